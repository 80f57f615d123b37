//! Command implementations and argument parsing for the dendro CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use dendro_core::{
    ClusterData, DendroBuilder, DendroConfig, DendroError, Dendrogram, Details, Linkage, NodeId,
    NodeRecord, Session,
};
use dendro_providers::{DEFAULT_DELIMITER, DenseTextProvider, ProviderError, SparseTextProvider};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "dendro",
    about = "Flatten a cluster tree and resolve node details."
)]
pub struct Cli {
    /// Maximum number of columns reported for a sparse node.
    #[arg(
        long = "sparse-detail-limit",
        global = true,
        default_value_t = DendroBuilder::new().sparse_detail_limit(),
        allow_negative_numbers = true,
    )]
    pub sparse_detail_limit: i64,

    /// Rule used to merge clusters while building the tree.
    #[arg(long, global = true, value_enum, default_value_t = LinkageArg::Average)]
    pub linkage: LinkageArg,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Stream every node record in rank order as JSON lines.
    Flatten(FlattenCommand),
    /// Print the details of selected nodes.
    Details(DetailsCommand),
}

/// Options accepted by the `flatten` command.
#[derive(Debug, Args, Clone)]
pub struct FlattenCommand {
    /// Input table.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Options accepted by the `details` command.
#[derive(Debug, Args, Clone)]
pub struct DetailsCommand {
    /// Input table.
    #[command(flatten)]
    pub input: InputArgs,

    /// Node identifiers to resolve, as printed by `flatten`.
    #[arg(long = "id", required = true)]
    pub ids: Vec<u64>,
}

/// Input table arguments shared by every command.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Layout of the input file.
    #[arg(value_enum)]
    pub format: InputFormat,

    /// Path to the input file.
    pub path: PathBuf,

    /// Cell delimiter for dense input.
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,
}

/// Supported input layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Header line followed by delimited rows of cells.
    Dense,
    /// Tab-separated header followed by `column:weight` rows.
    Sparse,
}

/// Linkage rules accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkageArg {
    /// Closest members.
    Single,
    /// Farthest members.
    Complete,
    /// Mean over member pairs.
    Average,
}

impl From<LinkageArg> for Linkage {
    fn from(value: LinkageArg) -> Self {
        match value {
            LinkageArg::Single => Self::Single,
            LinkageArg::Complete => Self::Complete,
            LinkageArg::Average => Self::Average,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while opening an input table.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Table ingestion failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Tree construction, flattening, or configuration failed.
    #[error(transparent)]
    Core(#[from] DendroError),
}

/// Result of executing a CLI command, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Node records in rank order.
    Records(Vec<NodeRecord>),
    /// Resolved details paired with the requested identifiers.
    Details(Vec<(NodeId, Details)>),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration, loading, or tree construction
/// fails. Unknown identifiers passed to `details` are not errors.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dendro_cli::cli::{Cli, Command, CommandOutput, FlattenCommand, InputArgs, InputFormat, LinkageArg, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "x\n0\n1\n10\n")?;
/// let cli = Cli {
///     sparse_detail_limit: 10,
///     linkage: LinkageArg::Single,
///     command: Command::Flatten(FlattenCommand {
///         input: InputArgs {
///             format: InputFormat::Dense,
///             path: file.path().to_path_buf(),
///             delimiter: '\t',
///         },
///     }),
/// };
/// let CommandOutput::Records(records) = run_cli(cli)? else {
///     panic!("flatten returns records");
/// };
/// assert_eq!(records.len(), 5);
/// assert_eq!(records[0].child_distance(), 9.0);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, linkage = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    let config = DendroBuilder::new()
        .with_sparse_detail_limit(cli.sparse_detail_limit)
        .with_linkage(cli.linkage.into())
        .build()?;
    let span = Span::current();
    span.record("linkage", field::display(config.linkage()));

    match cli.command {
        Command::Flatten(command) => {
            span.record("command", field::display("flatten"));
            run_flatten(command, &config)
        }
        Command::Details(command) => {
            span.record("command", field::display("details"));
            run_details(command, &config)
        }
    }
}

pub(super) fn run_flatten(
    command: FlattenCommand,
    config: &DendroConfig,
) -> Result<CommandOutput, CliError> {
    let session = open_session(&command.input, config)?;
    let records: Vec<NodeRecord> = session.ranked().cloned().collect();
    info!(records = records.len(), "flatten completed");
    Ok(CommandOutput::Records(records))
}

pub(super) fn run_details(
    command: DetailsCommand,
    config: &DendroConfig,
) -> Result<CommandOutput, CliError> {
    let session = open_session(&command.input, config)?;
    let resolver = session.resolver();
    let details: Vec<(NodeId, Details)> = command
        .ids
        .into_iter()
        .map(NodeId::new)
        .map(|id| (id, resolver.resolve(id)))
        .collect();
    let missing = details
        .iter()
        .filter(|(_, details)| details.is_not_found())
        .count();
    info!(queries = details.len(), missing, "details resolved");
    Ok(CommandOutput::Details(details))
}

#[instrument(
    name = "cli.open_session",
    err,
    skip(input, config),
    fields(path = %input.path.display(), format = ?input.format),
)]
pub(super) fn open_session(
    input: &InputArgs,
    config: &DendroConfig,
) -> Result<Session<Dendrogram>, CliError> {
    let data = load_table(input)?;
    Ok(Session::cluster(data, config)?)
}

pub(super) fn load_table(input: &InputArgs) -> Result<ClusterData, CliError> {
    let name = derive_table_name(&input.path);
    let reader = open_reader(&input.path)?;
    let data = match input.format {
        InputFormat::Dense => {
            DenseTextProvider::try_from_reader(name, reader, input.delimiter)?.into_data()
        }
        InputFormat::Sparse => SparseTextProvider::try_from_reader(name, reader)?.into_data(),
    };
    Ok(data)
}

pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "table".to_owned(), ToOwned::to_owned)
}

/// Renders `output` to `writer`.
///
/// Records are written one JSON object per line. Details are written as a
/// `node {id}` line followed by the tab-separated rendering of each node.
///
/// # Errors
/// Returns [`io::Error`] if serialisation or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dendro_cli::cli::{CommandOutput, render_output};
/// # use dendro_core::{Details, NodeId};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let output = CommandOutput::Details(vec![(NodeId::new(7), Details::NotFound(NodeId::new(7)))]);
/// let mut buffer = Vec::new();
/// render_output(&output, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "node 7\nno content for id 7\n");
/// # Ok(())
/// # }
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Records(records) => {
            for record in records {
                serde_json::to_writer(&mut writer, record)?;
                writer.write_all(b"\n")?;
            }
        }
        CommandOutput::Details(details) => {
            for (id, entry) in details {
                writeln!(writer, "node {id}")?;
                write!(writer, "{entry}")?;
            }
        }
    }
    Ok(())
}
