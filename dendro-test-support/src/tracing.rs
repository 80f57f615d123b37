//! In-memory capture of `tracing` output for assertions.
//!
//! Install a [`RecordingLayer`] on a registry with
//! `tracing::subscriber::with_default`, run the code under test, then inspect
//! the spans that closed and the events that fired. Field values are stored as
//! text: strings verbatim, everything else through its `Debug` rendering
//! (which for `%value` fields is the `Display` text).

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Field values of one span or event, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    /// Returns the text recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns whether `name` was recorded with exactly `value`.
    #[must_use]
    pub fn has(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    /// Returns the number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.0.insert(field.name().to_owned(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

/// A span that has closed, with every field it recorded while open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedSpan {
    /// Span name.
    pub name: &'static str,
    /// Fields from creation plus any later `Span::record` calls.
    pub fields: Fields,
}

/// An event as it was emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Module path or explicit target.
    pub target: String,
    /// Event fields, `message` included.
    pub fields: Fields,
}

impl CapturedEvent {
    /// Returns the event's message, if it has one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message")
    }
}

#[derive(Debug, Default)]
struct Journal {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

/// Layer that keeps closed spans and events in memory.
///
/// Clones share storage, so keep one clone for assertions and hand another to
/// the subscriber.
///
/// # Examples
/// ```
/// use dendro_test_support::tracing::RecordingLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = RecordingLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let _span = tracing::info_span!("demo.work", items = 3_u64).entered();
///     tracing::info!(kind = "dense", "working");
/// });
///
/// let span = layer.span_named("demo.work").expect("span closed");
/// assert!(span.fields.has("items", "3"));
/// let event = layer.event_with_message("working").expect("event fired");
/// assert!(event.fields.has("kind", "dense"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingLayer {
    journal: Arc<Mutex<Journal>>,
}

impl RecordingLayer {
    fn journal(&self) -> MutexGuard<'_, Journal> {
        // A panicking test thread must not hide what was captured before it.
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the closed spans in the order they closed.
    #[must_use]
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.journal().spans.clone()
    }

    /// Returns the events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.journal().events.clone()
    }

    /// Returns the first closed span called `name`.
    #[must_use]
    pub fn span_named(&self, name: &str) -> Option<CapturedSpan> {
        self.journal()
            .spans
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }

    /// Returns the first event whose message is `message`.
    #[must_use]
    pub fn event_with_message(&self, message: &str) -> Option<CapturedEvent> {
        self.journal()
            .events
            .iter()
            .find(|event| event.message() == Some(message))
            .cloned()
    }
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<Fields>() {
            values.record(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let metadata = event.metadata();
        self.journal().events.push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            fields,
        });
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let fields = span.extensions_mut().remove::<Fields>().unwrap_or_default();
        self.journal().spans.push(CapturedSpan {
            name: span.name(),
            fields,
        });
    }
}
