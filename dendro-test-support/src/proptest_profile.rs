//! Property-test run profile shared by the dendro property suites.
//!
//! Case counts and process forking can be overridden from the environment so
//! CI can run longer suites without touching the tests.

use std::env;

/// Environment variable controlling proptest case counts.
pub const DENDRO_PBT_CASES_ENV_KEY: &str = "DENDRO_PBT_CASES";
/// Environment variable controlling proptest process forking.
pub const DENDRO_PBT_FORK_ENV_KEY: &str = "DENDRO_PBT_FORK";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from environment variables with provided defaults.
    ///
    /// Invalid overrides are logged and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use dendro_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        let cases = read_env_or_default(DENDRO_PBT_CASES_ENV_KEY, default_cases, parse_cases);
        let fork = read_env_or_default(DENDRO_PBT_FORK_ENV_KEY, default_fork, parse_bool);
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    T: Copy,
    F: Fn(&str) -> Result<T, String>,
{
    match env::var(key) {
        Ok(raw) => match parser(&raw) {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(
                    env = key,
                    raw = %raw,
                    reason = %reason,
                    "invalid property-test profile override; using default",
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case(" 250 ", Ok(250))]
    #[case("0", Err(()))]
    #[case("-1", Err(()))]
    #[case("abc", Err(()))]
    fn parse_cases_accepts_positive_integers(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_cases(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case("true", Ok(true))]
    #[case("YES", Ok(true))]
    #[case("on", Ok(true))]
    #[case("0", Ok(false))]
    #[case("off", Ok(false))]
    #[case("maybe", Err(()))]
    #[case("", Err(()))]
    fn parse_bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: Result<bool, ()>) {
        assert_eq!(parse_bool(raw).map_err(|_| ()), expected);
    }
}
