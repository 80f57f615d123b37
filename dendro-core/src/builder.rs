//! Builder utilities for configuring dendrogram sessions.
//!
//! Exposes the linkage selection surface and the validation applied to the
//! sparse detail limit before a [`DendroConfig`] is handed to
//! [`crate::Session`].

use crate::{
    detail::DEFAULT_SPARSE_DETAIL_LIMIT,
    error::{DendroError, Result},
    linkage::Linkage,
};

/// Validated session configuration.
///
/// # Examples
/// ```
/// use dendro_core::{DendroBuilder, Linkage};
///
/// let config = DendroBuilder::new()
///     .with_sparse_detail_limit(4)
///     .with_linkage(Linkage::Single)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.sparse_detail_limit(), 4);
/// assert_eq!(config.linkage(), Linkage::Single);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DendroConfig {
    sparse_detail_limit: usize,
    linkage: Linkage,
}

impl DendroConfig {
    /// Returns the maximum number of columns reported for a sparse node.
    #[must_use]
    pub const fn sparse_detail_limit(&self) -> usize {
        self.sparse_detail_limit
    }

    /// Returns the linkage rule used when a session builds its own tree.
    #[must_use]
    pub const fn linkage(&self) -> Linkage {
        self.linkage
    }
}

impl Default for DendroConfig {
    fn default() -> Self {
        Self {
            sparse_detail_limit: DEFAULT_SPARSE_DETAIL_LIMIT,
            linkage: Linkage::default(),
        }
    }
}

/// Configures and validates [`DendroConfig`] instances.
///
/// The limit is accepted as a signed value so configuration layers can pass
/// user input through unchanged and receive a validation error for negative
/// values.
#[derive(Debug, Clone)]
pub struct DendroBuilder {
    sparse_detail_limit: i64,
    linkage: Linkage,
}

impl Default for DendroBuilder {
    fn default() -> Self {
        Self {
            sparse_detail_limit: i64::try_from(DEFAULT_SPARSE_DETAIL_LIMIT).unwrap_or(i64::MAX),
            linkage: Linkage::default(),
        }
    }
}

impl DendroBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use dendro_core::{DendroBuilder, Linkage};
    ///
    /// let builder = DendroBuilder::new();
    /// assert_eq!(builder.sparse_detail_limit(), 10);
    /// assert_eq!(builder.linkage(), Linkage::Average);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the sparse detail limit.
    #[must_use]
    pub const fn with_sparse_detail_limit(mut self, limit: i64) -> Self {
        self.sparse_detail_limit = limit;
        self
    }

    /// Returns the configured sparse detail limit.
    #[must_use]
    pub const fn sparse_detail_limit(&self) -> i64 {
        self.sparse_detail_limit
    }

    /// Overrides the linkage rule.
    #[must_use]
    pub const fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Returns the configured linkage rule.
    #[must_use]
    pub const fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Validates the configuration.
    ///
    /// Limits larger than the columns available to a node are accepted and
    /// clamped when details are resolved.
    ///
    /// # Errors
    /// Returns [`DendroError::InvalidDetailLimit`] when the limit is negative.
    ///
    /// # Examples
    /// ```
    /// use dendro_core::{DendroBuilder, DendroError};
    ///
    /// let err = DendroBuilder::new().with_sparse_detail_limit(-1).build().unwrap_err();
    /// assert_eq!(err, DendroError::InvalidDetailLimit { got: -1 });
    /// ```
    pub fn build(self) -> Result<DendroConfig> {
        let sparse_detail_limit = usize::try_from(self.sparse_detail_limit).map_err(|_| {
            DendroError::InvalidDetailLimit {
                got: self.sparse_detail_limit,
            }
        })?;
        Ok(DendroConfig {
            sparse_detail_limit,
            linkage: self.linkage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(10, 10)]
    #[case(1_000, 1_000)]
    fn accepts_non_negative_limits(#[case] raw: i64, #[case] expected: usize) {
        let config = DendroBuilder::new()
            .with_sparse_detail_limit(raw)
            .build()
            .expect("non-negative limits are valid");
        assert_eq!(config.sparse_detail_limit(), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(i64::MIN)]
    fn rejects_negative_limits(#[case] raw: i64) {
        let err = DendroBuilder::new()
            .with_sparse_detail_limit(raw)
            .build()
            .expect_err("negative limits are invalid");
        assert_eq!(err, DendroError::InvalidDetailLimit { got: raw });
    }

    #[rstest]
    fn default_config_matches_builder_defaults() {
        let built = DendroBuilder::new().build().expect("defaults are valid");
        assert_eq!(built, DendroConfig::default());
    }

    #[rstest]
    fn default_limit_round_trips_through_signed_input() {
        let builder = DendroBuilder::new();
        assert_eq!(builder.sparse_detail_limit(), 10);
        let config = builder.build().expect("defaults are valid");
        assert_eq!(config.sparse_detail_limit(), DEFAULT_SPARSE_DETAIL_LIMIT);
    }
}
