//! Parameters for STL decoding.

use crate::sniff::{ASCII_MARKERS, DEFAULT_LOOKAHEAD};

/// How the binary decoder treats a header facet count that disagrees with
/// the number of complete records in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FacetCountPolicy {
    /// Keep every complete record present, whatever the header says.
    /// A truncated file yields fewer facets, an over-long one more.
    #[default]
    Clip,
    /// Fail with [`crate::StlError::InvalidFacetCount`] on any mismatch.
    Strict,
}

/// Parameters for STL decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlParams {
    /// Number of leading bytes inspected to tell ASCII from binary.
    /// Default: 300
    pub lookahead: usize,

    /// Handling of declared vs. actual binary facet counts.
    /// Default: [`FacetCountPolicy::Clip`]
    pub facet_count_policy: FacetCountPolicy,
}

impl Default for StlParams {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            facet_count_policy: FacetCountPolicy::Clip,
        }
    }
}

impl StlParams {
    /// Create params that reject binary files whose facet count is off.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            facet_count_policy: FacetCountPolicy::Strict,
            ..Default::default()
        }
    }

    /// Set the sniffing window.
    ///
    /// Clamped so the window can always hold the longest ASCII marker.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        let min = ASCII_MARKERS.iter().map(|m| m.len()).max().unwrap_or(0);
        self.lookahead = lookahead.max(min);
        self
    }

    /// Set the facet count policy.
    #[must_use]
    pub const fn with_facet_count_policy(mut self, policy: FacetCountPolicy) -> Self {
        self.facet_count_policy = policy;
        self
    }
}
