//! Error types for triangle-soup construction.

use thiserror::Error;

/// Result type for triangle-soup construction.
pub type SoupResult<T> = Result<T, SoupError>;

/// Layout invariants a triangle soup refused to accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoupError {
    /// Vertex and normal arrays differ in length.
    #[error("normal array length {normals} does not match vertex array length {vertices}")]
    NormalCountMismatch {
        /// Number of vertex floats.
        vertices: usize,
        /// Number of normal floats.
        normals: usize,
    },

    /// Vertex array does not describe a whole number of facets.
    #[error("vertex array length {len} is not a multiple of 9 (whole facets)")]
    PartialFacet {
        /// Number of vertex floats.
        len: usize,
    },

    /// More vertices than a `u32` index buffer can address.
    #[error("{vertex_count} vertices exceed the u32 index range")]
    IndexOverflow {
        /// Number of vertices.
        vertex_count: usize,
    },
}
