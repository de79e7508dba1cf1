//! STL decoding into triangle soups.
//!
//! STL comes in two unrelated encodings: a line-oriented ASCII text and a
//! packed little-endian binary layout. This crate tells them apart from the
//! first few hundred bytes of the stream, runs the matching decoder and
//! assembles a [`TriangleSoup`]: flat vertex positions, one normal per
//! vertex (the facet normal repeated three times) and an identity index
//! buffer.
//!
//! # Pipeline
//!
//! ```text
//! sniff ──► ASCII decoder ──┐
//!       └─► binary decoder ─┴─► assembler ──► TriangleSoup
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mesh_stl::load_stl;
//!
//! let soup = load_stl("model.stl").unwrap();
//! println!("Loaded {} facets", soup.facet_count());
//! ```
//!
//! # Error handling
//!
//! Any failure rejects the whole input: a single malformed number in an
//! ASCII file, a binary file cut off inside a record, or a facet that does
//! not have exactly three vertices all yield an [`StlError`] and no mesh.
//! The one exception is a NaN or infinite normal in binary data, which is
//! replaced by `(0, 0, 0)` and logged.
//!
//! Binary files whose header facet count disagrees with the records present
//! are clipped to the records present by default. Use
//! [`StlParams::strict`] to reject them instead.
//!
//! # Logging
//!
//! Progress and anomalies are reported through [`tracing`]; install a
//! subscriber to see them.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod ascii;
mod assemble;
mod binary;
mod error;
mod params;
mod parser;
mod sniff;
mod source;
mod write;

use std::path::Path;

pub use binary::{HEADER_SIZE, PREAMBLE_SIZE, RECORD_SIZE};
pub use error::{StlError, StlErrorKind, StlResult};
pub use params::{FacetCountPolicy, StlParams};
pub use parser::{decode_stl, decode_stl_with, StlParser};
pub use sniff::{sniff, sniff_bytes, StlDialect, ASCII_MARKERS, DEFAULT_LOOKAHEAD};
pub use source::{AssetBundle, AssetSource, FileSource, MeshSource};
pub use write::{save_stl, write_stl_ascii, write_stl_binary};

pub use mesh_soup::{Facet, MeshSink, TriangleSoup};

/// Load an STL file with default parameters.
///
/// # Errors
///
/// Returns [`StlError::SourceNotFound`] if the file does not exist, or any
/// decoding error.
pub fn load_stl<P: AsRef<Path>>(path: P) -> StlResult<TriangleSoup> {
    StlParser::new(FileSource::new(path)).parse()
}

/// Load an STL file with explicit parameters.
///
/// # Errors
///
/// Same as [`load_stl`].
pub fn load_stl_with<P: AsRef<Path>>(path: P, params: &StlParams) -> StlResult<TriangleSoup> {
    StlParser::with_params(FileSource::new(path), params.clone()).parse()
}
