//! ASCII/binary dialect detection.
//!
//! Binary STL starts with an arbitrary 80-byte header that may well begin
//! with `solid`, so the leading keyword alone is not trusted. Instead the
//! first few hundred bytes must contain both `facet normal` and `outer loop`,
//! which every ASCII file has within its first facet.

use std::io::{Read, Seek, SeekFrom};

/// Bytes inspected by default.
pub const DEFAULT_LOOKAHEAD: usize = 300;

/// Substrings that must all appear in the window for ASCII.
pub const ASCII_MARKERS: [&str; 2] = ["facet normal", "outer loop"];

/// The two on-disk STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StlDialect {
    /// Line-oriented text.
    Ascii,
    /// Packed little-endian records.
    Binary,
}

impl std::fmt::Display for StlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ascii => "ASCII",
            Self::Binary => "binary",
        })
    }
}

/// Classify a prefix of an STL stream.
///
/// The whole slice is searched; callers pass at most their lookahead window.
///
/// # Example
///
/// ```
/// use mesh_stl::{sniff_bytes, StlDialect};
///
/// let text = b"solid cube\nfacet normal 0 0 1\nouter loop\n";
/// assert_eq!(sniff_bytes(text), StlDialect::Ascii);
///
/// // "solid" alone is not enough
/// assert_eq!(sniff_bytes(b"solid but binary"), StlDialect::Binary);
/// ```
#[must_use]
pub fn sniff_bytes(prefix: &[u8]) -> StlDialect {
    let text = String::from_utf8_lossy(prefix);
    if ASCII_MARKERS.iter().all(|marker| text.contains(marker)) {
        StlDialect::Ascii
    } else {
        StlDialect::Binary
    }
}

/// Classify a stream from its first `lookahead` bytes, then rewind it.
///
/// The stream is read from its current position and left at offset 0, the
/// start every decoder expects. Short streams are searched in full.
///
/// # Errors
///
/// Returns an error if reading or seeking fails.
pub fn sniff<R: Read + Seek>(reader: &mut R, lookahead: usize) -> std::io::Result<StlDialect> {
    let mut window = Vec::with_capacity(lookahead);
    reader
        .by_ref()
        .take(lookahead as u64)
        .read_to_end(&mut window)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(sniff_bytes(&window))
}
