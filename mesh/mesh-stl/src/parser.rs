//! Dialect dispatch and the parser facade.

use std::io::{BufReader, Read, Seek, SeekFrom};

use mesh_soup::{MeshSink, TriangleSoup};
use tracing::{debug, info};

use crate::ascii::decode_ascii;
use crate::binary::decode_binary;
use crate::error::StlResult;
use crate::params::StlParams;
use crate::sniff::{sniff, StlDialect};
use crate::source::MeshSource;

/// Decode an STL stream with default parameters.
///
/// See [`decode_stl_with`].
///
/// # Errors
///
/// Returns an error if the stream cannot be read or is not valid STL.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use mesh_stl::decode_stl;
///
/// let text = "solid t
///   facet normal 0 0 1
///     outer loop
///       vertex 0 0 0
///       vertex 1 0 0
///       vertex 0 1 0
///     endloop
///   endfacet
/// endsolid t
/// ";
///
/// let soup = decode_stl(Cursor::new(text)).unwrap();
/// assert_eq!(soup.indices(), &[0, 1, 2]);
/// ```
pub fn decode_stl<R: Read + Seek>(reader: R) -> StlResult<TriangleSoup> {
    decode_stl_with(reader, &StlParams::default())
}

/// Decode an STL stream, detecting ASCII or binary automatically.
///
/// The stream is read from offset 0 regardless of its current position:
/// it is measured, rewound, sniffed, rewound again and handed to exactly one
/// decoder. The reader is consumed and dropped before returning, on success
/// and on error alike.
///
/// # Errors
///
/// Any [`crate::StlError`] other than `SourceNotFound`; see the variant docs.
pub fn decode_stl_with<R: Read + Seek>(
    mut reader: R,
    params: &StlParams,
) -> StlResult<TriangleSoup> {
    let len = reader.seek(SeekFrom::End(0))?;
    reader.rewind()?;

    let dialect = sniff(&mut reader, params.lookahead)?;
    info!(%dialect, bytes = len, "reading STL");

    let acc = match dialect {
        StlDialect::Ascii => decode_ascii(BufReader::new(reader))?,
        StlDialect::Binary => {
            decode_binary(BufReader::new(reader), params.facet_count_policy, Some(len))?
        }
    };
    acc.finish()
}

/// STL parser bound to a [`MeshSource`].
///
/// Each call opens the source afresh, so a parser can be reused and shared
/// between threads as long as the source allows it.
///
/// # Example
///
/// ```
/// use mesh_stl::{AssetBundle, StlParser, TriangleSoup};
///
/// let mut bundle = AssetBundle::new();
/// bundle.insert(
///     "tri",
///     b"solid t\nfacet normal 0 0 1\nouter loop\n\
///       vertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n\
///       endloop\nendfacet\nendsolid t\n"
///         .to_vec(),
/// );
///
/// let mut sink: Option<TriangleSoup> = None;
/// StlParser::new(bundle.source("tri")).parse_into(&mut sink).unwrap();
/// assert_eq!(sink.unwrap().facet_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StlParser<S> {
    source: S,
    params: StlParams,
}

impl<S: MeshSource> StlParser<S> {
    /// Create a parser with default parameters.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_params(source, StlParams::default())
    }

    /// Create a parser with explicit parameters.
    #[must_use]
    pub const fn with_params(source: S, params: StlParams) -> Self {
        Self { source, params }
    }

    /// The source this parser reads from.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The decoding parameters.
    #[must_use]
    pub const fn params(&self) -> &StlParams {
        &self.params
    }

    /// Detect the dialect without decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened or read.
    pub fn dialect(&self) -> StlResult<StlDialect> {
        let mut reader = self.source.open()?;
        Ok(sniff(&mut reader, self.params.lookahead)?)
    }

    /// Decode the source into a triangle soup.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be opened, read or decoded.
    pub fn parse(&self) -> StlResult<TriangleSoup> {
        debug!(source = %self.source.name(), "opening STL source");
        let reader = self.source.open()?;
        decode_stl_with(reader, &self.params)
    }

    /// Decode the source and hand the result to `sink`.
    ///
    /// The sink is only called on success.
    ///
    /// # Errors
    ///
    /// Same as [`StlParser::parse`].
    pub fn parse_into<K: MeshSink + ?Sized>(&self, sink: &mut K) -> StlResult<()> {
        let soup = self.parse()?;
        sink.set_data(soup);
        Ok(())
    }
}
