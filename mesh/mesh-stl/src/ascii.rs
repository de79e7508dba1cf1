//! ASCII STL decoding.
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! Only `facet normal` and `vertex` lines carry data. Each holds exactly one
//! statement, so the numbers are simply the last three whitespace-separated
//! fields of the line. Everything else is skipped, and `endsolid` is not
//! required: decoding runs to the end of the stream.

use std::io::BufRead;

use tracing::debug;

use crate::assemble::FacetAccumulator;
use crate::error::{StlError, StlResult};

pub(crate) const FACET_NORMAL: &str = "facet normal";
pub(crate) const VERTEX: &str = "vertex";

/// Decode an ASCII STL body into an accumulator.
///
/// Lines are decoded lossily, so stray non-UTF-8 bytes in a solid name do
/// not fail the parse.
///
/// # Errors
///
/// - [`StlError::MalformedNumeric`] if a normal or vertex field is not a float
/// - [`StlError::MissingField`] if a data line has fewer than three fields
/// - [`StlError::Io`] if reading fails
pub(crate) fn decode_ascii<R: BufRead>(mut reader: R) -> StlResult<FacetAccumulator> {
    let mut acc = FacetAccumulator::default();
    let mut buf = Vec::with_capacity(128);
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = String::from_utf8_lossy(&buf);
        if let Some((_, fields)) = line.split_once(FACET_NORMAL) {
            acc.push_normal(trailing_triple(fields, line_no)?);
        } else if let Some((_, fields)) = line.split_once(VERTEX) {
            acc.push_vertex(trailing_triple(fields, line_no)?);
        }
    }

    debug!(lines = line_no, vertices = acc.vertex_count(), "decoded ASCII STL");
    Ok(acc)
}

/// Parse the last three whitespace-separated fields after a keyword as
/// `[x, y, z]`.
fn trailing_triple(fields: &str, line_no: usize) -> StlResult<[f32; 3]> {
    let mut fields = fields.split_whitespace().rev();
    let mut xyz = [0.0f32; 3];

    // Rightmost field is z.
    for slot in xyz.iter_mut().rev() {
        let field = fields
            .next()
            .ok_or(StlError::MissingField { line: line_no })?;
        *slot = field.parse().map_err(|source| StlError::MalformedNumeric {
            line: line_no,
            field: field.to_string(),
            source,
        })?;
    }

    Ok(xyz)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::unnecessary_raw_string_hashes
)]
mod tests {
    use super::*;
    use crate::StlErrorKind;

    fn decode(text: &str) -> StlResult<mesh_soup::TriangleSoup> {
        decode_ascii(text.as_bytes()).and_then(FacetAccumulator::finish)
    }

    #[test]
    fn single_facet() {
        let soup = decode(
            r#"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test"#,
        )
        .unwrap();

        assert_eq!(soup.vertices(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(soup.normals(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(soup.indices(), &[0, 1, 2]);
    }

    #[test]
    fn scientific_notation_and_tabs() {
        let soup = decode(
            "solid s\n\tfacet normal  0.000000e+00 -1.0E0\t0\n outer loop\n\
             vertex 1.5e1 -2.5 3\nvertex\t4 5 6\n vertex 7 8 9\r\n endloop\nendfacet\n",
        )
        .unwrap();

        assert_eq!(&soup.normals()[..3], &[0.0, -1.0, 0.0]);
        assert_eq!(
            soup.vertices(),
            &[15.0, -2.5, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
    }

    #[test]
    fn missing_endsolid_is_fine() {
        let soup = decode(
            "solid s\nfacet normal 1 0 0\nouter loop\nvertex 0 0 0\nvertex 0 1 0\nvertex 0 0 1\n",
        )
        .unwrap();
        assert_eq!(soup.facet_count(), 1);
    }

    #[test]
    fn empty_solid() {
        let soup = decode("solid empty\nendsolid empty\n").unwrap();
        assert!(soup.is_empty());
    }

    #[test]
    fn malformed_number_aborts() {
        let err = decode(
            "solid s\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 zero 0\nvertex 0 1 0\n",
        )
        .unwrap_err();

        assert_eq!(err.kind(), StlErrorKind::MalformedNumeric);
        match err {
            StlError::MalformedNumeric { line, field, .. } => {
                assert_eq!(line, 5);
                assert_eq!(field, "zero");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_normal_line_is_missing_a_field() {
        let err = decode("solid s\nfacet normal 0 1\n").unwrap_err();
        assert!(matches!(err, StlError::MissingField { line: 2 }));
        assert_eq!(err.kind(), StlErrorKind::MalformedNumeric);
    }

    #[test]
    fn too_few_fields() {
        let err = decode("vertex 1\n").unwrap_err();
        assert!(matches!(err, StlError::MissingField { line: 1 }));

        let err = decode("  vertex\n").unwrap_err();
        assert!(matches!(err, StlError::MissingField { line: 1 }));
    }

    #[test]
    fn extra_leading_fields_after_keyword_are_skipped() {
        let soup = decode("facet normal 7 0 0 1\nvertex v 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n")
            .unwrap();
        assert_eq!(&soup.normals()[..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn four_vertices_in_a_facet_is_rejected() {
        let err = decode(
            "facet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nvertex 1 1 0\nendloop\nendfacet\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), StlErrorKind::Structural);
    }

    #[test]
    fn non_finite_ascii_normal_is_zeroed() {
        let soup = decode("facet normal nan 0 inf\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n")
            .unwrap();
        assert_eq!(soup.normals(), &[0.0; 9]);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let soup = decode("FACET NORMAL 0 0 1\nVERTEX 0 0 0\n").unwrap();
        assert!(soup.is_empty());
    }

    #[test]
    fn non_utf8_name_is_tolerated() {
        let mut bytes = b"solid \xff\xfe\n".to_vec();
        bytes.extend_from_slice(
            b"facet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n",
        );
        let soup = decode_ascii(&bytes[..])
            .and_then(FacetAccumulator::finish)
            .unwrap();
        assert_eq!(soup.facet_count(), 1);
    }

    #[test]
    fn trailing_triple_reads_right_to_left() {
        assert_eq!(
            trailing_triple("   1 2 3  ", 1).unwrap(),
            [1.0, 2.0, 3.0]
        );
        assert_eq!(
            trailing_triple(" 4 9 -0.5 7", 1).unwrap(),
            [9.0, -0.5, 7.0]
        );
    }
}
