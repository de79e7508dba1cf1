//! End-to-end decoding tests on files written to disk.
//!
//! Covers dialect detection, the one-facet reference mesh, bit-exact binary
//! decoding, normal sanitization, truncated streams and failure reporting.
//!
//! To run: cargo test -p mesh-stl --test stl_conformance

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use mesh_stl::{
    load_stl, load_stl_with, sniff_bytes, FileSource, StlDialect, StlError, StlErrorKind,
    StlParams, StlParser, TriangleSoup,
};
use tempfile::{tempdir, TempDir};

// =============================================================================
// Fixture helpers
// =============================================================================

const REFERENCE_ASCII: &str = "solid reference
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid reference
";

/// One binary record: normal then three vertices, attribute bytes zero.
type Record = [f32; 12];

fn binary_stl(declared: u32, records: &[Record]) -> Vec<u8> {
    let mut buf: Vec<u8> = (0..80u8).map(|i| i.wrapping_mul(151) ^ 0xA5).collect();
    buf.extend_from_slice(&declared.to_le_bytes());
    for record in records {
        for value in record {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf.extend_from_slice(&[0, 0]);
    }
    buf
}

fn ascii_cube_strip(facets: usize) -> String {
    let mut text = String::from("solid strip\n");
    for i in 0..facets {
        let x = i as f32;
        text.push_str("  facet normal 0 0 1\n    outer loop\n");
        text.push_str(&format!("      vertex {x} 0 0\n"));
        text.push_str(&format!("      vertex {} 0 0\n", x + 1.0));
        text.push_str(&format!("      vertex {x} 1 0\n"));
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid strip\n");
    text
}

fn record(i: usize) -> Record {
    let o = i as f32;
    [
        0.0, 0.0, 1.0, //
        o, 0.0, 0.0, //
        o + 1.0, 0.0, 0.0, //
        o, 1.0, 0.0,
    ]
}

fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("failed to write fixture");
    path
}

fn assert_soup_layout(soup: &TriangleSoup, facets: usize) {
    assert_eq!(soup.facet_count(), facets);
    assert_eq!(soup.vertices().len(), 9 * facets);
    assert_eq!(soup.normals().len(), 9 * facets);
    assert_eq!(soup.indices().len(), 3 * facets);
    let expected: Vec<u32> = (0..u32::try_from(3 * facets).unwrap()).collect();
    assert_eq!(soup.indices(), &expected[..]);
}

fn load(path: &Path) -> TriangleSoup {
    load_stl(path).unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()))
}

// =============================================================================
// Dialect detection
// =============================================================================

#[test]
fn test_sniff_ascii_prefix() {
    assert_eq!(
        sniff_bytes(b"solid cube\nfacet normal 0 0 1\nouter loop\n..."),
        StlDialect::Ascii
    );
}

#[test]
fn test_sniff_binary_garbage() {
    let bytes = binary_stl(7, &[]);
    assert_eq!(bytes.len(), 84);
    assert_eq!(sniff_bytes(&bytes), StlDialect::Binary);
}

#[test]
fn test_parser_reports_dialect() {
    let dir = tempdir().unwrap();
    let ascii = write_fixture(&dir, "a.stl", REFERENCE_ASCII.as_bytes());
    let binary = write_fixture(&dir, "b.stl", &binary_stl(1, &[record(0)]));

    assert_eq!(
        StlParser::new(FileSource::new(&ascii)).dialect().unwrap(),
        StlDialect::Ascii
    );
    assert_eq!(
        StlParser::new(FileSource::new(&binary)).dialect().unwrap(),
        StlDialect::Binary
    );
}

// =============================================================================
// ASCII decoding
// =============================================================================

#[test]
fn test_reference_facet() {
    let dir = tempdir().unwrap();
    let soup = load(&write_fixture(&dir, "ref.stl", REFERENCE_ASCII.as_bytes()));

    assert_eq!(soup.vertices(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(soup.normals(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    assert_eq!(soup.indices(), &[0, 1, 2]);
}

#[test]
fn test_ascii_many_facets() {
    let dir = tempdir().unwrap();
    let soup = load(&write_fixture(&dir, "strip.stl", ascii_cube_strip(50).as_bytes()));

    assert_soup_layout(&soup, 50);
    let last = soup.facet(49).unwrap();
    assert_eq!(last.vertices[1].x, 50.0);
    assert_relative_eq!(last.area(), 0.5);
    assert_relative_eq!(soup.bounds().max.x, 50.0);
}

#[test]
fn test_ascii_crlf_line_endings() {
    let dir = tempdir().unwrap();
    let text = REFERENCE_ASCII.replace('\n', "\r\n");
    let soup = load(&write_fixture(&dir, "crlf.stl", text.as_bytes()));
    assert_soup_layout(&soup, 1);
}

#[test]
fn test_ascii_malformed_number_rejects_file() {
    let dir = tempdir().unwrap();
    let text = ascii_cube_strip(3).replace("vertex 2 0 0", "vertex 2 0 zero");
    let path = write_fixture(&dir, "bad.stl", text.as_bytes());

    let err = load_stl(&path).unwrap_err();
    assert_eq!(err.kind(), StlErrorKind::MalformedNumeric);
    assert!(matches!(err, StlError::MalformedNumeric { ref field, .. } if field == "zero"));
}

#[test]
fn test_ascii_wrong_vertex_count_rejects_file() {
    let dir = tempdir().unwrap();
    let text = REFERENCE_ASCII.replace("vertex 0 1 0\n", "");
    let err = load_stl(write_fixture(&dir, "short.stl", text.as_bytes())).unwrap_err();
    assert!(matches!(err, StlError::Geometry(_)));
}

// =============================================================================
// Binary decoding
// =============================================================================

#[test]
fn test_binary_bit_exact() {
    let records = [
        [
            0.0,
            -0.0,
            1.0,
            f32::MIN_POSITIVE,
            f32::MAX,
            -1.5e-38,
            0.1,
            0.2,
            0.3,
            1.0e20,
            -7.0,
            f32::EPSILON,
        ],
        record(3),
    ];
    let dir = tempdir().unwrap();
    let soup = load(&write_fixture(&dir, "exact.stl", &binary_stl(2, &records)));

    assert_soup_layout(&soup, 2);
    for (f, rec) in records.iter().enumerate() {
        for v in 0..3 {
            for c in 0..3 {
                let stored = soup.vertices()[f * 9 + v * 3 + c];
                assert_eq!(stored.to_bits(), rec[3 + v * 3 + c].to_bits());
                let normal = soup.normals()[f * 9 + v * 3 + c];
                assert_eq!(normal.to_bits(), rec[c].to_bits());
            }
        }
    }
}

#[test]
fn test_binary_nan_normal_sanitized() {
    let mut bad = record(0);
    bad[0] = f32::NAN;
    bad[1] = 1.0;
    bad[2] = 2.0;

    let dir = tempdir().unwrap();
    let soup = load(&write_fixture(&dir, "nan.stl", &binary_stl(2, &[bad, record(1)])));

    assert_eq!(&soup.normals()[..9], &[0.0; 9]);
    assert_eq!(&soup.vertices()[..9], &bad[3..]);
    assert_eq!(&soup.normals()[9..12], &[0.0, 0.0, 1.0]);
}

#[test]
fn test_binary_truncated_is_clipped_by_default() {
    let records: Vec<Record> = (0..3).map(record).collect();
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "trunc.stl", &binary_stl(10, &records));

    let soup = load(&path);
    assert_soup_layout(&soup, 3);
    assert_eq!(soup.facet(2).unwrap().vertices[0].x, 2.0);
}

#[test]
fn test_binary_truncated_is_rejected_when_strict() {
    let records: Vec<Record> = (0..3).map(record).collect();
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "trunc.stl", &binary_stl(10, &records));

    let err = load_stl_with(&path, &StlParams::strict()).unwrap_err();
    assert!(matches!(
        err,
        StlError::InvalidFacetCount {
            expected: 10,
            got: 3
        }
    ));
}

#[test]
fn test_binary_cut_inside_record() {
    let mut bytes = binary_stl(2, &[record(0), record(1)]);
    bytes.pop();
    let dir = tempdir().unwrap();
    let err = load_stl(write_fixture(&dir, "cut.stl", &bytes)).unwrap_err();
    assert!(matches!(err, StlError::UnexpectedEof { position: 183 }));
}

#[test]
fn test_binary_header_claiming_billions() {
    let dir = tempdir().unwrap();
    let path = write_fixture(&dir, "huge.stl", &binary_stl(u32::MAX, &[record(0)]));
    assert_soup_layout(&load(&path), 1);
}

// =============================================================================
// Failures and concurrency
// =============================================================================

#[test]
fn test_missing_file() {
    let err = load_stl("nonexistent_file_12345.stl").unwrap_err();
    assert_eq!(err.kind(), StlErrorKind::SourceNotFound);
    if let StlError::SourceNotFound { source_name } = err {
        assert!(source_name.contains("nonexistent"));
    }
}

#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    let err = load_stl(write_fixture(&dir, "empty.stl", &[])).unwrap_err();
    assert!(matches!(err, StlError::InvalidHeader { got: 0, .. }));
}

#[test]
fn test_parallel_parses_are_independent() {
    let dir = tempdir().unwrap();
    let ascii = write_fixture(&dir, "a.stl", ascii_cube_strip(20).as_bytes());
    let records: Vec<Record> = (0..30).map(record).collect();
    let binary = write_fixture(&dir, "b.stl", &binary_stl(30, &records));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = if i % 2 == 0 { &ascii } else { &binary };
                scope.spawn(move || load_stl(path).map(|s| s.facet_count()))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let facets = handle.join().unwrap().unwrap();
            assert_eq!(facets, if i % 2 == 0 { 20 } else { 30 });
        }
    });
}
