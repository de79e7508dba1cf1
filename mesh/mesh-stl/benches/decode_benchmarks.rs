//! Benchmarks for STL decoding.
//!
//! Run with: cargo bench -p mesh-stl
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-stl -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-stl -- --baseline main

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mesh_stl::{
    decode_stl, sniff, write_stl_ascii, write_stl_binary, Facet, TriangleSoup, DEFAULT_LOOKAHEAD,
};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// A flat grid of `side * side` quads, two facets each.
fn create_grid(side: usize) -> TriangleSoup {
    let step = 1.0 / side as f32;
    let facets = (0..side).flat_map(|i| {
        (0..side).flat_map(move |j| {
            let (x0, y0) = (i as f32 * step, j as f32 * step);
            let (x1, y1) = (x0 + step, y0 + step);
            [
                Facet::from_arrays([0.0, 0.0, 1.0], [[x0, y0, 0.0], [x1, y0, 0.0], [x1, y1, 0.0]]),
                Facet::from_arrays([0.0, 0.0, 1.0], [[x0, y0, 0.0], [x1, y1, 0.0], [x0, y1, 0.0]]),
            ]
        })
    });
    TriangleSoup::from_facets(facets).unwrap()
}

fn encode(soup: &TriangleSoup) -> (Vec<u8>, Vec<u8>) {
    let mut binary = Vec::new();
    write_stl_binary(soup, &mut binary).unwrap();
    let mut ascii = Vec::new();
    write_stl_ascii(soup, &mut ascii, "grid").unwrap();
    (binary, ascii)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for side in [16usize, 64, 256] {
        let soup = create_grid(side);
        let (binary, ascii) = encode(&soup);
        group.throughput(Throughput::Elements(soup.facet_count() as u64));

        group.bench_with_input(BenchmarkId::new("binary", side), &binary, |b, bytes| {
            b.iter(|| decode_stl(Cursor::new(black_box(bytes.as_slice()))).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("ascii", side), &ascii, |b, bytes| {
            b.iter(|| decode_stl(Cursor::new(black_box(bytes.as_slice()))).unwrap());
        });
    }

    group.finish();
}

fn bench_sniff(c: &mut Criterion) {
    let (binary, ascii) = encode(&create_grid(8));

    for (name, bytes) in [("sniff_binary", &binary), ("sniff_ascii", &ascii)] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut cursor = Cursor::new(black_box(bytes.as_slice()));
                sniff(&mut cursor, DEFAULT_LOOKAHEAD).unwrap()
            });
        });
    }
}

criterion_group!(benches, bench_decode, bench_sniff);
criterion_main!(benches);
