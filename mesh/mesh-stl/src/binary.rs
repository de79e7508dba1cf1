//! Binary STL decoding.
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (skipped)
//! end
//! ```
//!
//! All values are little-endian. The header's triangle count only sizes the
//! initial allocation; records are read until the stream runs out.

use std::io::{ErrorKind, Read};

use tracing::{debug, warn};

use crate::assemble::FacetAccumulator;
use crate::error::{StlError, StlResult};
use crate::params::FacetCountPolicy;

/// STL binary header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Header plus the `u32` facet count.
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one facet record (normal + 3 vertices + attribute).
pub const RECORD_SIZE: usize = 50;

/// Preallocation limit when the stream length is unknown.
const UNKNOWN_LENGTH_FACET_CAP: u64 = 1 << 16;

/// Decode a binary STL stream positioned at offset 0.
///
/// `stream_len` (total bytes, if known) caps the preallocation so that a
/// bogus header count cannot trigger a huge allocation.
///
/// # Errors
///
/// - [`StlError::InvalidHeader`] if fewer than 84 bytes are available
/// - [`StlError::UnexpectedEof`] if the stream ends inside a record
/// - [`StlError::InvalidFacetCount`] on a count mismatch under
///   [`FacetCountPolicy::Strict`]
/// - [`StlError::Io`] if reading fails
pub(crate) fn decode_binary<R: Read>(
    mut reader: R,
    policy: FacetCountPolicy,
    stream_len: Option<u64>,
) -> StlResult<FacetAccumulator> {
    let mut preamble = [0u8; PREAMBLE_SIZE];
    let got = read_full(&mut reader, &mut preamble)?;
    if got < PREAMBLE_SIZE {
        return Err(StlError::InvalidHeader {
            expected: PREAMBLE_SIZE,
            got,
        });
    }

    let declared = u32::from_le_bytes([
        preamble[HEADER_SIZE],
        preamble[HEADER_SIZE + 1],
        preamble[HEADER_SIZE + 2],
        preamble[HEADER_SIZE + 3],
    ]);
    let hint = capacity_hint(declared, stream_len);
    debug!(declared, preallocated = hint, "binary STL header");

    let mut acc = FacetAccumulator::with_capacity(hint);
    let mut record = [0u8; RECORD_SIZE];
    let mut records: u64 = 0;

    loop {
        let n = read_full(&mut reader, &mut record)?;
        if n == 0 {
            break;
        }
        if n < RECORD_SIZE {
            return Err(StlError::UnexpectedEof {
                position: PREAMBLE_SIZE as u64 + records * RECORD_SIZE as u64 + n as u64,
            });
        }

        // All three normal floats are consumed even when the normal is
        // discarded, so the record stride never changes.
        acc.push_normal(read_vec3(&record[0..12]));
        acc.push_vertex(read_vec3(&record[12..24]));
        acc.push_vertex(read_vec3(&record[24..36]));
        acc.push_vertex(read_vec3(&record[36..48]));
        records += 1;
    }

    if records != u64::from(declared) {
        match policy {
            FacetCountPolicy::Strict => {
                return Err(StlError::InvalidFacetCount {
                    expected: declared,
                    got: records,
                });
            }
            FacetCountPolicy::Clip => {
                warn!(declared, read = records, "binary STL facet count mismatch");
            }
        }
    }

    Ok(acc)
}

/// Facets worth preallocating: the declared count, limited by what the
/// stream can actually hold.
fn capacity_hint(declared: u32, stream_len: Option<u64>) -> usize {
    let available = stream_len.map_or(UNKNOWN_LENGTH_FACET_CAP, |len| {
        len.saturating_sub(PREAMBLE_SIZE as u64) / RECORD_SIZE as u64
    });
    let facets = u64::from(declared).min(available);
    usize::try_from(facets).unwrap_or(usize::MAX)
}

/// Read three little-endian `f32`s from 12 bytes.
fn read_vec3(buf: &[u8]) -> [f32; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [x, y, z]
}

/// Fill `buf` as far as the stream allows, returning the bytes read.
///
/// Unlike `read_exact`, a short read at end of stream is reported as a count
/// rather than an error, so callers can tell a clean end (0) from a
/// truncated record.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use crate::StlErrorKind;
    use mesh_soup::TriangleSoup;

    fn stl_bytes(declared: u32, facets: &[([f32; 3], [[f32; 3]; 3])]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf.extend_from_slice(&declared.to_le_bytes());
        for (normal, verts) in facets {
            for c in normal {
                buf.extend_from_slice(&c.to_le_bytes());
            }
            for v in verts {
                for c in v {
                    buf.extend_from_slice(&c.to_le_bytes());
                }
            }
            buf.extend_from_slice(&0u16.to_le_bytes());
        }
        buf
    }

    fn unit(i: usize) -> ([f32; 3], [[f32; 3]; 3]) {
        let o = i as f32;
        (
            [0.0, 0.0, 1.0],
            [[o, 0.0, 0.0], [o + 1.0, 0.0, 0.0], [o, 1.0, 0.0]],
        )
    }

    fn decode(bytes: &[u8], policy: FacetCountPolicy) -> StlResult<TriangleSoup> {
        decode_binary(bytes, policy, Some(bytes.len() as u64)).and_then(FacetAccumulator::finish)
    }

    #[test]
    fn single_facet() {
        let bytes = stl_bytes(1, &[unit(0)]);
        assert_eq!(bytes.len(), PREAMBLE_SIZE + RECORD_SIZE);

        let soup = decode(&bytes, FacetCountPolicy::Clip).unwrap();
        assert_eq!(soup.vertices(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(soup.normals(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(soup.indices(), &[0, 1, 2]);
    }

    #[test]
    fn zero_facets() {
        let soup = decode(&stl_bytes(0, &[]), FacetCountPolicy::Strict).unwrap();
        assert!(soup.is_empty());
    }

    #[test]
    fn header_may_start_with_solid() {
        let mut bytes = stl_bytes(1, &[unit(0)]);
        bytes[..11].copy_from_slice(b"solid model");
        assert_eq!(decode(&bytes, FacetCountPolicy::Clip).unwrap().facet_count(), 1);
    }

    #[test]
    fn attribute_bytes_are_ignored() {
        let mut bytes = stl_bytes(1, &[unit(0)]);
        let n = bytes.len();
        bytes[n - 2..].copy_from_slice(&0xBEEFu16.to_le_bytes());
        let soup = decode(&bytes, FacetCountPolicy::Clip).unwrap();
        assert_eq!(soup.facet_count(), 1);
    }

    #[test]
    fn nan_normal_is_zeroed_without_shifting_vertices() {
        let mut bytes = stl_bytes(2, &[unit(0), unit(5)]);
        bytes[PREAMBLE_SIZE..PREAMBLE_SIZE + 4].copy_from_slice(&f32::NAN.to_le_bytes());

        let soup = decode(&bytes, FacetCountPolicy::Strict).unwrap();
        assert!(soup.normals()[..9].iter().all(|&n| n == 0.0));
        assert_eq!(&soup.normals()[9..12], &[0.0, 0.0, 1.0]);
        assert_eq!(&soup.vertices()[..9], &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&soup.vertices()[9..12], &[5.0, 0.0, 0.0]);
    }

    #[test]
    fn short_header() {
        let err = decode(&[0u8; 40], FacetCountPolicy::Clip).unwrap_err();
        assert!(matches!(err, StlError::InvalidHeader { expected: 84, got: 40 }));
        assert_eq!(err.kind(), StlErrorKind::Structural);
    }

    #[test]
    fn partial_trailing_record() {
        let mut bytes = stl_bytes(2, &[unit(0), unit(1)]);
        bytes.truncate(PREAMBLE_SIZE + RECORD_SIZE + 20);
        let err = decode(&bytes, FacetCountPolicy::Clip).unwrap_err();
        assert!(matches!(err, StlError::UnexpectedEof { position: 154 }));
    }

    #[test]
    fn truncated_stream_is_clipped() {
        let facets: Vec<_> = (0..3).map(unit).collect();
        let bytes = stl_bytes(10, &facets);

        let soup = decode(&bytes, FacetCountPolicy::Clip).unwrap();
        assert_eq!(soup.facet_count(), 3);
        assert_eq!(soup.vertices().len(), 27);
        assert_eq!(soup.indices().len(), 9);
    }

    #[test]
    fn truncated_stream_is_rejected_when_strict() {
        let facets: Vec<_> = (0..3).map(unit).collect();
        let bytes = stl_bytes(10, &facets);

        let err = decode(&bytes, FacetCountPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            StlError::InvalidFacetCount {
                expected: 10,
                got: 3
            }
        ));
    }

    #[test]
    fn extra_records_are_read() {
        let facets: Vec<_> = (0..4).map(unit).collect();
        let bytes = stl_bytes(2, &facets);

        let soup = decode(&bytes, FacetCountPolicy::Clip).unwrap();
        assert_eq!(soup.facet_count(), 4);
        assert_eq!(soup.indices(), &(0..12).collect::<Vec<u32>>()[..]);
        assert!(decode(&bytes, FacetCountPolicy::Strict).is_err());
    }

    #[test]
    fn capacity_hint_is_bounded() {
        assert_eq!(capacity_hint(10, Some((PREAMBLE_SIZE + 3 * RECORD_SIZE) as u64)), 3);
        assert_eq!(capacity_hint(2, Some(10_000)), 2);
        assert_eq!(capacity_hint(u32::MAX, Some(0)), 0);
        assert_eq!(capacity_hint(u32::MAX, None), 1 << 16);
    }

    #[test]
    fn read_full_handles_short_reads() {
        struct Trickle<'a>(&'a [u8]);
        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = buf.len().min(self.0.len()).min(3);
                buf[..n].copy_from_slice(&self.0[..n]);
                self.0 = &self.0[n..];
                Ok(n)
            }
        }

        let bytes = stl_bytes(2, &[unit(0), unit(1)]);
        let acc = decode_binary(Trickle(&bytes), FacetCountPolicy::Strict, None).unwrap();
        assert_eq!(acc.finish().unwrap().facet_count(), 2);
    }
}
