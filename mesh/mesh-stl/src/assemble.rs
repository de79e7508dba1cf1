//! Accumulation of decoded facet data into a triangle soup.

use mesh_soup::{sanitize_normal, TriangleSoup, Vector3, FLOATS_PER_FACET, VERTICES_PER_FACET};
use tracing::{info, warn};

use crate::error::StlResult;

/// Growable vertex/normal buffers filled by one decoder run.
///
/// Normals are pushed once per facet and stored once per vertex.
/// Nothing here enforces three vertices per facet; [`FacetAccumulator::finish`]
/// rejects buffers that do not line up.
#[derive(Debug, Default)]
pub(crate) struct FacetAccumulator {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    sanitized_normals: usize,
}

impl FacetAccumulator {
    /// Empty accumulator with room for `facets` facets.
    pub(crate) fn with_capacity(facets: usize) -> Self {
        let floats = facets.saturating_mul(FLOATS_PER_FACET);
        Self {
            vertices: Vec::with_capacity(floats),
            normals: Vec::with_capacity(floats),
            sanitized_normals: 0,
        }
    }

    /// Record a facet normal for each of the facet's three vertices.
    ///
    /// A normal with any NaN or infinite component is stored as `(0, 0, 0)`.
    pub(crate) fn push_normal(&mut self, normal: [f32; 3]) {
        let raw = Vector3::from(normal);
        let n = sanitize_normal(raw);
        // Finite input comes back unchanged; NaN never compares equal.
        if n != raw {
            self.sanitized_normals += 1;
        }
        for _ in 0..VERTICES_PER_FACET {
            self.normals.extend_from_slice(n.as_slice());
        }
    }

    /// Record one vertex position.
    pub(crate) fn push_vertex(&mut self, vertex: [f32; 3]) {
        self.vertices.extend_from_slice(&vertex);
    }

    /// Number of vertices recorded so far.
    pub(crate) fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of normals that had to be replaced by the zero vector.
    #[cfg(test)]
    pub(crate) const fn sanitized_normals(&self) -> usize {
        self.sanitized_normals
    }

    /// Finalize into a soup with an identity index buffer.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StlError::Geometry`] if the vertex and normal buffers
    /// differ in length or do not hold whole facets.
    pub(crate) fn finish(mut self) -> StlResult<TriangleSoup> {
        if self.sanitized_normals > 0 {
            warn!(
                count = self.sanitized_normals,
                "STL contains NaN or infinite normals, replaced with zero vectors"
            );
        }
        self.vertices.shrink_to_fit();
        self.normals.shrink_to_fit();
        let soup = TriangleSoup::from_arrays(self.vertices, self.normals)?;
        info!(
            facets = soup.facet_count(),
            vertices = soup.vertex_count(),
            "assembled STL mesh"
        );
        Ok(soup)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::StlError;
    use mesh_soup::SoupError;

    fn push_unit_facet(acc: &mut FacetAccumulator) {
        acc.push_normal([0.0, 0.0, 1.0]);
        acc.push_vertex([0.0, 0.0, 0.0]);
        acc.push_vertex([1.0, 0.0, 0.0]);
        acc.push_vertex([0.0, 1.0, 0.0]);
    }

    #[test]
    fn single_facet() {
        let mut acc = FacetAccumulator::default();
        push_unit_facet(&mut acc);
        assert_eq!(acc.vertex_count(), 3);

        let soup = acc.finish().unwrap();
        assert_eq!(soup.vertices(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(soup.normals(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(soup.indices(), &[0, 1, 2]);
    }

    #[test]
    fn empty_is_valid() {
        let soup = FacetAccumulator::with_capacity(10).finish().unwrap();
        assert!(soup.is_empty());
    }

    #[test]
    fn bad_normal_is_zeroed_whole() {
        let mut acc = FacetAccumulator::default();
        acc.push_normal([f32::NAN, 1.0, 2.0]);
        acc.push_normal([3.0, f32::NEG_INFINITY, 4.0]);
        acc.push_normal([1.0, 0.0, 0.0]);
        assert_eq!(acc.sanitized_normals(), 2);
        assert!(acc.normals[..18].iter().all(|&n| n == 0.0));
        assert_eq!(&acc.normals[18..21], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn extra_vertex_is_rejected() {
        let mut acc = FacetAccumulator::default();
        push_unit_facet(&mut acc);
        acc.push_vertex([5.0, 5.0, 5.0]);
        let err = acc.finish().unwrap_err();
        assert!(matches!(
            err,
            StlError::Geometry(SoupError::NormalCountMismatch {
                vertices: 12,
                normals: 9
            })
        ));
    }

    #[test]
    fn missing_normal_is_rejected() {
        let mut acc = FacetAccumulator::default();
        for _ in 0..3 {
            acc.push_vertex([1.0, 2.0, 3.0]);
        }
        assert!(matches!(acc.finish(), Err(StlError::Geometry(_))));
    }
}
