//! Flat triangle-soup mesh.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::facet::sanitize_normal;
use crate::{Aabb, Facet, SoupError, SoupResult};

/// Floats per vertex position or normal.
pub const FLOATS_PER_VERTEX: usize = 3;

/// Vertices owned by each facet.
pub const VERTICES_PER_FACET: usize = 3;

/// Floats contributed by one facet to `vertices` (and to `normals`).
pub const FLOATS_PER_FACET: usize = FLOATS_PER_VERTEX * VERTICES_PER_FACET;

/// A triangle soup: every facet owns three unshared vertices.
///
/// The three arrays always satisfy
///
/// - `vertices.len() == normals.len() == indices.len() * 3`
/// - `vertices.len() % 9 == 0`
/// - `indices == [0, 1, 2, ..., indices.len() - 1]`
///
/// These are checked on construction and the arrays are not exposed
/// mutably afterwards, so a soup handed to a consumer is always well formed.
/// Use [`TriangleSoup::into_parts`] to take ownership of the buffers.
///
/// # Example
///
/// ```
/// use mesh_soup::TriangleSoup;
///
/// let soup = TriangleSoup::from_arrays(
///     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
///     vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
/// )
/// .unwrap();
///
/// assert_eq!(soup.facet_count(), 1);
/// assert_eq!(soup.vertex_count(), 3);
/// assert_eq!(soup.indices(), &[0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TriangleSoup {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl TriangleSoup {
    /// Create an empty soup.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Build a soup from flat vertex and per-vertex normal arrays.
    ///
    /// The identity index buffer is generated here.
    ///
    /// # Errors
    ///
    /// - [`SoupError::NormalCountMismatch`] if the arrays differ in length
    /// - [`SoupError::PartialFacet`] if the length is not a multiple of 9
    /// - [`SoupError::IndexOverflow`] if there are more than `u32::MAX` vertices
    pub fn from_arrays(vertices: Vec<f32>, normals: Vec<f32>) -> SoupResult<Self> {
        if vertices.len() != normals.len() {
            return Err(SoupError::NormalCountMismatch {
                vertices: vertices.len(),
                normals: normals.len(),
            });
        }
        if vertices.len() % FLOATS_PER_FACET != 0 {
            return Err(SoupError::PartialFacet {
                len: vertices.len(),
            });
        }

        let indices = identity_indices(vertices.len() / FLOATS_PER_VERTEX)?;
        Ok(Self {
            vertices,
            normals,
            indices,
        })
    }

    /// Build a soup from facets, replicating each (sanitized) normal per vertex.
    ///
    /// # Errors
    ///
    /// Returns [`SoupError::IndexOverflow`] if the facets need more vertices
    /// than a `u32` index can address.
    pub fn from_facets<I>(facets: I) -> SoupResult<Self>
    where
        I: IntoIterator<Item = Facet>,
    {
        let facets = facets.into_iter();
        let (lower, _) = facets.size_hint();
        let mut vertices = Vec::with_capacity(lower * FLOATS_PER_FACET);
        let mut normals = Vec::with_capacity(lower * FLOATS_PER_FACET);

        for facet in facets {
            let n = sanitize_normal(facet.normal);
            for v in &facet.vertices {
                vertices.extend_from_slice(&[v.x, v.y, v.z]);
                normals.extend_from_slice(&[n.x, n.y, n.z]);
            }
        }

        Self::from_arrays(vertices, normals)
    }

    /// Flat vertex positions, `[x0, y0, z0, x1, ...]`.
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Flat per-vertex normals, aligned with [`TriangleSoup::vertices`].
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Identity index buffer.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of facets.
    #[inline]
    #[must_use]
    pub fn facet_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_FACET
    }

    /// Number of vertices (three per facet).
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Check if the soup has no facets.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Get a facet by index.
    ///
    /// The returned normal is the one stored for the facet's first vertex;
    /// all three stored copies are identical.
    #[must_use]
    pub fn facet(&self, index: usize) -> Option<Facet> {
        let start = index.checked_mul(FLOATS_PER_FACET)?;
        let v = self.vertices.get(start..start.checked_add(FLOATS_PER_FACET)?)?;
        let n = self.normals.get(start..start + FLOATS_PER_VERTEX)?;

        Some(Facet::new(
            Vector3::new(n[0], n[1], n[2]),
            [
                Point3::new(v[0], v[1], v[2]),
                Point3::new(v[3], v[4], v[5]),
                Point3::new(v[6], v[7], v[8]),
            ],
        ))
    }

    /// Iterate over all facets in input order.
    pub fn facets(&self) -> impl ExactSizeIterator<Item = Facet> + '_ {
        self.vertices
            .chunks_exact(FLOATS_PER_FACET)
            .zip(self.normals.chunks_exact(FLOATS_PER_FACET))
            .map(|(v, n)| {
                Facet::new(
                    Vector3::new(n[0], n[1], n[2]),
                    [
                        Point3::new(v[0], v[1], v[2]),
                        Point3::new(v[3], v[4], v[5]),
                        Point3::new(v[6], v[7], v[8]),
                    ],
                )
            })
    }

    /// Compute the axis-aligned bounding box of all vertices.
    ///
    /// Returns an empty AABB for an empty soup.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for p in self.vertices.chunks_exact(FLOATS_PER_VERTEX) {
            aabb.expand_to_include(&Point3::new(p[0], p[1], p[2]));
        }
        aabb
    }

    /// Take ownership of the `(vertices, normals, indices)` buffers.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<u32>) {
        (self.vertices, self.normals, self.indices)
    }
}

/// Generate `0, 1, ..., vertex_count - 1`.
fn identity_indices(vertex_count: usize) -> SoupResult<Vec<u32>> {
    let end = u32::try_from(vertex_count).map_err(|_| SoupError::IndexOverflow { vertex_count })?;
    Ok((0..end).collect())
}
