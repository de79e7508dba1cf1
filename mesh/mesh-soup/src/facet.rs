//! Facet type: one triangle as stored by STL.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One triangular face: a normal and three vertex positions.
///
/// The normal is whatever the source declared. STL only loosely requires it
/// to be a unit vector, so it is kept as given (apart from
/// [`Facet::sanitized_normal`]) and never recomputed from the vertices.
///
/// Vertices keep the source winding order.
///
/// # Example
///
/// ```
/// use mesh_soup::{Facet, Point3, Vector3};
///
/// let facet = Facet::new(
///     Vector3::new(0.0, 0.0, 1.0),
///     [
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
/// );
///
/// assert!((facet.area() - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facet {
    /// Declared facet normal.
    pub normal: Vector3<f32>,
    /// Vertex positions in source winding order.
    pub vertices: [Point3<f32>; 3],
}

impl Facet {
    /// Create a facet from a normal and three vertices.
    #[inline]
    #[must_use]
    pub const fn new(normal: Vector3<f32>, vertices: [Point3<f32>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Create a facet from plain arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_soup::Facet;
    ///
    /// let facet = Facet::from_arrays(
    ///     [0.0, 0.0, 1.0],
    ///     [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    /// );
    /// assert_eq!(facet.vertices[1].x, 1.0);
    /// ```
    #[must_use]
    pub fn from_arrays(normal: [f32; 3], vertices: [[f32; 3]; 3]) -> Self {
        Self {
            normal: Vector3::from(normal),
            vertices: vertices.map(Point3::from),
        }
    }

    /// Normal with any non-finite component collapsed to `(0, 0, 0)`.
    ///
    /// A single NaN or infinite component invalidates the whole vector, so
    /// the finite components are discarded as well.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_soup::{Facet, Vector3};
    ///
    /// let facet = Facet::from_arrays(
    ///     [f32::NAN, 1.0, 2.0],
    ///     [[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    /// );
    /// assert_eq!(facet.sanitized_normal(), Vector3::zeros());
    /// ```
    #[must_use]
    pub fn sanitized_normal(&self) -> Vector3<f32> {
        sanitize_normal(self.normal)
    }

    /// Normal computed from the vertices by the right-hand rule.
    ///
    /// Returns `None` for degenerate facets whose cross product vanishes.
    #[must_use]
    pub fn geometric_normal(&self) -> Option<Vector3<f32>> {
        let [v0, v1, v2] = self.vertices;
        let n = (v1 - v0).cross(&(v2 - v0));
        let len = n.norm();
        if len > f32::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Surface area of the facet.
    #[must_use]
    pub fn area(&self) -> f32 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }
}

/// Replace a normal containing NaN or infinity with the zero vector.
///
/// The whole vector is replaced, not just the offending components.
///
/// # Example
///
/// ```
/// use mesh_soup::{sanitize_normal, Vector3};
///
/// let n = sanitize_normal(Vector3::new(f32::NAN, 0.0, 1.0));
/// assert_eq!(n, Vector3::zeros());
/// ```
#[must_use]
pub fn sanitize_normal(normal: Vector3<f32>) -> Vector3<f32> {
    if normal.iter().all(|c| c.is_finite()) {
        normal
    } else {
        Vector3::zeros()
    }
}
