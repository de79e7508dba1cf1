//! Triangle-soup mesh types.
//!
//! This crate provides the output representation shared by the STL decoder
//! and whatever consumes its meshes:
//!
//! - [`TriangleSoup`] - Flat vertex/normal arrays with an identity index buffer
//! - [`Facet`] - One triangle: a normal plus three vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`MeshSink`] - Receiver of a finished mesh
//!
//! # Layout
//!
//! A triangle soup never shares vertices between facets. Every facet owns
//! three consecutive vertices, and the facet normal is repeated for each of
//! them so that `normals` lines up one-to-one with `vertices`:
//!
//! ```text
//! vertices: [x y z | x y z | x y z] [x y z | x y z | x y z] ...
//! normals:  [n n n | n n n | n n n] [n n n | n n n | n n n] ...
//! indices:  [  0   |   1   |   2  ] [  3   |   4   |   5  ] ...
//! ```
//!
//! # Example
//!
//! ```
//! use mesh_soup::{Facet, Point3, TriangleSoup, Vector3};
//!
//! let facet = Facet::new(
//!     Vector3::new(0.0, 0.0, 1.0),
//!     [
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//! );
//!
//! let soup = TriangleSoup::from_facets([facet]).unwrap();
//! assert_eq!(soup.facet_count(), 1);
//! assert_eq!(soup.indices(), &[0, 1, 2]);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod bounds;
mod error;
mod facet;
mod soup;
mod traits;

pub use bounds::Aabb;
pub use error::{SoupError, SoupResult};
pub use facet::{sanitize_normal, Facet};
pub use soup::{TriangleSoup, FLOATS_PER_FACET, FLOATS_PER_VERTEX, VERTICES_PER_FACET};
pub use traits::MeshSink;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
