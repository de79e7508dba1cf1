//! Traits for mesh consumers.

use crate::TriangleSoup;

/// Receiver of a finished mesh.
///
/// Decoders hand a soup to a sink only after it is complete and valid; a
/// failed decode never touches the sink. What the sink does with the mesh
/// (upload to the GPU, attach to a scene node, ...) is up to the implementor.
///
/// # Example
///
/// ```
/// use mesh_soup::{MeshSink, TriangleSoup};
///
/// struct Counter(usize);
///
/// impl MeshSink for Counter {
///     fn set_data(&mut self, soup: TriangleSoup) {
///         self.0 += soup.facet_count();
///     }
/// }
///
/// let mut counter = Counter(0);
/// counter.set_data(TriangleSoup::new());
/// assert_eq!(counter.0, 0);
/// ```
pub trait MeshSink {
    /// Take ownership of a finished mesh.
    fn set_data(&mut self, soup: TriangleSoup);
}

/// Keeps the most recent mesh.
impl MeshSink for Option<TriangleSoup> {
    fn set_data(&mut self, soup: TriangleSoup) {
        *self = Some(soup);
    }
}

/// Collects every mesh in arrival order.
impl MeshSink for Vec<TriangleSoup> {
    fn set_data(&mut self, soup: TriangleSoup) {
        self.push(soup);
    }
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn set_data(&mut self, soup: TriangleSoup) {
        (**self).set_data(soup);
    }
}
