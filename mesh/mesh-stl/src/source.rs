//! Where STL bytes come from.
//!
//! A [`MeshSource`] hands out a fresh, seekable stream at offset 0 each time
//! it is opened. Two sources are provided: a file on disk and a named asset
//! from an in-memory [`AssetBundle`] (for meshes packaged with an
//! application).

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{StlError, StlResult};

/// A resource that can be opened as a seekable byte stream.
pub trait MeshSource {
    /// Stream type handed out by [`MeshSource::open`].
    type Reader: Read + Seek;

    /// Open a new stream positioned at offset 0.
    ///
    /// # Errors
    ///
    /// Returns [`StlError::SourceNotFound`] if the resource does not exist,
    /// or [`StlError::Io`] if it exists but cannot be opened.
    fn open(&self) -> StlResult<Self::Reader>;

    /// Human-readable name for diagnostics.
    fn name(&self) -> String;
}

impl<S: MeshSource + ?Sized> MeshSource for &S {
    type Reader = S::Reader;

    fn open(&self) -> StlResult<Self::Reader> {
        (**self).open()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// An STL file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path. Nothing is opened yet.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeshSource for FileSource {
    type Reader = File;

    fn open(&self) -> StlResult<File> {
        File::open(&self.path).map_err(|e| StlError::from_open(e, self.path.display().to_string()))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Named in-memory assets, typically meshes embedded in a binary.
///
/// # Example
///
/// ```
/// use mesh_stl::{AssetBundle, MeshSource};
///
/// let mut bundle = AssetBundle::new();
/// bundle.insert("models/tri", b"solid t\nendsolid t\n".to_vec());
///
/// assert!(bundle.source("models/tri").open().is_ok());
/// assert!(bundle.source("models/missing").open().is_err());
/// ```
#[derive(Clone, Default)]
pub struct AssetBundle {
    assets: HashMap<String, Arc<[u8]>>,
}

impl AssetBundle {
    /// Create an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under an identifier, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.assets.insert(id.into(), bytes.into());
    }

    /// Check whether an identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.assets.contains_key(id)
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check whether the bundle is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// A source for the given identifier.
    ///
    /// The identifier is resolved when the source is opened, not here.
    #[must_use]
    pub fn source(&self, id: impl Into<String>) -> AssetSource<'_> {
        AssetSource {
            bundle: self,
            id: id.into(),
        }
    }
}

impl fmt::Debug for AssetBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.assets.keys().collect();
        ids.sort();
        f.debug_struct("AssetBundle").field("assets", &ids).finish()
    }
}

/// An asset identifier resolved through an [`AssetBundle`].
#[derive(Debug, Clone)]
pub struct AssetSource<'a> {
    bundle: &'a AssetBundle,
    id: String,
}

impl AssetSource<'_> {
    /// The asset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl MeshSource for AssetSource<'_> {
    type Reader = Cursor<Arc<[u8]>>;

    fn open(&self) -> StlResult<Self::Reader> {
        self.bundle
            .assets
            .get(&self.id)
            .map(|bytes| Cursor::new(Arc::clone(bytes)))
            .ok_or_else(|| StlError::SourceNotFound {
                source_name: self.id.clone(),
            })
    }

    fn name(&self) -> String {
        format!("asset:{}", self.id)
    }
}
