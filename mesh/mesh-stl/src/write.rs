//! STL encoding of triangle soups.
//!
//! Facet normals are written as stored (the copy on the facet's first
//! vertex), not recomputed, so decoding a written file reproduces the soup.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mesh_soup::TriangleSoup;

use crate::ascii::{FACET_NORMAL, VERTEX};
use crate::binary::HEADER_SIZE;
use crate::error::StlResult;

/// Solid name used when the requested one cannot be written safely.
const FALLBACK_SOLID_NAME: &str = "mesh";

/// Header text of binary files written here.
const BINARY_HEADER_TEXT: &[u8] = b"binary STL written by mesh-stl";

/// Save a soup to an STL file.
///
/// # Arguments
///
/// * `soup` - The mesh to save
/// * `path` - Output file path
/// * `binary` - If true, save as binary STL; if false, save as ASCII
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_stl<P: AsRef<Path>>(soup: &TriangleSoup, path: P, binary: bool) -> StlResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    if binary {
        write_stl_binary(soup, &mut writer)?;
    } else {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");
        write_stl_ascii(soup, &mut writer, name)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a soup as binary STL.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stl_binary<W: Write>(soup: &TriangleSoup, mut writer: W) -> StlResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    header[..BINARY_HEADER_TEXT.len()].copy_from_slice(BINARY_HEADER_TEXT);
    writer.write_all(&header)?;

    // A soup's u32 index buffer bounds its facet count well below u32::MAX.
    let facet_count = u32::try_from(soup.facet_count()).unwrap_or(u32::MAX);
    writer.write_all(&facet_count.to_le_bytes())?;

    for facet in soup.facets() {
        for c in facet.normal.iter() {
            writer.write_all(&c.to_le_bytes())?;
        }
        for v in &facet.vertices {
            for c in v.coords.iter() {
                writer.write_all(&c.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Write a soup as ASCII STL under the given solid name.
///
/// Floats use Rust's shortest round-trip exponent form, so every value
/// parses back to the same bits. Only the first line of `name` is used, and a
/// name containing `vertex` or `facet normal` is replaced by `mesh` since the
/// decoder would read it as data.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stl_ascii<W: Write>(soup: &TriangleSoup, mut writer: W, name: &str) -> StlResult<()> {
    let name = solid_name(name);
    writeln!(writer, "solid {name}")?;

    for facet in soup.facets() {
        let n = facet.normal;
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

fn solid_name(name: &str) -> &str {
    let name = name.lines().next().unwrap_or("").trim();
    if name.contains(VERTEX) || name.contains(FACET_NORMAL) {
        FALLBACK_SOLID_NAME
    } else {
        name
    }
}
