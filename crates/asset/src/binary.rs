//! Loader for the teapot's raw binary mesh format.
//!
//! Fixed, unversioned layout with no magic number. All integers and floats
//! are little-endian:
//!
//! ```text
//! i32 position_bytes
//! f32 x 3 per vertex           (position_bytes bytes)
//! i32 index_bytes
//! u16 per index, 3 per triangle (index_bytes bytes)
//! ```
//!
//! Trailing bytes after the index block are ignored.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use crate::{
    error::{AssetError, AssetResult},
    mesh::{MeshData, Vertex, check_indices},
};

const F32_SIZE: usize = 4;
const U16_SIZE: usize = 2;
const POSITION_SIZE: usize = 3 * F32_SIZE;

/// Load a mesh from a file path and estimate its normals.
pub fn load_mesh_from_path(path: impl AsRef<Path>) -> AssetResult<MeshData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AssetError::from_open(path, e))?;
    let mesh = load_mesh_from_reader(BufReader::new(file))?;
    log::info!(
        "Loaded mesh {:?}: {} vertices, {} triangles, y in [{}, {}]",
        path,
        mesh.vertices.len(),
        mesh.triangle_count(),
        mesh.bounds.min_y,
        mesh.bounds.max_y
    );
    Ok(mesh)
}

/// Load a mesh from any [`Read`] implementation.
pub fn load_mesh_from_reader<R: Read>(mut reader: R) -> AssetResult<MeshData> {
    let (vertices, indices) = read_raw(&mut reader)?;
    MeshData::from_raw(vertices, indices)
}

/// Convenience helper for in-memory resources.
pub fn load_mesh_from_bytes(bytes: &[u8]) -> AssetResult<MeshData> {
    load_mesh_from_reader(io::Cursor::new(bytes))
}

/// Positions (normals zeroed) and validated indices, without normal estimation.
pub fn read_raw<R: Read>(reader: &mut R) -> AssetResult<(Vec<Vertex>, Vec<u16>)> {
    let position_bytes = read_block(reader, F32_SIZE, "position")?;
    if position_bytes.len() % POSITION_SIZE != 0 {
        return Err(AssetError::malformed(format!(
            "position block of {} bytes does not hold whole xyz triples",
            position_bytes.len()
        )));
    }
    let vertices: Vec<Vertex> = position_bytes
        .chunks_exact(POSITION_SIZE)
        .map(|p| Vertex::at([le_f32(&p[0..4]), le_f32(&p[4..8]), le_f32(&p[8..12])]))
        .collect();

    let index_bytes = read_block(reader, U16_SIZE, "index")?;
    let indices: Vec<u16> = index_bytes
        .chunks_exact(U16_SIZE)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    check_indices(&indices, vertices.len())?;

    Ok((vertices, indices))
}

/// Read one length-prefixed block whose payload is made of `elem_size`-byte
/// elements.
fn read_block<R: Read>(reader: &mut R, elem_size: usize, what: &str) -> AssetResult<Vec<u8>> {
    let mut prefix = [0u8; 4];
    reader
        .read_exact(&mut prefix)
        .map_err(|e| eof_as_malformed(e, || format!("missing {what} block length")))?;

    let declared = i32::from_le_bytes(prefix);
    let len = usize::try_from(declared).map_err(|_| {
        AssetError::malformed(format!("negative {what} block length {declared}"))
    })?;
    if len % elem_size != 0 {
        return Err(AssetError::malformed(format!(
            "{what} block length {len} is not a multiple of {elem_size}"
        )));
    }

    // Read through `take` so a bogus length cannot force a huge allocation.
    let mut buf = Vec::new();
    reader.take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(AssetError::malformed(format!(
            "{what} block declares {len} bytes but only {} are available",
            buf.len()
        )));
    }
    Ok(buf)
}

fn eof_as_malformed(err: io::Error, msg: impl FnOnce() -> String) -> AssetError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        AssetError::malformed(msg())
    } else {
        AssetError::Io(err)
    }
}

#[inline]
fn le_f32(b: &[u8]) -> f32 {
    f32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
