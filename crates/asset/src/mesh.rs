//! CPU-side mesh representation used by loaders.

use bytemuck::{Pod, Zeroable};

use crate::error::{AssetError, AssetResult};

/// Vertex with position/normal, tightly packed for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Byte distance between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `normal` within a vertex.
    pub const NORMAL_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: [0.0; 3],
        }
    }
}

/// Vertical extent of the mesh; drives the height gradient in the shaders.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// True min/max Y over `vertices`; zero for an empty slice.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut it = vertices.iter().map(|v| v.position[1]);
        let Some(first) = it.next() else {
            return Self::default();
        };
        let (min_y, max_y) = it.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
        Self { min_y, max_y }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Indexed triangle mesh. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub bounds: Bounds,
}

impl MeshData {
    /// Estimate smooth normals for `vertices` and capture the Y bounds.
    ///
    /// Fails with [`AssetError::MalformedResource`] unless `indices` holds
    /// whole triangles that all reference existing vertices.
    pub fn from_raw(mut vertices: Vec<Vertex>, indices: Vec<u16>) -> AssetResult<Self> {
        check_indices(&indices, vertices.len())?;
        let bounds = crate::normals::estimate_normals(&mut vertices, &indices);
        Ok(Self {
            vertices,
            indices,
            bounds,
        })
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }
}

/// Index count must be a multiple of 3 and every index below `vertex_count`.
pub(crate) fn check_indices(indices: &[u16], vertex_count: usize) -> AssetResult<()> {
    if indices.len() % 3 != 0 {
        return Err(AssetError::malformed(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some((pos, &bad)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| usize::from(i) >= vertex_count)
    {
        return Err(AssetError::malformed(format!(
            "index {bad} at position {pos} out of range for {vertex_count} vertices"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        assert_eq!(Vertex::NORMAL_OFFSET, 12);
        let v = [Vertex::at([1.0, 2.0, 3.0])];
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&v).len(), 24);
    }

    #[test]
    fn bounds_track_true_extrema() {
        let verts = [
            Vertex::at([0.0, 3.0, 0.0]),
            Vertex::at([0.0, 5.5, 0.0]),
            Vertex::at([0.0, 1.25, 0.0]),
        ];
        let b = Bounds::from_vertices(&verts);
        assert_eq!(b, Bounds { min_y: 1.25, max_y: 5.5 });
        assert_eq!(b.height(), 4.25);
    }

    #[test]
    fn bounds_of_empty_mesh_are_zero() {
        assert_eq!(Bounds::from_vertices(&[]), Bounds::default());
    }

    fn triangle() -> Vec<Vertex> {
        vec![
            Vertex::at([0.0, 0.0, 0.0]),
            Vertex::at([1.0, 0.0, 0.0]),
            Vertex::at([0.0, 2.0, 0.0]),
        ]
    }

    #[test]
    fn from_raw_builds_normals_and_bounds() {
        let mesh = MeshData::from_raw(triangle(), vec![0, 1, 2]).expect("valid triangle");
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.bounds, Bounds { min_y: 0.0, max_y: 2.0 });
        assert!(mesh.vertices.iter().all(|v| v.normal != [0.0; 3]));
    }

    #[test]
    fn from_raw_rejects_out_of_range_index() {
        let res = MeshData::from_raw(vec![Vertex::default()], vec![0, 1, 2]);
        assert!(matches!(res, Err(AssetError::MalformedResource(_))), "{res:?}");
    }

    #[test]
    fn from_raw_rejects_partial_triangle() {
        let res = MeshData::from_raw(triangle(), vec![0, 1, 2, 0, 1]);
        assert!(matches!(res, Err(AssetError::MalformedResource(_))), "{res:?}");
    }
}
