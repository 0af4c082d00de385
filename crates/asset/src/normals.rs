//! Smooth per-vertex normals from triangle topology.

use glam::Vec3;

use crate::mesh::{Bounds, Vertex};

/// Normal given to vertices that no triangle touches (or whose incident
/// face normals cancel out).
pub(crate) const FALLBACK_NORMAL: Vec3 = Vec3::Y;

/// Overwrite every vertex normal with the normalized sum of the face
/// normals of its incident triangles, and return the mesh's Y bounds.
///
/// Face normal of `(i0, i1, i2)` is `normalize((p2 - p1) × (p0 - p1))`, so
/// reversing the winding flips every normal. Degenerate triangles have no
/// direction and contribute nothing.
///
/// Indices must be in range; [`MeshData::from_raw`] checks that first.
///
/// [`MeshData::from_raw`]: crate::mesh::MeshData::from_raw
pub(crate) fn estimate_normals(vertices: &mut [Vertex], indices: &[u16]) -> Bounds {
    let mut acc = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vec3::from(vertices[i0].position);
        let p1 = Vec3::from(vertices[i1].position);
        let p2 = Vec3::from(vertices[i2].position);

        let face = (p2 - p1).cross(p0 - p1).normalize_or_zero();
        acc[i0] += face;
        acc[i1] += face;
        acc[i2] += face;
    }

    let mut isolated = 0usize;
    for (vertex, sum) in vertices.iter_mut().zip(acc) {
        let n = sum.try_normalize().unwrap_or_else(|| {
            isolated += 1;
            FALLBACK_NORMAL
        });
        vertex.normal = n.to_array();
    }
    if isolated > 0 {
        log::debug!("{isolated} vertices without a usable face normal; using +Y");
    }

    Bounds::from_vertices(vertices)
}
