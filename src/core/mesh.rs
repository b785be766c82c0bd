use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of a mesh's vertex positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::empty(), |bounds, &p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// CPU-side indexed triangle mesh: the input for hull and concave shapes and
/// the vertex data behind every [`VboMesh`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            ..Self::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }
}

/// Attribute layout of a renderable mesh buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VboLayout {
    pub has_positions: bool,
    pub has_normals: bool,
    pub has_tex_coords: bool,
    pub has_indices: bool,
}

impl VboLayout {
    fn describe(mesh: &TriMesh) -> Self {
        Self {
            has_positions: !mesh.positions.is_empty(),
            has_normals: !mesh.normals.is_empty(),
            has_tex_coords: !mesh.tex_coords.is_empty(),
            has_indices: !mesh.indices.is_empty(),
        }
    }
}

/// Renderable mesh buffer handed to the drawing code.
///
/// Clones share the same vertex data, which is how cached primitives are
/// reused across objects. The data is released when the last clone drops.
#[derive(Debug, Clone)]
pub struct VboMesh {
    layout: VboLayout,
    data: Arc<TriMesh>,
}

impl VboMesh {
    pub fn new(mesh: TriMesh) -> Self {
        Self {
            layout: VboLayout::describe(&mesh),
            data: Arc::new(mesh),
        }
    }

    pub fn layout(&self) -> VboLayout {
        self.layout
    }

    pub fn mesh(&self) -> &TriMesh {
        &self.data
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.data.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.data.normals
    }

    pub fn tex_coords(&self) -> &[Vec2] {
        &self.data.tex_coords
    }

    pub fn indices(&self) -> &[u32] {
        &self.data.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.data.vertex_count()
    }

    pub fn index_count(&self) -> usize {
        self.data.index_count()
    }

    /// Whether both meshes draw from the same vertex data.
    pub fn shares_buffer_with(&self, other: &VboMesh) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Number of live handles to this buffer.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reflects_present_attributes() {
        let mesh = TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
        let vbo = VboMesh::new(mesh);
        let layout = vbo.layout();

        assert!(layout.has_positions && layout.has_indices);
        assert!(!layout.has_normals && !layout.has_tex_coords);
    }

    #[test]
    fn clones_share_vertex_data() {
        let vbo = VboMesh::new(TriMesh::default());
        let clone = vbo.clone();
        assert!(vbo.shares_buffer_with(&clone));
        assert_eq!(vbo.share_count(), 2);
        drop(clone);
        assert_eq!(vbo.share_count(), 1);
    }

    #[test]
    fn empty_bounds_are_flagged() {
        assert!(Aabb::from_points(&[]).is_empty());
        let bounds = Aabb::from_points(&[Vec3::NEG_ONE, Vec3::ONE]);
        assert_eq!(bounds.center(), Vec3::ZERO);
        assert_eq!(bounds.size(), Vec3::splat(2.0));
    }
}
