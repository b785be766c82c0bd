//! Procedural primitive meshes and the cache that shares them between objects.
//!
//! Primitives are generated at unit size and scaled by the owning object's
//! transform: the box is a unit cube, the sphere has radius 1 and the cylinder
//! is one unit tall with radii expressed as ratios of its height.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};
use log::debug;

use super::mesh::{TriMesh, VboMesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Box,
    Cylinder,
    Sphere,
}

/// Cache key: shape kind, segment count and the bit patterns of any extra
/// shape parameters (cylinder radius ratios).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveKey {
    pub kind: PrimitiveKind,
    pub segments: u32,
    params: [u32; 2],
}

impl PrimitiveKey {
    pub fn cube() -> Self {
        Self {
            kind: PrimitiveKind::Box,
            segments: 0,
            params: [0; 2],
        }
    }

    pub fn sphere(segments: u32) -> Self {
        Self {
            kind: PrimitiveKind::Sphere,
            segments,
            params: [0; 2],
        }
    }

    pub fn cylinder(top_ratio: f32, bottom_ratio: f32, segments: u32) -> Self {
        Self {
            kind: PrimitiveKind::Cylinder,
            segments,
            params: [top_ratio.to_bits(), bottom_ratio.to_bits()],
        }
    }

    fn generate(&self) -> TriMesh {
        match self.kind {
            PrimitiveKind::Box => cube_mesh(),
            PrimitiveKind::Sphere => sphere_mesh(self.segments),
            PrimitiveKind::Cylinder => cylinder_mesh(
                f32::from_bits(self.params[0]),
                f32::from_bits(self.params[1]),
                self.segments,
            ),
        }
    }
}

/// Explicit store of generated primitive meshes, passed to the object
/// constructors that need one.
#[derive(Debug, Default)]
pub struct PrimitiveMeshCache {
    meshes: HashMap<PrimitiveKey, VboMesh>,
}

impl PrimitiveMeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached mesh for `key`, generating it on first use.
    pub fn get_or_create(&mut self, key: PrimitiveKey) -> VboMesh {
        self.meshes
            .entry(key)
            .or_insert_with(|| {
                debug!("generating primitive mesh {key:?}");
                VboMesh::new(key.generate())
            })
            .clone()
    }

    pub fn cube(&mut self) -> VboMesh {
        self.get_or_create(PrimitiveKey::cube())
    }

    pub fn sphere(&mut self, segments: u32) -> VboMesh {
        self.get_or_create(PrimitiveKey::sphere(segments))
    }

    pub fn cylinder(&mut self, top_ratio: f32, bottom_ratio: f32, segments: u32) -> VboMesh {
        self.get_or_create(PrimitiveKey::cylinder(top_ratio, bottom_ratio, segments))
    }

    pub fn contains(&self, key: &PrimitiveKey) -> bool {
        self.meshes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Drops the cache's references; meshes still held by objects stay alive.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

/// Unit cube centered on the origin, four vertices per face.
pub fn cube_mesh() -> TriMesh {
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut mesh = TriMesh::default();
    for (normal, u_axis, v_axis) in FACES {
        let base = mesh.positions.len() as u32;
        for (u, v) in CORNERS {
            mesh.positions
                .push((normal + u_axis * u + v_axis * v) * 0.5);
            mesh.normals.push(normal);
            mesh.tex_coords.push(Vec2::new((u + 1.0) * 0.5, (v + 1.0) * 0.5));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// UV sphere of radius 1 with `segments` slices and `segments / 2` stacks.
pub fn sphere_mesh(segments: u32) -> TriMesh {
    let slices = segments.max(3);
    let stacks = (segments / 2).max(2);

    let mut mesh = TriMesh::default();
    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * TAU;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.positions.push(normal);
            mesh.normals.push(normal);
            mesh.tex_coords.push(Vec2::new(u, v));
        }
    }

    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            mesh.indices
                .extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Capped cylinder one unit tall along Y with the given top and bottom radii.
pub fn cylinder_mesh(top_radius: f32, bottom_radius: f32, segments: u32) -> TriMesh {
    let slices = segments.max(3);
    let slope = bottom_radius - top_radius;

    let mut mesh = TriMesh::default();
    for slice in 0..=slices {
        let u = slice as f32 / slices as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = Vec3::new(cos, slope, sin).normalize_or_zero();
        mesh.positions
            .push(Vec3::new(cos * bottom_radius, -0.5, sin * bottom_radius));
        mesh.positions
            .push(Vec3::new(cos * top_radius, 0.5, sin * top_radius));
        mesh.normals.extend_from_slice(&[normal, normal]);
        mesh.tex_coords
            .extend_from_slice(&[Vec2::new(u, 1.0), Vec2::new(u, 0.0)]);
    }
    for slice in 0..slices {
        let a = slice * 2;
        mesh.indices
            .extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }

    for (y, radius, normal) in [(0.5, top_radius, Vec3::Y), (-0.5, bottom_radius, Vec3::NEG_Y)] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, y, 0.0));
        mesh.normals.push(normal);
        mesh.tex_coords.push(Vec2::splat(0.5));
        for slice in 0..slices {
            let (sin, cos) = (slice as f32 / slices as f32 * TAU).sin_cos();
            mesh.positions.push(Vec3::new(cos * radius, y, sin * radius));
            mesh.normals.push(normal);
            mesh.tex_coords
                .push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 + 0.5));
        }
        for slice in 0..slices {
            let current = center + 1 + slice;
            let next = center + 1 + (slice + 1) % slices;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, next, current]);
            } else {
                mesh.indices.extend_from_slice(&[center, current, next]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_spans_unit_extent() {
        let cube = cube_mesh();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.bounds().size(), Vec3::ONE);
    }

    #[test]
    fn sphere_vertices_lie_on_unit_radius() {
        let sphere = sphere_mesh(12);
        assert!(sphere
            .positions
            .iter()
            .all(|p| (p.length() - 1.0).abs() < 1e-5));
        assert_eq!(sphere.triangle_count(), 12 * 6 * 2);
    }

    #[test]
    fn cylinder_uses_radius_ratios() {
        let cylinder = cylinder_mesh(0.25, 0.5, 8);
        let bounds = cylinder.bounds();
        assert!((bounds.size().y - 1.0).abs() < 1e-6);
        assert!((bounds.max.x - 0.5).abs() < 1e-6);
        assert!(cylinder.indices.iter().all(|&i| (i as usize) < cylinder.vertex_count()));
    }

    #[test]
    fn cache_generates_each_key_once() {
        let mut cache = PrimitiveMeshCache::new();
        let a = cache.sphere(16);
        let b = cache.sphere(16);
        let c = cache.sphere(8);

        assert!(a.shares_buffer_with(&b));
        assert!(!a.shares_buffer_with(&c));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cylinder_keys_distinguish_radii() {
        let mut cache = PrimitiveMeshCache::new();
        let narrow = cache.cylinder(0.1, 0.1, 16);
        let wide = cache.cylinder(0.5, 0.5, 16);
        assert!(!narrow.shares_buffer_with(&wide));
        assert!(cache.contains(&PrimitiveKey::cylinder(0.1, 0.1, 16)));
    }
}
