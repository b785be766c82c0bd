//! Collision shape factory.
//!
//! Builds engine shapes from plain geometry parameters. Sizes, radii and
//! segment counts are passed through unchecked; only failures the engine
//! reports through its API come back as [`ShapeError`].

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use log::warn;
use rapier3d::geometry::SharedShape;
use rapier3d::math::{Isometry, Point, Real};
use rapier3d::na::DMatrix;
use serde::{Deserialize, Serialize};

use super::mesh::TriMesh;
use super::terrain::{luminance, HeightField};
use super::types::UpAxis;
use crate::error::ShapeError;
use crate::utils::convert::{to_isometry, to_physics_point, to_physics_vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Cylinder,
    Sphere,
    ConvexHull,
    ConcaveMesh,
    Heightfield,
}

/// Engine collision shape plus its placement relative to the body origin.
///
/// Owned by the caller until it is moved into
/// [`create_body`](super::rigidbody::create_body).
#[derive(Clone)]
pub struct CollisionShape {
    kind: ShapeKind,
    shape: SharedShape,
    offset: Isometry<Real>,
    margin: Option<f32>,
}

impl std::fmt::Debug for CollisionShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionShape")
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("margin", &self.margin)
            .finish()
    }
}

impl CollisionShape {
    fn new(kind: ShapeKind, shape: SharedShape) -> Self {
        Self {
            kind,
            shape,
            offset: Isometry::identity(),
            margin: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    /// Pose of the shape in its body's local frame.
    pub fn offset(&self) -> &Isometry<Real> {
        &self.offset
    }

    /// Contact margin requested for concave meshes.
    pub fn margin(&self) -> Option<f32> {
        self.margin
    }
}

/// Parameters of a heightfield terrain shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldParams {
    /// Number of samples along X.
    pub stick_width: u32,
    /// Number of samples along Z.
    pub stick_length: u32,
    pub min_height: f32,
    pub max_height: f32,
    pub up_axis: UpAxis,
    pub scale: Vec3,
}

impl HeightfieldParams {
    /// Covers the whole field with unit scale and a `[0, 1]` height range.
    pub fn for_field(field: &impl HeightField) -> Self {
        Self {
            stick_width: field.width(),
            stick_length: field.height(),
            min_height: 0.0,
            max_height: 1.0,
            up_axis: UpAxis::Y,
            scale: Vec3::ONE,
        }
    }
}

/// Box with full edge lengths `size`.
pub fn create_box(size: Vec3) -> CollisionShape {
    let half = size * 0.5;
    CollisionShape::new(ShapeKind::Box, SharedShape::cuboid(half.x, half.y, half.z))
}

/// Y-aligned cylinder. Unequal radii produce a convex frustum sampled with
/// `segments` points per ring.
pub fn create_cylinder(
    top_radius: f32,
    bottom_radius: f32,
    height: f32,
    segments: u32,
) -> Result<CollisionShape, ShapeError> {
    let half_height = height * 0.5;
    if top_radius == bottom_radius {
        return Ok(CollisionShape::new(
            ShapeKind::Cylinder,
            SharedShape::cylinder(half_height, top_radius),
        ));
    }

    let slices = segments.max(3);
    let points: Vec<Point<Real>> = (0..slices)
        .flat_map(|slice| {
            let (sin, cos) = (slice as f32 / slices as f32 * TAU).sin_cos();
            [
                Point::new(cos * top_radius, half_height, sin * top_radius),
                Point::new(cos * bottom_radius, -half_height, sin * bottom_radius),
            ]
        })
        .collect();
    let shape = SharedShape::convex_hull(&points).ok_or(ShapeError::DegenerateHull {
        points: points.len(),
    })?;
    Ok(CollisionShape::new(ShapeKind::Cylinder, shape))
}

pub fn create_sphere(radius: f32) -> CollisionShape {
    CollisionShape::new(ShapeKind::Sphere, SharedShape::ball(radius))
}

/// Convex hull around the mesh vertices scaled per axis.
pub fn create_hull(mesh: &TriMesh, scale: Vec3) -> Result<CollisionShape, ShapeError> {
    let points = scaled_points(mesh, scale);
    let shape = SharedShape::convex_hull(&points).ok_or(ShapeError::DegenerateHull {
        points: points.len(),
    })?;
    Ok(CollisionShape::new(ShapeKind::ConvexHull, shape))
}

/// Triangle mesh shape; the engine builds the bounding volume hierarchy.
pub fn create_concave_mesh(
    mesh: &TriMesh,
    scale: Vec3,
    margin: f32,
) -> Result<CollisionShape, ShapeError> {
    if mesh.indices.len() % 3 != 0 {
        return Err(ShapeError::InvalidIndexCount(mesh.indices.len()));
    }
    let triangles: Vec<[u32; 3]> = mesh
        .indices
        .chunks_exact(3)
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();
    let shape = SharedShape::trimesh(scaled_points(mesh, scale), triangles)
        .map_err(|err| ShapeError::TriMesh(format!("{err:?}")))?;

    let mut collision = CollisionShape::new(ShapeKind::ConcaveMesh, shape);
    collision.margin = Some(margin);
    Ok(collision)
}

/// Heightfield sampled from the same grid the terrain mesh is built from.
///
/// Grid points land on the terrain mesh vertices `(x - W/2, h, y - H/2)`
/// once `params.scale` is applied, so both surfaces agree at every sample.
/// A non-Y `up_axis` turns the shape within its body frame.
pub fn create_heightfield_terrain(
    field: &impl HeightField,
    params: &HeightfieldParams,
) -> CollisionShape {
    let columns = params.stick_width as usize;
    let rows = params.stick_length as usize;
    if params.stick_width > field.width() || params.stick_length > field.height() {
        warn!(
            "heightfield sticks {}x{} exceed the {}x{} source, edge samples repeat",
            params.stick_width,
            params.stick_length,
            field.width(),
            field.height()
        );
    }

    let max_x = field.width().saturating_sub(1);
    let max_y = field.height().saturating_sub(1);
    let heights = DMatrix::from_fn(rows, columns, |row, column| {
        let x = (column as u32).min(max_x);
        let y = (row as u32).min(max_y);
        luminance(field.pixel(x, y))
            .max(params.min_height)
            .min(params.max_height)
    });

    let scale = params.scale;
    let extent = Vec3::new(
        columns.saturating_sub(1) as f32 * scale.x,
        scale.y,
        rows.saturating_sub(1) as f32 * scale.z,
    );
    let shape = SharedShape::heightfield(heights, to_physics_vector(extent));

    // The engine centers the grid on the origin; sample `j` has to land on
    // the render vertex at `j - W/2` instead.
    let rotation: Quat = params.up_axis.rotation_from_y();
    let center = Vec3::new(
        (columns.saturating_sub(1) as f32 * 0.5 - field.width() as f32 * 0.5) * scale.x,
        0.0,
        (rows.saturating_sub(1) as f32 * 0.5 - field.height() as f32 * 0.5) * scale.z,
    );

    let mut collision = CollisionShape::new(ShapeKind::Heightfield, shape);
    collision.offset = to_isometry(rotation * center, rotation);
    collision
}

fn scaled_points(mesh: &TriMesh, scale: Vec3) -> Vec<Point<Real>> {
    mesh.positions
        .iter()
        .map(|&p| to_physics_point(p * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_uses_half_extents() {
        let shape = create_box(Vec3::new(2.0, 4.0, 6.0));
        let cuboid = shape.shape().as_cuboid().expect("cuboid");
        assert_eq!(cuboid.half_extents.x, 1.0);
        assert_eq!(cuboid.half_extents.y, 2.0);
        assert_eq!(cuboid.half_extents.z, 3.0);
    }

    #[test]
    fn equal_radii_build_a_true_cylinder() {
        let shape = create_cylinder(0.5, 0.5, 2.0, 16).expect("cylinder");
        let cylinder = shape.shape().as_cylinder().expect("cylinder shape");
        assert_eq!(cylinder.half_height, 1.0);
        assert_eq!(cylinder.radius, 0.5);
    }

    #[test]
    fn tapered_cylinder_falls_back_to_hull() {
        let shape = create_cylinder(0.25, 0.75, 1.0, 12).expect("frustum");
        assert_eq!(shape.kind(), ShapeKind::Cylinder);
        assert!(shape.shape().as_convex_polyhedron().is_some());
    }

    #[test]
    fn hull_vertices_are_scaled() {
        let corners: Vec<Vec3> = (0..8)
            .map(|i| {
                Vec3::new(
                    if i & 1 == 0 { -0.5 } else { 0.5 },
                    if i & 2 == 0 { -0.5 } else { 0.5 },
                    if i & 4 == 0 { -0.5 } else { 0.5 },
                )
            })
            .collect();
        let mesh = TriMesh::new(corners, Vec::new());
        let shape = create_hull(&mesh, Vec3::new(2.0, 1.0, 1.0)).expect("hull");
        let aabb = shape.shape().compute_local_aabb();
        assert!((aabb.maxs.x - 1.0).abs() < 1e-5);
        assert!((aabb.maxs.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn concave_mesh_rejects_partial_triangles() {
        let mesh = TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Z], vec![0, 1]);
        assert_eq!(
            create_concave_mesh(&mesh, Vec3::ONE, 0.04).unwrap_err(),
            ShapeError::InvalidIndexCount(2)
        );
    }
}
