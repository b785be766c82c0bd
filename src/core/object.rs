//! Collision objects: one simulated body paired with one renderable mesh.

use glam::{Mat4, Quat, Vec3};
use rapier3d::dynamics::{RigidBodyHandle, RigidBodySet};
use serde::{Deserialize, Serialize};

use super::mesh::{TriMesh, VboMesh};
use super::primitives::PrimitiveMeshCache;
use super::rigidbody::{create_body, RigidBodyDesc};
use super::shapes::{self, HeightfieldParams};
use super::terrain::{synthesize_terrain, HeightField};
use super::types::{Transform, UpAxis};
use crate::error::ShapeError;
use crate::utils::convert::from_isometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Box,
    Cylinder,
    Hull,
    Mesh,
    Sphere,
    Terrain,
}

/// Lifecycle of a collision object as seen by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectState {
    /// Built, body not yet inserted into a world.
    Constructed,
    Active,
    /// Age reached the lifespan; the owner decides what happens next.
    Expired,
}

pub(crate) enum SimulatedBody {
    Pending(Box<RigidBodyDesc>),
    Attached {
        handle: RigidBodyHandle,
        exclusive: bool,
    },
}

pub struct CollisionObject {
    kind: ObjectKind,
    age: f64,
    lifespan: Option<f64>,
    transform: Transform,
    body: SimulatedBody,
    vbo_mesh: VboMesh,
}

impl CollisionObject {
    fn from_desc(kind: ObjectKind, desc: RigidBodyDesc, vbo_mesh: VboMesh, scale: Vec3) -> Self {
        let motion = desc.motion_state();
        Self {
            kind,
            age: 0.0,
            lifespan: None,
            transform: Transform::new(motion.position, motion.rotation, scale),
            body: SimulatedBody::Pending(Box::new(desc)),
            vbo_mesh,
        }
    }

    /// Wraps a body that already lives in a world. The object does not own
    /// it, so removing the object leaves the body in place.
    pub(crate) fn attached(kind: ObjectKind, handle: RigidBodyHandle, vbo_mesh: VboMesh) -> Self {
        Self {
            kind,
            age: 0.0,
            lifespan: None,
            transform: Transform::default(),
            body: SimulatedBody::Attached {
                handle,
                exclusive: false,
            },
            vbo_mesh,
        }
    }

    /// Box drawn with the shared unit cube mesh.
    pub fn rigid_box(
        cache: &mut PrimitiveMeshCache,
        size: Vec3,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Self {
        let desc = create_body(shapes::create_box(size), mass, position, rotation);
        Self::from_desc(ObjectKind::Box, desc, cache.cube(), size)
    }

    /// Cylinder along Y. The mesh is one unit tall with radii relative to
    /// `height` and is drawn scaled by `height`.
    #[allow(clippy::too_many_arguments)]
    pub fn rigid_cylinder(
        cache: &mut PrimitiveMeshCache,
        top_radius: f32,
        bottom_radius: f32,
        height: f32,
        segments: u32,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Result<Self, ShapeError> {
        let shape = shapes::create_cylinder(top_radius, bottom_radius, height, segments)?;
        let desc = create_body(shape, mass, position, rotation);
        let mesh = cache.cylinder(top_radius / height, bottom_radius / height, segments);
        Ok(Self::from_desc(ObjectKind::Cylinder, desc, mesh, Vec3::splat(height)))
    }

    /// Convex hull around `mesh`, drawn with the mesh itself.
    pub fn rigid_hull(
        mesh: &TriMesh,
        scale: Vec3,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Result<Self, ShapeError> {
        let desc = create_body(shapes::create_hull(mesh, scale)?, mass, position, rotation);
        Ok(Self::from_desc(ObjectKind::Hull, desc, VboMesh::new(mesh.clone()), scale))
    }

    /// Concave triangle mesh, drawn with the mesh itself.
    pub fn rigid_mesh(
        mesh: &TriMesh,
        scale: Vec3,
        margin: f32,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Result<Self, ShapeError> {
        let shape = shapes::create_concave_mesh(mesh, scale, margin)?;
        let desc = create_body(shape, mass, position, rotation);
        Ok(Self::from_desc(ObjectKind::Mesh, desc, VboMesh::new(mesh.clone()), scale))
    }

    pub fn rigid_sphere(
        cache: &mut PrimitiveMeshCache,
        radius: f32,
        segments: u32,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Self {
        let desc = create_body(shapes::create_sphere(radius), mass, position, rotation);
        Self::from_desc(ObjectKind::Sphere, desc, cache.sphere(segments), Vec3::splat(radius))
    }

    /// Terrain whose render surface and heightfield come from the same samples.
    ///
    /// The render mesh is Y-up, so the heightfield is built Y-up too and
    /// `params.up_axis` turns the whole body instead.
    pub fn rigid_terrain(
        field: &impl HeightField,
        params: &HeightfieldParams,
        mass: f32,
        position: Vec3,
        rotation: Quat,
    ) -> Self {
        let y_up = HeightfieldParams {
            up_axis: UpAxis::Y,
            ..*params
        };
        let shape = shapes::create_heightfield_terrain(field, &y_up);
        let rotation = rotation * params.up_axis.rotation_from_y();
        let desc = create_body(shape, mass, position, rotation);
        let mesh = VboMesh::new(synthesize_terrain(field));
        Self::from_desc(ObjectKind::Terrain, desc, mesh, params.scale)
    }

    pub fn with_lifespan(mut self, seconds: f64) -> Self {
        self.lifespan = Some(seconds);
        self
    }

    pub fn set_lifespan(&mut self, lifespan: Option<f64>) {
        self.lifespan = lifespan;
    }

    /// Advances the age by `step` seconds and mirrors the body's pose.
    ///
    /// Does not step the simulation; the owning world does that before
    /// calling this.
    pub fn update(&mut self, step: f64, bodies: &RigidBodySet) {
        self.age += step;
        if let SimulatedBody::Attached { handle, .. } = self.body {
            if let Some(body) = bodies.get(handle) {
                let (position, rotation) = from_isometry(body.position());
                self.transform.position = position;
                self.transform.rotation = rotation;
            }
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    /// Time to live in seconds; `None` means the object never expires.
    pub fn lifespan(&self) -> Option<f64> {
        self.lifespan
    }

    pub fn is_expired(&self) -> bool {
        self.lifespan.is_some_and(|lifespan| self.age >= lifespan)
    }

    pub fn state(&self) -> ObjectState {
        match self.body {
            SimulatedBody::Pending(_) => ObjectState::Constructed,
            _ if self.is_expired() => ObjectState::Expired,
            _ => ObjectState::Active,
        }
    }

    /// Handle of the simulated body once a world holds it.
    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        match self.body {
            SimulatedBody::Attached { handle, .. } => Some(handle),
            SimulatedBody::Pending(_) => None,
        }
    }

    /// The body as built, before a world takes it over.
    pub fn pending_body(&self) -> Option<&RigidBodyDesc> {
        match &self.body {
            SimulatedBody::Pending(desc) => Some(desc),
            SimulatedBody::Attached { .. } => None,
        }
    }

    /// Whether removing this object also removes its body from the world.
    pub fn owns_body(&self) -> bool {
        match self.body {
            SimulatedBody::Pending(_) => true,
            SimulatedBody::Attached { exclusive, .. } => exclusive,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    pub fn vbo_mesh(&self) -> &VboMesh {
        &self.vbo_mesh
    }

    /// Hands the pending body to `insert` and keeps the handle it returns.
    /// Does nothing once the body has been inserted.
    pub(crate) fn insert_body(
        &mut self,
        insert: impl FnOnce(RigidBodyDesc) -> RigidBodyHandle,
    ) -> Option<RigidBodyHandle> {
        let placeholder = SimulatedBody::Attached {
            handle: RigidBodyHandle::invalid(),
            exclusive: true,
        };
        match std::mem::replace(&mut self.body, placeholder) {
            SimulatedBody::Pending(desc) => {
                let handle = insert(*desc);
                self.body = SimulatedBody::Attached {
                    handle,
                    exclusive: true,
                };
                Some(handle)
            }
            attached => {
                self.body = attached;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_objects_are_constructed_and_ageless() {
        let mut cache = PrimitiveMeshCache::new();
        let object = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 1.0, Vec3::Y, Quat::IDENTITY);

        assert_eq!(object.state(), ObjectState::Constructed);
        assert_eq!(object.age(), 0.0);
        assert_eq!(object.lifespan(), None);
        assert!(object.body_handle().is_none());
        assert!(object.owns_body());
        assert_eq!(object.position(), Vec3::Y);
    }

    #[test]
    fn sphere_scale_is_radius() {
        let mut cache = PrimitiveMeshCache::new();
        let object = CollisionObject::rigid_sphere(&mut cache, 2.5, 12, 1.0, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(object.scale(), Vec3::splat(2.5));
        assert_eq!(object.kind(), ObjectKind::Sphere);
    }

    #[test]
    fn body_is_inserted_once() {
        let mut cache = PrimitiveMeshCache::new();
        let mut object = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 0.0, Vec3::ZERO, Quat::IDENTITY);
        let mut bodies = RigidBodySet::new();

        let handle = object.insert_body(|desc| bodies.insert(desc.into_parts().0));
        assert!(handle.is_some());
        assert_eq!(object.body_handle(), handle);
        assert_eq!(object.state(), ObjectState::Active);
        assert!(object.insert_body(|_| RigidBodyHandle::invalid()).is_none());
        assert_eq!(object.body_handle(), handle);
    }
}
