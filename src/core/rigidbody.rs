use glam::{Quat, Vec3};
use rapier3d::dynamics::{RigidBody, RigidBodyBuilder};
use rapier3d::geometry::{Collider, ColliderBuilder};

use super::shapes::{CollisionShape, ShapeKind};
use super::types::MotionState;
use crate::utils::convert::{from_physics_vector, to_isometry};

/// A rigid body and its collider, built but not yet inserted into a world.
pub struct RigidBodyDesc {
    body: RigidBody,
    collider: Collider,
    shape_kind: ShapeKind,
    mass: f32,
    local_inertia: Vec3,
    motion_state: MotionState,
}

impl RigidBodyDesc {
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Principal inertia in the body frame; zero for massless bodies.
    pub fn local_inertia(&self) -> Vec3 {
        self.local_inertia
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion_state
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    pub fn is_static(&self) -> bool {
        self.mass == 0.0
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    pub(crate) fn into_parts(self) -> (RigidBody, Collider) {
        (self.body, self.collider)
    }
}

/// Wraps `shape` into a rigid body posed at `position` / `rotation`.
///
/// A zero mass yields a fixed body with zero inertia. Any other mass,
/// negative included, is handed to the engine as is and the local inertia
/// is the shape's inertia scaled to that mass.
pub fn create_body(shape: CollisionShape, mass: f32, position: Vec3, rotation: Quat) -> RigidBodyDesc {
    let is_static = mass == 0.0;
    let local_inertia = if is_static {
        Vec3::ZERO
    } else {
        let unit = shape.shape().mass_properties(1.0);
        let unit_mass = unit.mass();
        if unit_mass > 0.0 {
            from_physics_vector(&unit.principal_inertia()) * (mass / unit_mass)
        } else {
            Vec3::ZERO
        }
    };

    let motion_state = MotionState::new(position, rotation);
    let builder = if is_static {
        RigidBodyBuilder::fixed()
    } else {
        RigidBodyBuilder::dynamic()
    };
    let body = builder.position(to_isometry(position, rotation)).build();

    let mut collider = ColliderBuilder::new(shape.shape().clone()).position(*shape.offset());
    collider = if is_static {
        collider.density(0.0)
    } else {
        collider.mass(mass)
    };
    if let Some(margin) = shape.margin() {
        collider = collider.contact_skin(margin);
    }

    RigidBodyDesc {
        body,
        collider: collider.build(),
        shape_kind: shape.kind(),
        mass,
        local_inertia,
        motion_state,
    }
}
