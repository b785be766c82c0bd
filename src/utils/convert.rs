//! Conversions between `glam` types and the physics engine's nalgebra types.
//!
//! These are format adaptations only: no normalization or validation happens,
//! so converting a value and converting it back yields the same bits.

use glam::{Quat, Vec3};
use rapier3d::math::{Isometry, Point, Real, Rotation, Translation, Vector};
use rapier3d::na::Quaternion;

pub fn to_physics_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub fn from_physics_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub fn to_physics_point(p: Vec3) -> Point<Real> {
    Point::new(p.x, p.y, p.z)
}

pub fn from_physics_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Wraps a glam quaternion as a unit quaternion without renormalizing it.
pub fn to_physics_rotation(q: Quat) -> Rotation<Real> {
    Rotation::new_unchecked(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_physics_rotation(r: &Rotation<Real>) -> Quat {
    let q = r.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// Builds a world-space isometry from a position and orientation.
pub fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation::from(to_physics_vector(position)),
        to_physics_rotation(rotation),
    )
}

/// Splits an isometry back into position and orientation.
pub fn from_isometry(iso: &Isometry<Real>) -> (Vec3, Quat) {
    (
        from_physics_vector(&iso.translation.vector),
        from_physics_rotation(&iso.rotation),
    )
}
