//! Collision Mesh – rapier rigid bodies paired with renderable meshes.
//!
//! Every [`CollisionObject`] owns one simulated body and one [`VboMesh`] and
//! mirrors the body's pose after each step of its [`DynamicsWorld`]. Shapes
//! can be boxes, cylinders, spheres, convex hulls, concave triangle meshes or
//! heightfield terrains synthesized from an image.

pub mod config;
pub mod core;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use rapier3d;

pub use config::WorldConfig;
pub use self::core::{
    create_body, load_height_field, synthesize_terrain, CollisionObject, CollisionShape,
    HeightField, HeightfieldParams, MotionState, ObjectKind, ObjectState, PrimitiveMeshCache,
    RigidBodyDesc, ShapeKind, Transform, TriMesh, UpAxis, VboMesh,
};
pub use self::core::shapes::{
    create_box, create_concave_mesh, create_cylinder, create_heightfield_terrain, create_hull,
    create_sphere,
};
pub use error::{Error, Result, ShapeError};
pub use utils::allocator::ObjectId;
pub use world::DynamicsWorld;
