//! Core types: shapes, bodies, meshes and the collision objects that pair them.

pub mod mesh;
pub mod object;
pub mod primitives;
pub mod rigidbody;
pub mod shapes;
pub mod terrain;
pub mod types;

pub use mesh::{Aabb, TriMesh, VboLayout, VboMesh};
pub use object::{CollisionObject, ObjectKind, ObjectState};
pub use primitives::{PrimitiveKey, PrimitiveKind, PrimitiveMeshCache};
pub use rigidbody::{create_body, RigidBodyDesc};
pub use shapes::{CollisionShape, HeightfieldParams, ShapeKind};
pub use terrain::{load_height_field, synthesize_terrain, HeightField};
pub use types::{MotionState, Transform, UpAxis};
