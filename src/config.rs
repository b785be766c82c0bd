//! Configuration defaults for the collision mesh world.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default gravity vector applied in the dynamics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default fixed simulation step (in seconds).
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 60.0;

/// Maximum number of fixed steps taken for a single `step` call.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 10;

/// Segment count used for procedural cylinders and spheres.
pub const DEFAULT_PRIMITIVE_SEGMENTS: u32 = 16;

/// Default contact margin for concave triangle meshes.
pub const DEFAULT_CONCAVE_MARGIN: f32 = 0.04;

/// Tunables for [`DynamicsWorld`](crate::world::DynamicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    pub time_step: f64,
    pub max_substeps: u32,
    /// Remove objects whose age reached their lifespan at the end of a step.
    pub remove_expired: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            remove_expired: true,
        }
    }
}
