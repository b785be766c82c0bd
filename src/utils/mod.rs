//! Utility helpers: math conversions, the object allocator and logging helpers.

pub mod allocator;
pub mod convert;
pub mod logging;

pub use allocator::{Arena, ObjectId};
pub use convert::*;
