//! Foundational types shared by every Marionette crate.

pub mod bounds;
pub mod errors;

pub use bounds::Aabb;
pub use errors::{MarionetteError, Result};
