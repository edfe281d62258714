//! Common utilities for physics simulations
//!
//! Shared window/GPU setup, a 2D camera and line-vertex helpers used by the
//! simulation crates in this workspace.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
