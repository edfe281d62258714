//! Moment of Inertia Simulator
//!
//! A rod pivoted at the origin carries point masses at signed offsets along
//! its axis and is driven by an adjustable torque. This crate holds the
//! physics and frame-driving core:
//!
//! - **physics**: moment of inertia, angular integration, rotation geometry
//! - **simulation**: the 200-frame run state machine feeding a render sink
//! - **scheduler**: fixed-cadence tick generation from wall-clock time
//! - **controls**: control-panel input handling and the inertia label

pub mod config;
pub mod controls;
pub mod error;
pub mod physics;
pub mod scheduler;
pub mod simulation;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use physics::{Mass, PhysicsModel, Point, RotationState, StepResult};
pub use simulation::{FrameUpdate, RenderSink, RunState, SimulationController};

/// Fixed constants of the simulator
pub mod constants {
    use std::time::Duration;

    /// Rod length in meters
    pub const ROD_LENGTH: f64 = 2.0;

    /// Fixed integration time step per frame (s)
    pub const DT: f64 = 0.1;

    /// Frames in one run
    pub const FRAME_COUNT: u32 = 200;

    /// Interval between animation ticks
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

    /// Torque applied on launch (N·m)
    pub const DEFAULT_TORQUE: f64 = 1.0;

    /// Slider range offered by the control panel (N·m)
    pub const TORQUE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;
}
