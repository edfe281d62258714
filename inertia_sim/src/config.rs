//! Simulator configuration

use std::time::Duration;

use glam::DVec2;

use crate::constants::{DEFAULT_TORQUE, DT, FRAME_COUNT, ROD_LENGTH, TICK_INTERVAL};

/// Fixed geometry, timing and the adjustable driving torque.
///
/// Only `torque` changes at runtime (via the slider); the rest stay fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Rod length in meters
    pub rod_length: f64,
    /// Fixed rotation point
    pub pivot: DVec2,
    /// Driving torque (N·m). Any float is accepted, including negative.
    pub torque: f64,
    /// Integration step per frame (s)
    pub dt: f64,
    /// Frames per run
    pub frame_count: u32,
    /// Wall-clock spacing of frame ticks
    pub tick_interval: Duration,
}

impl SimConfig {
    /// Half-width of the square viewport that shows the whole sweep of the rod
    pub fn view_extent(&self) -> f64 {
        self.rod_length + 1.0
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rod_length: ROD_LENGTH,
            pivot: DVec2::ZERO,
            torque: DEFAULT_TORQUE,
            dt: DT,
            frame_count: FRAME_COUNT,
            tick_interval: TICK_INTERVAL,
        }
    }
}
