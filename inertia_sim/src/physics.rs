//! Rotational dynamics of a pivoted rod carrying point masses
//!
//! Simulates:
//! - Moment of inertia of point masses: I = Σ m·r²
//! - Angular acceleration from the driving torque: α = τ / I
//! - Frame-indexed angle update: ω ← ω + α·Δt, θ = ω·n·Δt
//!
//! The angle is recomputed from the frame index on every step rather than
//! accumulated, so θ jumps whenever ω changes mid-run (for example after a
//! torque or mass edit). Keep this recurrence: the animation timing depends
//! on it.

use glam::DVec2;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// A 2D point in world coordinates (meters)
pub type Point = DVec2;

/// A point mass placed on the rod axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    /// Mass in kg
    pub mass: f64,
    /// Signed offset from the pivot along the rod (m)
    pub position: f64,
}

impl Mass {
    pub const fn new(mass: f64, position: f64) -> Self {
        Self { mass, position }
    }

    /// Contribution m·r² to the moment of inertia
    pub fn inertia(&self) -> f64 {
        self.mass * self.position * self.position
    }
}

/// Masses loaded on launch
pub const DEFAULT_MASSES: [Mass; 2] = [Mass::new(2.0, 1.0), Mass::new(3.0, 1.5)];

/// Integration state mutated by [`PhysicsModel::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub angular_velocity: f64,
    /// Angle produced by the most recent step (derived, not integrated)
    pub angle: f64,
}

/// Outcome of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub angle: f64,
    pub angular_velocity: f64,
    pub angular_acceleration: f64,
}

/// Rotate `point` counterclockwise by `theta` radians about the origin
pub fn rotate(point: Point, theta: f64) -> Point {
    let (sin, cos) = theta.sin_cos();
    DVec2::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}

/// Owns the mass list, configuration and rotation state
#[derive(Debug, Clone)]
pub struct PhysicsModel {
    config: SimConfig,
    masses: Vec<Mass>,
    state: RotationState,
    zero_inertia_reported: bool,
}

impl PhysicsModel {
    /// Empty rod with the given configuration
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            masses: Vec::new(),
            state: RotationState::default(),
            zero_inertia_reported: false,
        }
    }

    pub fn with_masses(config: SimConfig, masses: impl IntoIterator<Item = Mass>) -> Self {
        let mut model = Self::new(config);
        model.masses.extend(masses);
        model
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn masses(&self) -> &[Mass] {
        &self.masses
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn torque(&self) -> f64 {
        self.config.torque
    }

    /// I = Σ m·r²; zero for an empty rod
    pub fn moment_of_inertia(&self) -> f64 {
        self.masses.iter().map(Mass::inertia).sum()
    }

    /// α = τ / I, or [`SimError::ZeroInertia`] when I is exactly zero
    pub fn angular_acceleration(&self) -> SimResult<f64> {
        let inertia = self.moment_of_inertia();
        if inertia == 0.0 {
            return Err(SimError::ZeroInertia);
        }
        Ok(self.config.torque / inertia)
    }

    /// Advance the rotation for frame `frame`.
    ///
    /// Reads masses and torque fresh, so mutations made between ticks take
    /// effect on the next call. With zero inertia the acceleration is taken
    /// as 0 for the step and a warning is logged once until the next reset.
    pub fn step(&mut self, frame: u32) -> StepResult {
        let angular_acceleration = match self.angular_acceleration() {
            Ok(alpha) => alpha,
            Err(err) => {
                if !self.zero_inertia_reported {
                    log::warn!("frame {}: {}, holding angular velocity", frame, err);
                    self.zero_inertia_reported = true;
                }
                0.0
            }
        };

        let dt = self.config.dt;
        let angular_velocity = self.state.angular_velocity + angular_acceleration * dt;
        let angle = angular_velocity * f64::from(frame) * dt;

        self.state = RotationState {
            angular_velocity,
            angle,
        };

        StepResult {
            angle,
            angular_velocity,
            angular_acceleration,
        }
    }

    /// Pivot and far end of the rod rotated by `angle`
    pub fn rod_endpoints(&self, angle: f64) -> (Point, Point) {
        let tip = DVec2::new(self.config.rod_length, 0.0);
        (rotate(self.config.pivot, angle), rotate(tip, angle))
    }

    /// Rotated position of each mass, in insertion order
    pub fn mass_positions(&self, angle: f64) -> Vec<Point> {
        self.masses
            .iter()
            .map(|m| rotate(DVec2::new(m.position, 0.0), angle))
            .collect()
    }

    /// Append a mass. Values are taken as given; validation happens where
    /// user text is parsed.
    pub fn add_mass(&mut self, mass: f64, position: f64) {
        self.masses.push(Mass::new(mass, position));
        log::debug!(
            "added {} kg at {} m, I = {:.4}",
            mass,
            position,
            self.moment_of_inertia()
        );
    }

    /// Remove the most recently added mass; no-op on an empty rod
    pub fn remove_mass(&mut self) -> Option<Mass> {
        let removed = self.masses.pop();
        if let Some(m) = removed {
            log::debug!("removed {} kg at {} m", m.mass, m.position);
        }
        removed
    }

    pub fn set_torque(&mut self, torque: f64) {
        self.config.torque = torque;
    }

    /// Zero the angular velocity ahead of a new run
    pub fn reset_velocity(&mut self) {
        self.state.angular_velocity = 0.0;
        self.zero_inertia_reported = false;
    }
}

impl Default for PhysicsModel {
    /// Launch configuration: two masses, torque 1 N·m
    fn default() -> Self {
        Self::with_masses(SimConfig::default(), DEFAULT_MASSES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    fn default_model() -> PhysicsModel {
        PhysicsModel::default()
    }

    #[test]
    fn test_inertia_empty_is_zero() {
        let model = PhysicsModel::new(SimConfig::default());
        assert_eq!(model.moment_of_inertia(), 0.0);
    }

    #[test]
    fn test_inertia_default_masses() {
        assert_relative_eq!(default_model().moment_of_inertia(), 8.75);
    }

    #[test]
    fn test_inertia_ignores_side_of_pivot() {
        let mut model = PhysicsModel::new(SimConfig::default());
        model.add_mass(2.0, -1.5);
        assert_relative_eq!(model.moment_of_inertia(), 4.5);
    }

    #[test]
    fn test_rod_endpoints_at_rest() {
        let (pivot, tip) = default_model().rod_endpoints(0.0);
        assert_eq!(pivot, DVec2::ZERO);
        assert_eq!(tip, DVec2::new(2.0, 0.0));
    }

    #[test]
    fn test_rod_endpoints_quarter_turn() {
        let (pivot, tip) = default_model().rod_endpoints(FRAC_PI_2);
        assert_abs_diff_eq!(pivot.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pivot.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tip.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tip.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mass_positions_unrotated_keep_order() {
        let mut model = default_model();
        model.add_mass(1.0, -0.5);
        let points = model.mass_positions(0.0);
        assert_eq!(
            points,
            vec![
                DVec2::new(1.0, 0.0),
                DVec2::new(1.5, 0.0),
                DVec2::new(-0.5, 0.0),
            ]
        );
    }

    #[test]
    fn test_mass_positions_rotate_with_rod() {
        let model = default_model();
        let points = model.mass_positions(FRAC_PI_2);
        assert_abs_diff_eq!(points[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[1].y, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_remove_on_empty_is_noop() {
        let mut model = PhysicsModel::new(SimConfig::default());
        assert_eq!(model.remove_mass(), None);
        assert!(model.masses().is_empty());
    }

    #[test]
    fn test_add_then_remove_is_neutral() {
        let mut model = default_model();
        let before = model.masses().to_vec();
        model.add_mass(4.0, 0.25);
        model.remove_mass();
        assert_eq!(model.masses(), before.as_slice());
    }

    #[test]
    fn test_first_frame_from_rest() {
        let mut model = default_model();
        let result = model.step(1);
        assert_relative_eq!(result.angular_acceleration, 1.0 / 8.75, epsilon = 1e-12);
        assert_relative_eq!(result.angular_velocity, 0.1 / 8.75, epsilon = 1e-12);
        assert_relative_eq!(result.angle, 0.01 / 8.75, epsilon = 1e-12);
        assert_abs_diff_eq!(result.angle, 0.0011429, epsilon = 1e-7);
        assert_eq!(model.state().angular_velocity, result.angular_velocity);
    }

    #[test]
    fn test_angle_recomputed_from_frame_index() {
        let mut model = default_model();
        model.step(0);
        let second = model.step(7);
        // θ = ω_after · n · Δt, not a running sum
        assert_relative_eq!(second.angle, second.angular_velocity * 7.0 * 0.1, epsilon = 1e-12);
        assert_relative_eq!(second.angular_velocity, 2.0 * 0.1 / 8.75, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_zero_angle_is_zero() {
        let mut model = default_model();
        let result = model.step(0);
        assert_eq!(result.angle, 0.0);
        assert!(result.angular_velocity > 0.0);
    }

    #[test]
    fn test_speed_grows_monotonically_under_constant_torque() {
        for torque in [2.5, -2.5] {
            let mut model = default_model();
            model.set_torque(torque);
            let mut last = 0.0;
            for frame in 0..50 {
                let speed = model.step(frame).angular_velocity.abs();
                assert!(speed > last);
                last = speed;
            }
        }
    }

    #[test]
    fn test_zero_inertia_holds_velocity() {
        let mut model = PhysicsModel::new(SimConfig::default());
        assert_eq!(model.angular_acceleration(), Err(SimError::ZeroInertia));

        let result = model.step(3);
        assert_eq!(result.angular_acceleration, 0.0);
        assert_eq!(result.angular_velocity, 0.0);
        assert_eq!(result.angle, 0.0);
    }

    #[test]
    fn test_masses_at_pivot_count_as_zero_inertia() {
        let mut model = default_model();
        model.step(1);
        let spinning = model.state().angular_velocity;

        let mut model = PhysicsModel::with_masses(SimConfig::default(), [Mass::new(5.0, 0.0)]);
        model.state.angular_velocity = spinning;
        let result = model.step(4);
        assert_eq!(result.angular_velocity, spinning);
        assert_relative_eq!(result.angle, spinning * 4.0 * 0.1);
    }

    #[test]
    fn test_torque_accepts_negative_values() {
        let mut model = default_model();
        model.set_torque(-3.0);
        assert_eq!(model.torque(), -3.0);
        assert!(model.step(1).angular_velocity < 0.0);
    }

    #[test]
    fn test_reset_velocity() {
        let mut model = default_model();
        model.step(1);
        model.step(2);
        model.reset_velocity();
        assert_eq!(model.state().angular_velocity, 0.0);
    }
}
