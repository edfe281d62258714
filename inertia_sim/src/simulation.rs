//! Frame-driving state machine
//!
//! `Idle → Running` on [`SimulationController::start`], back to `Idle` after
//! the last frame. Starting while running cancels the current run: the frame
//! counter, scheduler and angular velocity are all reset together, so ticks
//! from the old run can never interleave with the new one.

use std::time::Duration;

use crate::physics::{PhysicsModel, Point};
use crate::scheduler::FrameScheduler;

/// Geometry for one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    pub frame: u32,
    pub angle: f64,
    pub angular_velocity: f64,
    /// Pivot and rod tip
    pub rod: (Point, Point),
    /// One point per mass, in insertion order
    pub masses: Vec<Point>,
}

impl FrameUpdate {
    /// Current masses posed at `angle`, outside of any run
    pub fn posed(model: &PhysicsModel, angle: f64) -> Self {
        Self {
            frame: 0,
            angle,
            angular_velocity: model.state().angular_velocity,
            rod: model.rod_endpoints(angle),
            masses: model.mass_positions(angle),
        }
    }

    /// Pose of the rod at angle 0, used before any run has drawn a frame
    pub fn at_rest(model: &PhysicsModel) -> Self {
        Self {
            angular_velocity: 0.0,
            ..Self::posed(model, 0.0)
        }
    }
}

/// Receives one update per tick
pub trait RenderSink {
    fn update_frame(&mut self, update: FrameUpdate);
}

impl RenderSink for Vec<FrameUpdate> {
    fn update_frame(&mut self, update: FrameUpdate) {
        self.push(update);
    }
}

/// Keeps only the most recent frame
#[derive(Debug, Clone, Default)]
pub struct LatestFrame(Option<FrameUpdate>);

impl LatestFrame {
    pub fn get(&self) -> Option<&FrameUpdate> {
        self.0.as_ref()
    }
}

impl RenderSink for LatestFrame {
    fn update_frame(&mut self, update: FrameUpdate) {
        self.0 = Some(update);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running {
        /// 1-based count of runs started so far
        run: u64,
        next_frame: u32,
    },
}

pub struct SimulationController {
    state: RunState,
    runs_started: u64,
    frame_count: u32,
    scheduler: FrameScheduler,
}

impl SimulationController {
    pub fn new(frame_count: u32, tick_interval: Duration) -> Self {
        Self {
            state: RunState::Idle,
            runs_started: 0,
            frame_count,
            scheduler: FrameScheduler::new(tick_interval),
        }
    }

    /// Controller using the frame count and tick interval of `model`'s config
    pub fn for_model(model: &PhysicsModel) -> Self {
        let config = model.config();
        Self::new(config.frame_count, config.tick_interval)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    /// Begin a new run from frame 0, cancelling any run in progress
    pub fn start(&mut self, model: &mut PhysicsModel) {
        if let RunState::Running { run, next_frame } = self.state {
            log::info!("run {} cancelled at frame {}", run, next_frame);
        }

        model.reset_velocity();
        self.scheduler.reset();
        self.runs_started += 1;
        self.state = RunState::Running {
            run: self.runs_started,
            next_frame: 0,
        };

        log::info!(
            "run {} started: I = {:.4} kg·m², torque = {} N·m",
            self.runs_started,
            model.moment_of_inertia(),
            model.torque()
        );
    }

    /// Render the next frame of the current run, if any.
    ///
    /// Returns `true` when a frame was produced.
    pub fn tick<S: RenderSink>(&mut self, model: &mut PhysicsModel, sink: &mut S) -> bool {
        let RunState::Running { run, next_frame } = self.state else {
            return false;
        };

        let result = model.step(next_frame);
        sink.update_frame(FrameUpdate {
            frame: next_frame,
            angle: result.angle,
            angular_velocity: result.angular_velocity,
            rod: model.rod_endpoints(result.angle),
            masses: model.mass_positions(result.angle),
        });

        let next_frame = next_frame + 1;
        if next_frame >= self.frame_count {
            log::info!(
                "run {} finished after {} frames, ω = {:.4} rad/s",
                run,
                next_frame,
                result.angular_velocity
            );
            self.state = RunState::Idle;
        } else {
            self.state = RunState::Running { run, next_frame };
        }
        true
    }

    /// Feed wall-clock time to the scheduler and render every tick that is due.
    ///
    /// Returns the number of frames produced.
    pub fn advance<S: RenderSink>(
        &mut self,
        model: &mut PhysicsModel,
        elapsed: Duration,
        sink: &mut S,
    ) -> u32 {
        if !self.is_running() {
            return 0;
        }

        let due = self.scheduler.advance(elapsed);
        let mut rendered = 0;
        for _ in 0..due {
            if !self.tick(model, sink) {
                break;
            }
            rendered += 1;
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::constants::{FRAME_COUNT, TICK_INTERVAL};
    use approx::assert_relative_eq;

    fn setup() -> (PhysicsModel, SimulationController) {
        let model = PhysicsModel::default();
        let controller = SimulationController::for_model(&model);
        (model, controller)
    }

    #[test]
    fn test_idle_controller_renders_nothing() {
        let (mut model, mut controller) = setup();
        let mut frames = Vec::new();
        assert!(!controller.tick(&mut model, &mut frames));
        assert!(frames.is_empty());
        assert_eq!(controller.state(), RunState::Idle);
    }

    #[test]
    fn test_run_has_200_frames_then_idles() {
        let (mut model, mut controller) = setup();
        let mut frames = Vec::new();
        controller.start(&mut model);
        while controller.tick(&mut model, &mut frames) {}

        assert_eq!(frames.len(), FRAME_COUNT as usize);
        assert_eq!(frames.first().map(|f| f.frame), Some(0));
        assert_eq!(frames.last().map(|f| f.frame), Some(199));
        assert_eq!(controller.state(), RunState::Idle);
    }

    #[test]
    fn test_frame_geometry_follows_step() {
        let (mut model, mut controller) = setup();
        let mut frames = Vec::new();
        controller.start(&mut model);
        controller.tick(&mut model, &mut frames);
        controller.tick(&mut model, &mut frames);

        let second = &frames[1];
        // second step: ω = 2·α·Δt, θ = ω·1·Δt
        assert_relative_eq!(second.angle, 0.02 / 8.75, epsilon = 1e-12);
        assert_eq!(second.rod, model.rod_endpoints(second.angle));
        assert_eq!(second.masses, model.mass_positions(second.angle));
        assert_eq!(second.masses.len(), 2);
    }

    #[test]
    fn test_restart_cancels_previous_run() {
        let (mut model, mut controller) = setup();
        let mut frames = Vec::new();
        controller.start(&mut model);
        for _ in 0..10 {
            controller.tick(&mut model, &mut frames);
        }

        controller.start(&mut model);
        assert_eq!(model.state().angular_velocity, 0.0);
        assert_eq!(
            controller.state(),
            RunState::Running {
                run: 2,
                next_frame: 0
            }
        );

        frames.clear();
        controller.tick(&mut model, &mut frames);
        assert_eq!(frames[0].frame, 0);
        assert_relative_eq!(frames[0].angular_velocity, 0.1 / 8.75, epsilon = 1e-12);
    }

    #[test]
    fn test_mid_run_mutations_apply_next_tick() {
        let (mut model, mut controller) = setup();
        let mut frames = Vec::new();
        controller.start(&mut model);
        controller.tick(&mut model, &mut frames);

        model.add_mass(1.0, 2.0);
        model.set_torque(0.0);
        controller.tick(&mut model, &mut frames);

        assert_eq!(frames[1].masses.len(), 3);
        assert_eq!(frames[1].angular_velocity, frames[0].angular_velocity);
    }

    #[test]
    fn test_empty_rod_run_does_not_stall() {
        let mut model = PhysicsModel::new(SimConfig::default());
        let mut controller = SimulationController::for_model(&model);
        let mut frames = Vec::new();
        controller.start(&mut model);
        while controller.tick(&mut model, &mut frames) {}

        assert_eq!(frames.len(), FRAME_COUNT as usize);
        assert!(frames.iter().all(|f| f.angle == 0.0 && f.masses.is_empty()));
    }

    #[test]
    fn test_advance_uses_tick_interval() {
        let (mut model, mut controller) = setup();
        let mut latest = LatestFrame::default();
        assert_eq!(controller.advance(&mut model, TICK_INTERVAL, &mut latest), 0);

        controller.start(&mut model);
        assert_eq!(controller.advance(&mut model, TICK_INTERVAL / 2, &mut latest), 0);
        assert!(latest.get().is_none());
        assert_eq!(controller.advance(&mut model, TICK_INTERVAL, &mut latest), 1);
        assert_eq!(latest.get().map(|f| f.frame), Some(0));
    }

    #[test]
    fn test_advance_stops_at_end_of_run() {
        let mut model = PhysicsModel::default();
        let mut controller = SimulationController::new(3, TICK_INTERVAL);
        let mut frames = Vec::new();
        controller.start(&mut model);
        let rendered = controller.advance(&mut model, TICK_INTERVAL * 4, &mut frames);
        assert_eq!(rendered, 3);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_rest_pose() {
        let model = PhysicsModel::default();
        let rest = FrameUpdate::at_rest(&model);
        assert_eq!(rest.rod.1, Point::new(2.0, 0.0));
        assert_eq!(rest.masses, vec![Point::new(1.0, 0.0), Point::new(1.5, 0.0)]);
    }
}
