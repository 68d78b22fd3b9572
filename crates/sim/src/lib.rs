#![warn(missing_docs)]
//! Frame driver wiring locomotion, camera and scene together.
//!
//! A [`Simulation`] runs the three per-frame hooks in the order the engine
//! would: the variable-rate locomotion step, zero or more fixed physics steps,
//! then the camera's late step.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace, warn};
use trailcam_camera::{CameraConfig, FollowCamera, LetterboxBars};
use trailcam_core::{
    AnimationSink, CameraMode, FrameTick, InputSource, ParameterAnimator, Transform,
};
use trailcam_locomotion::{LocomotionConfig, LocomotionController};
use trailcam_physics::StaticScene;

/// Fraction of a fixed step treated as rounding noise.
const STEP_TOLERANCE: f32 = 1e-4;

/// Driver timing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed physics step in seconds.
    pub fixed_dt: f32,
    /// Upper bound on fixed steps per frame; excess time is dropped.
    pub max_fixed_steps: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.02,
            max_fixed_steps: 8,
        }
    }
}

impl SimConfig {
    /// Reject timings the accumulator cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(SimError::InvalidFixedStep(self.fixed_dt));
        }
        if self.max_fixed_steps == 0 {
            return Err(SimError::NoFixedSteps);
        }
        Ok(())
    }
}

/// Errors raised while assembling a simulation.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// `fixed_dt` must be a positive, finite number of seconds.
    #[error("fixed step must be positive and finite, got {0}")]
    InvalidFixedStep(f32),
    /// At least one fixed step per frame is required.
    #[error("max_fixed_steps must be at least 1")]
    NoFixedSteps,
    /// Camera tuning was rejected.
    #[error(transparent)]
    Camera(#[from] trailcam_camera::ConfigError),
}

/// Everything observable about one driven frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    /// Frame index, starting at zero.
    pub tick: FrameTick,
    /// Sanitized frame delta.
    pub dt: f32,
    /// Fixed steps run this frame.
    pub fixed_steps: u32,
    /// Stick speed from the locomotion sample.
    pub speed: f32,
    /// Signed turn amount from the locomotion sample.
    pub direction: f32,
    /// Body yaw in degrees after the frame.
    pub body_yaw: f32,
    /// Body position after the frame.
    pub body_position: Vec3,
    /// Camera position after the frame.
    pub camera_position: Vec3,
    /// Camera mode after the frame.
    pub camera_mode: CameraMode,
    /// Letterbox coverage, if bars are attached.
    pub coverage: Option<f32>,
    /// Head IK blend weight.
    pub look_weight: f32,
    /// Whether a wall pulled the camera target in.
    pub occluded: bool,
}

/// Owns the character body, its controllers and the scene they run in.
#[derive(Debug)]
pub struct Simulation<A = ParameterAnimator> {
    config: SimConfig,
    body: Transform,
    locomotion: LocomotionController<A>,
    camera: FollowCamera,
    scene: StaticScene,
    accumulator: f32,
    tick: FrameTick,
}

impl Simulation<ParameterAnimator> {
    /// Standard setup: a parameter animator, letterbox bars and a camera
    /// starting behind `body`.
    pub fn standard(
        config: SimConfig,
        locomotion: LocomotionConfig,
        camera: CameraConfig,
        animator: ParameterAnimator,
        scene: StaticScene,
        body: Transform,
    ) -> Result<Self, SimError> {
        let start = Transform::from_position(
            body.position + Vec3::Y * (camera.distance_up * 2.0)
                - body.forward() * camera.distance_away,
        );
        let bars = Box::new(LetterboxBars::new());
        let camera = FollowCamera::new(camera, start, &body, Some(bars))?;
        let locomotion = LocomotionController::new(locomotion, Some(animator));
        Self::new(config, locomotion, camera, scene, body)
    }
}

impl<A: AnimationSink> Simulation<A> {
    /// Assemble a simulation from prepared parts.
    pub fn new(
        config: SimConfig,
        locomotion: LocomotionController<A>,
        camera: FollowCamera,
        scene: StaticScene,
        body: Transform,
    ) -> Result<Self, SimError> {
        config.validate()?;
        debug!(
            fixed_dt = config.fixed_dt,
            max_fixed_steps = config.max_fixed_steps,
            obstacles = scene.len(),
            "simulation ready"
        );
        Ok(Self {
            config,
            body,
            locomotion,
            camera,
            scene,
            accumulator: 0.0,
            tick: FrameTick::ZERO,
        })
    }

    /// Driver timing in effect.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Character body.
    pub fn body(&self) -> &Transform {
        &self.body
    }

    /// Locomotion controller.
    pub fn locomotion(&self) -> &LocomotionController<A> {
        &self.locomotion
    }

    /// Follow camera.
    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    /// Occlusion scene.
    pub fn scene(&self) -> &StaticScene {
        &self.scene
    }

    /// Index of the next frame.
    pub fn tick(&self) -> FrameTick {
        self.tick
    }

    /// Drive one frame of `dt` seconds with `input`.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn step<I>(&mut self, dt: f32, input: &I) -> FrameReport
    where
        I: InputSource + ?Sized,
    {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            if dt != 0.0 {
                warn!(dt, "ignoring invalid frame delta");
            }
            0.0
        };

        let camera_forward = self.camera.transform().forward();
        self.locomotion.on_variable_step(
            dt,
            input,
            &self.body,
            camera_forward,
            self.camera.mode(),
        );

        let fixed_steps = self.run_fixed_steps(dt);

        let frame = self.camera.on_late_step(
            dt,
            input,
            &mut self.locomotion,
            &mut self.body,
            &self.scene,
        );

        let sample = self.locomotion.sample();
        let report = FrameReport {
            tick: self.tick,
            dt,
            fixed_steps,
            speed: sample.speed,
            direction: sample.direction,
            body_yaw: self.body.yaw_degrees(),
            body_position: self.body.position,
            camera_position: self.camera.transform().position,
            camera_mode: frame.mode,
            coverage: frame.coverage,
            look_weight: frame.look_weight,
            occluded: frame.occluded,
        };
        trace!(?report, "frame");
        self.tick = self.tick.advance(1);
        report
    }

    fn run_fixed_steps(&mut self, dt: f32) -> u32 {
        let fixed_dt = self.config.fixed_dt;
        let budget = fixed_dt * self.config.max_fixed_steps as f32;
        let wanted = self.accumulator + dt;
        if wanted > budget {
            debug!(wanted, budget, "dropping simulation time beyond the fixed-step budget");
        }
        self.accumulator = wanted.min(budget);

        // Whole steps available, tolerant of rounding in the accumulated sum.
        let available = (self.accumulator / fixed_dt + STEP_TOLERANCE).floor() as u32;
        let steps = available.min(self.config.max_fixed_steps);
        for _ in 0..steps {
            self.locomotion.on_fixed_step(fixed_dt, &mut self.body);
        }
        self.accumulator = (self.accumulator - steps as f32 * fixed_dt).max(0.0);
        steps
    }
}
