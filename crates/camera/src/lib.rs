#![warn(missing_docs)]
//! Third-person follow camera.
//!
//! Runs once per frame after the body has been rotated. Each frame it picks a
//! [`CameraMode`] from the current input, computes where the camera wants to
//! be for that mode, pulls the target in front of any wall between it and the
//! character, springs toward it and finally looks at the resolved point.

mod config;
mod effect;
mod rig;

use glam::{Quat, Vec3};
use serde::Serialize;
use tracing::{debug, error, trace};
use trailcam_core::math::{
    ground_direction, lerp_clamped, lerp_vec3_clamped, smooth_damp, smooth_step, yaw_step,
};
use trailcam_core::{AnimationSink, Axis, Button, InputSource, Transform};
use trailcam_locomotion::LocomotionController;
use trailcam_physics::OcclusionOracle;

pub use config::{CameraConfig, ConfigError};
pub use effect::{CoverageEffect, LetterboxBars};
pub use rig::FirstPersonRig;
pub use trailcam_core::CameraMode;

/// Name given to the eye rig.
pub const FIRST_PERSON_RIG_NAME: &str = "First Person Camera";

/// What the camera did on one late step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrame {
    /// Mode after this frame's selection.
    pub mode: CameraMode,
    /// Target position before occlusion compensation.
    pub desired_target: Vec3,
    /// Target position after occlusion compensation.
    pub resolved_target: Vec3,
    /// Point the camera was turned toward.
    pub look_at: Vec3,
    /// Whether a wall pulled the target in.
    pub occluded: bool,
    /// Head IK blend weight after this frame.
    pub look_weight: f32,
    /// Letterbox coverage, if bars are attached.
    pub coverage: Option<f32>,
}

/// Follow camera with behind, target and first-person modes.
#[derive(Debug)]
pub struct FollowCamera {
    config: CameraConfig,
    transform: Transform,
    mode: CameraMode,
    look_dir: Vec3,
    target_position: Vec3,
    velocity: Vec3,
    pitch: f32,
    look_weight: f32,
    rig: FirstPersonRig,
    bars: Option<Box<dyn CoverageEffect>>,
}

impl FollowCamera {
    /// Create a camera at `initial` following `body`.
    ///
    /// Missing bars are logged once and otherwise tolerated; the letterbox
    /// transition simply has nothing to drive.
    pub fn new(
        config: CameraConfig,
        initial: Transform,
        body: &Transform,
        bars: Option<Box<dyn CoverageEffect>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if bars.is_none() {
            error!("follow camera has no letterbox effect attached; widescreen bars are disabled");
        }
        let rig = FirstPersonRig::initialize(
            FIRST_PERSON_RIG_NAME,
            config.first_person_offset,
            body,
        );
        Ok(Self {
            look_dir: body.forward(),
            target_position: initial.position,
            transform: initial,
            mode: CameraMode::Behind,
            velocity: Vec3::ZERO,
            pitch: 0.0,
            look_weight: 0.0,
            rig,
            bars,
            config,
        })
    }

    /// Tuning in effect.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Current camera transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current mode.
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// First-person pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Head IK blend weight.
    pub fn look_weight(&self) -> f32 {
        self.look_weight
    }

    /// The eye rig.
    pub fn rig(&self) -> &FirstPersonRig {
        &self.rig
    }

    /// Smoothing velocity carried between frames.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Letterbox coverage, if bars are attached.
    pub fn coverage(&self) -> Option<f32> {
        self.bars.as_ref().map(|bars| bars.coverage())
    }

    /// Late phase: choose a mode, place and orient the camera.
    pub fn on_late_step<A, I>(
        &mut self,
        dt: f32,
        input: &I,
        follow: &mut LocomotionController<A>,
        body: &mut Transform,
        oracle: &dyn OcclusionOracle,
    ) -> CameraFrame
    where
        A: AnimationSink,
        I: InputSource + ?Sized,
    {
        let character_offset = body.position + Vec3::Y * self.config.distance_up;
        let mut look_at = character_offset;

        self.select_mode(
            input.axis(Axis::Target),
            input.axis(Axis::RightStickY),
            input.button(Button::ExitFpv),
            follow.is_in_locomotion(),
        );

        if let Some(animator) = follow.animator_mut() {
            animator.set_look_at_weight(self.look_weight);
        }

        match self.mode {
            CameraMode::Behind => {
                self.reset_camera(dt);
                match ground_direction(character_offset - self.transform.position) {
                    Some(dir) => self.look_dir = dir,
                    None => trace!("camera above character; keeping previous look direction"),
                }
                self.target_position = self.trailing_target(character_offset, body);
            }
            CameraMode::Target => {
                self.reset_camera(dt);
                self.look_dir = body.forward();
                self.target_position = self.trailing_target(character_offset, body);
            }
            CameraMode::FirstPerson => {
                look_at = self.first_person(
                    dt,
                    input.axis(Axis::Horizontal),
                    input.axis(Axis::Vertical),
                    follow,
                    body,
                );
            }
            CameraMode::Free => {}
        }

        let desired_target = self.target_position;
        let occluded = self.compensate_for_walls(character_offset, oracle);
        self.smooth_position(dt);
        self.transform.look_at(look_at, Vec3::Y);

        CameraFrame {
            mode: self.mode,
            desired_target,
            resolved_target: self.target_position,
            look_at,
            occluded,
            look_weight: self.look_weight,
            coverage: self.coverage(),
        }
    }

    /// Recompute the mode from this frame's input.
    ///
    /// Targeting wins over everything. Otherwise first person is entered from
    /// the right stick while standing, and left with the exit button; a
    /// released trigger drops back behind.
    fn select_mode(&mut self, target: f32, right_y: f32, exit_pressed: bool, in_locomotion: bool) {
        let previous = self.mode;
        let threshold = self.config.targeting_threshold;

        if target > threshold {
            self.step_coverage(self.config.widescreen);
            self.mode = CameraMode::Target;
        } else {
            self.step_coverage(0.0);

            // Holding the stick re-arms first person every frame, restarting
            // the pitch and head blend from rest.
            if right_y > self.config.first_person_threshold && !in_locomotion {
                self.pitch = 0.0;
                self.look_weight = 0.0;
                self.mode = CameraMode::FirstPerson;
            }

            if (self.mode == CameraMode::FirstPerson && exit_pressed)
                || (self.mode == CameraMode::Target && target <= threshold)
            {
                self.mode = CameraMode::Behind;
            }
        }

        if self.mode != previous {
            debug!(from = previous.label(), to = self.mode.label(), "camera mode changed");
        }
    }

    fn step_coverage(&mut self, goal: f32) {
        let t = self.config.targeting_time;
        if let Some(bars) = self.bars.as_mut() {
            let next = smooth_step(bars.coverage(), goal, t);
            bars.set_coverage(next);
        }
    }

    /// Ease the head IK out and the camera roll back to level.
    fn reset_camera(&mut self, dt: f32) {
        self.look_weight = lerp_clamped(
            self.look_weight,
            0.0,
            dt * self.config.first_person_look_speed,
        );
        self.transform.rotation = self
            .transform
            .rotation
            .lerp(Quat::IDENTITY, dt.clamp(0.0, 1.0))
            .normalize();
    }

    fn trailing_target(&self, character_offset: Vec3, body: &Transform) -> Vec3 {
        character_offset + body.up() * self.config.distance_up
            - self.look_dir * self.config.distance_away
    }

    /// First-person look: pitch the eye rig, yaw the body, aim the head.
    ///
    /// Returns the point the camera should look at.
    fn first_person<A: AnimationSink>(
        &mut self,
        dt: f32,
        left_x: f32,
        left_y: f32,
        follow: &mut LocomotionController<A>,
        body: &mut Transform,
    ) -> Vec3 {
        let clamp = self.config.first_person_pitch_clamp;
        let pitch = self.pitch + left_y * self.config.first_person_look_speed;
        if !pitch.is_nan() {
            self.pitch = pitch.clamp(clamp.x, clamp.y);
        }
        self.rig.set_pitch(self.pitch);

        let rig_forward = self.rig.world_forward(body);
        let shift = Quat::from_rotation_arc(self.transform.forward().normalize(), rig_forward);
        self.transform.rotation = (shift * self.transform.rotation).normalize();

        let eye = self.rig.world_position(body);
        if let Some(animator) = follow.animator_mut() {
            animator.set_look_at_position(eye + rig_forward);
        }
        self.look_weight = lerp_clamped(
            self.look_weight,
            1.0,
            dt * self.config.first_person_look_speed,
        );

        body.rotate_local_yaw(yaw_step(
            self.config.first_person_rotation_degrees_per_second,
            left_x,
            dt,
        ));

        let eye = self.rig.world_position(body);
        self.target_position = eye;

        let camera_ahead = self.transform.position + self.transform.forward();
        let eased = lerp_vec3_clamped(
            eye + body.forward(),
            camera_ahead,
            self.config.smooth_time * dt,
        );
        // The weight is the camera's distance from the eye, clamped to 1: far
        // away the camera looks at the eased point, close in it keeps its
        // current heading.
        lerp_vec3_clamped(camera_ahead, eased, self.transform.position.distance(eye))
    }

    /// Pull the target in front of whatever blocks the line from the
    /// character to it. Height is kept so the camera slides along the wall.
    fn compensate_for_walls(&mut self, from: Vec3, oracle: &dyn OcclusionOracle) -> bool {
        match oracle.line_intersects(from, self.target_position) {
            Some(hit) => {
                trace!(?hit, target = ?self.target_position, "camera target occluded");
                self.target_position = Vec3::new(hit.x, self.target_position.y, hit.z);
                true
            }
            None => false,
        }
    }

    fn smooth_position(&mut self, dt: f32) {
        self.transform.position = smooth_damp(
            self.transform.position,
            self.target_position,
            &mut self.velocity,
            self.config.smooth_time,
            dt,
        );
    }
}
