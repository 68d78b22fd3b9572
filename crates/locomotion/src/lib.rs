#![warn(missing_docs)]
//! Character locomotion driven by camera-relative stick input.
//!
//! The controller turns the left stick into the `Speed` and `Direction`
//! parameters of the animation graph and yaws the body while the base layer
//! is in locomotion. It runs in two phases per frame: [`on_variable_step`]
//! samples input and writes animation parameters, [`on_fixed_step`] applies
//! body rotation at the physics rate.
//!
//! [`on_variable_step`]: LocomotionController::on_variable_step
//! [`on_fixed_step`]: LocomotionController::on_fixed_step

mod stick;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trailcam_core::{
    math::yaw_step, AnimParam, AnimStateId, AnimationSink, Axis, CameraMode, InputSource,
    Transform,
};

pub use stick::{stick_to_world, MovementSample};

/// Tuning for the locomotion controller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Seconds over which `Direction` is damped.
    pub direction_damp_time: f32,
    /// Multiplier applied to the scaled turn angle.
    pub direction_speed: f32,
    /// Body yaw rate at full stick deflection.
    pub rotation_degrees_per_second: f32,
    /// Divisor turning the signed angle (degrees) into a blend-tree value.
    pub angle_divisor: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            direction_damp_time: 0.25,
            direction_speed: 3.0,
            rotation_degrees_per_second: 120.0,
            angle_divisor: 100.0,
        }
    }
}

/// Reads movement input, drives the animation graph and turns the body.
#[derive(Debug)]
pub struct LocomotionController<A> {
    config: LocomotionConfig,
    animator: Option<A>,
    sample: MovementSample,
    state: AnimStateId,
    rotation_suppressed: bool,
}

impl<A: AnimationSink> LocomotionController<A> {
    /// Create a controller driving `animator`.
    ///
    /// Without an animator the controller is inert. With two or more layers,
    /// layer 1 is switched on at full weight.
    pub fn new(config: LocomotionConfig, mut animator: Option<A>) -> Self {
        match animator.as_mut() {
            Some(sink) => {
                if sink.layer_count() >= 2 {
                    sink.set_layer_weight(1, 1.0);
                }
            }
            None => warn!("locomotion controller has no animator attached; it will stay inert"),
        }
        let state = animator
            .as_ref()
            .map(AnimationSink::current_state)
            .unwrap_or_default();
        Self {
            config,
            animator,
            sample: MovementSample::default(),
            state,
            rotation_suppressed: false,
        }
    }

    /// Tuning in effect.
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Most recent movement sample.
    pub fn sample(&self) -> MovementSample {
        self.sample
    }

    /// Animation state seen on the last variable step.
    pub fn state(&self) -> AnimStateId {
        self.state
    }

    /// The attached animator, if any.
    pub fn animator(&self) -> Option<&A> {
        self.animator.as_ref()
    }

    /// Mutable access to the attached animator, used for head IK.
    pub fn animator_mut(&mut self) -> Option<&mut A> {
        self.animator.as_mut()
    }

    /// Whether the base layer is in the locomotion state.
    pub fn is_in_locomotion(&self) -> bool {
        self.animator.is_some() && self.state == AnimStateId::Locomotion
    }

    /// Compute the camera-relative movement sample for the given stick.
    pub fn update(
        &self,
        horizontal: f32,
        vertical: f32,
        character_forward: Vec3,
        camera_forward: Vec3,
    ) -> MovementSample {
        stick_to_world(
            horizontal,
            vertical,
            character_forward,
            camera_forward,
            self.config.angle_divisor,
            self.config.direction_speed,
        )
    }

    /// Write `Speed` immediately and `Direction` damped into the animator.
    pub fn set_animation_parameters(
        &mut self,
        speed: f32,
        direction: f32,
        damp_time: f32,
        dt: f32,
    ) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_scalar(AnimParam::Speed, speed);
            animator.set_scalar_damped(AnimParam::Direction, direction, damp_time, dt);
        }
    }

    /// Yaw `body` toward the intended turn.
    ///
    /// Only rotates in locomotion, and only when `direction` and `horizontal`
    /// agree in sign, so the body never spins against the turn during a blend.
    /// Returns whether a rotation was applied.
    pub fn apply_body_rotation(
        &self,
        body: &mut Transform,
        direction: f32,
        horizontal: f32,
        degrees_per_second: f32,
        dt: f32,
    ) -> bool {
        if !self.is_in_locomotion() {
            return false;
        }
        let same_side =
            (direction >= 0.0 && horizontal >= 0.0) || (direction < 0.0 && horizontal < 0.0);
        if !same_side {
            return false;
        }
        body.rotate_local_yaw(yaw_step(degrees_per_second, horizontal, dt));
        true
    }

    /// Variable-rate phase: sample input and drive the animator.
    ///
    /// In first-person view the stick belongs to the camera, so nothing is
    /// sampled and body rotation is suppressed until the camera leaves it.
    pub fn on_variable_step<I>(
        &mut self,
        dt: f32,
        input: &I,
        body: &Transform,
        camera_forward: Vec3,
        camera_mode: CameraMode,
    ) -> Option<MovementSample>
    where
        I: InputSource + ?Sized,
    {
        let animator = self.animator.as_ref()?;
        let state = animator.current_state();
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "locomotion state changed");
            self.state = state;
        }

        self.rotation_suppressed = camera_mode == CameraMode::FirstPerson;
        if self.rotation_suppressed {
            return None;
        }

        let sample = self.update(
            input.axis(Axis::Horizontal),
            input.axis(Axis::Vertical),
            body.forward(),
            camera_forward,
        );
        self.sample = sample;
        self.set_animation_parameters(
            sample.speed,
            sample.direction,
            self.config.direction_damp_time,
            dt,
        );
        Some(sample)
    }

    /// Fixed-rate phase: turn the body from the last sample.
    pub fn on_fixed_step(&mut self, dt: f32, body: &mut Transform) -> bool {
        if self.rotation_suppressed {
            return false;
        }
        let MovementSample {
            direction,
            horizontal,
            ..
        } = self.sample;
        self.apply_body_rotation(
            body,
            direction,
            horizontal,
            self.config.rotation_degrees_per_second,
            dt,
        )
    }
}
