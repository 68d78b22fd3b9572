//! Property-based tests for camera-relative movement.
//!
//! Validates:
//! - `speed` is the squared stick magnitude and never negative
//! - `direction` takes the sign of the side the movement falls on
//! - a released stick damps `Direction` toward zero

use glam::Vec3;
use proptest::prelude::*;
use trailcam_core::{
    AnimParam, AnimationSink, Axis, CameraMode, InputFrame, ParameterAnimator, Transform,
};
use trailcam_locomotion::{stick_to_world, LocomotionConfig, LocomotionController};

fn yaw_vector(degrees: f32) -> Vec3 {
    let radians = degrees.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

proptest! {
    /// Property: speed is the squared magnitude of the stick.
    #[test]
    fn speed_is_squared_magnitude(
        horizontal in -1.0f32..=1.0,
        vertical in -1.0f32..=1.0,
        body_yaw in -180.0f32..180.0,
        camera_yaw in -180.0f32..180.0,
    ) {
        let sample = stick_to_world(
            horizontal,
            vertical,
            yaw_vector(body_yaw),
            yaw_vector(camera_yaw),
            100.0,
            3.0,
        );
        prop_assert!(sample.speed >= 0.0);
        prop_assert!((sample.speed - (horizontal * horizontal + vertical * vertical)).abs() < 1e-5);
        prop_assert!(sample.direction.is_finite());
    }

    /// Property: direction sign matches the side of the movement vector.
    ///
    /// The stick is expressed in camera space; the expected side is measured
    /// with the cross product of the world-space movement and body forward.
    #[test]
    fn direction_sign_matches_side(
        stick_angle in -179.0f32..179.0,
        body_yaw in -180.0f32..180.0,
        camera_yaw in -180.0f32..180.0,
    ) {
        let stick = yaw_vector(stick_angle);
        let body = yaw_vector(body_yaw);
        let sample = stick_to_world(stick.x, stick.z, body, yaw_vector(camera_yaw), 100.0, 3.0);

        let world = yaw_vector(camera_yaw + stick_angle);
        let side = world.cross(body).y;
        prop_assume!(side.abs() > 1e-3);
        if side < 0.0 {
            prop_assert!(sample.direction > 0.0, "expected right turn, got {}", sample.direction);
        } else {
            prop_assert!(sample.direction < 0.0, "expected left turn, got {}", sample.direction);
        }
    }

    /// Property: a released stick writes zero speed at once and damps
    /// direction toward 0.
    #[test]
    fn released_stick_damps_direction_to_zero(
        push in -1.0f32..=1.0,
        frames in 1usize..30,
    ) {
        let mut loco = LocomotionController::new(
            LocomotionConfig::default(),
            Some(ParameterAnimator::new()),
        );
        let body = Transform::IDENTITY;
        let pushed = InputFrame::neutral().with_axis(Axis::Horizontal, push);
        for _ in 0..frames {
            loco.on_variable_step(1.0 / 60.0, &pushed, &body, Vec3::Z, CameraMode::Behind);
        }

        let released = InputFrame::neutral();
        let sample = loco
            .on_variable_step(1.0 / 60.0, &released, &body, Vec3::Z, CameraMode::Behind)
            .unwrap();
        prop_assert_eq!(sample.speed, 0.0);
        prop_assert_eq!(sample.direction, 0.0);
        prop_assert_eq!(loco.animator().unwrap().parameter(AnimParam::Speed), 0.0);

        for _ in 0..300 {
            loco.on_variable_step(1.0 / 60.0, &released, &body, Vec3::Z, CameraMode::Behind);
        }
        let settled = loco.animator().unwrap().parameter(AnimParam::Direction);
        prop_assert!(settled.abs() < 1e-3, "direction still {}", settled);
    }
}

#[test]
fn aligned_forward_stick_goes_straight() {
    let loco = LocomotionController::<ParameterAnimator>::new(
        LocomotionConfig::default(),
        Some(ParameterAnimator::new()),
    );
    let sample = loco.update(0.0, 1.0, Vec3::Z, Vec3::Z);
    assert_eq!(sample.speed, 1.0);
    assert!(sample.direction.abs() < 1e-4);
}

#[test]
fn aligned_right_stick_turns_right() {
    let loco = LocomotionController::<ParameterAnimator>::new(
        LocomotionConfig::default(),
        Some(ParameterAnimator::new()),
    );
    let sample = loco.update(1.0, 0.0, Vec3::Z, Vec3::Z);
    assert_eq!(sample.speed, 1.0);
    // 90 degrees / 100 * 3.
    assert!((sample.direction - 2.7).abs() < 1e-3);
}

#[test]
fn animation_parameters_reach_the_sink() {
    let mut loco = LocomotionController::new(
        LocomotionConfig::default(),
        Some(trailcam_testkit::RecordingAnimator::new()),
    );
    loco.set_animation_parameters(0.5, -1.2, 0.25, 0.02);
    let animator = loco.animator().unwrap();
    assert_eq!(animator.last_value(AnimParam::Speed), Some(0.5));
    assert_eq!(animator.last_value(AnimParam::Direction), Some(-1.2));
    assert_eq!(
        animator.calls()[1],
        trailcam_testkit::AnimCall::Damped {
            param: AnimParam::Direction,
            value: -1.2,
            damp_time: 0.25,
            dt: 0.02,
        }
    );
    assert_eq!(animator.current_state(), trailcam_core::AnimStateId::Idle);
}
