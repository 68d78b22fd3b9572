//! Stick input to camera-relative movement.

use glam::Vec3;
use serde::Serialize;
use trailcam_core::math::{referential_shift, signed_ground_angle};

/// Per-frame movement values derived from the left stick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MovementSample {
    /// Raw horizontal axis.
    pub horizontal: f32,
    /// Raw vertical axis.
    pub vertical: f32,
    /// Squared stick magnitude, never negative.
    pub speed: f32,
    /// Signed turn amount; positive turns right.
    pub direction: f32,
}

/// Express the stick in world space relative to the camera, then measure how
/// far the character has to turn to face it.
///
/// Stick forward always means "away from the camera", whatever the character
/// is facing. The signed angle (degrees) is divided by `angle_divisor` and
/// multiplied by `direction_speed`.
pub fn stick_to_world(
    horizontal: f32,
    vertical: f32,
    character_forward: Vec3,
    camera_forward: Vec3,
    angle_divisor: f32,
    direction_speed: f32,
) -> MovementSample {
    let stick = Vec3::new(horizontal, 0.0, vertical);
    let speed = stick.length_squared();

    let move_direction = referential_shift(camera_forward) * stick;
    let angle = signed_ground_angle(character_forward, move_direction);
    tracing::trace!(?move_direction, ?character_forward, angle, "stick to world");

    let divisor = if angle_divisor.abs() > f32::EPSILON {
        angle_divisor
    } else {
        1.0
    };

    MovementSample {
        horizontal,
        vertical,
        speed,
        direction: angle / divisor * direction_speed,
    }
}
