use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when camera tuning cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The first-person pitch range has min above max.
    #[error("first-person pitch clamp is inverted: min {min} > max {max}")]
    InvertedPitchClamp {
        /// Lower bound as configured.
        min: f32,
        /// Upper bound as configured.
        max: f32,
    },
    /// A value that must be strictly positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// A value was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
}

/// Tuning for the follow camera.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Trailing distance behind the character.
    pub distance_away: f32,
    /// Height of the anchor above the character's feet, also added again
    /// along the character's up axis for the camera target.
    pub distance_up: f32,
    /// Position smoothing time in seconds.
    pub smooth_time: f32,
    /// Letterbox coverage while targeting.
    pub widescreen: f32,
    /// Per-frame step factor for the letterbox transition.
    pub targeting_time: f32,
    /// Target axis value above which the camera targets.
    pub targeting_threshold: f32,
    /// Right stick Y value above which first-person view is entered.
    pub first_person_threshold: f32,
    /// Look speed in first person; also the rate of the look-weight blend.
    pub first_person_look_speed: f32,
    /// Allowed first-person pitch in degrees, `[min, max]`. Positive looks down.
    pub first_person_pitch_clamp: Vec2,
    /// Body yaw rate while looking around in first person.
    pub first_person_rotation_degrees_per_second: f32,
    /// Eye position relative to the character.
    pub first_person_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance_away: 3.0,
            distance_up: 1.5,
            smooth_time: 0.1,
            widescreen: 0.2,
            targeting_time: 0.5,
            targeting_threshold: 0.01,
            first_person_threshold: 0.5,
            first_person_look_speed: 1.5,
            first_person_pitch_clamp: Vec2::new(-70.0, 90.0),
            first_person_rotation_degrees_per_second: 120.0,
            first_person_offset: Vec3::new(0.0, 1.6, 0.2),
        }
    }
}

impl CameraConfig {
    /// Check that the tuning is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("distance_away", self.distance_away),
            ("distance_up", self.distance_up),
            ("smooth_time", self.smooth_time),
            ("widescreen", self.widescreen),
            ("targeting_time", self.targeting_time),
            ("targeting_threshold", self.targeting_threshold),
            ("first_person_threshold", self.first_person_threshold),
            ("first_person_look_speed", self.first_person_look_speed),
            (
                "first_person_rotation_degrees_per_second",
                self.first_person_rotation_degrees_per_second,
            ),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }
        if !self.first_person_pitch_clamp.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "first_person_pitch_clamp",
            });
        }
        if !self.first_person_offset.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "first_person_offset",
            });
        }
        if self.smooth_time <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "smooth_time",
                value: self.smooth_time,
            });
        }
        let Vec2 { x: min, y: max } = self.first_person_pitch_clamp;
        if min > max {
            return Err(ConfigError::InvertedPitchClamp { min, max });
        }
        Ok(())
    }
}
