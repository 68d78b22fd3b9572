#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod anim;
pub mod input;
pub mod math;
mod transform;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use anim::{AnimParam, AnimStateId, AnimationSink, ParameterAnimator};
pub use input::{Axis, Button, InputFrame, InputSource};
pub use transform::Transform;

/// Frame counter advanced once per driver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any run.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Behavioral mode of the follow camera.
///
/// Owned by the camera; the locomotion controller only reads it to suppress
/// movement-driven body rotation while the player looks around in first person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Trailing view behind the character.
    #[default]
    Behind,
    /// Eye-level view from the character's head.
    FirstPerson,
    /// Aim view aligned with the character's facing.
    Target,
    /// Reserved. Never entered by the mode selection logic.
    Free,
}

impl CameraMode {
    /// Stable lowercase label for logs and traces.
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Behind => "behind",
            CameraMode::FirstPerson => "first_person",
            CameraMode::Target => "target",
            CameraMode::Free => "free",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_tick_advances() {
        assert_eq!(FrameTick::ZERO.advance(3), FrameTick(3));
        assert!(FrameTick(2) > FrameTick::ZERO);
    }

    #[test]
    fn camera_mode_defaults_to_behind() {
        assert_eq!(CameraMode::default(), CameraMode::Behind);
        assert_eq!(CameraMode::FirstPerson.label(), "first_person");
    }
}
