//! Named input axes and the source abstraction the controllers read from.

use serde::{Deserialize, Serialize};

/// Normalized input axis, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left stick X / strafe keys.
    Horizontal,
    /// Left stick Y / forward-back keys.
    Vertical,
    /// Right stick X.
    RightStickX,
    /// Right stick Y.
    RightStickY,
    /// Targeting trigger.
    Target,
}

impl Axis {
    /// Every axis.
    pub const ALL: [Axis; 5] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::RightStickX,
        Axis::RightStickY,
        Axis::Target,
    ];

    /// Identifier the axis is queried by.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Horizontal => "Horizontal",
            Axis::Vertical => "Vertical",
            Axis::RightStickX => "RightStickX",
            Axis::RightStickY => "RightStickY",
            Axis::Target => "Target",
        }
    }

    /// Parse an axis identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}

/// Discrete input buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Leave first-person view.
    ExitFpv,
}

impl Button {
    /// Identifier the button is queried by.
    pub fn name(self) -> &'static str {
        match self {
            Button::ExitFpv => "ExitFPV",
        }
    }

    /// Parse a button identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ExitFPV" => Some(Button::ExitFpv),
            _ => None,
        }
    }
}

/// Anything the controllers can poll for axes and buttons.
pub trait InputSource {
    /// Current value of `axis`, in `[-1, 1]`.
    fn axis(&self, axis: Axis) -> f32;

    /// Whether `button` is held.
    fn button(&self, button: Button) -> bool;
}

/// One frame of sampled input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Left stick X.
    pub horizontal: f32,
    /// Left stick Y.
    pub vertical: f32,
    /// Right stick X.
    pub right_x: f32,
    /// Right stick Y.
    pub right_y: f32,
    /// Targeting trigger.
    pub target: f32,
    /// Exit first-person button.
    pub exit_fpv: bool,
}

impl InputFrame {
    /// A frame with every axis at rest.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Set an axis, clamping into `[-1, 1]`. Non-finite values read as 0.
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        let value = if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        match axis {
            Axis::Horizontal => self.horizontal = value,
            Axis::Vertical => self.vertical = value,
            Axis::RightStickX => self.right_x = value,
            Axis::RightStickY => self.right_y = value,
            Axis::Target => self.target = value,
        }
    }

    /// Builder form of [`InputFrame::set_axis`].
    pub fn with_axis(mut self, axis: Axis, value: f32) -> Self {
        self.set_axis(axis, value);
        self
    }

    /// Builder form for buttons.
    pub fn with_button(mut self, button: Button, held: bool) -> Self {
        match button {
            Button::ExitFpv => self.exit_fpv = held,
        }
        self
    }

    /// Re-clamp every axis; used after deserializing untrusted frames.
    pub fn sanitized(self) -> Self {
        let mut out = self;
        for axis in Axis::ALL {
            out.set_axis(axis, self.axis(axis));
        }
        out
    }
}

impl InputSource for InputFrame {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
            Axis::RightStickX => self.right_x,
            Axis::RightStickY => self.right_y,
            Axis::Target => self.target,
        }
    }

    fn button(&self, button: Button) -> bool {
        match button {
            Button::ExitFpv => self.exit_fpv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_names_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_name(axis.name()), Some(axis));
        }
        assert_eq!(Axis::from_name("Jump"), None);
        assert_eq!(Button::from_name("ExitFPV"), Some(Button::ExitFpv));
    }

    #[test]
    fn set_axis_clamps() {
        let frame = InputFrame::neutral()
            .with_axis(Axis::Vertical, 4.0)
            .with_axis(Axis::Horizontal, f32::NAN)
            .with_axis(Axis::Target, -2.0);
        assert_eq!(frame.vertical, 1.0);
        assert_eq!(frame.horizontal, 0.0);
        assert_eq!(frame.target, -1.0);
    }

    #[test]
    fn sanitized_clamps_deserialized_values() {
        let frame = InputFrame {
            right_y: 7.0,
            ..InputFrame::default()
        };
        assert_eq!(frame.sanitized().right_y, 1.0);
    }
}
