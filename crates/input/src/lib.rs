#![warn(missing_docs)]
//! Keyboard input mapped onto the named stick axes.

use std::collections::HashSet;
use trailcam_core::{Axis, Button, InputFrame, InputSource};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;

pub use winit::keyboard::KeyCode;

/// A pair of keys driving one axis toward -1 and +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisKeys {
    /// Key pushing the axis toward -1.
    pub negative: KeyCode,
    /// Key pushing the axis toward +1.
    pub positive: KeyCode,
}

/// Key assignments for every axis and button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Strafe left/right.
    pub horizontal: AxisKeys,
    /// Move back/forward.
    pub vertical: AxisKeys,
    /// Look left/right.
    pub right_x: AxisKeys,
    /// Look down/up.
    pub right_y: AxisKeys,
    /// Held to target.
    pub target: KeyCode,
    /// Leave first-person view.
    pub exit_fpv: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            horizontal: AxisKeys {
                negative: KeyCode::KeyA,
                positive: KeyCode::KeyD,
            },
            vertical: AxisKeys {
                negative: KeyCode::KeyS,
                positive: KeyCode::KeyW,
            },
            right_x: AxisKeys {
                negative: KeyCode::ArrowLeft,
                positive: KeyCode::ArrowRight,
            },
            right_y: AxisKeys {
                negative: KeyCode::ArrowDown,
                positive: KeyCode::ArrowUp,
            },
            target: KeyCode::KeyQ,
            exit_fpv: KeyCode::KeyE,
        }
    }
}

/// Held-key state read as stick axes and buttons.
#[derive(Debug, Default)]
pub struct KeyboardAxes {
    bindings: KeyBindings,
    /// Keys currently pressed.
    keys_pressed: HashSet<KeyCode>,
}

impl KeyboardAxes {
    /// Create keyboard state with the default bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create keyboard state with custom bindings.
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Process a window event to update key state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.press(*keycode),
                ElementState::Released => self.release(*keycode),
            },
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Record a key going down.
    pub fn press(&mut self, key: KeyCode) {
        self.keys_pressed.insert(key);
    }

    /// Record a key going up.
    pub fn release(&mut self, key: KeyCode) {
        self.keys_pressed.remove(&key);
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_pressed.clear();
    }

    /// Check if a key is currently pressed.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn axis_value(&self, keys: AxisKeys) -> f32 {
        let mut value = 0.0;
        if self.key_pressed(keys.positive) {
            value += 1.0;
        }
        if self.key_pressed(keys.negative) {
            value -= 1.0;
        }
        value
    }

    /// Sample every axis and button into a frame snapshot.
    pub fn snapshot(&self) -> InputFrame {
        let mut frame = InputFrame::neutral();
        for axis in Axis::ALL {
            frame.set_axis(axis, self.axis(axis));
        }
        frame.with_button(Button::ExitFpv, self.button(Button::ExitFpv))
    }
}

impl InputSource for KeyboardAxes {
    fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.axis_value(self.bindings.horizontal),
            Axis::Vertical => self.axis_value(self.bindings.vertical),
            Axis::RightStickX => self.axis_value(self.bindings.right_x),
            Axis::RightStickY => self.axis_value(self.bindings.right_y),
            Axis::Target => {
                if self.key_pressed(self.bindings.target) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    fn button(&self, button: Button) -> bool {
        match button {
            Button::ExitFpv => self.key_pressed(self.bindings.exit_fpv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_default_to_rest() {
        let input = KeyboardAxes::new();
        assert_eq!(input.snapshot(), InputFrame::neutral());
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = KeyboardAxes::new();
        input.press(KeyCode::KeyW);
        assert_eq!(input.axis(Axis::Vertical), 1.0);

        input.press(KeyCode::KeyS);
        assert_eq!(input.axis(Axis::Vertical), 0.0);

        input.release(KeyCode::KeyW);
        assert_eq!(input.axis(Axis::Vertical), -1.0);
    }

    #[test]
    fn target_and_exit_keys_map_to_controls() {
        let mut input = KeyboardAxes::new();
        input.press(KeyCode::KeyQ);
        input.press(KeyCode::KeyE);
        input.press(KeyCode::ArrowUp);

        let frame = input.snapshot();
        assert_eq!(frame.target, 1.0);
        assert!(frame.exit_fpv);
        assert_eq!(frame.right_y, 1.0);
    }

    #[test]
    fn losing_focus_releases_held_keys() {
        let mut input = KeyboardAxes::new();
        input.press(KeyCode::KeyD);
        input.press(KeyCode::KeyE);
        assert_eq!(input.axis(Axis::Horizontal), 1.0);

        input.handle_event(&WindowEvent::Focused(false));
        assert!(!input.key_pressed(KeyCode::KeyD));
        assert_eq!(input.snapshot(), InputFrame::neutral());
    }

    #[test]
    fn custom_bindings_are_respected() {
        let bindings = KeyBindings {
            target: KeyCode::Space,
            ..KeyBindings::default()
        };
        let mut input = KeyboardAxes::with_bindings(bindings);
        input.press(KeyCode::KeyQ);
        assert_eq!(input.axis(Axis::Target), 0.0);
        input.press(KeyCode::Space);
        assert_eq!(input.axis(Axis::Target), 1.0);
    }
}
