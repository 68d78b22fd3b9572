//! Narrow contract to the animation system.
//!
//! The controllers never see clips or blend trees. They write a handful of
//! named scalars, drive the head look-at IK, and ask which state the base
//! layer is currently in.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::smooth_damp_scalar;

/// Scalar parameters written into the animation system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimParam {
    /// Squared stick magnitude.
    Speed,
    /// Camera-relative turn amount, signed.
    Direction,
}

impl AnimParam {
    /// All parameters in slot order.
    pub const ALL: [AnimParam; 2] = [AnimParam::Speed, AnimParam::Direction];

    /// Parameter name as authored in the animation graph.
    pub fn name(self) -> &'static str {
        match self {
            AnimParam::Speed => "Speed",
            AnimParam::Direction => "Direction",
        }
    }

    fn slot(self) -> usize {
        match self {
            AnimParam::Speed => 0,
            AnimParam::Direction => 1,
        }
    }
}

/// Identifier of the state currently playing on the base layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimStateId {
    /// Standing still.
    #[default]
    Idle,
    /// Walking or running blend.
    Locomotion,
    /// Any state the controllers do not care about.
    Other(u32),
}

/// Sink for animation-drive values.
pub trait AnimationSink {
    /// Set a scalar immediately.
    fn set_scalar(&mut self, param: AnimParam, value: f32);

    /// Move a scalar toward `value`, damped over `damp_time` seconds.
    fn set_scalar_damped(&mut self, param: AnimParam, value: f32, damp_time: f32, dt: f32);

    /// State currently playing on the base layer.
    fn current_state(&self) -> AnimStateId;

    /// Blend between animated head motion (0) and IK look-at (1).
    fn set_look_at_weight(&mut self, weight: f32);

    /// World-space point the head IK aims at.
    fn set_look_at_position(&mut self, point: Vec3);

    /// Number of animation layers.
    fn layer_count(&self) -> usize {
        1
    }

    /// Set the blend weight of a layer.
    fn set_layer_weight(&mut self, _layer: usize, _weight: f32) {}
}

#[derive(Debug, Clone, Copy, Default)]
struct ParamSlot {
    value: f32,
    velocity: f32,
}

/// Parameter table with a two-state base layer.
///
/// The base layer sits in [`AnimStateId::Locomotion`] while `Speed` is above
/// the locomotion threshold and in [`AnimStateId::Idle`] otherwise. Used by
/// the headless driver in place of a full animation runtime.
#[derive(Debug, Clone)]
pub struct ParameterAnimator {
    params: [ParamSlot; 2],
    state: AnimStateId,
    locomotion_threshold: f32,
    look_at_weight: f32,
    look_at_position: Option<Vec3>,
    layer_weights: Vec<f32>,
}

impl Default for ParameterAnimator {
    fn default() -> Self {
        Self {
            params: [ParamSlot::default(); 2],
            state: AnimStateId::Idle,
            locomotion_threshold: 0.1,
            look_at_weight: 0.0,
            look_at_position: None,
            layer_weights: vec![1.0],
        }
    }
}

impl ParameterAnimator {
    /// Create an animator with a single layer and the default threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `layers` layers (at least one). Extra layers start at weight 0.
    pub fn with_layers(mut self, layers: usize) -> Self {
        let mut weights = vec![0.0; layers.max(1)];
        weights[0] = 1.0;
        self.layer_weights = weights;
        self
    }

    /// `Speed` value above which the base layer enters locomotion.
    pub fn with_locomotion_threshold(mut self, threshold: f32) -> Self {
        self.locomotion_threshold = threshold.max(0.0);
        self.refresh_state();
        self
    }

    /// Current value of a parameter.
    pub fn parameter(&self, param: AnimParam) -> f32 {
        self.params[param.slot()].value
    }

    /// Last look-at weight written.
    pub fn look_at_weight(&self) -> f32 {
        self.look_at_weight
    }

    /// Last look-at point written, if any.
    pub fn look_at_position(&self) -> Option<Vec3> {
        self.look_at_position
    }

    /// Weight of `layer`, or `None` past the last layer.
    pub fn layer_weight(&self, layer: usize) -> Option<f32> {
        self.layer_weights.get(layer).copied()
    }

    fn refresh_state(&mut self) {
        if !matches!(self.state, AnimStateId::Idle | AnimStateId::Locomotion) {
            return;
        }
        let next = if self.parameter(AnimParam::Speed) > self.locomotion_threshold {
            AnimStateId::Locomotion
        } else {
            AnimStateId::Idle
        };
        if next != self.state {
            tracing::trace!(from = ?self.state, to = ?next, "base layer transition");
            self.state = next;
        }
    }
}

impl AnimationSink for ParameterAnimator {
    fn set_scalar(&mut self, param: AnimParam, value: f32) {
        let slot = &mut self.params[param.slot()];
        slot.value = value;
        slot.velocity = 0.0;
        self.refresh_state();
    }

    fn set_scalar_damped(&mut self, param: AnimParam, value: f32, damp_time: f32, dt: f32) {
        let slot = &mut self.params[param.slot()];
        slot.value = smooth_damp_scalar(slot.value, value, &mut slot.velocity, damp_time, dt);
        self.refresh_state();
    }

    fn current_state(&self) -> AnimStateId {
        self.state
    }

    fn set_look_at_weight(&mut self, weight: f32) {
        self.look_at_weight = weight.clamp(0.0, 1.0);
    }

    fn set_look_at_position(&mut self, point: Vec3) {
        self.look_at_position = Some(point);
    }

    fn layer_count(&self) -> usize {
        self.layer_weights.len()
    }

    fn set_layer_weight(&mut self, layer: usize, weight: f32) {
        if let Some(slot) = self.layer_weights.get_mut(layer) {
            *slot = weight.clamp(0.0, 1.0);
        }
    }
}
