//! Collaborator doubles that record what the controllers asked of them.

use glam::Vec3;
use std::cell::RefCell;
use trailcam_core::{AnimParam, AnimStateId, AnimationSink};
use trailcam_physics::OcclusionOracle;

/// One call made against a [`RecordingAnimator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimCall {
    /// `set_scalar`.
    Scalar {
        /// Parameter written.
        param: AnimParam,
        /// Value written.
        value: f32,
    },
    /// `set_scalar_damped`.
    Damped {
        /// Parameter written.
        param: AnimParam,
        /// Target value.
        value: f32,
        /// Damping time.
        damp_time: f32,
        /// Frame delta.
        dt: f32,
    },
    /// `set_look_at_weight`.
    LookAtWeight(f32),
    /// `set_look_at_position`.
    LookAtPosition(Vec3),
    /// `set_layer_weight`.
    LayerWeight {
        /// Layer index.
        layer: usize,
        /// Weight written.
        weight: f32,
    },
}

/// Animator that reports a scripted state and logs every call.
#[derive(Debug, Default)]
pub struct RecordingAnimator {
    state: AnimStateId,
    layers: usize,
    calls: Vec<AnimCall>,
}

impl RecordingAnimator {
    /// Idle animator with one layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `state` from `current_state`.
    pub fn in_state(mut self, state: AnimStateId) -> Self {
        self.state = state;
        self
    }

    /// Report `layers` from `layer_count`.
    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    /// Change the reported state.
    pub fn set_state(&mut self, state: AnimStateId) {
        self.state = state;
    }

    /// Every call in order.
    pub fn calls(&self) -> &[AnimCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Last look-at weight written.
    pub fn last_look_at_weight(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match call {
            AnimCall::LookAtWeight(weight) => Some(*weight),
            _ => None,
        })
    }

    /// Last look-at point written.
    pub fn last_look_at_position(&self) -> Option<Vec3> {
        self.calls.iter().rev().find_map(|call| match call {
            AnimCall::LookAtPosition(point) => Some(*point),
            _ => None,
        })
    }

    /// Last value written to `param`, damped or not.
    pub fn last_value(&self, param: AnimParam) -> Option<f32> {
        self.calls.iter().rev().find_map(|call| match *call {
            AnimCall::Scalar { param: p, value } if p == param => Some(value),
            AnimCall::Damped { param: p, value, .. } if p == param => Some(value),
            _ => None,
        })
    }
}

impl AnimationSink for RecordingAnimator {
    fn set_scalar(&mut self, param: AnimParam, value: f32) {
        self.calls.push(AnimCall::Scalar { param, value });
    }

    fn set_scalar_damped(&mut self, param: AnimParam, value: f32, damp_time: f32, dt: f32) {
        self.calls.push(AnimCall::Damped {
            param,
            value,
            damp_time,
            dt,
        });
    }

    fn current_state(&self) -> AnimStateId {
        self.state
    }

    fn set_look_at_weight(&mut self, weight: f32) {
        self.calls.push(AnimCall::LookAtWeight(weight));
    }

    fn set_look_at_position(&mut self, point: Vec3) {
        self.calls.push(AnimCall::LookAtPosition(point));
    }

    fn layer_count(&self) -> usize {
        self.layers.max(1)
    }

    fn set_layer_weight(&mut self, layer: usize, weight: f32) {
        self.calls.push(AnimCall::LayerWeight { layer, weight });
    }
}

/// Oracle that answers every query with the same result and logs queries.
#[derive(Debug, Default)]
pub struct FixedOracle {
    hit: Option<Vec3>,
    queries: RefCell<Vec<(Vec3, Vec3)>>,
}

impl FixedOracle {
    /// Oracle that never reports a hit.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Oracle that always reports `point`.
    pub fn hit(point: Vec3) -> Self {
        Self {
            hit: Some(point),
            queries: RefCell::default(),
        }
    }

    /// Segments queried so far.
    pub fn queries(&self) -> Vec<(Vec3, Vec3)> {
        self.queries.borrow().clone()
    }
}

impl OcclusionOracle for FixedOracle {
    fn line_intersects(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        self.queries.borrow_mut().push((from, to));
        self.hit
    }
}
