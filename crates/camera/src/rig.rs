use glam::{Quat, Vec3};
use trailcam_core::Transform;

/// Eye frame parented to the character.
///
/// Position is a fixed offset in the parent's space; only the local pitch
/// changes after creation. World placement is always computed against the
/// parent passed in, so the rig follows the body without holding a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonRig {
    name: String,
    local_offset: Vec3,
    local_rotation: Quat,
}

impl FirstPersonRig {
    /// Create the rig at `local_offset` under `parent`.
    pub fn initialize(name: impl Into<String>, local_offset: Vec3, parent: &Transform) -> Self {
        let rig = Self {
            name: name.into(),
            local_offset,
            local_rotation: Quat::IDENTITY,
        };
        tracing::debug!(
            name = %rig.name,
            world = ?rig.world_position(parent),
            "first-person rig attached"
        );
        rig
    }

    /// Rig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset from the parent origin, in parent space.
    pub fn local_offset(&self) -> Vec3 {
        self.local_offset
    }

    /// Rotation relative to the parent.
    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    /// Pitch the rig by `degrees` about its local X axis. Positive looks down.
    pub fn set_pitch(&mut self, degrees: f32) {
        self.local_rotation = Quat::from_rotation_x(degrees.to_radians());
    }

    /// World position under `parent`.
    pub fn world_position(&self, parent: &Transform) -> Vec3 {
        parent.transform_point(self.local_offset)
    }

    /// World rotation under `parent`.
    pub fn world_rotation(&self, parent: &Transform) -> Quat {
        parent.rotation * self.local_rotation
    }

    /// World forward axis under `parent`.
    pub fn world_forward(&self, parent: &Transform) -> Vec3 {
        self.world_rotation(parent) * Vec3::Z
    }

    /// Full world transform under `parent`.
    pub fn world_transform(&self, parent: &Transform) -> Transform {
        Transform::new(self.world_position(parent), self.world_rotation(parent))
    }
}
