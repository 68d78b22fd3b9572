use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::{ground_direction, DEGENERATE_LENGTH_SQ};

/// World-space position and orientation of a body or camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space.
    pub position: Vec3,
    /// Orientation; local +Z is forward.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Origin, facing +Z.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a transform from position and rotation.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create an unrotated transform at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a transform at `position` turned `degrees` about +Y.
    pub fn from_position_yaw(position: Vec3, degrees: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(degrees.to_radians()),
        }
    }

    /// Local +Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Heading of the forward axis on the ground plane, in degrees.
    ///
    /// 0 faces +Z and 90 faces +X. A forward axis with no ground component
    /// reports 0.
    pub fn yaw_degrees(&self) -> f32 {
        ground_direction(self.forward())
            .map(|dir| dir.x.atan2(dir.z).to_degrees())
            .unwrap_or(0.0)
    }

    /// Map a point from local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Turn by `degrees` about the local up axis.
    pub fn rotate_local_yaw(&mut self, degrees: f32) {
        let delta = Quat::from_rotation_y(degrees.to_radians());
        self.rotation = (self.rotation * delta).normalize();
    }

    /// Orient local +Z toward `point`, keeping local +Y as close to `world_up`
    /// as possible.
    ///
    /// A `point` on top of the current position leaves the rotation untouched.
    /// Looking straight along `world_up` keeps the current right axis.
    pub fn look_at(&mut self, point: Vec3, world_up: Vec3) {
        let dir = point - self.position;
        if dir.length_squared() < DEGENERATE_LENGTH_SQ {
            return;
        }
        let forward = dir.normalize();

        let mut right = world_up.cross(forward);
        if right.length_squared() < DEGENERATE_LENGTH_SQ {
            let current = self.right();
            right = current - forward * current.dot(forward);
            if right.length_squared() < DEGENERATE_LENGTH_SQ {
                return;
            }
        }
        let right = right.normalize();
        let up = forward.cross(right);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_axes() {
        let t = Transform::IDENTITY;
        assert_eq!(t.forward(), Vec3::Z);
        assert_eq!(t.right(), Vec3::X);
        assert_eq!(t.up(), Vec3::Y);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let mut t = Transform::IDENTITY;
        t.rotate_local_yaw(90.0);
        assert!(t.forward().distance(Vec3::X) < 1e-5);
        assert!((t.yaw_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut t = Transform::from_position(Vec3::new(0.0, 2.0, -5.0));
        t.look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::Y);
        assert!(t.forward().distance(Vec3::Z) < 1e-5);
        assert!(t.up().distance(Vec3::Y) < 1e-5);

        t.look_at(Vec3::new(10.0, 2.0, -5.0), Vec3::Y);
        assert!(t.forward().distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn look_at_degenerate_inputs_keep_rotation() {
        let mut t = Transform::from_position_yaw(Vec3::ONE, 30.0);
        let before = t.rotation;
        t.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(t.rotation, before);

        t.look_at(Vec3::new(1.0, 5.0, 1.0), Vec3::Y);
        assert!(t.forward().distance(Vec3::Y) < 1e-5);
        assert!(t.rotation.is_finite());
    }

    #[test]
    fn transform_point_applies_rotation() {
        let t = Transform::from_position_yaw(Vec3::new(1.0, 0.0, 0.0), 90.0);
        let p = t.transform_point(Vec3::new(0.0, 1.6, 0.2));
        assert!(p.distance(Vec3::new(1.2, 1.6, 0.0)) < 1e-5);
    }
}
