//! Scalar and vector helpers for frame-stepped control code.
//!
//! Conventions: +Y is up, +Z is forward, +X is right. Angles passed in and out
//! of this module are in degrees unless the name says otherwise.

use glam::{Quat, Vec3};

/// Squared length below which a direction is treated as degenerate.
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-8;

/// Smallest smoothing time accepted by the damping helpers.
const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Vector linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp_vec3_clamped(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Hermite interpolation between `from` and `to`.
///
/// `t` is clamped to `[0, 1]` and eased with `3t^2 - 2t^3`, so a constant `t`
/// per frame closes a fixed fraction of the remaining gap.
pub fn smooth_step(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let t = -2.0 * t * t * t + 3.0 * t * t;
    to * t + from * (1.0 - t)
}

/// Critically damped spring toward `target`.
///
/// `velocity` carries state between calls and must persist across frames. The
/// result never passes the target: if a step would overshoot, the output snaps
/// to the target and the velocity is cleared.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let output = target + (change + temp) * exp;

    if (target - current).dot(output - target) > 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }
    output
}

/// Scalar counterpart of [`smooth_damp`].
pub fn smooth_damp_scalar(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let output = target + (change + temp) * exp;

    if (target - current) * (output - target) > 0.0 {
        *velocity = 0.0;
        return target;
    }
    output
}

/// Zero the vertical component of `v`.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Flatten and normalize `v`, or `None` when nothing is left on the ground plane.
pub fn ground_direction(v: Vec3) -> Option<Vec3> {
    let flat = flatten(v);
    if flat.length_squared() < DEGENERATE_LENGTH_SQ {
        None
    } else {
        Some(flat.normalize())
    }
}

/// Yaw rotation carrying world forward (+Z) onto the flattened `observed` axis.
///
/// Identity when `observed` has no ground-plane component (camera looking
/// straight up or down).
pub fn referential_shift(observed: Vec3) -> Quat {
    match ground_direction(observed) {
        Some(dir) => Quat::from_rotation_y(dir.x.atan2(dir.z)),
        None => Quat::IDENTITY,
    }
}

/// Unsigned angle between two vectors in degrees; 0 if either is degenerate.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed angle in degrees from `from` to `to`, positive when `to` lies to the
/// right of `from`.
///
/// The side is taken from the vertical component of `to x from`; a
/// non-negative component means `to` is on the left.
pub fn signed_ground_angle(from: Vec3, to: Vec3) -> f32 {
    let angle = angle_between(from, to);
    if to.cross(from).y >= 0.0 {
        -angle
    } else {
        angle
    }
}

/// Yaw in degrees needed to turn at `degrees_per_second` scaled by the stick
/// deflection `input`, over `dt` seconds.
pub fn yaw_step(degrees_per_second: f32, input: f32, dt: f32) -> f32 {
    let full = if input < 0.0 {
        -degrees_per_second
    } else {
        degrees_per_second
    };
    lerp_clamped(0.0, full, input.abs()) * dt
}
