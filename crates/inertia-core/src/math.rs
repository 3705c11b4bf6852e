//! Vector and unit-quaternion helpers over glam's f64 types.
//!
//! Every constructor here tolerates degenerate input: zero-length axes and
//! ill-defined directions map to the identity rotation instead of NaN, since
//! zero angular rate and free fall are ordinary conditions for a handheld
//! sensor.

use glam::{DQuat, DVec3};

pub type Vector3 = DVec3;
pub type Quaternion = DQuat;

/// Reference "down" axis of the world frame.
pub const DOWN: Vector3 = DVec3::NEG_Z;

/// Lengths below this are treated as zero.
const DEGENERATE_LENGTH: f64 = 1e-9;

/// Unit vector in the direction of `v`, or `None` if it has no direction.
pub fn safe_normalize(v: Vector3) -> Option<Vector3> {
    let length = v.length();
    if length.is_finite() && length > DEGENERATE_LENGTH {
        Some(v / length)
    } else {
        None
    }
}

/// Rotation of `angle` radians about `axis`. A degenerate axis yields identity.
pub fn axis_angle(axis: Vector3, angle: f64) -> Quaternion {
    match safe_normalize(axis) {
        Some(axis) if angle.is_finite() => Quaternion::from_axis_angle(axis, angle),
        _ => Quaternion::IDENTITY,
    }
}

/// Rotation accumulated over `dt` seconds at a constant angular rate given in deg/s.
pub fn rotation_step(rate_degrees: Vector3, dt: f64) -> Quaternion {
    let rate = degrees_to_radians(rate_degrees);
    axis_angle(rate, rate.length() * dt)
}

/// Shortest rotation taking direction `from` onto direction `to`.
///
/// Inputs need not be unit length. If either has no direction the identity is
/// returned. Antiparallel inputs rotate half a turn about an arbitrary
/// perpendicular axis.
pub fn shortest_arc(from: Vector3, to: Vector3) -> Quaternion {
    match (safe_normalize(from), safe_normalize(to)) {
        (Some(from), Some(to)) => renormalize(Quaternion::from_rotation_arc(from, to)),
        _ => Quaternion::IDENTITY,
    }
}

/// Scale back onto the unit sphere. Degenerate quaternions collapse to identity.
pub fn renormalize(q: Quaternion) -> Quaternion {
    let length = q.length();
    if length.is_finite() && length > DEGENERATE_LENGTH {
        q * (1.0 / length)
    } else {
        Quaternion::IDENTITY
    }
}

/// Inverse of a unit quaternion.
pub fn inverse(q: Quaternion) -> Quaternion {
    q.conjugate()
}

/// Spherical interpolation along the shorter arc, renormalized.
pub fn slerp(from: Quaternion, to: Quaternion, t: f64) -> Quaternion {
    renormalize(from.slerp(to, t))
}

/// Apply the rotation `q` to `v`.
pub fn rotate(q: Quaternion, v: Vector3) -> Vector3 {
    q * v
}

pub fn degrees_to_radians(v: Vector3) -> Vector3 {
    v * std::f64::consts::PI / 180.0
}

/// Angle (radians) of the smallest rotation taking `a` onto `b`.
pub fn angle_between(a: Quaternion, b: Quaternion) -> f64 {
    let dot = a.dot(b).abs().min(1.0);
    2.0 * dot.acos()
}
