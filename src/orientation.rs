use bevy::math::{Quat, Vec3};

const ALIGNED_EPSILON: f32 = 1e-6;

/// Orientations after the first and second axis corrections. The second is
/// one of the 24 axis-aligned poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationKeyframes {
    pub first: Quat,
    pub second: Quat,
}

impl OrientationKeyframes {
    pub fn rest(&self) -> Quat {
        self.second
    }

    /// Un-rotation path for `w` in [0, 1]: `start` at 1, `first` at 0.5,
    /// `second` at 0.
    pub fn sample(&self, start: Quat, w: f32) -> Quat {
        let w = w.clamp(0.0, 1.0);
        if w >= 0.5 {
            self.first.lerp(start, (w - 0.5) * 2.0)
        } else {
            self.second.lerp(self.first, w * 2.0)
        }
    }
}

/// Signed world axis closest to `v`. Ties prefer X, then Y, then Z.
pub fn nearest_world_axis(v: Vec3) -> Vec3 {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        Vec3::X * v.x.signum()
    } else if a.y >= a.z {
        Vec3::Y * v.y.signum()
    } else {
        Vec3::Z * v.z.signum()
    }
}

/// Shortest-arc rotation taking the cube's local `reference` axis, as seen
/// in world space, onto the nearest signed world axis.
fn axis_correction(orientation: Quat, reference: Vec3) -> Quat {
    let begin = (orientation * reference).normalize();
    let end = nearest_world_axis(begin);
    if begin.dot(end) >= 1.0 - ALIGNED_EPSILON {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(begin, end)
}

/// Two-step correction back to a rest pose: align local X first, then
/// local Y against the partially corrected orientation.
pub fn snap_orientation(orientation: Quat) -> OrientationKeyframes {
    let orientation = orientation.normalize();
    let first = (axis_correction(orientation, Vec3::X) * orientation).normalize();
    let second = (axis_correction(first, Vec3::Y) * first).normalize();
    OrientationKeyframes { first, second }
}

/// Whether two rotations are the same, ignoring the sign of the quaternion.
pub fn same_rotation(a: Quat, b: Quat, tolerance: f32) -> bool {
    a.dot(b).abs() >= 1.0 - tolerance
}

/// True when every local axis maps onto a signed world axis.
pub fn is_axis_aligned(q: Quat, tolerance: f32) -> bool {
    [Vec3::X, Vec3::Y, Vec3::Z].iter().all(|&axis| {
        let v = q * axis;
        (v - nearest_world_axis(v)).length() <= tolerance
    })
}
