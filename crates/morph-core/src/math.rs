use glam::{EulerRot, Quat, Vec3};

/// Scalar linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a frame delta to something the integrators can consume.
///
/// Negative, NaN and infinite deltas become 0 so a broken host clock freezes
/// the frame instead of poisoning every entity.
#[inline]
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// Exponential-decay step factor: `min(dt * speed_weight * rate, 1)`.
#[inline]
pub fn morph_alpha(dt: f32, speed_weight: f32, rate: f32) -> f32 {
    let alpha = sanitize_delta(dt) * speed_weight * rate;
    if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Normalize a quaternion, falling back to identity for zero-length or
/// non-finite input.
#[inline]
pub fn normalize_or_identity(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > 1.0e-6 {
        q / len
    } else {
        Quat::IDENTITY
    }
}

/// Orientation from per-axis Euler angles (XYZ order, radians).
#[inline]
pub fn quat_from_euler(angles: Vec3) -> Quat {
    normalize_or_identity(Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z))
}

/// Replace a non-finite vector with `fallback`.
#[inline]
pub fn finite_or(v: Vec3, fallback: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
