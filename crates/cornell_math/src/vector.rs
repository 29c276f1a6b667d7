//! Vector helpers shared by the primitives and the shading code.

use crate::Vec3;

/// Vectors shorter than this normalize to zero.
pub const NORMALIZE_EPSILON: f32 = 1e-8;

/// Normalize `v`, returning the zero vector when `v` is (nearly) zero length.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON {
        v / len
    } else {
        Vec3::ZERO
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Largest of the three components.
#[inline]
pub fn max_component(v: Vec3) -> f32 {
    v.x.max(v.y).max(v.z)
}
