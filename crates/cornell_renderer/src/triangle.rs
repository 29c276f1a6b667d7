//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use cornell_math::safe_normalize;

use crate::{HitRecord, Hittable, Interval, Material, Ray, Vec3};

/// Determinant threshold below which a ray counts as parallel to the
/// triangle plane.
pub const TRIANGLE_EPSILON: f32 = 1e-8;

/// A triangle primitive.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length, zero if degenerate)
    normal: Vec3,
    material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the winding order, `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = safe_normalize((v1 - v0).cross(v2 - v0));
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // Ray parallel to triangle (or degenerate triangle)
        if det.abs() < TRIANGLE_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if !ray_t.contains_half_open(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material))
    }
}
