//! Infinite plane primitive.

use cornell_math::safe_normalize;

use crate::{HitRecord, Hittable, Interval, Material, Ray, Vec3};

/// Rays with |dot(normal, direction)| below this are treated as parallel.
pub const PLANE_EPSILON: f32 = 1e-6;

/// An unbounded plane through `point` with unit `normal`.
///
/// Walls of a box are made from planes; camera framing keeps the parts
/// outside the box out of view.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Material,
}

impl Plane {
    /// Create a new plane. The normal is normalized here.
    pub fn new(point: Vec3, normal: Vec3, material: Material) -> Self {
        Self {
            point,
            normal: safe_normalize(normal),
            material,
        }
    }
}

impl Hittable for Plane {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PLANE_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        if !ray_t.contains_half_open(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material))
    }
}
