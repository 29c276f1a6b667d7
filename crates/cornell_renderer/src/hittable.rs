//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Color, Interval, Material, MaterialKind, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Carries a copy of the surface material so shading never has to reach
/// back into the primitive that produced the hit.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Surface reflectance
    pub albedo: Color,
    /// Emitted radiance
    pub emission: Color,
    pub kind: MaterialKind,
    pub fuzz: f32,
}

impl HitRecord {
    /// Build a record for a hit at `t`, orienting `outward_normal` against
    /// the ray and copying the material attributes.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &Material) -> Self {
        let (front_face, normal) = face_normal(ray, outward_normal);
        Self {
            t,
            p: ray.at(t),
            normal,
            front_face,
            albedo: material.albedo,
            emission: material.emission,
            kind: material.kind,
            fuzz: material.fuzz,
        }
    }

    /// Check if the surface emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length() > 0.0
    }
}

/// Resolve front/back face for an outward normal.
///
/// The returned normal always points against the ray direction.
#[inline]
fn face_normal(ray: &Ray, outward_normal: Vec3) -> (bool, Vec3) {
    // If the ray and normal point in the same direction, we're inside
    let front_face = ray.direction().dot(outward_normal) < 0.0;
    let normal = if front_face {
        outward_normal
    } else {
        -outward_normal
    };
    (front_face, normal)
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object with t in `[ray_t.min, ray_t.max)`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// A list of hittable objects searched linearly.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
