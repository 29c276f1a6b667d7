//! Render-ready scene: the primitive list plus an optional solid texture.

use std::sync::Arc;

use crate::{Color, HitRecord, Hittable, HittableList, Interval, MaterialKind, ProceduralColor, Ray};

/// Primitives in insertion order and the texture used by `Textured`
/// surfaces.
///
/// Immutable once built; render threads share it by reference.
#[derive(Default)]
pub struct Scene {
    objects: HittableList,
    texture: Option<Arc<dyn ProceduralColor>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive. Earlier primitives win exact distance ties.
    pub fn add<H: Hittable + 'static>(&mut self, object: H) {
        self.objects.add(Box::new(object));
    }

    pub fn set_texture(&mut self, texture: Arc<dyn ProceduralColor>) {
        self.texture = Some(texture);
    }

    pub fn with_texture(mut self, texture: Arc<dyn ProceduralColor>) -> Self {
        self.set_texture(texture);
        self
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Nearest hit with t in `[ray_t.min, ray_t.max)`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.objects.hit(ray, ray_t)
    }

    /// Reflectance at the hit point.
    ///
    /// `Textured` surfaces take their color from the scene texture; without
    /// one they fall back to the primitive albedo.
    pub fn surface_albedo(&self, rec: &HitRecord) -> Color {
        match (rec.kind, &self.texture) {
            (MaterialKind::Textured, Some(texture)) => texture.color_at(rec.p),
            _ => rec.albedo,
        }
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
