//! Pinhole camera for ray generation.

use cornell_core::CameraDesc;
use cornell_math::safe_normalize;
use rand::RngCore;

use crate::{gen_f32, Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// Pixel `y` grows upwards: `y = 0` is the bottom row of the image.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    scale: f32,
    aspect: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let desc = CameraDesc::default();
        Self {
            image_width: 512,
            image_height: 512,
            look_from: desc.look_from,
            look_at: desc.look_at,
            vup: desc.vup,
            vfov: desc.vfov,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            scale: 1.0,
            aspect: 1.0,
        }
    }

    /// Build an initialized camera from a scene description.
    pub fn from_desc(desc: &CameraDesc, width: u32, height: u32) -> Self {
        let mut camera = Self::new()
            .with_resolution(width, height)
            .with_position(desc.look_from, desc.look_at, desc.vup)
            .with_fov(desc.vfov);
        camera.initialize();
        camera
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.forward = safe_normalize(self.look_at - self.look_from);
        self.right = safe_normalize(self.forward.cross(self.vup));
        if self.right == Vec3::ZERO {
            log::warn!(
                "Camera up vector {} is parallel to the view direction",
                self.vup
            );
        }
        self.up = safe_normalize(self.right.cross(self.forward));

        self.scale = (self.vfov.to_radians() / 2.0).tan();
        self.aspect = self.image_width as f32 / self.image_height.max(1) as f32;
    }

    /// Ray through the point `(x + jx, y + jy)` of the image plane, where
    /// `(jx, jy)` is the sub-pixel offset in `[0, 1)`.
    pub fn ray_through(&self, x: u32, y: u32, jx: f32, jy: f32) -> Ray {
        let u = 2.0 * ((x as f32 + jx) / self.image_width as f32) - 1.0;
        let v = 2.0 * ((y as f32 + jy) / self.image_height as f32) - 1.0;

        let direction = self.forward
            + self.right * (u * self.scale * self.aspect)
            + self.up * (v * self.scale);

        Ray::new(self.look_from, safe_normalize(direction))
    }

    /// Generate a ray for pixel (x, y) with random sub-pixel jitter.
    pub fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let jx = gen_f32(rng);
        let jy = gen_f32(rng);
        self.ray_through(x, y, jx, jy)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
