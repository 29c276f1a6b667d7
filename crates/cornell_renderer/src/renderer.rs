//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - An iterative bounce loop carrying path throughput
//! - Russian roulette termination after a configurable depth
//! - Anti-aliasing via jittered multi-sampling

use cornell_math::max_component;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{gen_f32, scatter, Camera, Color, Interval, Ray, Scene};

/// Lower bound of the Russian roulette survival probability.
const RR_MIN_SURVIVAL: f32 = 0.1;
/// Upper bound of the Russian roulette survival probability.
const RR_MAX_SURVIVAL: f32 = 0.99;

/// Errors from validating a [`RenderConfig`].
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Image size must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("samples_per_pixel must be at least 1")]
    ZeroSamples,

    #[error("Gamma must be positive, got {0}")]
    InvalidGamma(f32),

    #[error("t_min must be finite and non-negative, got {0}")]
    InvalidTMin(f32),
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Depth from which Russian roulette may end a path
    pub rr_depth: u32,
    /// Output gamma
    pub gamma: f32,
    /// Radiance returned by rays that leave the scene
    pub background: Color,
    /// Self-intersection offset for continuation rays
    pub t_min: f32,
    /// Base seed for the per-row RNGs; random when unset
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            samples_per_pixel: 1000,
            max_depth: 8,
            rr_depth: 3,
            gamma: 2.2,
            background: Color::new(0.5, 0.7, 1.0) * 0.3,
            t_min: 0.001,
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Check that the configuration can produce an image.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if !(self.gamma > 0.0 && self.gamma.is_finite()) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        if !(self.t_min >= 0.0 && self.t_min.is_finite()) {
            return Err(ConfigError::InvalidTMin(self.t_min));
        }
        Ok(())
    }
}

/// Russian roulette for a surface of reflectance `albedo`.
///
/// Survives with probability `clamp(max(albedo), 0.1, 0.99)`. Returns the
/// compensation weight `1/p` for a surviving path, `None` when it ends.
pub fn russian_roulette(albedo: Color, rng: &mut dyn RngCore) -> Option<f32> {
    let p = max_component(albedo).clamp(RR_MIN_SURVIVAL, RR_MAX_SURVIVAL);
    if gen_f32(rng) > p {
        None
    } else {
        Some(1.0 / p)
    }
}

/// Compute the radiance carried back along a ray.
///
/// Lights terminate the path without scattering. A path that exceeds
/// `max_depth`, loses at Russian roulette or is absorbed by a surface
/// contributes nothing.
pub fn ray_color(ray: &Ray, scene: &Scene, config: &RenderConfig, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;
    let mut depth = 0;

    loop {
        if depth >= config.max_depth {
            return Color::ZERO;
        }

        let Some(rec) = scene.hit(&ray, Interval::from_min(config.t_min)) else {
            return throughput * config.background;
        };

        if rec.is_emissive() {
            return throughput * rec.emission;
        }

        let mut weight = 1.0;
        if depth >= config.rr_depth {
            match russian_roulette(rec.albedo, rng) {
                Some(w) => weight = w,
                None => return Color::ZERO,
            }
        }

        let albedo = scene.surface_albedo(&rec);

        let Some(scattered) = scatter(&ray, &rec, rng) else {
            return Color::ZERO;
        };

        throughput *= albedo * weight;
        ray = scattered;
        depth += 1;
    }
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, scene, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear HDR frame buffer, row-major from the top row down.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at buffer position (x, row).
    pub fn get(&self, x: u32, row: u32) -> Color {
        self.pixels[self.index(x, row)]
    }

    /// Set the pixel at buffer position (x, row).
    pub fn set(&mut self, x: u32, row: u32, color: Color) {
        let index = self.index(x, row);
        self.pixels[index] = color;
    }

    /// One buffer row.
    pub fn row(&self, row: u32) -> &[Color] {
        let start = self.index(0, row);
        &self.pixels[start..start + self.width as usize]
    }

    #[inline]
    fn index(&self, x: u32, row: u32) -> usize {
        row as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Plane, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> RenderConfig {
        RenderConfig {
            background: Color::splat(0.1),
            seed: Some(42),
            ..RenderConfig::default()
        }
    }

    /// Diffuse box spanning [-1, 1] x [0, 2] x [-1, 1] lit by its ceiling.
    fn closed_box() -> Scene {
        let wall = Material::diffuse(Color::splat(0.5));
        let mut scene = Scene::new();
        scene.add(Plane::new(Vec3::ZERO, Vec3::Y, wall));
        scene.add(Plane::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::NEG_Y,
            Material::emissive(Color::ONE),
        ));
        scene.add(Plane::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X, wall));
        scene.add(Plane::new(Vec3::new(1.0, 0.0, 0.0), Vec3::NEG_X, wall));
        scene.add(Plane::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z, wall));
        scene.add(Plane::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z, wall));
        scene
    }

    fn std_dev(values: &[f32]) -> f32 {
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / (n - 1.0);
        var.sqrt()
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.samples_per_pixel, 1000);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.rr_depth, 3);
        assert!((config.background - Color::new(0.15, 0.21, 0.3)).length() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let zero = RenderConfig { width: 0, ..RenderConfig::default() };
        assert_eq!(
            zero.validate(),
            Err(ConfigError::ZeroDimension { width: 0, height: 512 })
        );

        let no_samples = RenderConfig { samples_per_pixel: 0, ..RenderConfig::default() };
        assert_eq!(no_samples.validate(), Err(ConfigError::ZeroSamples));

        let bad_gamma = RenderConfig { gamma: 0.0, ..RenderConfig::default() };
        assert_eq!(bad_gamma.validate(), Err(ConfigError::InvalidGamma(0.0)));

        let bad_t_min = RenderConfig { t_min: -1.0, ..RenderConfig::default() };
        assert_eq!(bad_t_min.validate(), Err(ConfigError::InvalidTMin(-1.0)));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "width": 64, "seed": 7, "background": [0, 0, 0] }"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 512);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.background, Color::ZERO);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &scene, &config(), &mut rng), Color::splat(0.1));
    }

    #[test]
    fn test_light_returns_emission() {
        let mut scene = Scene::new();
        scene.add(Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::emissive(Color::new(4.0, 2.0, 1.0)),
        ));
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(
            ray_color(&ray, &scene, &config(), &mut rng),
            Color::new(4.0, 2.0, 1.0)
        );
    }

    #[test]
    fn test_depth_limit_blocks_background() {
        // One bounce allowed: the floor is hit, its continuation is cut off
        let mut scene = Scene::new();
        scene.add(Plane::new(Vec3::ZERO, Vec3::Y, Material::diffuse(Color::splat(0.5))));
        let config = RenderConfig { max_depth: 1, ..config() };

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        for _ in 0..16 {
            assert_eq!(ray_color(&ray, &scene, &config, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_single_bounce_sees_background() {
        let mut scene = Scene::new();
        scene.add(Plane::new(Vec3::ZERO, Vec3::Y, Material::diffuse(Color::splat(0.5))));
        let config = RenderConfig { max_depth: 2, ..config() };

        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let color = ray_color(&ray, &scene, &config, &mut rng);
        assert!((color - Color::splat(0.05)).length() < 1e-6);
    }

    #[test]
    fn test_russian_roulette_is_unbiased() {
        let mut rng = StdRng::seed_from_u64(42);
        let incoming = 2.0;

        for albedo in [0.05f32, 0.3, 0.8] {
            let n = 200_000;
            let mut sum = 0.0f64;
            for _ in 0..n {
                if let Some(weight) = russian_roulette(Color::splat(albedo), &mut rng) {
                    sum += (albedo * weight * incoming) as f64;
                }
            }
            let mean = sum / n as f64;
            let expected = (albedo * incoming) as f64;
            assert!(
                (mean - expected).abs() < 0.02 * expected.max(0.5),
                "albedo {}: mean {} expected {}",
                albedo,
                mean,
                expected
            );
        }
    }

    #[test]
    fn test_russian_roulette_survival_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        // Black surfaces still survive 10% of the time
        let survived = (0..10_000)
            .filter_map(|_| russian_roulette(Color::ZERO, &mut rng))
            .inspect(|&w| assert!((w - 10.0).abs() < 1e-4))
            .count();
        assert!((800..1200).contains(&survived));

        // White surfaces are capped below certainty
        let weight = russian_roulette(Color::ONE, &mut StdRng::seed_from_u64(1));
        if let Some(w) = weight {
            assert!((w - 1.0 / 0.99).abs() < 1e-5);
        }
    }

    #[test]
    fn test_closed_box_noise_halves_with_4x_samples() {
        let scene = closed_box();
        let config = config();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.2));
        let mut rng = StdRng::seed_from_u64(42);

        let mut batch_means = |samples: u32| -> Vec<f32> {
            (0..64)
                .map(|_| {
                    let mut sum = 0.0;
                    for _ in 0..samples {
                        let c = ray_color(&ray, &scene, &config, &mut rng);
                        assert!(c.min_element() >= 0.0, "negative radiance {:?}", c);
                        sum += c.x;
                    }
                    sum / samples as f32
                })
                .collect()
        };

        let coarse = std_dev(&batch_means(16));
        let fine = std_dev(&batch_means(64));
        assert!(fine > 0.0);

        let ratio = coarse / fine;
        assert!(
            (1.25..3.2).contains(&ratio),
            "std error ratio {} (coarse {}, fine {})",
            ratio,
            coarse,
            fine
        );
    }

    #[test]
    fn test_render_pixel_inside_box() {
        let scene = closed_box();
        let mut camera = Camera::new()
            .with_resolution(8, 8)
            .with_position(Vec3::new(0.0, 1.0, 0.9), Vec3::new(0.0, 1.0, -1.0), Vec3::Y)
            .with_fov(60.0);
        camera.initialize();

        let config = RenderConfig { samples_per_pixel: 32, ..config() };
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&camera, &scene, 4, 4, &config, &mut rng);
        assert!(color.min_element() >= 0.0);
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_image_buffer_rows() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.row(1), &[Color::ZERO, Color::ZERO, Color::ONE]);
        assert_eq!(image.pixels.len(), 6);
    }
}
