//! Procedural solid textures.
//!
//! A solid texture maps a world-space point straight to a color, so it
//! needs no UV parameterization and works the same on spheres, planes and
//! triangle meshes.

use cornell_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::perlin::Perlin;

/// Anything that can color a surface point.
///
/// Implementations must be pure: the same point always yields the same
/// color, and lookups may run concurrently from every render thread.
pub trait ProceduralColor: Send + Sync {
    /// Color of the surface at world-space `point`.
    fn color_at(&self, point: Vec3) -> Color;
}

/// The built-in solid texture patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Marble,
    Wood,
    Checkerboard,
    Clouds,
}

impl Pattern {
    /// Scale the pattern uses when none is configured.
    pub fn default_scale(self) -> f32 {
        match self {
            Pattern::Marble => 5.0,
            Pattern::Wood => 10.0,
            Pattern::Checkerboard => 2.0,
            Pattern::Clouds => 3.0,
        }
    }
}

/// A Perlin-noise driven solid texture.
#[derive(Clone, Debug)]
pub struct SolidTexture {
    pattern: Pattern,
    scale: f32,
    perlin: Perlin,
}

impl SolidTexture {
    /// Create a texture with the pattern's default scale.
    pub fn new(pattern: Pattern, seed: u64) -> Self {
        Self::with_scale(pattern, pattern.default_scale(), seed)
    }

    /// Create a texture with an explicit scale.
    pub fn with_scale(pattern: Pattern, scale: f32, seed: u64) -> Self {
        Self {
            pattern,
            scale,
            perlin: Perlin::new(seed),
        }
    }

    fn marble(&self, p: Vec3) -> Color {
        let s = self.scale;
        let noise = self.perlin.octave_noise(p * s, 6, 0.5);
        let t = ((p.x * s + 3.0 * noise).sin() + 1.0) * 0.5;

        let white = Color::new(0.9, 0.85, 0.8);
        let gray = Color::new(0.5, 0.5, 0.52);
        white.lerp(gray, t)
    }

    fn wood(&self, p: Vec3) -> Color {
        let r = (p.x * p.x + p.z * p.z).sqrt();
        let noise = self.perlin.octave_noise(p * 2.0, 4, 0.5);
        let t = ((r * self.scale + noise * 3.0).sin() + 1.0) * 0.5;

        let dark = Color::new(0.4, 0.2, 0.1);
        let light = Color::new(0.7, 0.5, 0.3);
        dark.lerp(light, t)
    }

    fn checkerboard(&self, p: Vec3) -> Color {
        let cell = (p * self.scale).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            Color::splat(0.9)
        } else {
            Color::splat(0.2)
        }
    }

    fn clouds(&self, p: Vec3) -> Color {
        let noise = self.perlin.octave_noise(p * self.scale, 6, 0.5);
        // Octave sums can overshoot [-1, 1] slightly
        let t = ((noise + 1.0) * 0.5).clamp(0.0, 1.0);

        let sky_blue = Color::new(0.5, 0.7, 1.0);
        sky_blue.lerp(Color::ONE, t)
    }
}

impl ProceduralColor for SolidTexture {
    fn color_at(&self, point: Vec3) -> Color {
        match self.pattern {
            Pattern::Marble => self.marble(point),
            Pattern::Wood => self.wood(point),
            Pattern::Checkerboard => self.checkerboard(point),
            Pattern::Clouds => self.clouds(point),
        }
    }
}
