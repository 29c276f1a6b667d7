//! Surface materials and scatter sampling.

use cornell_core::MaterialDesc;
use cornell_math::{reflect, safe_normalize, Interval};
use rand::RngCore;
use std::f32::consts::PI;

use crate::{gen_f32, Color, HitRecord, MaterialKind, Ray, Vec3};

/// Surface attributes shared by every primitive.
///
/// A material is plain data: the scatter rule is selected by `kind` when a
/// hit is shaded, so primitives stay monomorphic and `Copy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub albedo: Color,
    pub emission: Color,
    pub kind: MaterialKind,
    pub fuzz: f32,
}

impl Material {
    /// Lambertian (diffuse) material with the given albedo color.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            emission: Color::ZERO,
            kind: MaterialKind::Diffuse,
            fuzz: 0.0,
        }
    }

    /// Metal (specular) material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            emission: Color::ZERO,
            kind: MaterialKind::Metal,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Diffuse material whose albedo is looked up in the scene texture.
    pub fn textured(albedo: Color) -> Self {
        Self {
            kind: MaterialKind::Textured,
            ..Self::diffuse(albedo)
        }
    }

    /// Diffuse light emitter.
    pub fn emissive(emission: Color) -> Self {
        Self {
            emission,
            ..Self::diffuse(Color::ZERO)
        }
    }
}

impl From<MaterialDesc> for Material {
    /// Resolve a material tag, forcing albedo into [0, 1] and emission to be
    /// non-negative.
    fn from(desc: MaterialDesc) -> Self {
        let albedo = Color::new(
            Interval::UNIT.clamp(desc.albedo.x),
            Interval::UNIT.clamp(desc.albedo.y),
            Interval::UNIT.clamp(desc.albedo.z),
        );
        if albedo != desc.albedo {
            log::warn!("Albedo {} clamped to {}", desc.albedo, albedo);
        }

        Self {
            albedo,
            emission: desc.emission.max(Color::ZERO),
            kind: desc.kind,
            fuzz: Interval::UNIT.clamp(desc.fuzz),
        }
    }
}

/// Scatter an incoming ray off the surface described by `rec`.
///
/// Returns the continuation ray, or `None` if the ray is absorbed (a rough
/// metal reflection that ends up below the surface).
pub fn scatter(ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Ray> {
    let direction = match rec.kind {
        MaterialKind::Diffuse | MaterialKind::Textured => cosine_sample_hemisphere(rec.normal, rng),
        MaterialKind::Metal => {
            let reflected = reflect(safe_normalize(ray_in.direction()), rec.normal);
            let perturbation = rec.fuzz * cosine_sample_hemisphere(rec.normal, rng);
            let direction = safe_normalize(reflected + perturbation);

            // Only scatter if the reflected ray is in the same hemisphere as the normal
            if direction.dot(rec.normal) <= 0.0 {
                return None;
            }
            direction
        }
    };

    Some(Ray::new(rec.p, direction))
}

/// Sample a direction around `normal` with density proportional to the
/// cosine of the angle to it.
pub fn cosine_sample_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let u1 = gen_f32(rng);
    let u2 = gen_f32(rng);

    let r = u1.sqrt();
    let theta = 2.0 * PI * u2;

    let x = r * theta.cos();
    let z = r * theta.sin();
    let y = (1.0 - u1).max(0.0).sqrt();

    let (tangent, bitangent) = tangent_frame(normal);
    safe_normalize(tangent * x + normal * y + bitangent * z)
}

/// Orthonormal tangent and bitangent for a unit normal.
///
/// +Y is used as the reference axis unless the normal is close to it.
fn tangent_frame(normal: Vec3) -> (Vec3, Vec3) {
    let reference = if normal.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
    let tangent = safe_normalize(reference.cross(normal));
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}
