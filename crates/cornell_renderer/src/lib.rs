//! Cornell Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for Cornell-box style scenes built from
//! spheres, infinite planes and triangles.
//!
//! The hot path (intersection, shading, integration) never allocates,
//! blocks or returns errors; failures only exist at the edges, when a
//! scene is built or an image is written.

mod camera;
mod frame;
mod hittable;
mod material;
mod output;
mod plane;
mod renderer;
mod scene;
mod scene_builder;
mod sphere;
mod triangle;

pub use camera::Camera;
pub use frame::{render, render_row, render_with_cancel, row_seed, FrameStats};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{cosine_sample_hemisphere, scatter, Material};
pub use output::{color_to_rgb, save_image, to_rgb8, OutputError, OutputResult};
pub use plane::{Plane, PLANE_EPSILON};
pub use renderer::{
    ray_color, render_pixel, russian_roulette, ConfigError, ImageBuffer, RenderConfig,
};
pub use scene::Scene;
pub use scene_builder::{add_mesh, build_scene};
pub use sphere::Sphere;
pub use triangle::{Triangle, TRIANGLE_EPSILON};

/// Re-export math and scene description types
pub use cornell_core::{MaterialKind, ProceduralColor};
pub use cornell_math::{Color, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
