//! Simple path tracer example.
//!
//! Renders the built-in Cornell box at preview quality and saves a PNG.
//!
//! ```text
//! cargo run --release -p cornell_renderer --example simple_render [samples]
//! ```

use cornell_core::SceneDescription;
use cornell_renderer::{build_scene, render, save_image, Camera, RenderConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let samples = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u32>())
        .transpose()?
        .unwrap_or(64);

    // Build the scene
    let desc = SceneDescription::cornell_box();
    let scene = build_scene(&desc)?;

    let config = RenderConfig {
        width: 256,
        height: 256,
        samples_per_pixel: samples,
        seed: Some(42),
        ..RenderConfig::default()
    };
    config.validate()?;

    let camera = Camera::from_desc(&desc.camera, config.width, config.height);
    let image = render(&camera, &scene, &config);

    let filename = "output/simple_render.png";
    save_image(&image, config.gamma, filename)?;
    println!("Saved to {}", filename);

    Ok(())
}
