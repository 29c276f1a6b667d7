//! `cornell` - render a scene to an image file.
//!
//! ```text
//! cornell [config.json]
//! ```
//!
//! Without a config file the built-in Cornell box is rendered with the
//! default settings to `output/render.png`. Set `RUST_LOG=debug` for
//! per-mesh details.

mod config;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use cornell_renderer::{build_scene, render, save_image, Camera};

use crate::config::AppConfig;

fn usage(program: &str) {
    eprintln!("Usage: {} [config.json]", program);
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cornell");

    let config = match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") => {
            usage(program);
            return Ok(());
        }
        Some(path) => {
            log::info!("Loading config {}", path);
            AppConfig::load(Path::new(path))?
        }
        None => AppConfig::default(),
    };
    if args.len() > 2 {
        usage(program);
        anyhow::bail!("Unexpected arguments: {:?}", &args[2..]);
    }

    let start = Instant::now();

    let desc = config.scene_description()?;
    let scene = build_scene(&desc).context("Failed to build scene")?;
    log::info!("Scene built in {:.2?}", start.elapsed());

    let camera = Camera::from_desc(&desc.camera, config.render.width, config.render.height);
    let image = render(&camera, &scene, &config.render);

    save_image(&image, config.render.gamma, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
