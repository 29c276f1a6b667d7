//! Parallel frame driver.
//!
//! Rows of the frame buffer are the unit of work. rayon hands them out
//! to worker threads; each row owns a private RNG seeded from the base
//! seed and the pixel row, so the image never depends on which thread
//! rendered which row or in what order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::render_pixel;
use crate::{Camera, Color, ImageBuffer, RenderConfig, Scene};

/// Rows between progress log lines.
const PROGRESS_INTERVAL: usize = 32;

/// Summary of a finished (or cancelled) render.
#[derive(Debug, Clone, Copy)]
pub struct FrameStats {
    pub rows_rendered: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
    /// Base seed the row RNGs were derived from
    pub seed: u64,
}

/// Seed for the RNG of pixel row `y` (splitmix64 finalizer).
pub fn row_seed(base: u64, y: u32) -> u64 {
    let mut z = base ^ (y as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render pixel row `y` into `row`.
///
/// `y` counts from the bottom of the image; `row.len()` must equal the
/// camera width.
pub fn render_row(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    y: u32,
    base_seed: u64,
    row: &mut [Color],
) {
    let mut rng = StdRng::seed_from_u64(row_seed(base_seed, y));
    for (x, pixel) in row.iter_mut().enumerate() {
        *pixel = render_pixel(camera, scene, x as u32, y, config, &mut rng);
    }
}

/// Render the entire scene to an image buffer using all cores.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    render_with_cancel(camera, scene, config, None).0
}

/// Render the scene, checking `cancel` before every row.
///
/// The camera must have been built for `config.width` x `config.height`.
/// Rows skipped after cancellation stay black.
pub fn render_with_cancel(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    cancel: Option<&AtomicBool>,
) -> (ImageBuffer, FrameStats) {
    let width = camera.image_width;
    let height = camera.image_height;
    debug_assert_eq!(
        (width, height),
        (config.width, config.height),
        "camera resolution differs from the render config"
    );
    let seed = config.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} (seed {})",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        seed
    );

    let start = Instant::now();
    let mut image = ImageBuffer::new(width, height);
    let completed = AtomicUsize::new(0);

    if width > 0 {
        image
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(buffer_row, row)| {
                if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                    return;
                }

                // Buffer row 0 is the top of the image
                let y = height - 1 - buffer_row as u32;
                render_row(camera, scene, config, y, seed, row);

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_INTERVAL == 0 || done == height as usize {
                    log::info!(
                        "Progress: {}/{} rows ({:.0}%)",
                        done,
                        height,
                        100.0 * done as f32 / height as f32
                    );
                }
            });
    }

    let rows_rendered = completed.into_inner();
    let cancelled = rows_rendered < height as usize;
    let elapsed = start.elapsed();

    if cancelled {
        log::warn!(
            "Render cancelled after {}/{} rows ({:.2?})",
            rows_rendered,
            height,
            elapsed
        );
    } else {
        log::info!("Rendered in {:.2?}", elapsed);
    }

    let stats = FrameStats {
        rows_rendered,
        cancelled,
        elapsed,
        seed,
    };
    (image, stats)
}
