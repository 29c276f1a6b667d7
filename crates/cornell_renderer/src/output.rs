//! Tone mapping and image file output.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::{Color, ImageBuffer};

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel data does not match a {width}x{height} image")]
    SizeMismatch { width: u32, height: u32 },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Convert a linear color to 8-bit sRGB-ish RGB.
///
/// Channels are clamped to [0, 1], raised to `1/gamma` and truncated.
pub fn color_to_rgb(color: Color, gamma: f32) -> [u8; 3] {
    let inv_gamma = 1.0 / gamma;
    let encode = |c: f32| (255.0 * c.clamp(0.0, 1.0).powf(inv_gamma)) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Tone map the whole buffer to packed RGB bytes, top row first.
pub fn to_rgb8(image: &ImageBuffer, gamma: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(image.pixels.len() * 3);
    for color in &image.pixels {
        bytes.extend_from_slice(&color_to_rgb(*color, gamma));
    }
    bytes
}

/// Write the image to `path`.
///
/// The format follows the file extension; paths without one are written
/// as PNG. Missing parent directories are created.
pub fn save_image<P: AsRef<Path>>(image: &ImageBuffer, gamma: f32, path: P) -> OutputResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let rgb = RgbImage::from_raw(image.width, image.height, to_rgb8(image, gamma)).ok_or(
        OutputError::SizeMismatch {
            width: image.width,
            height: image.height,
        },
    )?;

    if path.extension().is_some() {
        rgb.save(path)?;
    } else {
        rgb.save_with_format(path, ImageFormat::Png)?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgb_endpoints() {
        assert_eq!(color_to_rgb(Color::ZERO, 2.2), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE, 2.2), [255, 255, 255]);
    }

    #[test]
    fn test_color_to_rgb_clamps_hdr_and_negative() {
        assert_eq!(color_to_rgb(Color::new(15.0, -3.0, 1.0), 2.2), [255, 0, 255]);
    }

    #[test]
    fn test_gamma_curve() {
        // 0.25^(1/2) = 0.5 -> 127 after truncation
        assert_eq!(color_to_rgb(Color::splat(0.25), 2.0), [127, 127, 127]);

        // Gamma 2.2 brightens mid-tones
        let [r, _, _] = color_to_rgb(Color::splat(0.5), 2.2);
        assert_eq!(r, (255.0 * 0.5f32.powf(1.0 / 2.2)) as u8);
        assert!(r > 127);
    }

    #[test]
    fn test_to_rgb8_layout() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::new(1.0, 0.0, 0.0));
        assert_eq!(to_rgb8(&image, 2.2), vec![0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_save_png_creates_directories() {
        let dir = std::env::temp_dir().join("cornell_output_test").join("nested");
        let path = dir.join("frame.png");
        std::fs::remove_dir_all(&dir).ok();

        let mut image = ImageBuffer::new(4, 3);
        image.set(0, 0, Color::ONE);
        save_image(&image, 2.2, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (4, 3));
        assert_eq!(loaded.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(loaded.get_pixel(3, 2).0, [0, 0, 0]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_size_mismatch() {
        let image = ImageBuffer {
            width: 4,
            height: 4,
            pixels: vec![Color::ZERO; 3],
        };
        let path = std::env::temp_dir().join("cornell_output_mismatch.png");
        assert!(matches!(
            save_image(&image, 2.2, &path),
            Err(OutputError::SizeMismatch { width: 4, height: 4 })
        ));
    }
}
