//! Output encoding and image writing.
//!
//! Accumulated sums are turned into 8-bit RGB per channel, in this order:
//! divide by the sample count, gamma 2 (square root), clamp to
//! `[0, 0.999]`, scale by 256.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ImageBuffer;
use lumen_math::{Color, Interval};
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Encode one channel of an accumulated sum.
#[inline]
pub fn encode_channel(sum: f64, samples_per_pixel: u32) -> u8 {
    let gamma = linear_to_gamma(sum / samples_per_pixel as f64);
    // NaN fails the comparison in linear_to_gamma and lands on 0
    (256.0 * INTENSITY.clamp(gamma)) as u8
}

/// Encode an accumulated color sum to 8-bit RGB.
pub fn encode_color(sum: Color, samples_per_pixel: u32) -> [u8; 3] {
    [
        encode_channel(sum.x, samples_per_pixel),
        encode_channel(sum.y, samples_per_pixel),
        encode_channel(sum.z, samples_per_pixel),
    ]
}

/// Write the image as plain-text PPM (`P3`).
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = encode_color(*color, image.samples_per_pixel);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Save the image, choosing the format from the file extension.
///
/// `.ppm` is written as plain-text PPM; every other extension goes through
/// the `image` crate.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("ppm"))
        .unwrap_or(false);

    if is_ppm {
        let mut writer = BufWriter::new(File::create(path)?);
        write_ppm(image, &mut writer)?;
        writer.flush()?;
    } else {
        image::save_buffer(
            path,
            &image.to_rgb8(),
            image.width,
            image.height,
            image::ColorType::Rgb8,
        )?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
