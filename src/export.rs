//! Encode noise images as PNG files with the `image` crate.

use crate::config::OUTPUT_FILE_NAME;
use crate::error::{Error, Result};
use crate::normalize::NoiseImage;
use image::{ImageEncoder, RgbaImage};
use image::codecs::png::PngEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;


/// Encode the image as an RGBA8 PNG.
pub fn encode_png(image: &NoiseImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    PngEncoder::new(&mut bytes).write_image(
        &image.pixels, image.size, image.size, image::ColorType::Rgba8
    )?;

    Ok(bytes)
}

/// Write the image to `<directory>/p.png`, replacing any existing file.
/// The bytes go to a temporary file in the same directory first,
/// which is then renamed, so a failed write never leaves a truncated image.
/// Returns the path of the written file.
pub fn write_png(image: &NoiseImage, directory: impl AsRef<Path>) -> Result<PathBuf> {
    let directory = directory.as_ref();
    let path = directory.join(OUTPUT_FILE_NAME);
    let bytes = encode_png(image)?;

    let io_error = |source: std::io::Error| Error::Io { path: path.clone(), source };

    let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
    file.write_all(&bytes).map_err(io_error)?;
    file.persist(&path).map_err(|error| io_error(error.error))?;

    log::info!("Output to: {}", path.display());
    Ok(path)
}

/// Copy the image into an `image` crate buffer for further processing.
pub fn to_rgba_image(image: &NoiseImage) -> Option<RgbaImage> {
    RgbaImage::from_raw(image.size, image.size, image.pixels.clone())
}
