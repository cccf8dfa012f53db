use crate::distance_field::{DistanceField, DistanceStorage};
use crate::error::Result;
use crate::reduction::GlobalMax;
use crate::scratch::try_filled;
use rayon::prelude::*;


/// Red, green, blue and alpha.
pub const CHANNELS: usize = 4;


/// The final grey-scale texture, stored as RGBA with 8 bits per channel.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NoiseImage {
    pub size: u32,

    /// Row-major, `CHANNELS` bytes per pixel.
    pub pixels: Vec<u8>,
}

impl NoiseImage {

    /// Scales every distance by the global maximum and writes
    /// the resulting intensity into all color channels, with full opacity.
    /// Requires the finished global maximum, which can only exist
    /// after all groups have been reduced.
    pub fn normalize<D: DistanceStorage>(field: &DistanceField<D>, global_max: GlobalMax) -> Result<Self> {
        if field.size == 0 {
            return Ok(NoiseImage { size: 0, pixels: Vec::new() });
        }

        let row_bytes = field.size as usize * CHANNELS;
        let mut pixels = try_filled("output image", row_bytes * field.size as usize, 0_u8)?;

        pixels.par_chunks_mut(row_bytes).enumerate().for_each(|(y, row)| {
            for (x, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let value = intensity(field.get_distance(x as u32, y as u32), global_max);
                let byte = intensity_to_byte(value);
                pixel.copy_from_slice(&[byte, byte, byte, 255]);
            }
        });

        Ok(NoiseImage { size: field.size, pixels })
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        let index = (self.size as usize * y as usize + x as usize) * CHANNELS;
        let mut pixel = [0; CHANNELS];
        pixel.copy_from_slice(&self.pixels[index .. index + CHANNELS]);
        pixel
    }

    /// The grey value of the pixel in `[0, 1]`.
    #[inline]
    pub fn get_intensity(&self, x: u32, y: u32) -> f32 {
        self.get_pixel(x, y)[0] as f32 / 255.0
    }
}

/// The distance relative to the global maximum, clamped to `[0, 1]`.
/// A zero maximum means all distances are zero, which maps to black.
#[inline]
pub fn intensity(distance: f32, global_max: GlobalMax) -> f32 {
    let max = global_max.value();
    if max > 0.0 { (distance / max).max(0.0).min(1.0) }
    else { 0.0 }
}

#[inline]
fn intensity_to_byte(intensity: f32) -> u8 {
    (intensity * 255.0).round() as u8
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance_field::F32DistanceStorage;
    use crate::reduction::{reduce_global, GroupMaxima};

    fn normalized(distances: Vec<f32>, size: u32) -> (NoiseImage, GlobalMax) {
        let field: DistanceField<F32DistanceStorage> = DistanceField { size, distances };
        let global_max = reduce_global(&GroupMaxima::reduce(&field).unwrap()).unwrap();
        (NoiseImage::normalize(&field, global_max).unwrap(), global_max)
    }

    #[test]
    fn maps_maximum_to_white() {
        let distances = (0 .. 16 * 16).map(|index| index as f32).collect();
        let (image, global_max) = normalized(distances, 16);

        assert_eq!(global_max.value(), 255.0);
        assert_eq!(image.get_pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(15, 15), [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(7, 5), [87, 87, 87, 255]);
        assert_eq!(image.get_intensity(15, 15), 1.0);
        assert_eq!(intensity(255.0, global_max), 1.0);
    }

    #[test]
    fn intensities_stay_in_unit_range() {
        let distances = (0 .. 32 * 32).map(|index| ((index * 7919) % 1013) as f32 * 0.37).collect();
        let (image, global_max) = normalized(distances, 32);

        for y in 0..32 {
            for x in 0..32 {
                let value = image.get_intensity(x, y);
                assert!(value >= 0.0 && value <= 1.0);
                assert_eq!(image.get_pixel(x, y)[3], 255);
            }
        }

        assert!(image.pixels.chunks(CHANNELS).any(|pixel| pixel[0] == 255));
        assert_eq!(intensity(global_max.value() * 2.0, global_max), 1.0);
    }

    #[test]
    fn zero_field_is_black() {
        let (image, global_max) = normalized(vec![0.0; 16 * 16], 16);
        assert_eq!(global_max.value(), 0.0);
        assert!(image.pixels.chunks(CHANNELS).all(|pixel| pixel == [0, 0, 0, 255]));
    }
}
