//! This crate generates 2D Worley (cellular) noise textures.
//! Seed points are scattered over a jittered square grid,
//! and every pixel stores the distance to its nearest seed,
//! which is found by searching only the 3x3 block of cells around the pixel.
//! Distances are computed in parallel, reduced per 16x16 workgroup
//! and then globally, and finally normalized into a grey-scale RGBA image.

pub mod error;
pub mod config;
pub mod seeds;
pub mod spatial_index;
pub mod distance_field;
pub mod reduction;
pub mod normalize;
pub mod pipeline;

#[cfg(feature = "piston_image")]
pub mod export;

mod scratch;

pub mod prelude {
    pub use crate::{
        generate_noise,
        generate_f16_noise,
        generate_f32_noise
    };

    pub use crate::error::{ Error, ConfigurationError, Result };

    pub use crate::config::{
        NoiseConfig, Boundary,
        DEFAULT_POINT_COUNT, DEFAULT_SIZE, DEFAULT_RNG_SEED,
        WORKGROUP_SIDE, OUTPUT_FILE_NAME
    };

    pub use crate::seeds::{ SeedPoint, SeedSet };
    pub use crate::spatial_index::{ SeedGrid, NEIGHBOR_OFFSETS };

    pub use crate::distance_field::{
        DistanceField, DistanceStorage,
        F16DistanceStorage, F32DistanceStorage
    };

    pub use crate::reduction::{ GroupMaxima, GlobalMax, GlobalMaxCell, reduce_global };
    pub use crate::normalize::{ NoiseImage, intensity };
    pub use crate::pipeline::{ NoiseGenerator, Phase, on_start };

    #[cfg(feature = "piston_image")]
    pub use crate::export::{ encode_png, write_png, to_rgba_image };
}


use prelude::*;

/// Generate a noise texture, storing intermediate distances with the specified storage.
pub fn generate_noise<D: DistanceStorage>(config: NoiseConfig) -> Result<NoiseImage> {
    NoiseGenerator::<D>::new(config).on_start()
}

/// Generate a noise texture, storing intermediate distances as `f16`.
pub fn generate_f16_noise(config: NoiseConfig) -> Result<NoiseImage> {
    generate_noise::<F16DistanceStorage>(config)
}

/// Generate a noise texture, storing intermediate distances as `f32`.
pub fn generate_f32_noise(config: NoiseConfig) -> Result<NoiseImage> {
    generate_noise::<F32DistanceStorage>(config)
}
