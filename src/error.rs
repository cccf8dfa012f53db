use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a noise generation run.
/// There is no partial success: a run either yields
/// a complete image or one of these errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A scratch buffer could not be allocated for the requested size.
    #[error("could not allocate {bytes} bytes for the {buffer} buffer")]
    ResourceExhausted { buffer: &'static str, bytes: usize },

    /// An internal reduction invariant was violated.
    #[error("synchronization fault: {0}")]
    Synchronization(String),

    #[cfg(feature = "piston_image")]
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("could not write `{}`: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

/// Rejected before any buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("point count must be at least one")]
    NoPoints,

    /// The seed grid would not be square.
    #[error("point count {point_count} is not a perfect square")]
    PointCountNotSquare { point_count: u32 },

    #[error("size {size} is not a positive multiple of the workgroup side {workgroup_side}")]
    SizeNotWorkgroupMultiple { size: u32, workgroup_side: u32 },

    /// An explicitly placed seed point lies outside of the cell it was listed for.
    #[error("seed point for cell ({cell_x}, {cell_y}) lies outside of that cell")]
    SeedOutsideCell { cell_x: u32, cell_y: u32 },
}
