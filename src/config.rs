use crate::error::ConfigurationError;

/// Number of seed points when nothing else is specified. A 10x10 grid.
pub const DEFAULT_POINT_COUNT: u32 = 100;

/// Width and height of the generated texture in pixels.
pub const DEFAULT_SIZE: u32 = 1024;

pub const DEFAULT_RNG_SEED: u64 = 1;

/// Workgroups are square blocks of `WORKGROUP_SIDE * WORKGROUP_SIDE` pixels.
pub const WORKGROUP_SIDE: u32 = 16;

/// Name of the exported file inside the output directory.
pub const OUTPUT_FILE_NAME: &str = "p.png";


/// What happens to neighbour cells that lie outside of the seed grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Boundary {
    /// Cells outside the grid are skipped,
    /// so border pixels see fewer than nine candidates.
    Clip,

    /// Cells wrap around to the opposite side of the grid,
    /// which makes the resulting texture tileable.
    Wrap,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Clip
    }
}


/// Parameters of a single noise generation run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NoiseConfig {
    /// Must be a perfect square, as the seeds form a square grid.
    pub point_count: u32,

    /// Must be a multiple of `WORKGROUP_SIDE`,
    /// so that no workgroup is split at the image border.
    pub size: u32,

    pub rng_seed: u64,
    pub boundary: Boundary,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            point_count: DEFAULT_POINT_COUNT,
            size: DEFAULT_SIZE,
            rng_seed: DEFAULT_RNG_SEED,
            boundary: Boundary::Clip,
        }
    }
}

impl NoiseConfig {
    pub fn new(rng_seed: u64, point_count: u32, size: u32) -> Self {
        NoiseConfig { point_count, size, rng_seed, ..Self::default() }
    }

    pub fn with_point_count(mut self, point_count: u32) -> Self {
        self.point_count = point_count;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Checks all invariants and returns the side length of the seed grid.
    pub fn validate(&self) -> Result<u32, ConfigurationError> {
        let grid_side = grid_side_of(self.point_count)?;

        if self.size == 0 || self.size % WORKGROUP_SIDE != 0 {
            return Err(ConfigurationError::SizeNotWorkgroupMultiple {
                size: self.size, workgroup_side: WORKGROUP_SIDE
            });
        }

        Ok(grid_side)
    }

    /// Number of workgroups along one axis.
    #[inline]
    pub fn groups_per_axis(&self) -> u32 {
        self.size / WORKGROUP_SIDE
    }
}

/// The exact integer square root of the point count.
pub fn grid_side_of(point_count: u32) -> Result<u32, ConfigurationError> {
    if point_count == 0 {
        return Err(ConfigurationError::NoPoints);
    }

    // start from the float estimate and correct it in integers,
    // as the float root may be off by one for large inputs
    let mut side = (point_count as f64).sqrt() as u64;
    let count = point_count as u64;
    while side * side > count { side -= 1; }
    while (side + 1) * (side + 1) <= count { side += 1; }

    if side * side == count { Ok(side as u32) }
    else { Err(ConfigurationError::PointCountNotSquare { point_count }) }
}
