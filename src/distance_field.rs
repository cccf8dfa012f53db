use crate::error::Result;
use crate::scratch::try_filled;
use crate::spatial_index::SeedGrid;
use rayon::prelude::*;


/// For every pixel of a square texture, the distance to the nearest seed point.
#[derive(Clone, PartialEq, Debug)]
pub struct DistanceField<D: DistanceStorage> {
    pub size: u32,

    /// Row-major, one distance per pixel.
    pub distances: D,
}

/// Needs less storage with sufficient precision, but takes longer
/// because of conversions between f16 and f32.
pub type F16DistanceStorage = Vec<half::f16>;

/// Needs more storage with full precision.
pub type F32DistanceStorage = Vec<f32>;

/// A buffer of distances, written once per pixel by the distance kernel.
pub trait DistanceStorage: Sized + Send + Sync {
    type Element: Copy + Send + Sync;

    /// Allocate a buffer where every distance is infinite.
    fn allocate(length: usize) -> Result<Self>;

    fn encode(distance: f32) -> Self::Element;

    fn elements_mut(&mut self) -> &mut [Self::Element];

    fn get(&self, index: usize) -> f32;

    fn len(&self) -> usize;
}


impl<D> DistanceField<D> where D: DistanceStorage {

    /// Runs the distance kernel over all pixels in parallel.
    /// Each row is an independent task and every pixel
    /// owns exactly one slot, so no two tasks write the same memory.
    pub fn compute(grid: &SeedGrid<'_>) -> Result<Self> {
        let size = grid.seeds().size();
        debug_assert!(size > 0, "empty texture");

        let mut distances = D::allocate(size as usize * size as usize)?;

        distances.elements_mut()
            .par_chunks_mut(size as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, slot) in row.iter_mut().enumerate() {
                    *slot = D::encode(nearest_seed_distance(grid, x as u32, y as u32));
                }
            });

        Ok(DistanceField { size, distances })
    }

    #[inline(always)]
    pub fn get_distance(&self, x: u32, y: u32) -> f32 {
        self.distances.get(self.flatten_index(x, y))
    }

    #[inline]
    pub fn flatten_index(&self, x: u32, y: u32) -> usize {
        self.size as usize * y as usize + x as usize
    }

    /// Sequential maximum over all pixels, for verification.
    pub fn max_distance(&self) -> f32 {
        (0 .. self.distances.len())
            .map(|index| self.distances.get(index))
            .fold(0.0, f32::max)
    }
}


/// The euclidean distance from the pixel to the nearest seed
/// found in the 3x3 block of cells around the cell of the pixel.
#[inline]
pub fn nearest_seed_distance(grid: &SeedGrid<'_>, x: u32, y: u32) -> f32 {
    let (cell_x, cell_y) = grid.cell_of(x, y);
    let (x, y) = (x as f32, y as f32);

    grid.candidates(cell_x, cell_y)
        .map(|seed| seed.squared_distance(x, y))
        .fold(std::f32::INFINITY, f32::min)
        .sqrt()
}


impl DistanceStorage for F16DistanceStorage {
    type Element = half::f16;

    fn allocate(length: usize) -> Result<Self> {
        try_filled("f16 distance field", length, half::f16::INFINITY)
    }

    #[inline]
    fn encode(distance: f32) -> half::f16 {
        half::f16::from_f32(distance)
    }

    #[inline]
    fn elements_mut(&mut self) -> &mut [half::f16] {
        self
    }

    #[inline]
    fn get(&self, index: usize) -> f32 {
        self[index].to_f32()
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl DistanceStorage for F32DistanceStorage {
    type Element = f32;

    fn allocate(length: usize) -> Result<Self> {
        try_filled("f32 distance field", length, std::f32::INFINITY)
    }

    #[inline]
    fn encode(distance: f32) -> f32 {
        distance
    }

    #[inline]
    fn elements_mut(&mut self) -> &mut [f32] {
        self
    }

    #[inline]
    fn get(&self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}
