use crate::config::grid_side_of;
use crate::error::ConfigurationError;
use rand::Rng;


/// A feature point of the noise, in pixel coordinates.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct SeedPoint {
    pub x: f32,
    pub y: f32,
}

impl SeedPoint {
    pub fn new(x: f32, y: f32) -> Self {
        SeedPoint { x, y }
    }

    #[inline]
    pub fn squared_distance(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}


/// Exactly one seed point per cell of a square grid
/// that covers the whole `size * size` texture.
/// Points are stored row-major by cell, so the point of cell
/// `(x, y)` is found at index `y * grid_side + x`.
#[derive(Clone, PartialEq, Debug)]
pub struct SeedSet {
    grid_side: u32,
    size: u32,
    points: Vec<SeedPoint>,
}

impl SeedSet {

    /// Scatter `point_count` seeds over a `size * size` texture,
    /// each one uniformly jittered inside its own grid cell.
    /// Jitter is drawn x first, then y, visiting cells row by row,
    /// so a deterministically seeded `rng` yields a reproducible set.
    pub fn generate(point_count: u32, size: u32, rng: &mut impl Rng) -> Result<Self, ConfigurationError> {
        let grid_side = grid_side_of(point_count)?;
        let scale = 1.0 / grid_side as f32;
        let size_f = size as f32;

        let mut points = Vec::with_capacity(point_count as usize);
        for cell_y in 0..grid_side {
            for cell_x in 0..grid_side {
                let jitter_x = rng.gen_range(0.0 .. scale);
                let jitter_y = rng.gen_range(0.0 .. scale);

                points.push(SeedPoint::new(
                    (scale * cell_x as f32 + jitter_x) * size_f,
                    (scale * cell_y as f32 + jitter_y) * size_f,
                ));
            }
        }

        Ok(SeedSet { grid_side, size, points })
    }

    /// Use explicitly placed seeds, for example an unjittered grid.
    /// The points are expected in row-major cell order,
    /// and every point must lie inside (or on the border of) its cell,
    /// up to float rounding.
    pub fn from_points(size: u32, points: Vec<SeedPoint>) -> Result<Self, ConfigurationError> {
        let grid_side = grid_side_of(points.len() as u32)?;

        let cell_size = size as f32 / grid_side as f32;
        let slack = cell_size * 1e-4;
        let in_cell = |position: f32, cell: u32| {
            position >= cell as f32 * cell_size - slack
                && position <= (cell + 1) as f32 * cell_size + slack
        };

        for (index, point) in points.iter().enumerate() {
            let cell_x = index as u32 % grid_side;
            let cell_y = index as u32 / grid_side;

            if !in_cell(point.x, cell_x) || !in_cell(point.y, cell_y) {
                return Err(ConfigurationError::SeedOutsideCell { cell_x, cell_y });
            }
        }

        Ok(SeedSet { grid_side, size, points })
    }

    /// Seeds placed exactly at the center of each cell.
    pub fn centered(point_count: u32, size: u32) -> Result<Self, ConfigurationError> {
        let grid_side = grid_side_of(point_count)?;
        let cell_size = size as f32 / grid_side as f32;

        let points = (0..grid_side)
            .flat_map(|y| (0..grid_side).map(move |x| (x, y)))
            .map(|(x, y)| SeedPoint::new(
                (x as f32 + 0.5) * cell_size,
                (y as f32 + 0.5) * cell_size,
            ))
            .collect();

        Ok(SeedSet { grid_side, size, points })
    }

    #[inline]
    pub fn grid_side(&self) -> u32 {
        self.grid_side
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[SeedPoint] {
        &self.points
    }

    /// The seed point of the specified cell.
    #[inline]
    pub fn get(&self, cell_x: u32, cell_y: u32) -> &SeedPoint {
        &self.points[(cell_y * self.grid_side + cell_x) as usize]
    }
}
