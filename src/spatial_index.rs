//! Cell lookup on the implicit seed grid.
//! Every cell holds exactly one seed, jittered by less than one cell width,
//! so the nearest seed of any pixel lies in the 3x3 block of cells around
//! the cell of that pixel. Searching those nine cells replaces a scan of all seeds.

use crate::config::Boundary;
use crate::seeds::{SeedPoint, SeedSet};


/// The cell itself first, followed by its eight neighbours, counter-clockwise from the right.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    ( 0,  0),
    ( 1,  0),
    ( 1, -1),
    ( 0, -1),
    (-1, -1),
    (-1,  0),
    (-1,  1),
    ( 0,  1),
    ( 1,  1),
];


/// Borrows a seed set and answers which seeds are candidates for a pixel.
#[derive(Clone, Copy, Debug)]
pub struct SeedGrid<'s> {
    seeds: &'s SeedSet,
    boundary: Boundary,

    /// Width of a cell in pixels. Not necessarily an integer.
    cell_size: f32,
}

impl<'s> SeedGrid<'s> {
    pub fn new(seeds: &'s SeedSet, boundary: Boundary) -> Self {
        let cell_size = seeds.size() as f32 / seeds.grid_side() as f32;
        SeedGrid { seeds, boundary, cell_size }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn seeds(&self) -> &'s SeedSet {
        self.seeds
    }

    /// The cell that contains the pixel, using the same partition as the seed generator.
    #[inline]
    pub fn cell_of(&self, x: u32, y: u32) -> (u32, u32) {
        let last = self.seeds.grid_side() - 1;
        let cell_x = ((x as f32 / self.cell_size) as u32).min(last);
        let cell_y = ((y as f32 / self.cell_size) as u32).min(last);
        (cell_x, cell_y)
    }

    /// The seed of the neighbour cell at the specified offset, if there is one.
    /// With `Boundary::Wrap`, seeds of wrapped cells are moved
    /// by a full texture size so that distances stay continuous across the border.
    #[inline]
    pub fn neighbor(&self, cell_x: u32, cell_y: u32, offset_x: i32, offset_y: i32) -> Option<SeedPoint> {
        let side = self.seeds.grid_side() as i32;
        let neighbor_x = cell_x as i32 + offset_x;
        let neighbor_y = cell_y as i32 + offset_y;

        if check_cell(neighbor_x, neighbor_y, side) {
            return Some(*self.seeds.get(neighbor_x as u32, neighbor_y as u32));
        }

        match self.boundary {
            Boundary::Clip => None,
            Boundary::Wrap => {
                let size = self.seeds.size() as f32;
                let seed = self.seeds.get(
                    neighbor_x.rem_euclid(side) as u32,
                    neighbor_y.rem_euclid(side) as u32,
                );

                Some(SeedPoint::new(
                    seed.x + neighbor_x.div_euclid(side) as f32 * size,
                    seed.y + neighbor_y.div_euclid(side) as f32 * size,
                ))
            }
        }
    }

    /// All seeds that may be the nearest one to any pixel of the specified cell.
    pub fn candidates(&self, cell_x: u32, cell_y: u32) -> impl Iterator<Item = SeedPoint> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(offset_x, offset_y)| {
            self.neighbor(cell_x, cell_y, offset_x, offset_y)
        })
    }
}

#[inline]
fn check_cell(x: i32, y: i32, side: i32) -> bool {
    x >= 0 && y >= 0 && x < side && y < side
}
