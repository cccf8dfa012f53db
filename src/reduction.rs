//! Two level maximum reduction over a distance field.
//! First every 16x16 workgroup reduces its own pixels into one slot of `GroupMaxima`,
//! then all group maxima are combined into the single `GlobalMax`
//! through an atomic maximum shared by all groups.

use crate::config::WORKGROUP_SIDE;
use crate::distance_field::{DistanceField, DistanceStorage};
use crate::error::{ConfigurationError, Error, Result};
use crate::scratch::try_filled;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};


const GROUP_PIXELS: usize = (WORKGROUP_SIDE * WORKGROUP_SIDE) as usize;


/// The largest distance inside each workgroup, row-major by group.
#[derive(Clone, PartialEq, Debug)]
pub struct GroupMaxima {
    pub groups_per_axis: u32,
    pub maxima: Vec<f32>,
}

impl GroupMaxima {

    /// Reduces every workgroup in parallel, one task per group.
    pub fn reduce<D: DistanceStorage>(field: &DistanceField<D>) -> Result<Self> {
        if field.size == 0 || field.size % WORKGROUP_SIDE != 0 {
            return Err(Error::Configuration(ConfigurationError::SizeNotWorkgroupMultiple {
                size: field.size, workgroup_side: WORKGROUP_SIDE
            }));
        }

        let groups_per_axis = field.size / WORKGROUP_SIDE;
        let group_count = groups_per_axis as usize * groups_per_axis as usize;
        let mut maxima = try_filled("group maxima", group_count, 0.0_f32)?;

        maxima.par_iter_mut().enumerate().for_each(|(index, slot)| {
            let group_x = index as u32 % groups_per_axis;
            let group_y = index as u32 / groups_per_axis;
            *slot = reduce_group(field, group_x, group_y);
        });

        Ok(GroupMaxima { groups_per_axis, maxima })
    }

    #[inline]
    pub fn get(&self, group_x: u32, group_y: u32) -> f32 {
        self.maxima[(group_y * self.groups_per_axis + group_x) as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.maxima.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty()
    }
}

/// Loads all pixels of the group into local memory before reducing,
/// so the published maximum always covers the complete group.
fn reduce_group<D: DistanceStorage>(field: &DistanceField<D>, group_x: u32, group_y: u32) -> f32 {
    let mut local = [0.0_f32; GROUP_PIXELS];
    let origin_x = group_x * WORKGROUP_SIDE;
    let origin_y = group_y * WORKGROUP_SIDE;

    for (index, slot) in local.iter_mut().enumerate() {
        let x = origin_x + index as u32 % WORKGROUP_SIDE;
        let y = origin_y + index as u32 / WORKGROUP_SIDE;
        *slot = field.get_distance(x, y);
    }

    local.iter().copied().fold(0.0, f32::max)
}


/// The largest of all minimum distances, used to normalize the texture.
/// Can only be obtained from a finished reduction.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GlobalMax(f32);

impl GlobalMax {
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }
}


/// A maximum that any number of threads may update concurrently.
/// For non-negative floats the order of the bit patterns
/// matches the order of the values, so an integer `fetch_max` suffices.
#[derive(Debug, Default)]
pub struct GlobalMaxCell {
    bits: AtomicU32,
}

impl GlobalMaxCell {
    pub fn new() -> Self {
        GlobalMaxCell { bits: AtomicU32::new(0.0_f32.to_bits()) }
    }

    #[inline]
    pub fn combine(&self, value: f32) {
        // also maps negative zero and NaN to zero
        let value = if value > 0.0 { value } else { 0.0 };
        self.bits.fetch_max(value.to_bits(), Ordering::Relaxed);
    }

    /// Consumes the cell, so nobody can observe or update it afterwards.
    pub fn finish(self) -> Result<GlobalMax> {
        let value = f32::from_bits(self.bits.into_inner());

        if value.is_finite() { Ok(GlobalMax(value)) }
        else { Err(Error::Synchronization(format!("global maximum is not finite: {}", value))) }
    }
}


/// Combines all group maxima in parallel into the global maximum.
pub fn reduce_global(group_maxima: &GroupMaxima) -> Result<GlobalMax> {
    let cell = GlobalMaxCell::new();
    group_maxima.maxima.par_iter().for_each(|&maximum| cell.combine(maximum));
    let global = cell.finish()?;

    if let Some(index) = group_maxima.maxima.iter().position(|&maximum| maximum > global.value()) {
        return Err(Error::Synchronization(format!(
            "group {} has maximum {} above the global maximum {}",
            index, group_maxima.maxima[index], global.value()
        )));
    }

    Ok(global)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Boundary;
    use crate::distance_field::F32DistanceStorage;
    use crate::seeds::SeedSet;
    use crate::spatial_index::SeedGrid;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use std::sync::Arc;

    fn field_from_function(size: u32, distance: impl Fn(u32, u32) -> f32) -> DistanceField<F32DistanceStorage> {
        let mut distances = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size {
            for x in 0..size {
                distances.push(distance(x, y));
            }
        }

        DistanceField { size, distances }
    }

    #[test]
    fn every_group_finds_its_peak() {
        // one distinct peak per group, at a different position in each group
        let field = field_from_function(64, |x, y| {
            let group = (y / 16 * 4 + x / 16) as f32;
            if x % 16 == (group as u32) % 16 && y % 16 == 15 - (group as u32) % 16 { 100.0 + group }
            else { (x + y) as f32 * 0.01 }
        });

        let maxima = GroupMaxima::reduce(&field).unwrap();
        assert_eq!(maxima.groups_per_axis, 4);
        assert_eq!(maxima.len(), 16);

        for group_y in 0..4 {
            for group_x in 0..4 {
                assert_eq!(maxima.get(group_x, group_y), 100.0 + (group_y * 4 + group_x) as f32);
            }
        }

        assert_eq!(reduce_global(&maxima).unwrap().value(), 115.0);
    }

    #[test]
    fn global_maximum_equals_field_maximum() {
        let mut rng = Pcg64::seed_from_u64(21);
        let seeds = SeedSet::generate(49, 224, &mut rng).unwrap();
        let grid = SeedGrid::new(&seeds, Boundary::Clip);
        let field = DistanceField::<F32DistanceStorage>::compute(&grid).unwrap();

        let maxima = GroupMaxima::reduce(&field).unwrap();
        let global = reduce_global(&maxima).unwrap();

        assert_eq!(global.value(), field.max_distance());
        assert!(maxima.maxima.iter().any(|&maximum| maximum == global.value()));
    }

    #[test]
    fn rejects_partial_groups() {
        let field = field_from_function(24, |_, _| 1.0);
        match GroupMaxima::reduce(&field) {
            Err(Error::Configuration(ConfigurationError::SizeNotWorkgroupMultiple { size: 24, .. })) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn concurrent_combine() {
        let cell = Arc::new(GlobalMaxCell::new());

        let handles: Vec<_> = (0..8).map(|thread| {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                for step in 0..1000 {
                    cell.combine((step * 8 + thread) as f32 * 0.5);
                }
            })
        }).collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let cell = Arc::try_unwrap(cell).unwrap();
        assert_eq!(cell.finish().unwrap().value(), 7999.0 * 0.5);
    }

    #[test]
    fn infinite_maximum_is_a_fault() {
        let cell = GlobalMaxCell::new();
        cell.combine(3.0);
        cell.combine(std::f32::INFINITY);

        match cell.finish() {
            Err(Error::Synchronization(_)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn empty_cell_is_zero() {
        let cell = GlobalMaxCell::new();
        cell.combine(-0.0);
        assert_eq!(cell.finish().unwrap().value(), 0.0);
    }
}
