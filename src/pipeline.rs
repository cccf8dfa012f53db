use crate::config::{Boundary, NoiseConfig};
use crate::distance_field::{DistanceField, DistanceStorage, F32DistanceStorage};
use crate::error::Result;
use crate::normalize::NoiseImage;
use crate::reduction::{reduce_global, GlobalMax, GroupMaxima};
use crate::seeds::SeedSet;
use crate::spatial_index::SeedGrid;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::time::Instant;


/// The steps of a run, in order. Each step starts only after
/// the previous one has completed for every pixel and group.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Phase {
    Seeded,
    DistanceComputed,
    GroupReduced,
    GlobalReduced,
    Normalized,
    Encoded,
}


/// Intermediate buffers of the last successful run.
#[derive(Clone, Debug)]
pub struct Scratch<D: DistanceStorage> {
    pub seeds: SeedSet,
    pub distance_field: DistanceField<D>,
    pub group_maxima: GroupMaxima,
    pub global_max: GlobalMax,
}


/// Runs the whole pipeline once per `on_start`.
/// Scratch buffers are kept for inspection until `on_teardown`
/// or until the generator is dropped. A failing run keeps nothing.
#[derive(Debug)]
pub struct NoiseGenerator<D: DistanceStorage = F32DistanceStorage> {
    config: NoiseConfig,
    phase: Option<Phase>,
    scratch: Option<Scratch<D>>,
}

impl<D: DistanceStorage> NoiseGenerator<D> {
    pub fn new(config: NoiseConfig) -> Self {
        NoiseGenerator { config, phase: None, scratch: None }
    }

    #[inline]
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// The last phase that completed, if any.
    #[inline]
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    #[inline]
    pub fn scratch(&self) -> Option<&Scratch<D>> {
        self.scratch.as_ref()
    }

    /// Scatter seeds with the configured random seed and generate the texture.
    pub fn on_start(&mut self) -> Result<NoiseImage> {
        self.on_teardown();
        self.config.validate()?;

        log::info!(
            "generating {0}x{0} worley noise from {1} points (rng seed {2})",
            self.config.size, self.config.point_count, self.config.rng_seed
        );

        let mut rng = Pcg64::seed_from_u64(self.config.rng_seed);
        let seeds = SeedSet::generate(self.config.point_count, self.config.size, &mut rng)?;

        let result = self.run(seeds, self.config.boundary);
        self.release_on_error(result)
    }

    /// Generate the texture from explicitly placed seeds.
    /// Point count and size are taken from the seed set for this run only,
    /// the configuration of the generator stays unchanged.
    pub fn on_start_with_seeds(&mut self, seeds: SeedSet) -> Result<NoiseImage> {
        self.on_teardown();

        let config = self.config
            .with_point_count(seeds.len() as u32)
            .with_size(seeds.size());

        config.validate()?;

        let result = self.run(seeds, config.boundary);
        self.release_on_error(result)
    }

    /// Generate the texture and write it to `<directory>/p.png`.
    /// If writing fails, nothing is kept and no file is left behind.
    #[cfg(feature = "piston_image")]
    pub fn export_png(&mut self, directory: impl AsRef<std::path::Path>) -> Result<std::path::PathBuf> {
        let image = self.on_start()?;

        let start = Instant::now();
        let result = crate::export::write_png(&image, directory);
        let path = self.release_on_error(result)?;
        self.enter(Phase::Encoded, start);

        Ok(path)
    }

    /// Release all scratch buffers.
    pub fn on_teardown(&mut self) {
        if self.scratch.take().is_some() {
            log::debug!("released scratch buffers");
        }

        self.phase = None;
    }

    fn release_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.on_teardown();
        }

        result
    }

    fn run(&mut self, seeds: SeedSet, boundary: Boundary) -> Result<NoiseImage> {
        let start = Instant::now();
        self.enter(Phase::Seeded, start);

        let grid = SeedGrid::new(&seeds, boundary);
        let distance_field = DistanceField::<D>::compute(&grid)?;
        self.enter(Phase::DistanceComputed, start);

        let group_maxima = GroupMaxima::reduce(&distance_field)?;
        self.enter(Phase::GroupReduced, start);

        let global_max = reduce_global(&group_maxima)?;
        debug_assert_eq!(global_max.value(), distance_field.max_distance(), "incomplete global reduction");
        self.enter(Phase::GlobalReduced, start);

        let image = NoiseImage::normalize(&distance_field, global_max)?;
        self.enter(Phase::Normalized, start);

        self.scratch = Some(Scratch { seeds, distance_field, group_maxima, global_max });
        Ok(image)
    }

    fn enter(&mut self, phase: Phase, start: Instant) {
        log::debug!("{:?} after {:?}", phase, start.elapsed());
        self.phase = Some(phase);
    }
}

impl<D: DistanceStorage> Drop for NoiseGenerator<D> {
    fn drop(&mut self) {
        self.on_teardown();
    }
}


/// Single shot generation: scatter seeds, compute and normalize the texture,
/// and release every scratch buffer before returning.
pub fn on_start(rng_seed: u64, point_count: u32, size: u32) -> Result<NoiseImage> {
    NoiseGenerator::<F32DistanceStorage>::new(NoiseConfig::new(rng_seed, point_count, size)).on_start()
}
