//! Reproducible ensembles of randomized grains plus one fixed tap.
//!
//! All random draws happen up front on one thread, in slot order. Synthesis
//! then fans out across a rayon pool; since each slot is a pure function of its
//! spec, scheduling cannot change the output.

use std::ops::Range;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::error::Result;
use crate::files;
use crate::friction::PhysicalParams;
use crate::grain::{normalize, GrainSpec, GrainSynthesizer, Signal, GRAIN_CEILING, TAP_CEILING};
use crate::manifest::ManifestRecord;
use crate::render::engrave;
use crate::synth_config::SynthConfig;

pub const TAP_FILE: &str = "chalk_tap.wav";
pub const TAP_LENGTH: f64 = 0.06;

pub fn grain_file_name(index: usize) -> String {
    format!("grain_{:03}.wav", index)
}

/// Uniform ranges each grain parameter is drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingRanges {
    pub length: Range<f64>,
    pub mass: Range<f64>,
    pub stiffness: Range<f64>,
    pub damping: Range<f64>,
    pub friction: Range<f64>,
    pub init_velocity: Range<f64>,
    pub lowpass_hz: Range<f64>,
    pub highpass_hz: Range<f64>,
    pub gain: Range<f64>,
}

impl Default for SamplingRanges {
    fn default() -> Self {
        SamplingRanges {
            length: 0.05..0.12,
            mass: 0.008..0.025,
            stiffness: 800.0..2500.0,
            damping: 0.03..0.12,
            friction: 0.003..0.009,
            init_velocity: 0.3..1.2,
            lowpass_hz: 2200.0..4500.0,
            highpass_hz: 200.0..600.0,
            gain: 0.25..0.45,
        }
    }
}

impl SamplingRanges {
    /// One grain's parameters. The draw order is part of the output format.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> GrainSpec {
        let length_seconds = rng.gen_range(self.length.clone());
        let mass = rng.gen_range(self.mass.clone());
        let spring_const = rng.gen_range(self.stiffness.clone());
        let damping_coeff = rng.gen_range(self.damping.clone());
        let friction_coeff = rng.gen_range(self.friction.clone());
        let init_velocity = rng.gen_range(self.init_velocity.clone());
        let lowpass_hz = rng.gen_range(self.lowpass_hz.clone());
        let highpass_hz = rng.gen_range(self.highpass_hz.clone());
        let gain = rng.gen_range(self.gain.clone());

        GrainSpec {
            length_seconds,
            params: PhysicalParams {
                mass,
                spring_const,
                damping_coeff,
                friction_coeff,
                init_velocity,
            },
            lowpass_hz,
            highpass_hz,
            gain,
        }
    }
}

/// The fixed, non-random tap.
pub fn tap_spec() -> GrainSpec {
    GrainSpec {
        length_seconds: TAP_LENGTH,
        params: PhysicalParams {
            mass: 0.01,
            spring_const: 2000.0,
            damping_coeff: 0.15,
            friction_coeff: 0.006,
            init_velocity: 1.0,
        },
        lowpass_hz: 3500.0,
        highpass_hz: 400.0,
        gain: 0.5,
    }
}

/// A normalized buffer ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedGrain {
    pub file: String,
    pub duration: f64,
    pub samples: Signal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub sample_rate: u32,
    pub grains: Vec<RenderedGrain>,
    pub tap: RenderedGrain,
}

impl Batch {
    pub fn manifest(&self) -> ManifestRecord {
        let mut manifest = ManifestRecord::new(self.sample_rate);
        for grain in &self.grains {
            manifest.push_grain(grain.file.clone(), grain.duration);
        }
        manifest.tap = Some(self.tap.file.clone());
        manifest
    }

    /// Write every WAV and then the manifest into `dir`.
    pub fn write(&self, dir: &Path) -> Result<()> {
        files::with_dir(dir)?;
        for grain in self.grains.iter().chain(std::iter::once(&self.tap)) {
            engrave::samples(self.sample_rate, &grain.samples, &dir.join(&grain.file))?;
        }
        self.manifest().write(dir)?;
        info!("wrote {} grains + tap to {}", self.grains.len(), dir.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BatchGenerator {
    pub sample_rate: u32,
    pub seed: u64,
    pub num_grains: usize,
    pub ranges: SamplingRanges,
    pub threads: usize,
}

impl BatchGenerator {
    pub fn new(sample_rate: u32, seed: u64, num_grains: usize) -> BatchGenerator {
        BatchGenerator {
            sample_rate,
            seed,
            num_grains,
            ranges: SamplingRanges::default(),
            threads: 1,
        }
    }

    pub fn from_config(config: &SynthConfig) -> BatchGenerator {
        BatchGenerator {
            threads: config.par_thread_count(),
            ..BatchGenerator::new(config.sample_rate, config.seed, config.num_grains)
        }
    }

    pub fn with_threads(mut self, threads: usize) -> BatchGenerator {
        self.threads = threads.max(1);
        self
    }

    /// Every grain spec, drawn sequentially from one seeded stream.
    pub fn sample_specs(&self) -> Vec<GrainSpec> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.num_grains).map(|_| self.ranges.draw(&mut rng)).collect()
    }

    pub fn generate(&self) -> Result<Batch> {
        let specs = self.sample_specs();
        self.render(&specs)
    }

    /// Synthesize the given specs in order, then the tap.
    /// The first failing grain aborts the whole batch.
    pub fn render(&self, specs: &[GrainSpec]) -> Result<Batch> {
        info!(
            "rendering {} grains at {} Hz (seed {}, {} threads)",
            specs.len(),
            self.sample_rate,
            self.seed,
            self.threads
        );
        let synth = GrainSynthesizer::new(self.sample_rate);

        let render_one = |(index, spec): (usize, &GrainSpec)| -> Result<RenderedGrain> {
            debug!("grain {}: {:?}", index, spec);
            let mut samples = synth.synthesize(spec)?;
            normalize(&mut samples, GRAIN_CEILING);
            Ok(RenderedGrain {
                file: grain_file_name(index),
                duration: spec.length_seconds,
                samples,
            })
        };

        let grains = if self.threads > 1 {
            let pool = ThreadPoolBuilder::new().num_threads(self.threads).build()?;
            pool.install(|| specs.par_iter().enumerate().map(render_one).collect::<Result<Vec<_>>>())?
        } else {
            specs.iter().enumerate().map(render_one).collect::<Result<Vec<_>>>()?
        };

        let tap = tap_spec();
        let mut tap_samples = synth.synthesize_tap(&tap)?;
        normalize(&mut tap_samples, TAP_CEILING);

        Ok(Batch {
            sample_rate: self.sample_rate,
            grains,
            tap: RenderedGrain {
                file: TAP_FILE.to_string(),
                duration: tap.length_seconds,
                samples: tap_samples,
            },
        })
    }
}
