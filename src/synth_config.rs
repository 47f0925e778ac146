use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;

use sysinfo::System;
use tracing::warn;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_NUM_GRAINS: usize = 60;
pub const DEFAULT_OUT_DIR: &str = "public/chalk_grains";

/// Batch-wide settings. Sample rate and seed are passed explicitly to every
/// stage rather than read from globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub seed: u64,
    pub num_grains: usize,
    pub out_dir: PathBuf,
    pub max_threads: Option<usize>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: DEFAULT_SEED,
            num_grains: DEFAULT_NUM_GRAINS,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_threads: None,
        }
    }
}

impl SynthConfig {
    pub fn new(sample_rate: u32, seed: u64, num_grains: usize, out_dir: PathBuf) -> SynthConfig {
        SynthConfig {
            sample_rate,
            seed,
            num_grains,
            out_dir,
            max_threads: None,
        }
    }

    /// Defaults overridden by a `.env` file and the process environment.
    ///
    /// Recognized keys: `CHALK_SAMPLE_RATE`, `CHALK_SEED`, `CHALK_NUM_GRAINS`,
    /// `CHALK_OUT_DIR`, `MAX_PAR_THREADS`.
    pub fn from_env() -> SynthConfig {
        dotenv::dotenv().ok();
        let defaults = SynthConfig::default();
        SynthConfig {
            sample_rate: parse_var("CHALK_SAMPLE_RATE").unwrap_or(defaults.sample_rate),
            seed: parse_var("CHALK_SEED").unwrap_or(defaults.seed),
            num_grains: parse_var("CHALK_NUM_GRAINS").unwrap_or(defaults.num_grains),
            out_dir: env::var("CHALK_OUT_DIR").map(PathBuf::from).unwrap_or(defaults.out_dir),
            max_threads: parse_var("MAX_PAR_THREADS"),
        }
    }

    /// Worker threads for grain synthesis.
    ///
    /// Available parallelism limited to cores that are currently mostly idle,
    /// capped by `max_threads`, leaving one core free. Never less than 1.
    pub fn par_thread_count(&self) -> usize {
        let available_threads = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

        let mut sys = System::new_all();
        sys.refresh_cpu_all();
        let idle_cores = sys.cpus().iter().filter(|cpu| cpu.cpu_usage() < 50.0).count().max(1);

        let actual_available_threads = available_threads.min(idle_cores);
        let num_threads = self.max_threads.map_or(actual_available_threads, |cap| actual_available_threads.min(cap));

        if num_threads > 1 {
            num_threads - 1
        } else {
            1
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
