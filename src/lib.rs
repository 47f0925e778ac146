//! Chalk grain synthesis: a slip-stick friction oscillator rendered into short
//! 16-bit mono WAV grains, one percussive tap, and a JSON manifest.

pub mod batch;
pub mod envelope;
pub mod error;
pub mod files;
pub mod filters;
pub mod friction;
pub mod grain;
pub mod integrate;
pub mod manifest;
pub mod playback;
pub mod render;
pub mod synth_config;

pub use batch::{Batch, BatchGenerator};
pub use error::{ChalkError, Result};
pub use grain::{GrainSpec, GrainSynthesizer};
pub use synth_config::SynthConfig;
