//! Bandpass and gain settings for the playback side.
//!
//! Synthesis never reads these. They are emitted next to the grains so the
//! player can shape them without rerunning the batch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const PLAYBACK_PARAMS_FILE: &str = "chalk_params.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackParams {
    pub bandpass_freq: f64,
    pub bandpass_freq_spread: f64,
    pub bandpass_q: f64,
    pub bandpass_q_spread: f64,
    pub grain_gain_min: f64,
    pub grain_gain_max: f64,
    pub tap_gain: f64,
    pub tap_bandpass_freq: f64,
    pub tap_bandpass_q: f64,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        PlaybackParams {
            bandpass_freq: 1200.0,
            bandpass_freq_spread: 500.0,
            bandpass_q: 0.7,
            bandpass_q_spread: 0.35,
            grain_gain_min: 0.26,
            grain_gain_max: 0.42,
            tap_gain: 0.5,
            tap_bandpass_freq: 1400.0,
            tap_bandpass_q: 0.8,
        }
    }
}

/// Write `params` as `chalk_params.json` inside `dir`.
pub fn write_playback_params(params: &PlaybackParams, dir: &Path) -> Result<()> {
    fs::write(dir.join(PLAYBACK_PARAMS_FILE), serde_json::to_string_pretty(params)?)?;
    Ok(())
}
