//! The JSON record listing every file a batch produced.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrainEntry {
    pub file: String,
    /// Requested grain length in seconds.
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    pub grains: Vec<GrainEntry>,
    pub tap: Option<String>,
    pub sample_rate: u32,
}

impl ManifestRecord {
    pub fn new(sample_rate: u32) -> ManifestRecord {
        ManifestRecord {
            grains: vec![],
            tap: None,
            sample_rate,
        }
    }

    pub fn push_grain(&mut self, file: impl Into<String>, duration: f64) {
        self.grains.push(GrainEntry {
            file: file.into(),
            duration,
        });
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the record as `manifest.json` inside `dir`.
    pub fn write(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join(MANIFEST_FILE), self.to_json()?)?;
        Ok(())
    }
}
