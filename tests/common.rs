#![allow(dead_code)]
use std::path::PathBuf;

use chalk_grains::friction::PhysicalParams;
use chalk_grains::GrainSpec;

const TEST_AUDIO_DIR: &str = "chalk-test-render";

pub const SR: u32 = 44100;

/// A fresh scratch directory per test label.
pub fn test_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(TEST_AUDIO_DIR).join(format!("{}_{}", label, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    dir
}

pub fn reference_spec() -> GrainSpec {
    GrainSpec {
        length_seconds: 0.08,
        params: PhysicalParams {
            mass: 0.015,
            spring_const: 1500.0,
            damping_coeff: 0.06,
            friction_coeff: 0.005,
            init_velocity: 0.7,
        },
        lowpass_hz: 3000.0,
        highpass_hz: 400.0,
        gain: 0.35,
    }
}

pub fn spec_with_length(length_seconds: f64) -> GrainSpec {
    GrainSpec {
        length_seconds,
        ..reference_spec()
    }
}

/// Size field of the `data` chunk.
pub fn data_chunk_len(bytes: &[u8]) -> Option<u32> {
    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes([bytes[offset + 4], bytes[offset + 5], bytes[offset + 6], bytes[offset + 7]]);
        if id == b"data" {
            return Some(size);
        }
        offset += 8 + size as usize;
    }
    None
}
