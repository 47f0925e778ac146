//! Turns one oscillator simulation into a finished grain.
//!
//! The pipeline is fixed: simulate, mix position and velocity, envelope,
//! highpass then lowpass, `tanh` saturation, gain. Peak normalization is left
//! to the caller so a grain and the tap can use different ceilings.

use itertools::Itertools;
use tracing::warn;

use crate::envelope::{self, Envelope};
use crate::error::Result;
use crate::filters::FilterChain;
use crate::friction::PhysicalParams;
use crate::integrate::{simulate, SimulationState, Trace};

/// Shortest grain in samples. Shorter signals make the filters misbehave.
pub const MIN_SAMPLES: usize = 100;

pub const POSITION_MIX: f64 = 0.4;
pub const VELOCITY_MIX: f64 = 0.6;

/// Input gain into the `tanh` saturator.
pub const DRIVE: f64 = 2.0;

pub const GRAIN_CEILING: f64 = 0.5;
pub const TAP_CEILING: f64 = 0.55;

pub type Signal = Vec<f64>;

/// Everything needed to render one grain at a given sample rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainSpec {
    pub length_seconds: f64,
    pub params: PhysicalParams,
    pub lowpass_hz: f64,
    pub highpass_hz: f64,
    pub gain: f64,
}

/// `round(sample_rate * length_seconds)`, never below [`MIN_SAMPLES`].
pub fn sample_count(length_seconds: f64, sample_rate: u32) -> usize {
    let n = (sample_rate as f64 * length_seconds).round();
    if n.is_finite() && n > 0.0 {
        (n as usize).max(MIN_SAMPLES)
    } else {
        MIN_SAMPLES
    }
}

/// Velocity carries the stick-slip texture, position the low body.
pub fn mix(trace: &Trace) -> Signal {
    trace
        .position
        .iter()
        .zip_eq(&trace.velocity)
        .map(|(x, v)| POSITION_MIX * x + VELOCITY_MIX * v)
        .collect()
}

/// Soft clip, then scale. Gain is applied after the clip.
pub fn saturate(signal: &mut [f64], gain: f64) {
    for sample in signal.iter_mut() {
        *sample = (DRIVE * *sample).tanh() * gain;
    }
}

pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0, |max, &x| max.max(x.abs()))
}

/// Scale so the loudest sample sits at `ceiling`.
/// An all-zero buffer is left untouched and `false` is returned.
pub fn normalize(signal: &mut [f64], ceiling: f64) -> bool {
    let max_amplitude = peak(signal);
    if max_amplitude == 0.0 {
        warn!("skipping normalization of a silent buffer ({} samples)", signal.len());
        return false;
    }
    let scale = ceiling / max_amplitude;
    signal.iter_mut().for_each(|sample| *sample *= scale);
    true
}

#[derive(Debug, Clone, Copy)]
pub struct GrainSynthesizer {
    pub sample_rate: u32,
}

impl GrainSynthesizer {
    pub fn new(sample_rate: u32) -> GrainSynthesizer {
        GrainSynthesizer { sample_rate }
    }

    /// Render a grain with the linear grain envelope. Not normalized.
    pub fn synthesize(&self, spec: &GrainSpec) -> Result<Signal> {
        let n = sample_count(spec.length_seconds, self.sample_rate);
        let chain = FilterChain::new(spec.highpass_hz, spec.lowpass_hz, self.sample_rate)?;

        let trace = simulate(SimulationState::new(0.0, spec.params.init_velocity), &spec.params, n, self.sample_rate);
        let mut raw = mix(&trace);
        envelope::apply(&mut raw, &Envelope::new(n).grain());

        let mut out = chain.apply(&raw);
        saturate(&mut out, spec.gain);
        Ok(out)
    }

    /// Same pipeline as [`GrainSynthesizer::synthesize`] with an exponential
    /// decay on top for a sharper hit. Not normalized.
    pub fn synthesize_tap(&self, spec: &GrainSpec) -> Result<Signal> {
        let mut out = self.synthesize(spec)?;
        let n = out.len();
        envelope::apply(&mut out, &Envelope::new(n).tap_decay());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChalkError;

    const SR: u32 = 44100;

    fn reference_spec() -> GrainSpec {
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

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(0.08, SR), 3528);
        assert_eq!(sample_count(0.06, SR), 2646);
        assert_eq!(sample_count(0.001, SR), MIN_SAMPLES);
        assert_eq!(sample_count(0.0, SR), MIN_SAMPLES);
        assert_eq!(sample_count(f64::NAN, SR), MIN_SAMPLES);
    }

    #[test]
    fn test_mix_weights() {
        let trace = Trace {
            position: vec![1.0, 0.0, 2.0],
            velocity: vec![0.0, 1.0, -1.0],
        };
        let raw = mix(&trace);
        assert!((raw[0] - 0.4).abs() < 1e-15);
        assert!((raw[1] - 0.6).abs() < 1e-15);
        assert!((raw[2] - 0.2).abs() < 1e-15);
    }

    #[test]
    fn test_saturate_bounds_by_gain() {
        let mut signal = vec![-100.0, -0.1, 0.0, 0.1, 100.0];
        saturate(&mut signal, 0.35);
        assert!(signal.iter().all(|x| x.abs() <= 0.35));
        assert_eq!(signal[2], 0.0);
        assert!((signal[3] - (0.2f64).tanh() * 0.35).abs() < 1e-15);
        assert!((signal[4] - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_normalize() {
        let mut signal = vec![0.1, -0.4, 0.2];
        assert!(normalize(&mut signal, 0.5));
        assert!((peak(&signal) - 0.5).abs() < 1e-12);
        assert!((signal[0] - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_skips_silence() {
        let mut signal = vec![0.0; 128];
        assert!(!normalize(&mut signal, 0.5));
        assert!(signal.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reference_grain() {
        let synth = GrainSynthesizer::new(SR);
        let mut grain = synth.synthesize(&reference_spec()).unwrap();
        assert_eq!(grain.len(), 3528);
        assert!(grain.iter().all(|x| x.is_finite()));
        assert!(peak(&grain) <= 0.35);
        assert!(peak(&grain) > 0.0);

        assert!(normalize(&mut grain, GRAIN_CEILING));
        assert!((peak(&grain) - GRAIN_CEILING).abs() < 1e-9);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synth = GrainSynthesizer::new(SR);
        let a = synth.synthesize(&reference_spec()).unwrap();
        let b = synth.synthesize(&reference_spec()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tap_decays_harder_than_grain() {
        let synth = GrainSynthesizer::new(SR);
        let spec = reference_spec();
        let grain = synth.synthesize(&spec).unwrap();
        let tap = synth.synthesize_tap(&spec).unwrap();
        assert_eq!(grain.len(), tap.len());

        let decay = Envelope::new(grain.len()).tap_decay();
        for i in [0, 100, 1000, grain.len() - 1] {
            assert!((tap[i] - grain[i] * decay[i]).abs() < 1e-15);
        }
        let tail = grain.len() * 3 / 4;
        assert!(peak(&tap[tail..]) < peak(&grain[tail..]));
    }

    #[test]
    fn test_bad_cutoff_fails_the_grain() {
        let synth = GrainSynthesizer::new(SR);
        let mut spec = reference_spec();
        spec.highpass_hz = 30000.0;
        assert!(matches!(synth.synthesize(&spec), Err(ChalkError::InvalidFilterSpec { .. })));
    }

    #[test]
    fn test_minimum_length_grain() {
        let synth = GrainSynthesizer::new(SR);
        let mut spec = reference_spec();
        spec.length_seconds = 0.0005;
        let grain = synth.synthesize(&spec).unwrap();
        assert_eq!(grain.len(), MIN_SAMPLES);
        assert!(grain.iter().all(|x| x.is_finite()));
    }
}
