//! 4th order Butterworth highpass/lowpass stages.
//!
//! Each stage is two cascaded bilinear-transform biquads whose Q values are the
//! pole pairs of the 4th order Butterworth prototype. Filter state starts at
//! zero on every call, so no memory carries over between grains.

use biquad::{Biquad, Coefficients, DirectForm1, Type as FilterType};
use std::f64::consts::PI;

use crate::error::{ChalkError, Result};

/// Fraction of Nyquist the lowpass cutoff is clamped to.
pub const LOWPASS_CLAMP: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    HighPass,
    LowPass,
}

/// Section Qs for a 4th order Butterworth: 1 / (2 cos(θ)) with θ = π/8, 3π/8.
pub fn butterworth_q4() -> [f64; 2] {
    [1.0 / (2.0 * (PI / 8.0).cos()), 1.0 / (2.0 * (3.0 * PI / 8.0).cos())]
}

#[derive(Debug, Clone, Copy)]
pub struct ButterworthFilter {
    pub kind: FilterKind,
    /// Cutoff after clamping.
    pub cutoff_hz: f64,
    pub sample_rate: u32,
    sections: [Coefficients<f64>; 2],
}

impl ButterworthFilter {
    pub fn design(kind: FilterKind, cutoff_hz: f64, sample_rate: u32) -> Result<ButterworthFilter> {
        let invalid = || ChalkError::InvalidFilterSpec { kind, cutoff_hz, sample_rate };

        if sample_rate == 0 || !cutoff_hz.is_finite() {
            return Err(invalid());
        }

        let nyquist = sample_rate as f64 / 2.0;
        let cutoff = match kind {
            FilterKind::LowPass => cutoff_hz.min(LOWPASS_CLAMP * nyquist),
            FilterKind::HighPass => cutoff_hz,
        };
        if cutoff <= 0.0 || cutoff >= nyquist {
            return Err(invalid());
        }

        let filter_type = || match kind {
            FilterKind::HighPass => FilterType::HighPass,
            FilterKind::LowPass => FilterType::LowPass,
        };
        // cutoff as a fraction of Nyquist
        let normalized = cutoff / nyquist;
        let [q1, q2] = butterworth_q4();
        let first = Coefficients::<f64>::from_normalized_params(filter_type(), normalized, q1).map_err(|_| invalid())?;
        let second = Coefficients::<f64>::from_normalized_params(filter_type(), normalized, q2).map_err(|_| invalid())?;

        Ok(ButterworthFilter {
            kind,
            cutoff_hz: cutoff,
            sample_rate,
            sections: [first, second],
        })
    }

    pub fn highpass(cutoff_hz: f64, sample_rate: u32) -> Result<ButterworthFilter> {
        Self::design(FilterKind::HighPass, cutoff_hz, sample_rate)
    }

    pub fn lowpass(cutoff_hz: f64, sample_rate: u32) -> Result<ButterworthFilter> {
        Self::design(FilterKind::LowPass, cutoff_hz, sample_rate)
    }

    /// Filter the whole buffer from a zero initial state.
    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        let mut first = DirectForm1::<f64>::new(self.sections[0]);
        let mut second = DirectForm1::<f64>::new(self.sections[1]);
        samples.iter().map(|&x| second.run(first.run(x))).collect()
    }
}

/// Highpass followed by lowpass.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain {
    pub highpass: ButterworthFilter,
    pub lowpass: ButterworthFilter,
}

impl FilterChain {
    pub fn new(highpass_hz: f64, lowpass_hz: f64, sample_rate: u32) -> Result<FilterChain> {
        Ok(FilterChain {
            highpass: ButterworthFilter::highpass(highpass_hz, sample_rate)?,
            lowpass: ButterworthFilter::lowpass(lowpass_hz, sample_rate)?,
        })
    }

    pub fn apply(&self, samples: &[f64]) -> Vec<f64> {
        self.lowpass.apply(&self.highpass.apply(samples))
    }
}
