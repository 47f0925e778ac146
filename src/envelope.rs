//! Amplitude envelopes for grains and the tap.
//! Each envelope is a slice of gain values to be multiplied elementwise onto a signal.

/// Fraction of the grain spent fading in.
pub const ATTACK_FRACTION: f64 = 0.02;
/// Fraction of the grain at which the release begins.
pub const DECAY_START_FRACTION: f64 = 0.5;
/// Level the release fades to. Not zero, so the tail stays audible.
pub const RELEASE_FLOOR: f64 = 0.1;
/// Exponent reached by the tap's decay at its last sample.
pub const TAP_DECAY_RATE: f64 = 5.0;

/// `n` evenly spaced values from `start` to `end` inclusive.
/// A single value is just `start`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    n: usize,
}

impl Envelope {
    pub fn new(n: usize) -> Envelope {
        Envelope { n }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Linear attack over the first 2%, flat until the midpoint,
    /// then a linear release down to [`RELEASE_FLOOR`].
    pub fn grain(&self) -> Vec<f64> {
        let n = self.n;
        let attack = (n as f64 * ATTACK_FRACTION) as usize;
        let decay_start = (n as f64 * DECAY_START_FRACTION) as usize;

        let mut env = vec![1.0; n];
        if attack > 0 {
            env[..attack].copy_from_slice(&linspace(0.0, 1.0, attack));
        }
        if decay_start < n {
            env[decay_start..].copy_from_slice(&linspace(1.0, RELEASE_FLOOR, n - decay_start));
        }
        env
    }

    /// `exp(-5 * i / (n - 1))`, the extra percussive decay of the tap.
    pub fn tap_decay(&self) -> Vec<f64> {
        linspace(0.0, TAP_DECAY_RATE, self.n).iter().map(|x| (-x).exp()).collect()
    }
}

/// Multiply `signal` by `env` in place.
pub fn apply(signal: &mut [f64], env: &[f64]) {
    for (sample, gain) in signal.iter_mut().zip(env) {
        *sample *= gain;
    }
}
