//! Explicit Euler integration of the friction oscillator.

use crate::friction::{acceleration, PhysicalParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub position: f64,
    pub velocity: f64,
}

impl SimulationState {
    pub fn new(position: f64, velocity: f64) -> SimulationState {
        SimulationState { position, velocity }
    }

    /// Advance one sample. Position moves with the velocity from before the update.
    pub fn step(&mut self, params: &PhysicalParams, dt: f64) {
        let a = acceleration(self.position, self.velocity, params);
        let previous_velocity = self.velocity;
        self.velocity = previous_velocity + a * dt;
        self.position += previous_velocity * dt;
    }
}

/// Position and velocity sampled on the same uniform grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }
}

/// Integrate `n` samples starting from `initial`, with `dt = 1 / sample_rate`.
/// The first sample of the trace is the initial state itself.
pub fn simulate(initial: SimulationState, params: &PhysicalParams, n: usize, sample_rate: u32) -> Trace {
    let dt = 1.0 / sample_rate as f64;
    let mut position = Vec::with_capacity(n);
    let mut velocity = Vec::with_capacity(n);

    let mut state = initial;
    for i in 0..n {
        if i > 0 {
            state.step(params, dt);
        }
        position.push(state.position);
        velocity.push(state.velocity);
    }

    Trace { position, velocity }
}
