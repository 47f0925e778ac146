//! Spring-mass-damper under dry (Coulomb) friction.

use crate::error::{ChalkError, Result};

/// Physical constants of one oscillator. All values are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    pub mass: f64,
    pub spring_const: f64,
    pub damping_coeff: f64,
    pub friction_coeff: f64,
    pub init_velocity: f64,
}

impl PhysicalParams {
    /// Checked constructor. Struct literals skip the check and leave `mass > 0`
    /// as the caller's responsibility.
    pub fn new(mass: f64, spring_const: f64, damping_coeff: f64, friction_coeff: f64, init_velocity: f64) -> Result<PhysicalParams> {
        if !(mass > 0.0) {
            return Err(ChalkError::InvalidParams(format!("mass must be positive, got {}", mass)));
        }
        Ok(PhysicalParams {
            mass,
            spring_const,
            damping_coeff,
            friction_coeff,
            init_velocity,
        })
    }
}

/// Kinetic friction opposing the direction of motion.
/// Exactly zero at rest: static friction is idealized away.
pub fn friction_force(velocity: f64, friction_coeff: f64) -> f64 {
    if velocity > 0.0 {
        -friction_coeff
    } else if velocity < 0.0 {
        friction_coeff
    } else {
        0.0
    }
}

/// Instantaneous acceleration from spring, damping and friction forces.
pub fn acceleration(position: f64, velocity: f64, params: &PhysicalParams) -> f64 {
    let spring = -params.spring_const * position;
    let damping = -params.damping_coeff * velocity;
    let friction = friction_force(velocity, params.friction_coeff);
    (spring + damping + friction) / params.mass
}
