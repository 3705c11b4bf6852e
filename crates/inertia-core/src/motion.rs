//! Velocity integration and the zero-speed heuristic.

use crate::filter::{HighPass, ScalarFilter};
use crate::math::Vector3;

/// Per-axis Euler integration of acceleration into velocity, starting at rest.
#[derive(Debug, Clone, Default)]
pub struct VelocityIntegrator {
    velocity: Vector3,
}

impl VelocityIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt * acceleration` and return the updated velocity.
    pub fn advance(&mut self, acceleration: Vector3, dt: f64) -> Vector3 {
        self.velocity += acceleration * dt;
        self.velocity
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }
}

/// Result of one zero-speed decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroSpeed {
    /// Norm of the raw acceleration, gravity included.
    pub norm: f64,
    /// The norm after high-pass filtering.
    pub high_passed: f64,
    pub stationary: bool,
}

impl ZeroSpeed {
    pub fn as_flag(&self) -> u8 {
        u8::from(self.stationary)
    }
}

/// Judges the device stationary when the high-passed acceleration norm is small.
///
/// Gravity is close to DC in the norm, so high-passing leaves roughly the
/// dynamic part of the motion.
#[derive(Debug, Clone)]
pub struct ZeroSpeedDetector {
    high_pass: HighPass,
    threshold: f64,
}

impl ZeroSpeedDetector {
    pub fn new(high_pass_alpha: f64, threshold: f64) -> Self {
        Self {
            high_pass: HighPass::new(high_pass_alpha),
            threshold,
        }
    }

    pub fn advance(&mut self, acceleration: Vector3) -> ZeroSpeed {
        let norm = acceleration.length();
        let high_passed = self.high_pass.advance(norm);
        ZeroSpeed {
            norm,
            high_passed,
            stationary: high_passed.abs() < self.threshold,
        }
    }
}
