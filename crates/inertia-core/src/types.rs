use crate::math::{Quaternion, Vector3};
use glam::EulerRot;
use thiserror::Error;

/// One device-motion reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Linear acceleration including gravity (m/s^2), device axes.
    pub acceleration: Vector3,
    /// Angular velocity (deg/s) about the device x, y and z axes.
    pub rotation_rate: Vector3,
    /// Time since the previous reading (s). Zero means unknown.
    pub interval: f64,
}

impl MotionSample {
    pub fn new(acceleration: Vector3, rotation_rate: Vector3, interval: f64) -> Self {
        Self {
            acceleration,
            rotation_rate,
            interval,
        }
    }

    /// Check that the sample can be integrated without poisoning filter state.
    pub fn validate(&self) -> Result<(), SampleError> {
        if !self.acceleration.is_finite() {
            return Err(SampleError::NonFinite("acceleration"));
        }
        if !self.rotation_rate.is_finite() {
            return Err(SampleError::NonFinite("rotation_rate"));
        }
        if !self.interval.is_finite() {
            return Err(SampleError::NonFinite("interval"));
        }
        // Finite components can still overflow once squared and summed.
        if !self.acceleration.length().is_finite() {
            return Err(SampleError::Overflow("acceleration"));
        }
        if !self.rotation_rate.length().is_finite() {
            return Err(SampleError::Overflow("rotation_rate"));
        }
        if self.interval < 0.0 {
            return Err(SampleError::NegativeInterval(self.interval));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SampleError {
    #[error("Sample {0} contains a non-finite value")]
    NonFinite(&'static str),
    #[error("Sample {0} magnitude overflows")]
    Overflow(&'static str),
    #[error("Sample interval is negative ({0} s)")]
    NegativeInterval(f64),
}

/// Fused orientation output from the complementary filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Orientation as a unit quaternion.
    pub quaternion: Quaternion,
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            quaternion: Quaternion::IDENTITY,
        }
    }
}

/// Euler angles in radians, extracted in `YXZ` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    /// Rotation about Y, applied first.
    pub yaw: f64,
    /// Rotation about X.
    pub pitch: f64,
    /// Rotation about Z, applied last.
    pub roll: f64,
}

impl EulerAngles {
    pub fn to_degrees(self) -> Self {
        Self {
            yaw: self.yaw.to_degrees(),
            pitch: self.pitch.to_degrees(),
            roll: self.roll.to_degrees(),
        }
    }
}

impl Orientation {
    /// Decompose into yaw/pitch/roll. The only rotation order used for display is `YXZ`.
    pub fn euler(&self) -> EulerAngles {
        let (yaw, pitch, roll) = self.quaternion.to_euler(EulerRot::YXZ);
        EulerAngles { yaw, pitch, roll }
    }
}

/// Everything the pipeline derives from one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Zero-based position of the sample in the accepted stream.
    pub index: u64,
    /// Interval the sample was integrated with (s).
    pub interval: f64,
    /// Per-axis low-passed acceleration.
    pub filtered_acceleration: Vector3,
    /// Euclidean norm of the raw acceleration.
    pub acceleration_norm: f64,
    /// High-passed acceleration norm feeding the zero-speed decision.
    pub high_passed_norm: f64,
    /// Whether the device is judged stationary this tick.
    pub zero_speed: bool,
    /// Per-axis integrated velocity.
    pub velocity: Vector3,
    /// Absolute fused orientation.
    pub orientation: Orientation,
    /// Orientation relative to the last zero reference.
    pub relative_orientation: Orientation,
}

impl TickOutput {
    /// Zero-speed flag as the 0/1 signal charted by hosts.
    pub fn zero_speed_flag(&self) -> u8 {
        u8::from(self.zero_speed)
    }
}
