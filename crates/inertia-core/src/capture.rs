//! Decoding of recorded device-motion captures.
//!
//! A capture is a JSON array of browser `devicemotion` readings:
//!
//! ```json
//! [{"accelerationIncludingGravity": {"x": 0.1, "y": 0.2, "z": 9.7},
//!   "rotationRate": {"alpha": 0.0, "beta": 1.5, "gamma": -0.3},
//!   "interval": 16}]
//! ```
//!
//! Recorders store batches by position, so the array may contain `null`
//! holes where a batch never arrived.

use crate::math::Vector3;
use crate::types::MotionSample;
use serde::Deserialize;
use thiserror::Error;

/// Intervals at or above this are taken to be milliseconds.
const MILLISECOND_INTERVAL_THRESHOLD: f64 = 1.0;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Malformed capture document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded reading, as written by the capture tool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRecord {
    pub acceleration_including_gravity: AxisReading,
    pub rotation_rate: RotationReading,
    #[serde(default)]
    pub interval: Option<f64>,
}

/// Accelerometer axes. Browsers report `null` for axes they cannot measure.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AxisReading {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// Gyroscope rates in deg/s about the device z (alpha), x (beta) and y (gamma) axes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RotationReading {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl CaptureRecord {
    /// Convert to a pipeline sample.
    ///
    /// Missing axes become NaN so the pipeline rejects the sample instead of
    /// integrating a made-up zero. A missing interval becomes zero (unknown).
    pub fn to_sample(&self) -> MotionSample {
        let axis = |v: Option<f64>| v.unwrap_or(f64::NAN);
        let accel = self.acceleration_including_gravity;
        let rot = self.rotation_rate;
        let interval = match self.interval {
            Some(i) if i >= MILLISECOND_INTERVAL_THRESHOLD => i / 1000.0,
            Some(i) => i,
            None => 0.0,
        };
        MotionSample {
            acceleration: Vector3::new(axis(accel.x), axis(accel.y), axis(accel.z)),
            rotation_rate: Vector3::new(axis(rot.beta), axis(rot.gamma), axis(rot.alpha)),
            interval,
        }
    }
}

/// A decoded capture.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    pub samples: Vec<MotionSample>,
    /// Number of `null` holes skipped.
    pub missing: usize,
}

/// Decode a capture document into samples in recorded order.
pub fn parse_capture(json: &str) -> Result<Capture, CaptureError> {
    let records: Vec<Option<CaptureRecord>> = serde_json::from_str(json)?;
    let mut capture = Capture {
        samples: Vec::with_capacity(records.len()),
        missing: 0,
    };
    for record in records {
        match record {
            Some(record) => capture.samples.push(record.to_sample()),
            None => capture.missing += 1,
        }
    }
    if capture.missing > 0 {
        tracing::warn!(missing = capture.missing, "Capture has gaps");
    }
    Ok(capture)
}
