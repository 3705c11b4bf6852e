//! Per-tick driver owning every stateful component of one sensor stream.

use crate::filter::LowPass3;
use crate::fusion::OrientationEstimator;
use crate::history::HistoryWindow;
use crate::motion::{VelocityIntegrator, ZeroSpeedDetector};
use crate::types::{MotionSample, Orientation, SampleError, TickOutput};
use inertia_config::{ConfigError, FusionConfig};

/// Runs one sample at a time through filters, velocity, zero-speed and orientation.
///
/// One pipeline per stream: none of its state may be shared with another stream.
pub struct MotionPipeline {
    fallback_interval: f64,
    acceleration_filter: LowPass3,
    velocity: VelocityIntegrator,
    zero_speed: ZeroSpeedDetector,
    estimator: OrientationEstimator,
    history: HistoryWindow<TickOutput>,
    accepted: u64,
}

impl MotionPipeline {
    pub fn new(config: &FusionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fallback_interval: config.sampling_interval_seconds,
            acceleration_filter: LowPass3::new(config.low_pass_alpha),
            velocity: VelocityIntegrator::new(),
            zero_speed: ZeroSpeedDetector::new(config.high_pass_alpha, config.zero_speed_threshold),
            estimator: OrientationEstimator::new(config.complementary_blend_factor),
            history: HistoryWindow::new(config.history_window_capacity),
            accepted: 0,
        })
    }

    /// Process one sample. Rejected samples leave all state untouched.
    pub fn advance(&mut self, sample: &MotionSample) -> Result<TickOutput, SampleError> {
        sample.validate()?;
        let dt = if sample.interval > 0.0 {
            sample.interval
        } else {
            self.fallback_interval
        };

        let filtered_acceleration = self.acceleration_filter.advance(sample.acceleration);
        let velocity = self.velocity.advance(filtered_acceleration, dt);
        let zero_speed = self.zero_speed.advance(sample.acceleration);
        let orientation = self
            .estimator
            .update(sample.acceleration, sample.rotation_rate, dt);

        let output = TickOutput {
            index: self.accepted,
            interval: dt,
            filtered_acceleration,
            acceleration_norm: zero_speed.norm,
            high_passed_norm: zero_speed.high_passed,
            zero_speed: zero_speed.stationary,
            velocity,
            orientation,
            relative_orientation: self.estimator.relative(orientation),
        };
        self.accepted += 1;
        self.history.push(output);
        Ok(output)
    }

    /// Trailing window of outputs, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &TickOutput> {
        self.history.iter()
    }

    /// Latest orientation, once the first sample has been accepted.
    pub fn orientation(&self) -> Option<Orientation> {
        self.estimator.orientation()
    }

    /// Use the current orientation as the reference for relative output.
    pub fn set_zero(&mut self) {
        self.estimator.set_zero();
    }

    /// Number of samples accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}
