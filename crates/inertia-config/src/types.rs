use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Signal processing and orientation estimator settings.
    pub fusion: FusionConfig,
    /// Capture replay settings for the host binary.
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Low-pass smoothing coefficient applied to each acceleration axis.
    /// Higher = smoother, slower to follow the input.
    pub low_pass_alpha: f64,
    /// High-pass coefficient applied to the acceleration norm for the zero-speed flag.
    pub high_pass_alpha: f64,
    /// Complementary filter weight pulling the gyro estimate toward the accelerometer.
    pub complementary_blend_factor: f64,
    /// A high-passed acceleration norm below this marks the device stationary.
    pub zero_speed_threshold: f64,
    /// Number of recent outputs kept for trailing-window consumers.
    pub history_window_capacity: usize,
    /// Sample period used when a sample does not report its own interval.
    pub sampling_interval_seconds: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            low_pass_alpha: 0.926,
            high_pass_alpha: 0.926,
            complementary_blend_factor: 0.08,
            zero_speed_threshold: 0.01,
            history_window_capacity: 60,
            sampling_interval_seconds: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    CoefficientOutOfRange { name: &'static str, value: f64 },
    #[error("history_window_capacity must be at least 1")]
    EmptyHistoryWindow,
    #[error("sampling_interval_seconds must be positive and finite, got {0}")]
    InvalidSamplingInterval(f64),
    #[error("zero_speed_threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
}

impl FusionConfig {
    /// Reject settings the filters cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coefficients = [
            ("low_pass_alpha", self.low_pass_alpha),
            ("high_pass_alpha", self.high_pass_alpha),
            ("complementary_blend_factor", self.complementary_blend_factor),
        ];
        for (name, value) in coefficients {
            // NaN fails the range check too.
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::CoefficientOutOfRange { name, value });
            }
        }
        if self.history_window_capacity == 0 {
            return Err(ConfigError::EmptyHistoryWindow);
        }
        if !(self.sampling_interval_seconds.is_finite() && self.sampling_interval_seconds > 0.0) {
            return Err(ConfigError::InvalidSamplingInterval(
                self.sampling_interval_seconds,
            ));
        }
        if !(self.zero_speed_threshold.is_finite() && self.zero_speed_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(self.zero_speed_threshold));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Capture file to replay when none is given on the command line.
    pub capture_path: Option<PathBuf>,
    /// Pace pushes by each sample's interval instead of replaying as fast as possible.
    pub realtime: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            capture_path: None,
            realtime: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(FusionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_coefficient_above_one() {
        let config = FusionConfig {
            complementary_blend_factor: 1.5,
            ..FusionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CoefficientOutOfRange {
                name: "complementary_blend_factor",
                value: 1.5,
            })
        );
    }

    #[test]
    fn rejects_nan_coefficient() {
        let config = FusionConfig {
            low_pass_alpha: f64::NAN,
            ..FusionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CoefficientOutOfRange { name: "low_pass_alpha", .. })
        ));
    }

    #[test]
    fn accepts_coefficient_bounds() {
        let config = FusionConfig {
            low_pass_alpha: 0.0,
            high_pass_alpha: 1.0,
            ..FusionConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = FusionConfig {
            history_window_capacity: 0,
            ..FusionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyHistoryWindow));
    }

    #[test]
    fn rejects_non_positive_interval() {
        for interval in [0.0, -0.01, f64::INFINITY] {
            let config = FusionConfig {
                sampling_interval_seconds: interval,
                ..FusionConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSamplingInterval(_))
            ));
        }
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [fusion]
            complementary_blend_factor = 0.02
            "#,
        )
        .unwrap();
        assert_eq!(config.fusion.complementary_blend_factor, 0.02);
        assert_eq!(config.fusion.low_pass_alpha, 0.926);
        assert!(!config.replay.realtime);
    }
}
