use crate::math::{self, Quaternion, Vector3, DOWN};
use crate::types::Orientation;

/// Complementary-filter orientation estimator.
///
/// Integrates gyroscope rate multiplicatively and, every tick, slerps a small
/// fraction of the way toward the orientation whose predicted gravity matches
/// the accelerometer. Gyro integration dominates at high frequency; the
/// accelerometer removes long-term drift.
pub struct OrientationEstimator {
    /// Fraction of the accelerometer correction applied per tick.
    blend: f64,
    state: EstimatorState,
    /// Reference quaternion for "set zero".
    zero_ref: Quaternion,
}

enum EstimatorState {
    Uninitialized,
    Tracking {
        previous_rotation: Quaternion,
        previous_acceleration: Vector3,
    },
}

impl OrientationEstimator {
    pub fn new(blend: f64) -> Self {
        Self {
            blend,
            state: EstimatorState::Uninitialized,
            zero_ref: Quaternion::IDENTITY,
        }
    }

    /// Fuse one accelerometer/gyroscope pair and return the new orientation.
    ///
    /// `rotation_rate` is in deg/s and `dt` in seconds. The first call seeds
    /// the orientation from the measured gravity direction before applying
    /// the same update as every later tick.
    pub fn update(&mut self, acceleration: Vector3, rotation_rate: Vector3, dt: f64) -> Orientation {
        let measured_gravity = math::safe_normalize(-acceleration);

        let previous_rotation = match self.state {
            EstimatorState::Uninitialized => {
                let seed = seed_rotation(measured_gravity);
                if measured_gravity.is_none() {
                    tracing::warn!("No gravity direction on first sample, seeding level");
                }
                tracing::debug!(x = seed.x, y = seed.y, z = seed.z, w = seed.w, "Orientation seeded");
                seed
            }
            EstimatorState::Tracking {
                previous_rotation, ..
            } => previous_rotation,
        };

        let current = previous_rotation * math::rotation_step(rotation_rate, dt);

        let filtered = match measured_gravity {
            Some(measured) => {
                let estimated = math::safe_normalize(math::rotate(math::inverse(current), DOWN))
                    .unwrap_or(DOWN);
                let delta_accel = math::inverse(math::shortest_arc(estimated, measured));
                let target = current * delta_accel;
                math::slerp(current, target, self.blend)
            }
            // Free fall: nothing to correct against this tick.
            None => math::renormalize(current),
        };

        self.state = EstimatorState::Tracking {
            previous_rotation: filtered,
            previous_acceleration: acceleration,
        };

        Orientation {
            quaternion: filtered,
        }
    }

    /// Latest orientation, once the first sample has arrived.
    pub fn orientation(&self) -> Option<Orientation> {
        match self.state {
            EstimatorState::Uninitialized => None,
            EstimatorState::Tracking {
                previous_rotation, ..
            } => Some(Orientation {
                quaternion: previous_rotation,
            }),
        }
    }

    /// Acceleration of the last fused sample.
    pub fn previous_acceleration(&self) -> Option<Vector3> {
        match self.state {
            EstimatorState::Uninitialized => None,
            EstimatorState::Tracking {
                previous_acceleration,
                ..
            } => Some(previous_acceleration),
        }
    }

    /// Whether the first sample has been seen.
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, EstimatorState::Tracking { .. })
    }

    /// Set current orientation as the zero reference.
    pub fn set_zero(&mut self) {
        self.zero_ref = self
            .orientation()
            .map_or(Quaternion::IDENTITY, |o| o.quaternion);
        tracing::info!("Zero reference set");
    }

    /// Express `absolute` relative to the zero reference.
    pub fn relative(&self, absolute: Orientation) -> Orientation {
        Orientation {
            quaternion: math::renormalize(math::inverse(self.zero_ref) * absolute.quaternion),
        }
    }
}

/// Rotation whose inverse takes the reference down axis onto the measured gravity.
fn seed_rotation(measured_gravity: Option<Vector3>) -> Quaternion {
    let gravity = measured_gravity.unwrap_or(DOWN);
    math::inverse(math::shortest_arc(DOWN, gravity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle_between;

    const DT: f64 = 1.0 / 60.0;

    fn predicted_gravity(q: Quaternion) -> Vector3 {
        math::rotate(math::inverse(q), DOWN)
    }

    #[test]
    fn starts_uninitialized() {
        let estimator = OrientationEstimator::new(0.08);
        assert!(!estimator.is_tracking());
        assert!(estimator.orientation().is_none());
        assert!(estimator.previous_acceleration().is_none());
    }

    #[test]
    fn first_sample_aligns_with_measured_gravity() {
        let mut estimator = OrientationEstimator::new(0.08);
        let accel = Vector3::new(0.0, -9.8, 0.0);
        let q = estimator.update(accel, Vector3::ZERO, DT).quaternion;

        assert!(estimator.is_tracking());
        assert_eq!(estimator.previous_acceleration(), Some(accel));
        let measured = math::safe_normalize(-accel).unwrap();
        assert!((predicted_gravity(q) - measured).length() < 1e-9);
    }

    #[test]
    fn level_device_seeds_identity() {
        let mut estimator = OrientationEstimator::new(0.08);
        let q = estimator
            .update(Vector3::new(0.0, 0.0, 9.8), Vector3::ZERO, DT)
            .quaternion;
        assert!(angle_between(q, Quaternion::IDENTITY) < 1e-6);
    }

    #[test]
    fn free_fall_seed_falls_back_to_level() {
        let mut estimator = OrientationEstimator::new(0.08);
        let q = estimator.update(Vector3::ZERO, Vector3::ZERO, DT).quaternion;
        assert!(q.is_finite());
        assert!(angle_between(q, Quaternion::IDENTITY) < 1e-9);
    }

    #[test]
    fn free_fall_keeps_integrating_gyro() {
        let mut estimator = OrientationEstimator::new(0.08);
        let start = estimator
            .update(Vector3::new(0.0, 0.0, 9.8), Vector3::ZERO, DT)
            .quaternion;
        let rate = Vector3::new(60.0, 0.0, 0.0);
        let q = estimator.update(Vector3::ZERO, rate, DT).quaternion;
        assert!(q.is_finite());
        assert!((angle_between(start, q) - 1f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn accelerometer_pulls_tilt_back() {
        // Tilt rotation about X while the accelerometer insists the device is level.
        let mut estimator = OrientationEstimator::new(0.08);
        let gravity = Vector3::new(0.0, 0.0, 9.8);
        let rate = Vector3::new(90.0, 0.0, 0.0);
        let mut q = Quaternion::IDENTITY;
        for _ in 0..60 {
            q = estimator.update(gravity, rate, DT).quaternion;
        }
        // Lag settles near 0.92 * 1.5 / 0.08 = 17.25 degrees rather than 90.
        let tilt = angle_between(Quaternion::IDENTITY, q).to_degrees();
        assert!(tilt > 15.0 && tilt < 19.0, "tilt = {tilt}");
    }

    #[test]
    fn zero_blend_is_pure_gyro_integration() {
        let mut estimator = OrientationEstimator::new(0.0);
        let gravity = Vector3::new(0.0, 0.0, 9.8);
        let rate = Vector3::new(90.0, 0.0, 0.0);
        let mut q = Quaternion::IDENTITY;
        for _ in 0..60 {
            q = estimator.update(gravity, rate, DT).quaternion;
        }
        let tilt = angle_between(Quaternion::IDENTITY, q).to_degrees();
        assert!((tilt - 90.0).abs() < 1e-6, "tilt = {tilt}");
    }

    #[test]
    fn set_zero_makes_current_orientation_the_reference() {
        let mut estimator = OrientationEstimator::new(0.08);
        let tilted = Vector3::new(3.0, -4.0, 8.0);
        let absolute = estimator.update(tilted, Vector3::ZERO, DT);
        let before = estimator.relative(absolute);
        assert!(angle_between(before.quaternion, absolute.quaternion) < 1e-6);

        estimator.set_zero();
        let relative = estimator.relative(absolute);
        assert!(angle_between(relative.quaternion, Quaternion::IDENTITY) < 1e-6);
    }
}
