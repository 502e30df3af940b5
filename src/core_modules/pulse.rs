// THEORY:
// The `pulse` module is the numeric heart of the actuation side: the pure
// transform from a commanded angle to a servo pulse width to a PWM duty
// cycle. It holds no state beyond the immutable `ServoConfig` it is handed.
//
// The transform, in order:
// 1.  Clamp the angle into the configured range.
// 2.  Linear-interpolate the pulse width across the configured range:
//     `min_pulse + (angle - min_angle) * pulse_range / angle_range`.
// 3.  Divide by the PWM period (`1_000_000 / frequency` µs) and scale to a
//     percentage.
//
// Invariants, guaranteed by `ServoConfig::validate` at construction time so
// they never need checking on the hot path:
// - the angle range is non-degenerate (no division by zero in step 2);
// - the pulse range fits inside the PWM period, so the duty cycle is in
//   `[0, 100]` for every angle.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable servo hardware profile, set once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServoConfig {
    /// GPIO pin the PWM sink drives (BCM numbering on a Pi).
    pub pin: u8,
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
    /// Pulse width commanding `min_angle_deg`, in microseconds.
    pub min_pulse_us: f64,
    /// Pulse width commanding `max_angle_deg`, in microseconds.
    pub max_pulse_us: f64,
    pub frequency_hz: f64,
    /// Emit a per-command diagnostic line (angle → pulse → duty).
    /// No behavioral effect.
    pub debug: bool,
}

impl Default for ServoConfig {
    /// The extended-range digital servo profile on BCM pin 18:
    /// 0–180° over 500–2500 µs at 50 Hz.
    fn default() -> Self {
        Self {
            pin: 18,
            min_angle_deg: 0.0,
            max_angle_deg: 180.0,
            min_pulse_us: 500.0,
            max_pulse_us: 2500.0,
            frequency_hz: 50.0,
            debug: false,
        }
    }
}

impl ServoConfig {
    /// Checks every static invariant. Components reject an invalid config
    /// at construction; the transform functions assume a validated one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_angle_deg >= self.max_angle_deg {
            return Err(ConfigError::DegenerateAngleRange {
                min: self.min_angle_deg,
                max: self.max_angle_deg,
            });
        }
        if self.min_pulse_us <= 0.0 || self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::InvalidPulseRange {
                min_us: self.min_pulse_us,
                max_us: self.max_pulse_us,
            });
        }
        if self.frequency_hz <= 0.0 {
            return Err(ConfigError::InvalidFrequency(self.frequency_hz));
        }
        if self.max_pulse_us > self.period_us() {
            return Err(ConfigError::PulseExceedsPeriod {
                max_us: self.max_pulse_us,
                period_us: self.period_us(),
            });
        }
        Ok(())
    }

    /// The PWM period in microseconds.
    pub fn period_us(&self) -> f64 {
        1_000_000.0 / self.frequency_hz
    }

    /// The midpoint of the angle range.
    pub fn center_angle(&self) -> f64 {
        (self.min_angle_deg + self.max_angle_deg) / 2.0
    }

    pub fn clamp_angle(&self, angle: f64) -> f64 {
        angle.clamp(self.min_angle_deg, self.max_angle_deg)
    }
}

/// The pulse width (µs) commanding `angle`, after clamping it into range.
pub fn pulse_width_us(config: &ServoConfig, angle: f64) -> f64 {
    let angle = config.clamp_angle(angle);
    let angle_range = config.max_angle_deg - config.min_angle_deg;
    let pulse_range = config.max_pulse_us - config.min_pulse_us;
    config.min_pulse_us + (angle - config.min_angle_deg) * pulse_range / angle_range
}

/// The PWM duty cycle (percent, `[0, 100]`) commanding `angle`.
pub fn duty_cycle(config: &ServoConfig, angle: f64) -> f64 {
    pulse_width_us(config, angle) / config.period_us() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn endpoints_are_exact() {
        let config = ServoConfig::default();
        // 500 / 20_000 * 100 and 2500 / 20_000 * 100.
        assert!((duty_cycle(&config, 0.0) - 2.5).abs() < TOLERANCE);
        assert!((duty_cycle(&config, 180.0) - 12.5).abs() < TOLERANCE);
    }

    #[test]
    fn center_is_the_pulse_midpoint() {
        let config = ServoConfig::default();
        assert!((pulse_width_us(&config, 90.0) - 1500.0).abs() < TOLERANCE);
        assert!((duty_cycle(&config, 90.0) - 7.5).abs() < TOLERANCE);
    }

    #[test]
    fn monotonic_over_the_angle_range() {
        let config = ServoConfig::default();
        let mut previous = duty_cycle(&config, config.min_angle_deg);
        let mut angle = config.min_angle_deg;
        while angle <= config.max_angle_deg {
            let duty = duty_cycle(&config, angle);
            assert!(duty >= previous);
            assert!((0.0..=100.0).contains(&duty));
            previous = duty;
            angle += 0.5;
        }
    }

    #[test]
    fn out_of_range_angles_clamp_to_the_boundary() {
        let config = ServoConfig::default();
        assert_eq!(duty_cycle(&config, -45.0), duty_cycle(&config, 0.0));
        assert_eq!(duty_cycle(&config, 999.0), duty_cycle(&config, 180.0));
    }

    #[test]
    fn validate_rejects_degenerate_angle_range() {
        let config = ServoConfig {
            min_angle_deg: 90.0,
            max_angle_deg: 90.0,
            ..ServoConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DegenerateAngleRange {
                min: 90.0,
                max: 90.0
            })
        );
    }

    #[test]
    fn validate_rejects_bad_pulse_bounds() {
        let inverted = ServoConfig {
            min_pulse_us: 2500.0,
            max_pulse_us: 500.0,
            ..ServoConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidPulseRange { .. })
        ));

        let non_positive = ServoConfig {
            min_pulse_us: 0.0,
            ..ServoConfig::default()
        };
        assert!(matches!(
            non_positive.validate(),
            Err(ConfigError::InvalidPulseRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_frequency() {
        let config = ServoConfig {
            frequency_hz: 0.0,
            ..ServoConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidFrequency(0.0))
        );
    }

    #[test]
    fn validate_rejects_pulse_wider_than_period() {
        // 500 Hz → 2000 µs period, narrower than a 2500 µs max pulse.
        let config = ServoConfig {
            frequency_hz: 500.0,
            ..ServoConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PulseExceedsPeriod { .. })
        ));
    }

    #[test]
    fn default_profile_is_valid() {
        assert_eq!(ServoConfig::default().validate(), Ok(()));
    }
}
