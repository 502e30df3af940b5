// THEORY:
// The `servo_driver` owns the actuation side of the system. A `ServoDriver`
// exclusively owns three things for its whole lifetime: its validated
// `ServoConfig`, the current committed angle, and the `PwmSink` it was
// constructed with. All hardware access flows through that injected sink —
// the driver decides *what* duty cycle to command, never how pulses are
// generated or how pins are claimed.
//
// Command discipline for `set_angle`:
// 1.  clamp the requested angle into the configured range;
// 2.  compute the duty cycle and issue `(pin, frequency, duty)` to the sink;
// 3.  suspend for the hold time (servo settling, a scheduled sleep — never
//     busy work);
// 4.  only then commit the new angle.
// A transport error aborts before step 3: the committed angle is unchanged
// and the driver remains usable for the next command. Dropping the future
// mid-hold likewise leaves the previously committed angle in place. The
// exclusive `&mut self` receiver is what serializes commands: a second
// command to the same actuator cannot start until the hold completes or is
// abandoned.
//
// The driver is a small state machine over {Idle, Moving, Off}. Idle and
// Moving behave identically to observers; Off is entered only by
// `turn_off` (duty 0, pulses stopped) and left by the next `set_angle`.
// Dropping the driver stops pulses too, so no exit path leaves the servo
// humming.

use std::time::Duration;

use tracing::debug;

use crate::core_modules::pulse::{self, ServoConfig};
use crate::error::{ActuationError, ConfigError, Error};

/// Hold applied by `center` and other single-shot moves, long enough for a
/// hobby servo horn to settle.
const SETTLE_HOLD: Duration = Duration::from_millis(100);

/// Sink for PWM commands. Implementations wrap whatever generates the
/// signal — a GPIO character device, a microcontroller bridge, a test
/// recorder. A duty cycle of 0 stops pulses without releasing the pin
/// claim.
pub trait PwmSink {
    fn set_pwm(
        &mut self,
        pin: u8,
        frequency_hz: f64,
        duty_cycle: f64,
    ) -> Result<(), ActuationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveState {
    Idle,
    Moving,
    Off,
}

/// Stateful servo wrapper: configuration, committed angle, and the owned
/// PWM sink.
pub struct ServoDriver<S: PwmSink> {
    sink: S,
    config: ServoConfig,
    current_angle_deg: f64,
    state: DriveState,
}

impl<S: PwmSink> ServoDriver<S> {
    /// Validates the configuration and takes ownership of the sink.
    /// The initial committed angle is the center of the configured range.
    pub fn new(sink: S, config: ServoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let current_angle_deg = config.center_angle();
        Ok(Self {
            sink,
            config,
            current_angle_deg,
            state: DriveState::Idle,
        })
    }

    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// The last committed angle. Always inside the configured range.
    pub fn current_angle_deg(&self) -> f64 {
        self.current_angle_deg
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Moves the servo to `angle` (clamped into range) and holds for
    /// `hold` before committing. On a transport error nothing is
    /// committed and the driver stays usable.
    pub async fn set_angle(&mut self, angle: f64, hold: Duration) -> Result<(), ActuationError> {
        let clamped = self.config.clamp_angle(angle);
        let duty = pulse::duty_cycle(&self.config, clamped);
        if self.config.debug {
            debug!(
                angle_deg = clamped,
                pulse_us = pulse::pulse_width_us(&self.config, clamped),
                duty_pct = duty,
                "servo command"
            );
        }

        self.sink
            .set_pwm(self.config.pin, self.config.frequency_hz, duty)?;
        self.state = DriveState::Moving;

        tokio::time::sleep(hold).await;

        self.current_angle_deg = clamped;
        self.state = DriveState::Idle;
        Ok(())
    }

    /// Sweeps from `start` to `end` (defaulting to the configured range
    /// ends), commanding every `step` degrees with `delay` as the per-step
    /// hold. The end angle is always commanded, and the direction of
    /// travel is inferred. `step` must be positive.
    pub async fn sweep(
        &mut self,
        start: Option<f64>,
        end: Option<f64>,
        step: f64,
        delay: Duration,
    ) -> Result<(), Error> {
        if step <= 0.0 {
            return Err(ConfigError::InvalidStep(step).into());
        }
        let start = start.unwrap_or(self.config.min_angle_deg);
        let end = end.unwrap_or(self.config.max_angle_deg);
        let direction = if end >= start { 1.0 } else { -1.0 };

        let mut angle = start;
        loop {
            self.set_angle(angle, delay).await?;
            if angle == end {
                break;
            }
            let next = angle + direction * step;
            let overshoots = (direction > 0.0 && next > end) || (direction < 0.0 && next < end);
            angle = if overshoots { end } else { next };
        }
        Ok(())
    }

    /// Moves to the center of the configured angle range.
    pub async fn center(&mut self) -> Result<(), ActuationError> {
        self.set_angle(self.config.center_angle(), SETTLE_HOLD).await
    }

    /// Stops sending pulses (duty 0). The committed angle is untouched and
    /// the next `set_angle` reactivates the servo.
    pub fn turn_off(&mut self) -> Result<(), ActuationError> {
        self.sink
            .set_pwm(self.config.pin, self.config.frequency_hz, 0.0)?;
        self.state = DriveState::Off;
        Ok(())
    }
}

impl<S: PwmSink> Drop for ServoDriver<S> {
    fn drop(&mut self) {
        // Stop pulses on every exit path; the pin claim itself belongs to
        // the sink.
        let _ = self
            .sink
            .set_pwm(self.config.pin, self.config.frequency_hz, 0.0);
    }
}
