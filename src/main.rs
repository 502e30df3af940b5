// Scripted range exercise for the servo side of the engine: center, both
// end stops, back to center, then stop pulses. Runs against a console sink
// so it works anywhere; swap in a real `PwmSink` to drive hardware.

use std::time::Duration;

use spotter_vision::core_modules::pulse::ServoConfig;
use spotter_vision::core_modules::servo_driver::{PwmSink, ServoDriver};
use spotter_vision::error::ActuationError;
use tracing::info;

/// Prints each PWM command instead of touching hardware.
struct ConsolePwm;

impl PwmSink for ConsolePwm {
    fn set_pwm(
        &mut self,
        pin: u8,
        frequency_hz: f64,
        duty_cycle: f64,
    ) -> Result<(), ActuationError> {
        info!(pin, frequency_hz, duty_cycle, "pwm");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServoConfig {
        debug: true,
        ..ServoConfig::default()
    };
    let min = config.min_angle_deg;
    let max = config.max_angle_deg;
    let hold = Duration::from_secs(2);

    let mut servo = ServoDriver::new(ConsolePwm, config)?;

    info!("center");
    servo.center().await?;
    info!("min {min}°");
    servo.set_angle(min, hold).await?;
    info!("max {max}°");
    servo.set_angle(max, hold).await?;
    info!("back to center");
    servo.center().await?;

    servo.turn_off()?;
    info!("pulses stopped");
    Ok(())
}
