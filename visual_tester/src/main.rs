// Live camera demo: feeds BGR frames from an OpenCV capture into the
// acquisition pipeline, draws the surviving candidates, and aims a
// console-backed servo at the acquired target. All device, window, and
// keyboard plumbing lives here — the library never sees any of it.

use std::fs;
use std::time::Duration;

use opencv::{
    core::{Rect, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use serde::Deserialize;
use spotter_vision::core_modules::frame::{ColorOrder, Frame};
use spotter_vision::core_modules::pulse::ServoConfig;
use spotter_vision::core_modules::servo_driver::{PwmSink, ServoDriver};
use spotter_vision::error::ActuationError;
use spotter_vision::pipeline::{AcquisitionPipeline, DetectorConfig, Report, aim_angle};
use tracing::info;

/// Hold after an aim command, long enough for the horn to settle.
const AIM_HOLD: Duration = Duration::from_millis(300);

/// Tester configuration, loadable from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TesterConfig {
    camera_index: i32,
    detector: DetectorConfig,
    servo: ServoConfig,
}

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

    // Usage: visual_tester [config.json]
    let config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str::<TesterConfig>(&fs::read_to_string(&path)?)?,
        None => TesterConfig::default(),
    };

    let mut cap = VideoCapture::new(config.camera_index, videoio::CAP_ANY)?;
    if !cap.is_opened()? {
        panic!("Error opening camera {}", config.camera_index);
    }

    let mut pipeline = AcquisitionPipeline::new(config.detector)?;
    let mut servo = ServoDriver::new(ConsolePwm, config.servo)?;

    let mut frame = Mat::default();
    loop {
        if !cap.read(&mut frame)? || frame.empty() {
            break;
        }

        let width = frame.cols() as u32;
        let height = frame.rows() as u32;

        // Hand the BGR buffer to the pipeline without copying it.
        let report = {
            let buffer = frame.data_bytes()?;
            let view = Frame::new(buffer, width, height, ColorOrder::Bgr)?;
            pipeline.process_frame(&view)
        };

        for candidate in pipeline.last_candidates() {
            let b = candidate.bounding_box;
            imgproc::rectangle(
                &mut frame,
                Rect::new(b.x as i32, b.y as i32, b.width as i32, b.height as i32),
                Scalar::new(0.0, 255.0, 0.0, 0.0),
                2,
                imgproc::LINE_8,
                0,
            )?;
        }

        if let Report::TargetAcquired(winner) = report {
            let angle = aim_angle(&winner.bounding_box, width, servo.config());
            info!(angle_deg = angle, "aiming at acquired target");
            if let Err(error) = servo.set_angle(angle, AIM_HOLD).await {
                // Transport faults are recoverable; keep showing frames.
                let ActuationError::Transport { pin, message: reason } = error;
                info!(pin, reason, "aim command failed");
            }
        }

        highgui::imshow("spotter", &frame)?;
        if highgui::wait_key(1)? == 'q' as i32 {
            break;
        }
    }

    servo.turn_off()?;
    Ok(())
}
