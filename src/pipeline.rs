// THEORY:
// The `pipeline` module is the top-level API for the acquisition side of
// the engine. It chains the segmentation and selection layers over a single
// frame and wraps the result in a `Report` the caller can act on.
//
// Acquisition is single-shot by contract: the first frame with a unique
// winner produces `Report::TargetAcquired` exactly once, and the
// acquisition phase is over — later frames report `Complete` without being
// scanned. Apart from that one latch, the pipeline is memoryless: every
// frame's winner decision is independent, and an ambiguous frame simply
// reports `NoTarget` and lets the next frame decide fresh.
//
// Whether the acquired target re-aims a servo, spawns an external action,
// or both is the caller's choice; the pipeline only emits the event and
// `aim_angle` provides the pure screen-position → angle mapping for
// callers that drive an actuator.

use tracing::{debug, info};

use crate::core_modules::candidate::{BoundingBox, Candidate};
use crate::core_modules::frame::Frame;
use crate::core_modules::pulse::ServoConfig;
use crate::core_modules::target_detector::target_detector;
use crate::core_modules::target_selector;
use crate::error::ConfigError;

// Re-export key data structures for the public API.
pub use crate::core_modules::target_detector::DetectorConfig;

/// The outcome of processing one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// No unique winner this frame; the search continues.
    NoTarget,
    /// A unique winner satisfied the acquisition condition.
    /// Emitted at most once per pipeline.
    TargetAcquired(Candidate),
    /// The trigger has already fired; the acquisition phase is over.
    Complete,
}

/// Per-frame detect → select orchestrator with single-shot trigger
/// semantics.
pub struct AcquisitionPipeline {
    config: DetectorConfig,
    last_candidates: Vec<Candidate>,
    acquired: bool,
}

impl AcquisitionPipeline {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_candidates: Vec::new(),
            acquired: false,
        })
    }

    /// Whether the single-shot trigger has already fired.
    pub fn is_complete(&self) -> bool {
        self.acquired
    }

    /// The candidates found in the most recent frame, for overlays and
    /// diagnostics. Overwritten on every call to `process_frame`.
    pub fn last_candidates(&self) -> &[Candidate] {
        &self.last_candidates
    }

    /// Runs detection and selection over one frame.
    pub fn process_frame(&mut self, frame: &Frame) -> Report {
        if self.acquired {
            self.last_candidates.clear();
            return Report::Complete;
        }

        self.last_candidates = target_detector::find_candidates(frame, &self.config);
        debug!(candidates = self.last_candidates.len(), "frame scanned");

        match target_selector::select(&self.last_candidates) {
            Some(winner) => {
                let winner = *winner;
                self.acquired = true;
                info!(
                    x = winner.bounding_box.x,
                    y = winner.bounding_box.y,
                    area = winner.area,
                    "target acquired"
                );
                Report::TargetAcquired(winner)
            }
            None => Report::NoTarget,
        }
    }
}

/// Maps a winner's horizontal center across the frame width onto the
/// servo's angle range. The left frame edge commands the minimum angle,
/// the right edge the maximum.
pub fn aim_angle(bounding_box: &BoundingBox, frame_width: u32, config: &ServoConfig) -> f64 {
    let ratio = (bounding_box.center_x() / frame_width as f64).clamp(0.0, 1.0);
    config.min_angle_deg + ratio * (config.max_angle_deg - config.min_angle_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::frame::Frame;
    use image::{Rgb, RgbImage};

    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    fn frame_with_squares(squares: &[(u32, u32, u32)]) -> RgbImage {
        let mut image = RgbImage::new(200, 100);
        for &(x, y, side) in squares {
            for py in y..y + side {
                for px in x..x + side {
                    image.put_pixel(px, py, GREEN);
                }
            }
        }
        image
    }

    #[test]
    fn fires_exactly_once() {
        let mut pipeline = AcquisitionPipeline::new(DetectorConfig::default()).unwrap();
        let image = frame_with_squares(&[(50, 40, 20)]);
        let frame = Frame::from_rgb_image(&image).unwrap();

        let report = pipeline.process_frame(&frame);
        let Report::TargetAcquired(winner) = report else {
            panic!("expected an acquisition, got {report:?}");
        };
        assert_eq!(winner.bounding_box.y, 40);
        assert!(pipeline.is_complete());

        // The same frame again: the phase is over.
        assert_eq!(pipeline.process_frame(&frame), Report::Complete);
        assert!(pipeline.last_candidates().is_empty());
    }

    #[test]
    fn ambiguous_frames_keep_searching() {
        let mut pipeline = AcquisitionPipeline::new(DetectorConfig::default()).unwrap();
        // Two squares with the same bottom edge: a tie, no winner.
        let tied = frame_with_squares(&[(20, 40, 20), (120, 40, 20)]);
        let frame = Frame::from_rgb_image(&tied).unwrap();

        assert_eq!(pipeline.process_frame(&frame), Report::NoTarget);
        assert!(!pipeline.is_complete());
        assert_eq!(pipeline.last_candidates().len(), 2);

        // A later unambiguous frame still acquires.
        let clear = frame_with_squares(&[(60, 50, 20)]);
        let frame = Frame::from_rgb_image(&clear).unwrap();
        assert!(matches!(
            pipeline.process_frame(&frame),
            Report::TargetAcquired(_)
        ));
    }

    #[test]
    fn empty_frames_report_no_target() {
        let mut pipeline = AcquisitionPipeline::new(DetectorConfig::default()).unwrap();
        let image = frame_with_squares(&[]);
        let frame = Frame::from_rgb_image(&image).unwrap();
        assert_eq!(pipeline.process_frame(&frame), Report::NoTarget);
    }

    #[test]
    fn bottom_most_square_wins() {
        let mut pipeline = AcquisitionPipeline::new(DetectorConfig::default()).unwrap();
        let image = frame_with_squares(&[(20, 10, 20), (120, 60, 20)]);
        let frame = Frame::from_rgb_image(&image).unwrap();

        let Report::TargetAcquired(winner) = pipeline.process_frame(&frame) else {
            panic!("expected an acquisition");
        };
        assert_eq!(winner.bounding_box.x, 120);
    }

    #[test]
    fn construction_rejects_invalid_detector_config() {
        let config = DetectorConfig {
            aspect_ratio_range: (2.0, 1.0),
            ..DetectorConfig::default()
        };
        assert!(AcquisitionPipeline::new(config).is_err());
    }

    #[test]
    fn aim_angle_maps_the_frame_span_onto_the_angle_range() {
        let servo = ServoConfig::default();
        let at = |x: u32, width: u32| BoundingBox {
            x,
            y: 0,
            width,
            height: 10,
        };

        // Center of a 640-wide frame → center of the range.
        assert_eq!(aim_angle(&at(310, 20), 640, &servo), 90.0);
        // Box hugging the left edge → near the minimum angle.
        assert_eq!(aim_angle(&at(0, 20), 640, &servo), 2.8125);
        // Box center at 1/4 width → 45°.
        assert_eq!(aim_angle(&at(150, 20), 640, &servo), 45.0);
    }
}
