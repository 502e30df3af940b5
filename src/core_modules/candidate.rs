// THEORY:
// The `candidate` module holds the frame-scoped value types produced by the
// detection layer. Like every data container in this crate, a `Candidate` is
// "dumb": it is produced fresh each frame, never mutated, carries no
// cross-frame identity, and is discarded when the frame is done. Anything
// that compares candidates to each other (the winner rule) or to past frames
// (a non-goal here) belongs in higher layers.

use serde::{Deserialize, Serialize};

/// Smallest axis-aligned rectangle enclosing a detected region, in pixel
/// coordinates with the origin at the top-left of the frame.
/// Width and height are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// The y coordinate of the box's bottom edge, `y + height`.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// The horizontal center of the box in pixel coordinates.
    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }
}

/// A single detection for the current frame: a bounding box plus the area
/// (in pixels²) enclosed by the source region's outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub bounding_box: BoundingBox,
    pub area: f64,
}
