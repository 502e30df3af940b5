// THEORY:
// The `frame` module is the boundary between the outside world's pixel
// buffers and the detection pipeline. A `Frame` is a borrowed, read-only
// view over a raw interleaved three-channel buffer plus the metadata the
// pipeline needs to interpret it: width, height, and channel order. Nothing
// is copied; the frame source keeps ownership of its buffer for the
// duration of the call, and a `Frame` never outlives a single processing
// pass.
//
// Key principles:
// 1.  **Validation at the boundary**: `Frame::new` is the only place frame
//     geometry is checked. An empty buffer or a length that disagrees with
//     the stated dimensions is a caller bug and is rejected immediately with
//     a `FrameError`; everything downstream may index freely.
// 2.  **Explicit channel order**: camera stacks disagree about BGR vs RGB,
//     so the source must say which it is. The HSV conversion honors the
//     declared order; the detector never sees raw channels.
// 3.  **OpenCV-scale HSV**: hue is stored in half-degrees (0..180) and
//     saturation/value in 0..255, so color windows tuned against common
//     camera tooling carry over as literal numbers.

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

/// Channel order of an interleaved three-channel pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// A color in HSV space on the 8-bit camera-tooling scale:
/// hue in half-degrees `0..180`, saturation and value in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Converts an 8-bit RGB triple to HSV.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let max = rf.max(gf).max(bf);
        let min = rf.min(gf).min(bf);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

        // Hue as an angle on the color wheel, then halved into 0..180.
        let h_deg = if delta == 0.0 {
            0.0
        } else if max == rf {
            60.0 * (gf - bf) / delta
        } else if max == gf {
            120.0 + 60.0 * (bf - rf) / delta
        } else {
            240.0 + 60.0 * (rf - gf) / delta
        };
        let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

        Self {
            h: ((h_deg / 2.0).round() as u16 % 180) as u8,
            s: s.round() as u8,
            v: v.round() as u8,
        }
    }

    /// Inclusive per-channel containment test against a color window.
    pub fn in_range(&self, lower: Hsv, upper: Hsv) -> bool {
        self.h >= lower.h
            && self.h <= upper.h
            && self.s >= lower.s
            && self.s <= upper.s
            && self.v >= lower.v
            && self.v <= upper.v
    }
}

/// A borrowed, validated view over one frame's pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    order: ColorOrder,
}

impl<'a> Frame<'a> {
    /// Wraps a raw interleaved three-channel buffer.
    ///
    /// Fails with a `FrameError` if the buffer is empty, a dimension is
    /// zero, or the length does not equal `width * height * 3`.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        order: ColorOrder,
    ) -> Result<Self, FrameError> {
        if data.is_empty() {
            return Err(FrameError::EmptyBuffer);
        }
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            order,
        })
    }

    /// Borrows an `image::RgbImage` as a frame.
    pub fn from_rgb_image(image: &'a image::RgbImage) -> Result<Self, FrameError> {
        Self::new(image.as_raw(), image.width(), image.height(), ColorOrder::Rgb)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The HSV value of the pixel at `(x, y)`, honoring the declared
    /// channel order. Coordinates must be inside the frame.
    pub fn hsv_at(&self, x: u32, y: u32) -> Hsv {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        let (c0, c1, c2) = (self.data[i], self.data[i + 1], self.data[i + 2]);
        match self.order {
            ColorOrder::Rgb => Hsv::from_rgb(c0, c1, c2),
            ColorOrder::Bgr => Hsv::from_rgb(c2, c1, c0),
        }
    }
}
