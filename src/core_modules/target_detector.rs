// THEORY:
// The `target_detector` is the engine of the segmentation layer. For each
// frame it answers one question: which regions of the image look like the
// configured target color and shape?
//
// Algorithm steps:
// 1.  **Mask Generation**: every pixel is converted to HSV and tested
//     against the configured color window (inclusive per channel),
//     producing a binary mask.
// 2.  **Region Extraction (Seeding + Growing)**: the mask is scanned in
//     row-major order; each unclaimed mask pixel seeds a new region, which
//     is grown with a 4-neighbor flood until its outer boundary is found.
//     Regions are therefore reported in discovery order.
// 3.  **Area Measurement**: a region's area is the area enclosed by its
//     outer boundary — interior holes are ignored, exactly as an external
//     contour ignores them. It is computed as the region's bounding-box
//     area minus the background reachable from the box border.
// 4.  **Gating**: a region survives only if its enclosed area strictly
//     exceeds `min_area` and its bounding-box aspect ratio falls strictly
//     inside the configured window.
// 5.  **Stateless Utility**: `find_candidates` takes one frame and produces
//     that frame's candidates. It has no memory of previous frames and can
//     be restarted on every frame.

use serde::{Deserialize, Serialize};

use crate::core_modules::candidate::{BoundingBox, Candidate};
use crate::core_modules::frame::Hsv;
use crate::error::ConfigError;

/// Color and shape gates for the detection layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Lower inclusive corner of the HSV color window.
    pub lower: Hsv,
    /// Upper inclusive corner of the HSV color window.
    pub upper: Hsv,
    /// A region is kept only if its enclosed area strictly exceeds this
    /// many pixels².
    pub min_area: f64,
    /// A region is kept only if its bounding-box width/height falls
    /// strictly inside `(lo, hi)`. The default window keeps roughly square
    /// regions, which suits tag- and marker-shaped targets.
    pub aspect_ratio_range: (f64, f64),
}

impl Default for DetectorConfig {
    /// The green-tag profile the system was originally tuned with.
    fn default() -> Self {
        Self {
            lower: Hsv::new(35, 80, 40),
            upper: Hsv::new(85, 255, 255),
            min_area: 50.0,
            aspect_ratio_range: (0.8, 1.25),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.aspect_ratio_range;
        if !(lo > 0.0 && lo < hi) {
            return Err(ConfigError::InvalidAspectWindow { lo, hi });
        }
        Ok(())
    }
}

pub mod target_detector {
    use super::*;
    use crate::core_modules::frame::Frame;

    /// Pixel bounds of a grown region.
    struct RegionBounds {
        min_x: usize,
        min_y: usize,
        max_x: usize,
        max_y: usize,
    }

    /// The main function of the segmentation layer.
    /// Scans one frame and returns every candidate that passes the color,
    /// area, and aspect-ratio gates, in discovery order.
    pub fn find_candidates(frame: &Frame, config: &DetectorConfig) -> Vec<Candidate> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        // --- 1. Mask Generation ---
        let mut mask = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                mask[y * width + x] = frame
                    .hsv_at(x as u32, y as u32)
                    .in_range(config.lower, config.upper);
            }
        }

        // --- 2. Region Extraction & Gating ---
        // `labels` doubles as the visited map: 0 means unclaimed, any other
        // value names the region that owns the pixel.
        let mut labels = vec![0u32; width * height];
        let mut next_label = 1u32;
        let mut candidates = Vec::new();

        for seed in 0..mask.len() {
            if !mask[seed] || labels[seed] != 0 {
                continue;
            }
            let label = next_label;
            next_label += 1;

            let bounds = grow_region(seed, &mask, &mut labels, label, width, height);
            let bounding_box = BoundingBox {
                x: bounds.min_x as u32,
                y: bounds.min_y as u32,
                width: (bounds.max_x - bounds.min_x + 1) as u32,
                height: (bounds.max_y - bounds.min_y + 1) as u32,
            };
            let area = enclosed_area(&bounds, &labels, label, width);

            let aspect = bounding_box.aspect_ratio();
            let (lo, hi) = config.aspect_ratio_range;
            if area > config.min_area && aspect > lo && aspect < hi {
                candidates.push(Candidate { bounding_box, area });
            }
        }

        candidates
    }

    /// Claims every mask pixel 4-connected to `seed` for `label` and
    /// returns the region's pixel bounds.
    fn grow_region(
        seed: usize,
        mask: &[bool],
        labels: &mut [u32],
        label: u32,
        width: usize,
        height: usize,
    ) -> RegionBounds {
        let mut bounds = RegionBounds {
            min_x: seed % width,
            min_y: seed / width,
            max_x: seed % width,
            max_y: seed / width,
        };
        let mut stack = vec![seed];
        labels[seed] = label;

        while let Some(current) = stack.pop() {
            let x = current % width;
            let y = current / width;
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);

            for (dx, dy) in &[(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || nx >= width as i64 || ny < 0 || ny >= height as i64 {
                    continue;
                }
                let neighbor = ny as usize * width + nx as usize;
                if mask[neighbor] && labels[neighbor] == 0 {
                    labels[neighbor] = label;
                    stack.push(neighbor);
                }
            }
        }

        bounds
    }

    /// The area enclosed by a region's outer boundary, holes included.
    ///
    /// Floods the non-region cells reachable from the bounding-box border;
    /// whatever the flood cannot reach lies inside the outer boundary.
    fn enclosed_area(bounds: &RegionBounds, labels: &[u32], label: u32, width: usize) -> f64 {
        let box_w = bounds.max_x - bounds.min_x + 1;
        let box_h = bounds.max_y - bounds.min_y + 1;

        let mut outside = vec![false; box_w * box_h];
        let mut outside_count = 0usize;
        let mut stack = Vec::new();

        let is_region = |lx: usize, ly: usize| {
            labels[(bounds.min_y + ly) * width + (bounds.min_x + lx)] == label
        };

        // Seed from every border cell the region does not occupy.
        for ly in 0..box_h {
            for lx in 0..box_w {
                let on_border = lx == 0 || ly == 0 || lx == box_w - 1 || ly == box_h - 1;
                if on_border && !is_region(lx, ly) && !outside[ly * box_w + lx] {
                    outside[ly * box_w + lx] = true;
                    outside_count += 1;
                    stack.push((lx, ly));
                }
            }
        }

        while let Some((lx, ly)) = stack.pop() {
            for (dx, dy) in &[(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
                let nx = lx as i64 + dx;
                let ny = ly as i64 + dy;
                if nx < 0 || nx >= box_w as i64 || ny < 0 || ny >= box_h as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !outside[ny * box_w + nx] && !is_region(nx, ny) {
                    outside[ny * box_w + nx] = true;
                    outside_count += 1;
                    stack.push((nx, ny));
                }
            }
        }

        (box_w * box_h - outside_count) as f64
    }
}
