//! Candidate region proposal for timestamp overlays
//!
//! Overlay positions follow a strong prior: bottom-right corner first, the
//! other corners next, then edge bands, and a near-full-frame catch-all
//! last. The table order doubles as the search priority: the resolver
//! accepts the first region that yields a plausible timestamp.

use serde::{Deserialize, Serialize};

/// Rectangle expressed as fractions (0.0-1.0) of the image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Pixel-space rectangle resolved against a concrete image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Resolve to integer pixel bounds, clipped to the image extent.
    ///
    /// Returns `None` when the clipped rectangle is degenerate (zero width
    /// or height), which callers skip silently.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        let x_start = (image_width as f32 * self.x) as u32;
        let y_start = (image_height as f32 * self.y) as u32;
        let x_end = (x_start + (image_width as f32 * self.width) as u32).min(image_width);
        let y_end = (y_start + (image_height as f32 * self.height) as u32).min(image_height);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        Some(PixelRect {
            x: x_start,
            y: y_start,
            width: x_end - x_start,
            height: y_end - y_start,
        })
    }
}

/// Overlay priors, highest first: quadrants, corner strips, center band,
/// horizontal edge bands, vertical edge bands, near-full-frame catch-all.
const TIMESTAMP_REGIONS: [Region; 14] = [
    // Quadrant-sized corner blocks (half width, quarter height)
    Region::new(0.50, 0.75, 0.50, 0.25),
    Region::new(0.00, 0.75, 0.50, 0.25),
    Region::new(0.50, 0.00, 0.50, 0.25),
    Region::new(0.00, 0.00, 0.50, 0.25),
    // Narrow corner strips
    Region::new(0.65, 0.85, 0.35, 0.15),
    Region::new(0.00, 0.85, 0.35, 0.15),
    Region::new(0.65, 0.00, 0.35, 0.15),
    Region::new(0.00, 0.00, 0.35, 0.15),
    // Central band
    Region::new(0.25, 0.25, 0.50, 0.50),
    // Full-width strips along the bottom and top edges
    Region::new(0.10, 0.80, 0.80, 0.20),
    Region::new(0.10, 0.00, 0.80, 0.20),
    // Full-height strips along the left and right edges
    Region::new(0.00, 0.10, 0.20, 0.80),
    Region::new(0.80, 0.10, 0.20, 0.80),
    // Catch-all
    Region::new(0.05, 0.05, 0.90, 0.90),
];

/// The fixed, ordered region table.
pub fn timestamp_regions() -> &'static [Region] {
    &TIMESTAMP_REGIONS
}
