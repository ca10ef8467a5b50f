//! ROI normalization ahead of character recognition
//!
//! The pipeline follows a fixed-parameter recipe: grayscale, CLAHE local
//! contrast enhancement, 3x3 Gaussian smoothing, inverse adaptive mean
//! thresholding, skew correction from the minimum-area rectangle of the
//! foreground, and a 1x1 morphological open kept as a tuning point.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::filter3x3;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::morphology::{dilate, erode};
use tracing::trace;

/// CLAHE clip limit (multiple of the uniform histogram level)
pub const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// CLAHE tile grid, `N x N`
pub const CLAHE_TILE_GRID: u32 = 8;

/// Adaptive threshold neighborhood, `N x N` pixels
pub const THRESHOLD_BLOCK: u32 = 15;

/// Adaptive threshold offset below the local mean
pub const THRESHOLD_OFFSET: i32 = 5;

/// 3x3 Gaussian kernel (the OpenCV `(3, 3)` / sigma-0 kernel)
const GAUSSIAN_3X3: [f32; 9] = [
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    4.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
];

/// Normalize one region for OCR.
///
/// The output is a single-channel binarized, deskewed buffer with the same
/// spatial extent as the input; text is foreground (255) on background (0).
pub fn normalize_for_ocr(roi: &RgbImage) -> GrayImage {
    let gray = image::imageops::grayscale(roi);
    let enhanced = clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID);
    let blurred: GrayImage = filter3x3(&enhanced, &GAUSSIAN_3X3);
    let binarized = adaptive_threshold_inv(&blurred, THRESHOLD_BLOCK, THRESHOLD_OFFSET);
    let deskewed = deskew(&binarized);
    // 1x1 structuring elements are an identity pass; the radius is the knob
    // to turn if speckle survives thresholding on a new camera overlay style.
    erode(&dilate(&deskewed, Norm::LInf, 0), Norm::LInf, 0)
}

/// Contrast-limited adaptive histogram equalization.
///
/// Per-tile 256-bin histograms are clipped at `clip_limit` times the uniform
/// level, the excess is redistributed evenly, and each output pixel blends
/// the CDF lookup tables of its four surrounding tiles bilinearly.
pub fn clahe(image: &GrayImage, clip_limit: f32, grid: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    // Never more tiles than pixels along an axis; recomputing the counts
    // from the tile size keeps every tile non-empty on small inputs
    let tile_w = width.div_ceil(grid.clamp(1, width));
    let tile_h = height.div_ceil(grid.clamp(1, height));
    let grid_x = width.div_ceil(tile_w);
    let grid_y = height.div_ceil(tile_h);

    // One LUT per tile
    let mut luts = vec![[0u8; 256]; (grid_x * grid_y) as usize];
    for ty in 0..grid_y {
        for tx in 0..grid_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x, y).0[0] as usize] += 1;
                }
            }
            let total = (x1 - x0) * (y1 - y0);

            // Clip and redistribute
            let clip_at = ((clip_limit * total as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > clip_at {
                    excess += *bin - clip_at;
                    *bin = clip_at;
                }
            }
            let bonus = excess / 256;
            for bin in hist.iter_mut() {
                *bin += bonus;
            }

            let lut = &mut luts[(ty * grid_x + tx) as usize];
            let scale = 255.0 / total as f32;
            let mut cumulative = 0u32;
            for (value, bin) in hist.iter().enumerate() {
                cumulative += bin;
                lut[value] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let lut_at = |tx: u32, ty: u32, value: u8| -> f32 {
        luts[(ty * grid_x + tx) as usize][value as usize] as f32
    };

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        // Position in tile space, offset so tile centers are the knots;
        // beyond the outermost centers both neighbors clamp to the same tile
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let ty = fy.floor();
        let wy = fy - ty;
        let ty0 = (ty.max(0.0) as u32).min(grid_y - 1);
        let ty1 = ((ty + 1.0).max(0.0) as u32).min(grid_y - 1);

        for x in 0..width {
            let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let tx = fx.floor();
            let wx = fx - tx;
            let tx0 = (tx.max(0.0) as u32).min(grid_x - 1);
            let tx1 = ((tx + 1.0).max(0.0) as u32).min(grid_x - 1);

            let value = image.get_pixel(x, y).0[0];
            let top = lut_at(tx0, ty0, value) * (1.0 - wx) + lut_at(tx1, ty0, value) * wx;
            let bottom = lut_at(tx0, ty1, value) * (1.0 - wx) + lut_at(tx1, ty1, value) * wx;
            let blended = top * (1.0 - wy) + bottom * wy;
            out.put_pixel(x, y, Luma([blended.round().clamp(0.0, 255.0) as u8]));
        }
    }

    out
}

/// Inverse adaptive threshold against the local mean.
///
/// A pixel becomes foreground (255) when it is at least `offset` below the
/// mean of its `block x block` neighborhood (clamped at image borders), so
/// dark text on any background polarity ends up as foreground.
pub fn adaptive_threshold_inv(image: &GrayImage, block: u32, offset: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return image.clone();
    }

    // Summed-area table with a zero top/left border
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    let raw = image.as_raw();
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += u64::from(raw[y * w + x]);
            integral[(y + 1) * stride + (x + 1)] = integral[y * stride + (x + 1)] + row_sum;
        }
    }

    let radius = (block / 2) as i64;
    let mut out = GrayImage::new(width, height);
    for y in 0..h as i64 {
        let y0 = (y - radius).max(0) as usize;
        let y1 = (y + radius).min(h as i64 - 1) as usize + 1;
        for x in 0..w as i64 {
            let x0 = (x - radius).max(0) as usize;
            let x1 = (x + radius).min(w as i64 - 1) as usize + 1;

            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            let mean = (sum / count) as i32;

            let px = i32::from(raw[y as usize * w + x as usize]);
            let v = if px <= mean - offset { 255 } else { 0 };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }

    out
}

/// Correct small rotational skew of a binarized buffer.
///
/// The rotation angle comes from the minimum-area bounding rectangle of all
/// foreground pixels; an empty foreground skips the step entirely.
pub fn deskew(binary: &GrayImage) -> GrayImage {
    let points = foreground_points(binary);
    if points.is_empty() {
        return binary.clone();
    }

    let angle = skew_angle(&points);
    if angle == 0.0 {
        return binary.clone();
    }

    trace!("deskewing by {angle:.2} degrees");
    // Positive correction is counter-clockwise; background stays black,
    // which matches the inverse-threshold polarity.
    rotate_about_center(
        binary,
        -angle.to_radians(),
        Interpolation::Bicubic,
        Luma([0u8]),
    )
}

/// Coordinates of every foreground (non-zero) pixel
fn foreground_points(binary: &GrayImage) -> Vec<(f32, f32)> {
    let (width, height) = binary.dimensions();
    let raw = binary.as_raw();
    let mut points = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if raw[(y * width + x) as usize] > 0 {
                points.push((x as f32, y as f32));
            }
        }
    }
    points
}

/// Skew angle in degrees of the minimum-area rectangle enclosing `points`.
///
/// The raw edge orientation is first reduced to the `[-90, 0)` range, then
/// normalized with the usual deskew rule: angles below -45 are subtracted
/// from -90, anything else is negated. Axis-aligned content yields 0.
pub fn skew_angle(points: &[(f32, f32)]) -> f32 {
    let Some(edge_angle) = min_area_rect_angle(points) else {
        return 0.0;
    };

    let angle = edge_angle.rem_euclid(90.0) - 90.0;
    if angle < -45.0 {
        -(90.0 + angle)
    } else {
        -angle
    }
}

/// Orientation in degrees of the base edge of the minimum-area enclosing
/// rectangle (rotating calipers over the convex hull).
///
/// Returns `None` for fewer than two distinct points.
fn min_area_rect_angle(points: &[(f32, f32)]) -> Option<f32> {
    let hull = convex_hull(points);
    match hull.len() {
        0 | 1 => None,
        2 => {
            let (dx, dy) = (hull[1].0 - hull[0].0, hull[1].1 - hull[0].1);
            Some(dy.atan2(dx).to_degrees())
        }
        n => {
            let mut best_area = f32::MAX;
            let mut best_angle = 0.0f32;

            for i in 0..n {
                let p1 = hull[i];
                let p2 = hull[(i + 1) % n];
                let (ex, ey) = (p2.0 - p1.0, p2.1 - p1.1);
                let len = ex.hypot(ey);
                if len < 1e-6 {
                    continue;
                }
                let (ux, uy) = (ex / len, ey / len);

                // Extent of the hull along the edge and its normal
                let (mut min_u, mut max_u) = (f32::MAX, f32::MIN);
                let (mut min_v, mut max_v) = (f32::MAX, f32::MIN);
                for p in &hull {
                    let (dx, dy) = (p.0 - p1.0, p.1 - p1.1);
                    let u = dx * ux + dy * uy;
                    let v = dy * ux - dx * uy;
                    min_u = min_u.min(u);
                    max_u = max_u.max(u);
                    min_v = min_v.min(v);
                    max_v = max_v.max(v);
                }

                let area = (max_u - min_u) * (max_v - min_v);
                if area < best_area {
                    best_area = area;
                    best_angle = uy.atan2(ux).to_degrees();
                }
            }

            Some(best_angle)
        }
    }
}

/// Convex hull via Andrew's monotone chain
fn convex_hull(points: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut pts: Vec<(f32, f32)> = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let cross = |o: (f32, f32), a: (f32, f32), b: (f32, f32)| -> f32 {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut lower: Vec<(f32, f32)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f32, f32)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
