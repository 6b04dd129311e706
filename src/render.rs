//! PNG rendering of the temperature and zone grids.
//!
//! The continuous map uses a warm color ramp over the display range; the
//! zone map uses the fixed four-color palette with black boundary pixels
//! where the zone changes. Masked cells are transparent in both.

use std::path::Path;

use image::{Rgba, RgbaImage};
use log::info;
use ndarray::Array2;

use crate::config::DisplayRange;
use crate::error::Result;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const CONTOUR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Zone palette, indexed by zone code 1..=4.
const ZONE_COLORS: [Rgba<u8>; 4] = [
    Rgba([0, 0, 255, 255]),   // Warm
    Rgba([255, 255, 0, 255]), // Very Warm
    Rgba([255, 165, 0, 255]), // Hot
    Rgba([255, 0, 0, 255]),   // Critical
];

/// Color ramp stops for the continuous map, from the cold end of the
/// display range to the hot end.
const RAMP: [(f64, [u8; 3]); 4] = [
    (0.0, [13, 8, 135]),
    (0.4, [156, 23, 158]),
    (0.75, [237, 121, 83]),
    (1.0, [252, 253, 191]),
];

/// Render the Celsius grid as a heatmap scaled to the display range.
pub fn render_temperature(celsius: &Array2<f64>, range: &DisplayRange) -> RgbaImage {
    let (height, width) = celsius.dim();
    let mut img = RgbaImage::new(width as u32, height as u32);
    for ((row, col), &t) in celsius.indexed_iter() {
        let pixel = if t.is_nan() {
            TRANSPARENT
        } else {
            let norm = ((t - range.min) / (range.max - range.min)).clamp(0.0, 1.0);
            ramp_color(norm)
        };
        img.put_pixel(col as u32, row as u32, pixel);
    }
    img
}

/// Render the zone grid with the discrete palette and boundary contours.
///
/// A pixel is painted black when the zone code changes towards its right
/// or lower neighbor, tracing the zone boundaries as thin lines.
pub fn render_zones(zones: &Array2<u8>) -> RgbaImage {
    let (height, width) = zones.dim();
    let mut img = RgbaImage::new(width as u32, height as u32);
    for ((row, col), &z) in zones.indexed_iter() {
        let pixel = match z {
            1..=4 if on_zone_boundary(zones, row, col) => CONTOUR,
            1..=4 => ZONE_COLORS[(z - 1) as usize],
            _ => TRANSPARENT,
        };
        img.put_pixel(col as u32, row as u32, pixel);
    }
    img
}

pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path)?;
    info!("Rendered {:?}", path);
    Ok(())
}

fn on_zone_boundary(zones: &Array2<u8>, row: usize, col: usize) -> bool {
    let (height, width) = zones.dim();
    let z = zones[[row, col]];
    (col + 1 < width && zones[[row, col + 1]] != z)
        || (row + 1 < height && zones[[row + 1, col]] != z)
}

fn ramp_color(norm: f64) -> Rgba<u8> {
    let mut lower = RAMP[0];
    for &stop in RAMP.iter().skip(1) {
        if norm <= stop.0 {
            let span = stop.0 - lower.0;
            let t = if span > 0.0 { (norm - lower.0) / span } else { 0.0 };
            return interpolate(lower.1, stop.1, t);
        }
        lower = stop;
    }
    Rgba([RAMP[3].1[0], RAMP[3].1[1], RAMP[3].1[2], 255])
}

fn interpolate(a: [u8; 3], b: [u8; 3], t: f64) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f64::from(x) * (1.0 - t) + f64::from(y) * t).round() as u8;
    Rgba([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255])
}
