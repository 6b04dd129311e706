//! Raster clipping: cut a single-band raster down to a boundary polygon.

use std::path::Path;

use gdal::Dataset;
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use log::{debug, info};
use ndarray::Array2;

use crate::error::{Result, UhiError};
use crate::geo_core;

/// A raster window clipped to a boundary.
///
/// Cells outside the boundary (and nodata cells) are NaN. The transform
/// and projection describe the window and are carried verbatim to any
/// raster derived from it, so derived rasters stay geographically aligned
/// with the source imagery.
pub struct ClippedRaster {
    /// Pixel values, row-major, NaN where masked.
    pub data: Array2<f64>,
    /// GDAL-style affine transform of the window.
    pub geotransform: [f64; 6],
    /// Projection of the source raster, as WKT.
    pub projection: String,
}

/// Clip band 1 of `raster_path` to `boundary`.
///
/// The boundary is reprojected from `boundary_epsg` into the raster's CRS
/// before any spatial test, so a CRS mismatch cannot occur. A cell is kept
/// when its center lies inside the boundary.
pub fn clip_to_boundary(
    raster_path: &Path,
    boundary: &MultiPolygon<f64>,
    boundary_epsg: i32,
) -> Result<ClippedRaster> {
    info!("Opening raster {:?}", raster_path);
    let dataset = Dataset::open(raster_path)?;

    let geotransform = dataset.geo_transform()?;
    if geotransform[2] != 0.0 || geotransform[4] != 0.0 {
        return Err(UhiError::RotatedRaster);
    }

    let raster_epsg = dataset
        .spatial_ref()?
        .auth_code()
        .map_err(|_| UhiError::MissingEpsg)?;
    let boundary = geo_core::reproject_multi_polygon(boundary_epsg, raster_epsg, boundary)?;

    let band = dataset.rasterband(1)?;
    let (width, height) = (band.x_size(), band.y_size());
    if width == 0 || height == 0 {
        return Err(UhiError::InvalidDimensions(width, height));
    }
    let nodata = band.no_data_value();

    let window = pixel_window(&geotransform, &boundary, width, height)?;
    debug!(
        "Clip window: cols {}..{}, rows {}..{}",
        window.col_min, window.col_max, window.row_min, window.row_max
    );

    let win_width = window.col_max - window.col_min;
    let win_height = window.row_max - window.row_min;
    let buffer = band.read_as::<f64>(
        (window.col_min as isize, window.row_min as isize),
        (win_width, win_height),
        (win_width, win_height),
        None,
    )?;
    let values: Vec<f64> = buffer.into_iter().collect();
    let mut data = Array2::from_shape_vec((win_height, win_width), values)?;

    // transform of the window, shifted by the window origin
    let geotransform = [
        geotransform[0] + window.col_min as f64 * geotransform[1],
        geotransform[1],
        0.0,
        geotransform[3] + window.row_min as f64 * geotransform[5],
        0.0,
        geotransform[5],
    ];

    let mut inside = 0usize;
    for ((row, col), value) in data.indexed_iter_mut() {
        if let Some(nd) = nodata {
            if *value == nd {
                *value = f64::NAN;
                continue;
            }
        }
        let x = geotransform[0] + (col as f64 + 0.5) * geotransform[1];
        let y = geotransform[3] + (row as f64 + 0.5) * geotransform[5];
        if boundary.contains(&Point::new(x, y)) {
            inside += 1;
        } else {
            *value = f64::NAN;
        }
    }
    if inside == 0 {
        return Err(UhiError::EmptyClip);
    }
    info!(
        "Clipped to {}x{} window, {} cell(s) inside the boundary",
        win_width, win_height, inside
    );

    Ok(ClippedRaster {
        data,
        geotransform,
        projection: dataset.projection(),
    })
}

struct PixelWindow {
    col_min: usize,
    col_max: usize,
    row_min: usize,
    row_max: usize,
}

/// Pixel window covering the boundary's bounding rect, clamped to the
/// raster extent.
fn pixel_window(
    geotransform: &[f64; 6],
    boundary: &MultiPolygon<f64>,
    width: usize,
    height: usize,
) -> Result<PixelWindow> {
    let rect = boundary.bounding_rect().ok_or(UhiError::EmptyClip)?;

    // pixel width is positive, pixel height negative for north-up rasters
    let col_of = |x: f64| (x - geotransform[0]) / geotransform[1];
    let row_of = |y: f64| (y - geotransform[3]) / geotransform[5];

    let (col_a, col_b) = (col_of(rect.min().x), col_of(rect.max().x));
    let (row_a, row_b) = (row_of(rect.min().y), row_of(rect.max().y));

    let col_min = col_a.min(col_b).floor().max(0.0) as usize;
    let col_max = (col_a.max(col_b).ceil() as usize).min(width);
    let row_min = row_a.min(row_b).floor().max(0.0) as usize;
    let row_max = (row_a.max(row_b).ceil() as usize).min(height);

    if col_min >= col_max || row_min >= row_max {
        return Err(UhiError::EmptyClip);
    }

    Ok(PixelWindow {
        col_min,
        col_max,
        row_min,
        row_max,
    })
}
