//! GeoTIFF export of the binary critical-zone mask.

use std::path::Path;

use gdal::raster::Buffer;
use gdal::DriverManager;
use log::info;
use ndarray::Array2;

use crate::error::{Result, UhiError};

/// Write the critical mask as a single-band 8-bit GeoTIFF.
///
/// The geotransform and projection are set verbatim from the clipped
/// raster so the mask stays aligned with the source imagery. The output
/// directory must already exist; a missing directory fails the write and
/// the error propagates.
pub fn write_critical_mask(
    path: &Path,
    mask: &Array2<u8>,
    geotransform: &[f64; 6],
    projection: &str,
) -> Result<()> {
    let (height, width) = mask.dim();
    if width == 0 || height == 0 {
        return Err(UhiError::InvalidDimensions(width, height));
    }

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dataset = driver.create_with_band_type::<u8, _>(path, width, height, 1)?;
    dataset.set_geo_transform(geotransform)?;
    dataset.set_projection(projection)?;

    let values: Vec<u8> = mask.iter().copied().collect();
    let mut buffer = Buffer::new((width, height), values);
    let mut band = dataset.rasterband(1)?;
    band.write((0, 0), (width, height), &mut buffer)?;

    info!("Critical UHI mask saved to {:?}", path);
    Ok(())
}
