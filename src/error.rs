use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UhiError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to create CRS transformation: {0}")]
    ProjCreate(#[from] proj::ProjCreateError),

    #[error("CRS transformation failed: {0}")]
    Proj(#[from] proj::ProjError),

    #[error("Missing calibration constant '{key}' in metadata file")]
    MissingConstant { key: String },

    #[error("No feature with {field} = '{name}' in {path:?}")]
    RegionNotFound {
        field: String,
        name: String,
        path: PathBuf,
    },

    #[error("Boundary does not intersect the raster")]
    EmptyClip,

    #[error("Rotated rasters are not supported (geotransform has shear terms)")]
    RotatedRaster,

    #[error("Raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Raster has no EPSG authority code in its CRS")]
    MissingEpsg,

    #[error("Unsupported boundary dataset: {0}")]
    UnsupportedDataset(String),
}

pub type Result<T> = std::result::Result<T, UhiError>;
