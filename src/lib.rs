pub mod boundary;
pub mod config;
pub mod error;
pub mod export;
pub mod geo_core;
pub mod mtl;
pub mod raster;
pub mod render;
pub mod thermal;
pub mod zones;

// Re-export commonly used types
pub use boundary::Boundary;
pub use config::{DisplayRange, UhiConfig, ZoneThresholds};
pub use error::{Result, UhiError};
pub use mtl::MtlMetadata;
pub use raster::ClippedRaster;
pub use thermal::CalibrationConstants;
pub use zones::HeatZone;
