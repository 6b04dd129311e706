use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Celsius bands for the four ordinal heat zones.
///
/// The `[hot, hot_upper]` band is closed on both ends while the two bands
/// below it are half-open; anything above `hot_upper` is critical. The
/// asymmetry is deliberate policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneThresholds {
    pub warm: f64,
    pub very_warm: f64,
    pub hot: f64,
    pub hot_upper: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        ZoneThresholds {
            warm: 25.0,
            very_warm: 30.0,
            hot: 35.0,
            hot_upper: 38.0,
        }
    }
}

/// Closed Celsius range that land-surface temperatures are clamped to
/// before display and classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl Default for DisplayRange {
    fn default() -> Self {
        DisplayRange {
            min: 10.0,
            max: 50.0,
        }
    }
}

/// Run configuration: every path, field name and threshold the pipeline
/// uses, as named overridable fields. `Default` carries the Porto /
/// Landsat 8 Band 10 setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UhiConfig {
    /// Municipalities vector dataset (GeoJSON or any OGR format).
    pub municipalities_path: PathBuf,
    /// Attribute column holding the administrative region name.
    pub region_field: String,
    /// Region to select, matched exactly.
    pub region_name: String,
    /// Where the filtered boundary is persisted as GeoJSON.
    pub boundary_path: PathBuf,
    /// Single-band thermal raster (digital numbers).
    pub band_path: PathBuf,
    /// MTL metadata text file shipped with the scene.
    pub mtl_path: PathBuf,
    /// Thermal band number, used to build the MTL keyword names.
    pub band: u8,
    /// CRS of the boundary dataset.
    pub boundary_epsg: i32,
    pub display_range: DisplayRange,
    pub thresholds: ZoneThresholds,
    /// Output path for the binary critical-zone GeoTIFF.
    pub mask_path: PathBuf,
    /// Output path for the continuous temperature map PNG.
    pub temperature_png: PathBuf,
    /// Output path for the discrete zone map PNG.
    pub zones_png: PathBuf,
}

impl Default for UhiConfig {
    fn default() -> Self {
        UhiConfig {
            municipalities_path: PathBuf::from("data/raw/concelhos-shapefile/concelhos.shp"),
            region_field: "NAME_2".to_string(),
            region_name: "Porto".to_string(),
            boundary_path: PathBuf::from("data/processed/porto_boundary.geojson"),
            band_path: PathBuf::from("data/raw/LC08_L1TP_204031_20240704_20240712_02_T1_B10.TIF"),
            mtl_path: PathBuf::from("data/raw/LC08_L1TP_204031_20240704_20240712_02_T1_MTL.txt"),
            band: 10,
            boundary_epsg: 4326,
            display_range: DisplayRange::default(),
            thresholds: ZoneThresholds::default(),
            mask_path: PathBuf::from("data/processed/porto_critical_uhi.tif"),
            temperature_png: PathBuf::from("data/processed/porto_lst.png"),
            zones_png: PathBuf::from("data/processed/porto_heat_zones.png"),
        }
    }
}
