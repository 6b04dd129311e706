use anyhow::{Context, Result};
use env_logger::Env;
use log::info;

use rsuhi::{boundary::Boundary, export, mtl::MtlMetadata, raster, render, thermal, zones, UhiConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cfg = UhiConfig::default();
    info!("=== Urban heat zone mapping: {} ===", cfg.region_name);

    // 1. Boundary: filter the municipalities dataset to the region
    let boundary = Boundary::new(
        &cfg.municipalities_path,
        &cfg.region_field,
        &cfg.region_name,
        &cfg.boundary_path,
    )
    .run()
    .context("boundary preparation failed")?;
    let geometry = boundary
        .geometry()
        .context("boundary geometry missing after preparation")?;

    // 2. Clip the thermal band to the boundary
    let clipped = raster::clip_to_boundary(&cfg.band_path, geometry, cfg.boundary_epsg)
        .context("raster clipping failed")?;

    // 3. Calibration constants from the MTL file
    let mtl = MtlMetadata::from_path(&cfg.mtl_path)
        .with_context(|| format!("failed to read MTL file {:?}", cfg.mtl_path))?;
    let constants = mtl.calibration(cfg.band)?;

    // 4. Digital numbers to clamped Celsius
    let celsius = thermal::land_surface_temperature(&clipped.data, &constants, &cfg.display_range);
    let heatmap = render::render_temperature(&celsius, &cfg.display_range);
    render::save_png(&heatmap, &cfg.temperature_png)?;

    // 5. Heat zones, zone map and critical mask export
    let zone_grid = zones::classify_grid(&celsius, &cfg.thresholds);
    for line in zones::legend(&cfg.thresholds) {
        info!("{}", line);
    }
    let zone_map = render::render_zones(&zone_grid);
    render::save_png(&zone_map, &cfg.zones_png)?;

    let mask = zones::critical_mask(&zone_grid);
    export::write_critical_mask(
        &cfg.mask_path,
        &mask,
        &clipped.geotransform,
        &clipped.projection,
    )
    .context("critical mask export failed")?;

    Ok(())
}
