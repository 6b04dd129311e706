//! End-to-end tests over real GDAL datasets in a temp directory.

use std::path::Path;

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{
    FieldValue, Geometry, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType,
};
use gdal::{Dataset, DriverManager};
use geo::{polygon, BoundingRect, MultiPolygon};
use geojson::GeoJson;
use tempfile::TempDir;

use rsuhi::config::{DisplayRange, ZoneThresholds};
use rsuhi::thermal::CalibrationConstants;
use rsuhi::{export, raster, thermal, zones, Boundary, UhiError};

const EPSG: i32 = 32629;
const GEOTRANSFORM: [f64; 6] = [500_000.0, 30.0, 0.0, 4_600_000.0, 0.0, -30.0];

/// Write a 20x20 Float64 GeoTIFF with cell value `row * 100 + col`.
fn write_test_band(path: &Path, nodata: Option<f64>) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = driver
        .create_with_band_type::<f64, _>(path, 20, 20, 1)
        .unwrap();
    dataset.set_geo_transform(&GEOTRANSFORM).unwrap();
    let srs = SpatialRef::from_epsg(EPSG as u32).unwrap();
    dataset.set_projection(&srs.to_wkt().unwrap()).unwrap();

    let mut values = Vec::with_capacity(400);
    for row in 0..20 {
        for col in 0..20 {
            values.push((row * 100 + col) as f64);
        }
    }
    if let Some(nd) = nodata {
        // one nodata cell inside the clip window, at row 6 / col 7
        values[6 * 20 + 7] = nd;
    }
    let mut buffer = Buffer::new((20, 20), values);
    let mut band = dataset.rasterband(1).unwrap();
    band.write((0, 0), (20, 20), &mut buffer).unwrap();
    if let Some(nd) = nodata {
        band.set_no_data_value(Some(nd)).unwrap();
    }
}

/// Square boundary covering pixel columns 5..15 and rows 5..15, in the
/// raster CRS.
fn clip_boundary() -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: 500_150.0, y: 4_599_550.0),
        (x: 500_450.0, y: 4_599_550.0),
        (x: 500_450.0, y: 4_599_850.0),
        (x: 500_150.0, y: 4_599_850.0),
        (x: 500_150.0, y: 4_599_550.0),
    ]])
}

/// Write a three-municipality shapefile with NAME_1 (district) and
/// NAME_2 (municipality) columns, one square polygon per row.
fn write_municipalities_shapefile(path: &Path) {
    let driver = DriverManager::get_driver_by_name("ESRI Shapefile").unwrap();
    let mut dataset = driver.create_vector_only(path).unwrap();
    let srs = SpatialRef::from_epsg(4326).unwrap();
    let mut layer = dataset
        .create_layer(LayerOptions {
            name: "concelhos",
            srs: Some(&srs),
            ty: OGRwkbGeometryType::wkbPolygon,
            ..Default::default()
        })
        .unwrap();
    layer
        .create_defn_fields(&[
            ("NAME_1", OGRFieldType::OFTString),
            ("NAME_2", OGRFieldType::OFTString),
        ])
        .unwrap();

    let rows = [
        (
            "Norte",
            "Porto",
            "POLYGON ((-8.70 41.10, -8.55 41.10, -8.55 41.20, -8.70 41.20, -8.70 41.10))",
        ),
        (
            "Lisboa",
            "Lisboa",
            "POLYGON ((-9.25 38.68, -9.05 38.68, -9.05 38.82, -9.25 38.82, -9.25 38.68))",
        ),
        (
            "Norte",
            "Braga",
            "POLYGON ((-8.50 41.50, -8.35 41.50, -8.35 41.60, -8.50 41.60, -8.50 41.50))",
        ),
    ];
    for (district, municipality, wkt) in rows {
        layer
            .create_feature_fields(
                Geometry::from_wkt(wkt).unwrap(),
                &["NAME_1", "NAME_2"],
                &[
                    FieldValue::StringValue(district.to_string()),
                    FieldValue::StringValue(municipality.to_string()),
                ],
            )
            .unwrap();
    }
}

#[test]
fn shapefile_boundary_selects_one_municipality() {
    let dir = TempDir::new().unwrap();
    let shp_path = dir.path().join("concelhos.shp");
    write_municipalities_shapefile(&shp_path);

    let out_path = dir.path().join("out/porto.geojson");
    let boundary = Boundary::new(&shp_path, "NAME_2", "Porto", &out_path)
        .run()
        .unwrap();

    let geometry = boundary.geometry().unwrap();
    assert_eq!(geometry.0.len(), 1);
    let rect = geometry.bounding_rect().unwrap();
    assert_eq!(rect.min().x, -8.70);
    assert_eq!(rect.max().y, 41.20);
    assert!(out_path.is_file());
}

#[test]
fn shapefile_boundary_keeps_the_full_attribute_row() {
    let dir = TempDir::new().unwrap();
    let shp_path = dir.path().join("concelhos.shp");
    write_municipalities_shapefile(&shp_path);

    let out_path = dir.path().join("porto.geojson");
    Boundary::new(&shp_path, "NAME_2", "Porto", &out_path)
        .run()
        .unwrap();

    let text = std::fs::read_to_string(&out_path).unwrap();
    let collection = match text.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc,
        other => panic!("expected a feature collection, got {:?}", other),
    };
    assert_eq!(collection.features.len(), 1);
    let properties = collection.features[0].properties.as_ref().unwrap();
    assert_eq!(properties["NAME_2"], "Porto");
    // columns beyond the filter column survive the round trip
    assert_eq!(properties["NAME_1"], "Norte");
}

#[test]
fn shapefile_boundary_unknown_municipality_is_an_error() {
    let dir = TempDir::new().unwrap();
    let shp_path = dir.path().join("concelhos.shp");
    write_municipalities_shapefile(&shp_path);

    let err = Boundary::new(&shp_path, "NAME_2", "Atlantis", dir.path().join("a.geojson"))
        .run()
        .unwrap_err();
    assert!(matches!(err, UhiError::RegionNotFound { .. }));
}

#[test]
fn clip_produces_window_adjusted_transform() {
    let dir = TempDir::new().unwrap();
    let band_path = dir.path().join("b10.tif");
    write_test_band(&band_path, None);

    let clipped = raster::clip_to_boundary(&band_path, &clip_boundary(), EPSG).unwrap();

    assert_eq!(clipped.data.dim(), (10, 10));
    assert_eq!(
        clipped.geotransform,
        [500_150.0, 30.0, 0.0, 4_599_850.0, 0.0, -30.0]
    );
    // window cell (0, 0) is source cell (5, 5)
    assert_eq!(clipped.data[[0, 0]], 505.0);
    assert_eq!(clipped.data[[9, 9]], 1414.0);
    assert!(clipped.data.iter().all(|v| v.is_finite()));
}

#[test]
fn clip_turns_nodata_into_missing() {
    let dir = TempDir::new().unwrap();
    let band_path = dir.path().join("b10.tif");
    write_test_band(&band_path, Some(-9999.0));

    let clipped = raster::clip_to_boundary(&band_path, &clip_boundary(), EPSG).unwrap();

    // source cell (6, 7) sits at window cell (1, 2)
    assert!(clipped.data[[1, 2]].is_nan());
    assert_eq!(clipped.data[[1, 3]], 608.0);
}

#[test]
fn clip_outside_raster_is_an_error() {
    let dir = TempDir::new().unwrap();
    let band_path = dir.path().join("b10.tif");
    write_test_band(&band_path, None);

    let far_away = MultiPolygon::new(vec![polygon![
        (x: 900_000.0, y: 4_599_550.0),
        (x: 900_300.0, y: 4_599_550.0),
        (x: 900_300.0, y: 4_599_850.0),
        (x: 900_000.0, y: 4_599_550.0),
    ]]);
    let err = raster::clip_to_boundary(&band_path, &far_away, EPSG).unwrap_err();
    assert!(matches!(err, UhiError::EmptyClip));
}

#[test]
fn exported_mask_carries_clip_transform_and_crs() {
    let dir = TempDir::new().unwrap();
    let band_path = dir.path().join("b10.tif");
    write_test_band(&band_path, None);

    let clipped = raster::clip_to_boundary(&band_path, &clip_boundary(), EPSG).unwrap();

    // constants chosen so the synthetic digital numbers span all zones
    let constants = CalibrationConstants {
        radiance_mult: 0.01,
        radiance_add: 0.5,
        k1: 774.8853,
        k2: 1321.0789,
    };
    let celsius = thermal::land_surface_temperature(
        &clipped.data,
        &constants,
        &DisplayRange::default(),
    );
    let zone_grid = zones::classify_grid(&celsius, &ZoneThresholds::default());
    let mask = zones::critical_mask(&zone_grid);

    let mask_path = dir.path().join("critical.tif");
    export::write_critical_mask(&mask_path, &mask, &clipped.geotransform, &clipped.projection)
        .unwrap();

    let reopened = Dataset::open(&mask_path).unwrap();
    assert_eq!(reopened.geo_transform().unwrap(), clipped.geotransform);
    assert_eq!(reopened.projection(), clipped.projection);

    let band = reopened.rasterband(1).unwrap();
    let buffer = band.read_as::<u8>((0, 0), (10, 10), (10, 10), None).unwrap();
    let roundtrip: Vec<u8> = buffer.into_iter().collect();
    let expected: Vec<u8> = mask.iter().copied().collect();
    assert_eq!(roundtrip, expected);

    // the mask is the indicator of the critical zone
    let mask_sum: u64 = expected.iter().map(|&v| u64::from(v)).sum();
    let critical = zone_grid.iter().filter(|&&z| z == 4).count() as u64;
    assert_eq!(mask_sum, critical);
}

#[test]
fn export_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let band_path = dir.path().join("b10.tif");
    write_test_band(&band_path, None);
    let clipped = raster::clip_to_boundary(&band_path, &clip_boundary(), EPSG).unwrap();

    let mask = ndarray::Array2::<u8>::zeros(clipped.data.dim());
    let missing = dir.path().join("does/not/exist/critical.tif");
    let result =
        export::write_critical_mask(&missing, &mask, &clipped.geotransform, &clipped.projection);
    assert!(result.is_err());
}
