//! Boundary preparation: filter a municipalities dataset down to one
//! named region and persist it as a GeoJSON boundary file.

use std::path::{Path, PathBuf};

use gdal::vector::{FieldValue, LayerAccess};
use gdal::Dataset;
use geo::{Geometry as GeoGeometry, MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use log::info;
use serde_json::{Map, Value};

use crate::error::{Result, UhiError};

/// Selects one administrative region from a municipalities dataset.
///
/// The dataset may be GeoJSON (read natively) or any OGR-supported vector
/// format such as an ESRI Shapefile (read through GDAL). Matching is an
/// exact string comparison on one attribute column.
pub struct Boundary {
    dataset_path: PathBuf,
    region_field: String,
    region_name: String,
    path_save_geojson: PathBuf,
    features: Vec<Feature>,
    geometry: Option<MultiPolygon<f64>>,
}

impl Boundary {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        dataset_path: P,
        region_field: &str,
        region_name: &str,
        path_save_geojson: Q,
    ) -> Self {
        Boundary {
            dataset_path: dataset_path.into(),
            region_field: region_field.to_string(),
            region_name: region_name.to_string(),
            path_save_geojson: path_save_geojson.into(),
            features: Vec::new(),
            geometry: None,
        }
    }

    /// Filter the dataset, collect the matching geometry and write the
    /// boundary GeoJSON.
    pub fn run(mut self) -> Result<Self> {
        info!(
            "Filtering {:?} on {} = '{}'",
            self.dataset_path, self.region_field, self.region_name
        );

        let features = self.load_matching_features()?;
        if features.is_empty() {
            return Err(UhiError::RegionNotFound {
                field: self.region_field.clone(),
                name: self.region_name.clone(),
                path: self.dataset_path.clone(),
            });
        }
        info!("Matched {} feature(s)", features.len());

        self.geometry = Some(collect_polygons(&features)?);
        self.features = features;
        self.save_geojson()?;

        Ok(self)
    }

    /// The selected region as one multipolygon. `None` before [`run`].
    ///
    /// [`run`]: Boundary::run
    pub fn geometry(&self) -> Option<&MultiPolygon<f64>> {
        self.geometry.as_ref()
    }

    pub fn path_save_geojson(&self) -> &Path {
        &self.path_save_geojson
    }

    fn load_matching_features(&self) -> Result<Vec<Feature>> {
        let is_geojson = self
            .dataset_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("geojson") || e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_geojson {
            self.load_from_geojson()
        } else {
            self.load_from_ogr()
        }
    }

    fn load_from_geojson(&self) -> Result<Vec<Feature>> {
        let text = std::fs::read_to_string(&self.dataset_path)?;
        let geojson: GeoJson = text.parse()?;

        let candidates = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => {
                return Err(UhiError::UnsupportedDataset(
                    "bare geometry has no attributes to filter on".to_string(),
                ))
            }
        };

        Ok(candidates
            .into_iter()
            .filter(|f| {
                f.properties
                    .as_ref()
                    .and_then(|p| p.get(&self.region_field))
                    .and_then(Value::as_str)
                    == Some(self.region_name.as_str())
            })
            .collect())
    }

    fn load_from_ogr(&self) -> Result<Vec<Feature>> {
        let dataset = Dataset::open(&self.dataset_path)?;
        let mut layer = dataset.layer(0)?;

        let mut matched = Vec::new();
        for feature in layer.features() {
            let name = match feature.field(&self.region_field)? {
                Some(value) => value.into_string(),
                None => None,
            };
            if name.as_deref() != Some(self.region_name.as_str()) {
                continue;
            }
            let geometry = match feature.geometry() {
                Some(g) => g,
                None => continue,
            };
            // gdal geometries are bridged through their GeoJSON encoding
            // rather than a second geometry-type dependency
            let geojson_geometry: GeoJson = geometry.json()?.parse()?;
            let geojson_geometry = match geojson_geometry {
                GeoJson::Geometry(g) => g,
                _ => {
                    return Err(UhiError::UnsupportedDataset(
                        "OGR feature did not encode as a GeoJSON geometry".to_string(),
                    ))
                }
            };

            // persist the full attribute row, not just the filter column
            let mut properties = Map::new();
            for (field_name, field_value) in feature.fields() {
                let json = field_value.map(field_value_to_json).unwrap_or(Value::Null);
                properties.insert(field_name, json);
            }
            matched.push(Feature {
                bbox: None,
                geometry: Some(geojson_geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            });
        }
        Ok(matched)
    }

    fn save_geojson(&self) -> Result<()> {
        if let Some(parent) = self.path_save_geojson.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let collection = GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: self.features.clone(),
            foreign_members: None,
        });
        std::fs::write(&self.path_save_geojson, collection.to_string())?;
        info!("Boundary saved to {:?}", self.path_save_geojson);
        Ok(())
    }
}

fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::IntegerValue(v) => Value::from(v),
        FieldValue::IntegerListValue(v) => Value::from(v),
        FieldValue::Integer64Value(v) => Value::from(v),
        FieldValue::Integer64ListValue(v) => Value::from(v),
        FieldValue::RealValue(v) => Value::from(v),
        FieldValue::RealListValue(v) => Value::from(v),
        FieldValue::StringValue(v) => Value::String(v),
        FieldValue::StringListValue(v) => v.into_iter().map(Value::String).collect(),
        FieldValue::DateValue(v) => Value::String(v.to_string()),
        FieldValue::DateTimeValue(v) => Value::String(v.to_rfc3339()),
    }
}

/// Merge the polygonal parts of the matched features into one multipolygon.
fn collect_polygons(features: &[Feature]) -> Result<MultiPolygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for feature in features {
        let geometry = match &feature.geometry {
            Some(g) => g,
            None => continue,
        };
        match GeoGeometry::<f64>::try_from(geometry)? {
            GeoGeometry::Polygon(p) => polygons.push(p),
            GeoGeometry::MultiPolygon(mp) => polygons.extend(mp.0),
            other => {
                return Err(UhiError::UnsupportedDataset(format!(
                    "expected polygonal boundary geometry, got {}",
                    kind(&other)
                )))
            }
        }
    }
    Ok(MultiPolygon::new(polygons))
}

fn kind(geometry: &GeoGeometry<f64>) -> &'static str {
    match geometry {
        GeoGeometry::Point(_) => "Point",
        GeoGeometry::Line(_) => "Line",
        GeoGeometry::LineString(_) => "LineString",
        GeoGeometry::MultiPoint(_) => "MultiPoint",
        GeoGeometry::MultiLineString(_) => "MultiLineString",
        GeoGeometry::GeometryCollection(_) => "GeometryCollection",
        GeoGeometry::Rect(_) => "Rect",
        GeoGeometry::Triangle(_) => "Triangle",
        GeoGeometry::Polygon(_) | GeoGeometry::MultiPolygon(_) => "Polygon",
    }
}
