//! CRS plumbing shared by the boundary and raster stages.

use geo::algorithm::map_coords::MapCoords;
use geo::{coord, MultiPolygon};
use proj::Proj;

use crate::error::Result;

/// Reproject a multipolygon between EPSG codes.
///
/// A no-op when source and target are the same code, so callers never
/// need proj data for already-matching CRSs.
pub fn reproject_multi_polygon(
    from_epsg: i32,
    to_epsg: i32,
    geometry: &MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>> {
    if from_epsg == to_epsg {
        return Ok(geometry.clone());
    }
    let from = format!("EPSG:{}", from_epsg);
    let to = format!("EPSG:{}", to_epsg);
    let proj = Proj::new_known_crs(&from, &to, None)?;
    let reprojected = geometry.try_map_coords(|c| {
        let (x, y) = proj.convert((c.x, c.y))?;
        Ok::<_, proj::ProjError>(coord! { x: x, y: y })
    })?;
    Ok(reprojected)
}
