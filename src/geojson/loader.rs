use std::str::FromStr;

use bevy::prelude::*;
use geojson::GeoJson;

use crate::types::{MapBundle, MapDataError, Region, RegionGeometry};

/// Parses a GeoJSON FeatureCollection into the ordered region list.
/// Features with unsupported or malformed geometry are skipped with a
/// warning; an input that is not a feature collection at all is an error.
pub fn get_map_data(data: &str) -> Result<MapBundle, MapDataError> {
    let geojson = GeoJson::from_str(data)?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(MapDataError::NotACollection);
    };

    let mut regions = Vec::new();
    for feature in collection.features {
        let name = feature
            .property("name")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| {
                feature
                    .id
                    .as_ref()
                    .map_or_else(|| String::from("unknown"), |id| format!("{id:?}"))
            });

        let Some(geometry) = feature.geometry else {
            warn!("feature {name} has no geometry, skipping");
            continue;
        };

        match region_geometry(&name, geometry.value) {
            Ok(geometry) => regions.push(Region {
                name,
                properties: serde_json::Value::Object(feature.properties.unwrap_or_default()),
                geometry,
                projected: None,
            }),
            Err(e) => warn!("{e}, skipping"),
        }
    }

    Ok(MapBundle { regions })
}

/// Resolves the GeoJSON nesting into a tagged geometry tree, validating
/// leaf arity and ring length on the way in.
fn region_geometry(feature: &str, value: geojson::Value) -> Result<RegionGeometry, MapDataError> {
    match value {
        geojson::Value::Polygon(rings) => Ok(RegionGeometry::Polygon(polygon(feature, rings)?)),
        geojson::Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .into_iter()
                .map(|rings| polygon(feature, rings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RegionGeometry::MultiPolygon(geo::MultiPolygon(polygons)))
        }
        _ => Err(MapDataError::MalformedGeometry {
            feature: feature.to_owned(),
            detail: String::from("geometry is not a Polygon or MultiPolygon"),
        }),
    }
}

fn polygon(feature: &str, rings: Vec<Vec<Vec<f64>>>) -> Result<geo::Polygon<f64>, MapDataError> {
    let mut rings = rings
        .into_iter()
        .map(|ring| ring_coords(feature, ring))
        .collect::<Result<Vec<_>, _>>()?;
    if rings.is_empty() {
        return Err(MapDataError::MalformedGeometry {
            feature: feature.to_owned(),
            detail: String::from("polygon has no rings"),
        });
    }
    let exterior = rings.remove(0);
    Ok(geo::Polygon::new(exterior, rings))
}

fn ring_coords(feature: &str, ring: Vec<Vec<f64>>) -> Result<geo::LineString<f64>, MapDataError> {
    if ring.len() < 3 {
        return Err(MapDataError::MalformedGeometry {
            feature: feature.to_owned(),
            detail: format!("ring has only {} positions", ring.len()),
        });
    }
    let coords = ring
        .into_iter()
        .map(|position| match position[..] {
            [x, y] => Ok(geo::Coord { x, y }),
            _ => Err(MapDataError::MalformedGeometry {
                feature: feature.to_owned(),
                detail: format!("position has {} components", position.len()),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(geo::LineString(coords))
}
