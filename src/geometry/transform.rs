use bevy::prelude::*;
use geo::LineString;

use super::projection::MercatorProjector;
use crate::types::RegionGeometry;

/// Projected mirror of a region's geometry tree: identical nesting shape,
/// ground-plane `Vec3` leaves. Built once per region during assembly.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectedGeometry {
    /// Rings of one polygon, exterior first, holes after in source order.
    Polygon(Vec<Vec<Vec3>>),
    MultiPolygon(Vec<Vec<Vec<Vec3>>>),
}

impl ProjectedGeometry {
    /// Rings flattened across polygon/multi-polygon nesting, in source
    /// order. The assembler builds exactly one solid per item.
    pub fn rings(&self) -> impl Iterator<Item = &[Vec3]> {
        let rings: Vec<&[Vec3]> = match self {
            ProjectedGeometry::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
            ProjectedGeometry::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .map(Vec::as_slice)
                .collect(),
        };
        rings.into_iter()
    }

    pub fn ring_count(&self) -> usize {
        self.rings().count()
    }
}

fn project_ring(projector: &MercatorProjector, ring: &LineString<f64>) -> Vec<Vec3> {
    ring.coords().map(|c| projector.project(*c)).collect()
}

fn project_polygon(projector: &MercatorProjector, polygon: &geo::Polygon<f64>) -> Vec<Vec<Vec3>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(|ring| project_ring(projector, ring))
        .collect()
}

/// Builds the projected parallel tree for one region's geometry. The raw
/// tree is left untouched; the caller stores the result beside it.
pub fn project_geometry(
    projector: &MercatorProjector,
    geometry: &RegionGeometry,
) -> ProjectedGeometry {
    match geometry {
        RegionGeometry::Polygon(polygon) => {
            ProjectedGeometry::Polygon(project_polygon(projector, polygon))
        }
        RegionGeometry::MultiPolygon(multi) => ProjectedGeometry::MultiPolygon(
            multi
                .0
                .iter()
                .map(|polygon| project_polygon(projector, polygon))
                .collect(),
        ),
    }
}
