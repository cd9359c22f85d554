use bevy::prelude::*;
use geo::BoundingRect;
use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::ProjectedGeometry;

/// Tagged geometry tree for one region. The GeoJSON nesting depth is
/// resolved once by the loader; everything downstream dispatches on this
/// tag instead of re-probing the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum RegionGeometry {
    Polygon(geo::Polygon<f64>),
    MultiPolygon(geo::MultiPolygon<f64>),
}

impl RegionGeometry {
    /// Ring count flattened across polygon/multi-polygon nesting.
    #[allow(dead_code)]
    pub fn ring_count(&self) -> usize {
        match self {
            RegionGeometry::Polygon(poly) => 1 + poly.interiors().len(),
            RegionGeometry::MultiPolygon(multi) => multi
                .0
                .iter()
                .map(|poly| 1 + poly.interiors().len())
                .sum(),
        }
    }
}

/// One named feature of the dataset. `projected` is filled during scene
/// assembly; the raw lon/lat geometry stays untouched beside it.
#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    pub properties: serde_json::Value,
    pub geometry: RegionGeometry,
    pub projected: Option<ProjectedGeometry>,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct MapBundle {
    /// Regions in dataset order. Scene-graph child order mirrors this.
    pub regions: Vec<Region>,
}

/// One planar outline polygon of an assembled region, indexed for click
/// lookup. `region` points back into the MapBundle, `group` at the region's
/// group entity.
#[derive(Clone, Debug)]
pub struct PlanarRegion {
    pub region: usize,
    pub group: Entity,
    pub outline: geo::Polygon<f64>,
}

impl RTreeObject for PlanarRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let bbox = self.outline.bounding_rect().unwrap();
        AABB::from_corners([bbox.min().x, bbox.min().y], [bbox.max().x, bbox.max().y])
    }
}

#[derive(Resource, Debug, Default)]
pub struct RegionIndex {
    pub tree: RTree<PlanarRegion>,
}
