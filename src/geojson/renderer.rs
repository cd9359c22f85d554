use bevy::prelude::*;
use geo::LineString;
use rstar::RTree;

use crate::geometry::{
    MercatorProjector, ProjectedGeometry, build_solid, project_geometry, solid_material,
};
use crate::types::{MapBundle, PlanarRegion, RegionIndex};

/// Root group of the assembled map scene.
#[derive(Component)]
pub struct MapRoot;

/// Group entity for one region; `index` is the back-reference into the
/// MapBundle for metadata lookup.
#[derive(Component)]
pub struct RegionGroup {
    pub index: usize,
}

#[derive(Component)]
pub struct SolidMarker;

/// Builds the whole map once at startup: per region in dataset order, the
/// projected tree is computed and stored, a named group is spawned, and one
/// solid child is added per ring flattened across the nesting. Also builds
/// the planar picking index.
pub fn spawn_map(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    projector: Res<MercatorProjector>,
    mut map_bundle: ResMut<MapBundle>,
) {
    let material = materials.add(solid_material());
    let root = commands
        .spawn((
            Name::new("map"),
            MapRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let mut planar = Vec::new();
    for (index, region) in map_bundle.regions.iter_mut().enumerate() {
        let projected = project_geometry(&projector, &region.geometry);

        let group = commands
            .spawn((
                Name::new(region.name.clone()),
                RegionGroup { index },
                Transform::default(),
                Visibility::default(),
            ))
            .id();
        commands.entity(root).add_child(group);

        for ring in projected.rings() {
            match build_solid(ring) {
                Ok(mesh) => {
                    let solid = commands
                        .spawn((
                            Mesh3d(meshes.add(mesh)),
                            MeshMaterial3d(material.clone()),
                            SolidMarker,
                        ))
                        .id();
                    commands.entity(group).add_child(solid);
                }
                Err(e) => warn!("region {}: {e}", region.name),
            }
        }

        planar.extend(planar_outlines(&projected).map(|outline| PlanarRegion {
            region: index,
            group,
            outline,
        }));
        region.projected = Some(projected);
    }

    commands.insert_resource(RegionIndex {
        tree: RTree::bulk_load(planar),
    });
}

/// One planar polygon per exterior ring of the projected tree, used for
/// click hit-testing.
fn planar_outlines(projected: &ProjectedGeometry) -> impl Iterator<Item = geo::Polygon<f64>> + '_ {
    let exteriors: Vec<&Vec<Vec3>> = match projected {
        ProjectedGeometry::Polygon(rings) => rings.first().into_iter().collect(),
        ProjectedGeometry::MultiPolygon(polygons) => {
            polygons.iter().filter_map(|rings| rings.first()).collect()
        }
    };
    exteriors.into_iter().map(|ring| {
        let coords = ring
            .iter()
            .map(|p| geo::Coord {
                x: p.x as f64,
                y: p.y as f64,
            })
            .collect();
        geo::Polygon::new(LineString(coords), vec![])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::get_map_data;

    fn assembled_app(data: &str) -> App {
        let bundle = get_map_data(data).unwrap();
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<Assets<Mesh>>();
        app.init_resource::<Assets<StandardMaterial>>();
        app.init_resource::<MercatorProjector>();
        app.insert_resource(bundle);
        app.add_systems(Startup, spawn_map);
        app.update();
        app
    }

    fn solid_count(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&SolidMarker>();
        query.iter(app.world()).count()
    }

    const BARE_RING: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "Hanbin"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[108.9, 32.6], [109.0, 32.6], [109.0, 32.7], [108.9, 32.6]]]
            }
        }]
    }"#;

    #[test]
    fn bare_ring_region_yields_one_solid() {
        let mut app = assembled_app(BARE_RING);
        let mut groups = app.world_mut().query::<&RegionGroup>();
        assert_eq!(groups.iter(app.world()).count(), 1);
        assert_eq!(solid_count(&mut app), 1);
    }

    #[test]
    fn multi_polygon_yields_one_solid_per_ring() {
        // Two polygons, three rings in total (one hole).
        let data = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Islands"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[108.0, 32.0], [108.2, 32.0], [108.1, 32.2], [108.0, 32.0]]],
                        [[[110.0, 33.0], [110.5, 33.0], [110.5, 33.5], [110.0, 33.5], [110.0, 33.0]],
                         [[110.1, 33.1], [110.2, 33.1], [110.15, 33.2], [110.1, 33.1]]]
                    ]
                }
            }]
        }"#;
        let mut app = assembled_app(data);
        assert_eq!(solid_count(&mut app), 3);
    }

    #[test]
    fn end_to_end_single_region() {
        let mut app = assembled_app(BARE_RING);
        assert_eq!(solid_count(&mut app), 1);

        let bundle = app.world().resource::<MapBundle>();
        let projected = bundle.regions[0].projected.as_ref().unwrap();
        assert_eq!(projected.ring_count(), 1);
        assert_eq!(projected.rings().next().unwrap().len(), 4);

        let meshes = app.world().resource::<Assets<Mesh>>();
        let mesh = meshes.iter().next().unwrap().1;
        let Some(bevy::render::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("solid mesh must have positions");
        };
        let min_z = positions.iter().map(|p| p[2]).fold(f32::INFINITY, f32::min);
        let max_z = positions
            .iter()
            .map(|p| p[2])
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min_z, -1.0);
        assert_eq!(max_z, 0.0);

        let materials = app.world().resource::<Assets<StandardMaterial>>();
        let material = materials.iter().next().unwrap().1;
        assert!(material.double_sided);
        assert!(material.cull_mode.is_none());
    }

    #[test]
    fn scene_children_follow_dataset_order() {
        let data = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "b"}, "geometry": {"type": "Polygon",
                 "coordinates": [[[108.0, 32.0], [108.2, 32.0], [108.1, 32.2], [108.0, 32.0]]]}},
                {"type": "Feature", "properties": {"name": "a"}, "geometry": {"type": "Polygon",
                 "coordinates": [[[109.0, 32.0], [109.2, 32.0], [109.1, 32.2], [109.0, 32.0]]]}},
                {"type": "Feature", "properties": {"name": "c"}, "geometry": {"type": "Polygon",
                 "coordinates": [[[110.0, 32.0], [110.2, 32.0], [110.1, 32.2], [110.0, 32.0]]]}}
            ]
        }"#;
        let mut app = assembled_app(data);

        let root_children: Vec<Entity> = {
            let mut query = app
                .world_mut()
                .query_filtered::<&Children, With<MapRoot>>();
            let children = query.single(app.world()).unwrap();
            (0..children.len()).map(|i| children[i]).collect()
        };

        let names: Vec<String> = root_children
            .iter()
            .map(|&child| app.world().get::<Name>(child).unwrap().as_str().to_owned())
            .collect();
        assert_eq!(names, ["b", "a", "c"]);

        for (position, &child) in root_children.iter().enumerate() {
            assert_eq!(
                app.world().get::<RegionGroup>(child).unwrap().index,
                position
            );
        }
    }

    #[test]
    fn picking_index_covers_every_polygon() {
        let app = assembled_app(BARE_RING);
        let index = app.world().resource::<RegionIndex>();
        assert_eq!(index.tree.size(), 1);
    }
}
