use bevy::{prelude::*, window::PrimaryWindow};
use geo::Contains;
use rstar::AABB;

use crate::types::{MapBundle, RegionIndex};

pub struct InteractionSystemPlugin;

impl Plugin for InteractionSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_mouse);
    }
}

/// Right click: cast a ray through the cursor onto the ground plane and
/// look up the region under it. Left drag is taken by the orbit camera.
fn handle_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    q_windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    index: Option<Res<RegionIndex>>,
    map_bundle: Res<MapBundle>,
) {
    if !buttons.just_pressed(MouseButton::Right) {
        return;
    }
    let Some(index) = index else {
        return;
    };
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Ok(window) = q_windows.single() else {
        return;
    };
    let Some(position) = window.cursor_position() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, position) else {
        return;
    };
    let Some(hit) = ray_to_ground(ray) else {
        return;
    };

    let point = geo::Point::new(hit.x as f64, hit.y as f64);
    let at = AABB::from_point([point.x(), point.y()]);
    for planar in index.tree.locate_in_envelope_intersecting(&at) {
        if planar.outline.contains(&point) {
            let region = &map_bundle.regions[planar.region];
            info!("picked region {:?} {}", region.name, region.properties);
            return;
        }
    }
}

/// Intersection of a camera ray with the ground plane z = 0.
fn ray_to_ground(ray: Ray3d) -> Option<Vec3> {
    let direction = ray.direction.as_vec3();
    if direction.z.abs() < f32::EPSILON {
        return None;
    }
    let t = -ray.origin.z / direction.z;
    (t >= 0.0).then(|| ray.origin + direction * t)
}
