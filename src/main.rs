use bevy::{prelude::*, window::WindowResolution, winit::WinitSettings};

use crate::camera::CameraSystemPlugin;
use crate::debug::DebugPlugin;
use crate::geojson::{RenderPlugin, get_map_data};
use crate::interaction::InteractionSystemPlugin;

pub mod camera;
pub mod debug;
pub mod geojson;
pub mod geometry;
pub mod interaction;
pub mod types;

/// Construction-time options for the viewer window.
pub struct MapViewerOptions {
    pub title: &'static str,
    pub width: f32,
    pub height: f32,
}

pub const VIEWER_OPTIONS: MapViewerOptions = MapViewerOptions {
    title: "3D Map Viewer",
    width: 1280.0,
    height: 720.0,
};

/// Boundary dataset compiled into the binary, in the same interchange shape
/// the loader accepts.
const MAP_GEOJSON: &str = include_str!("../assets/regions.geo.json");

fn main() {
    // A dataset that fails to parse outright is fatal; a partial scene is
    // never shown.
    let map_bundle = match get_map_data(MAP_GEOJSON) {
        Ok(bundle) => bundle,
        Err(e) => {
            eprintln!("failed to load map data: {e}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: VIEWER_OPTIONS.title.to_string(),
                resolution: WindowResolution::new(VIEWER_OPTIONS.width, VIEWER_OPTIONS.height),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Redraw on interaction only; the scene is static between inputs.
        .insert_resource(WinitSettings::desktop_app())
        .insert_resource(ClearColor(Color::from(Srgba {
            red: 0xb9 as f32 / 255.0,
            green: 0xd3 as f32 / 255.0,
            blue: 1.0,
            alpha: 1.0,
        })))
        .insert_resource(map_bundle)
        .add_plugins((CameraSystemPlugin, InteractionSystemPlugin, DebugPlugin))
        .add_plugins(RenderPlugin)
        .run();
}
