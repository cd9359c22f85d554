use bevy::{
    color::palettes::css::{BLUE, GREEN, RED},
    prelude::*,
};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_axes);
    }
}

/// World axes helper, RGB = XYZ, length 100.
fn draw_axes(mut gizmos: Gizmos) {
    gizmos.line(Vec3::ZERO, Vec3::X * 100.0, RED);
    gizmos.line(Vec3::ZERO, Vec3::Y * 100.0, GREEN);
    gizmos.line(Vec3::ZERO, Vec3::Z * 100.0, BLUE);
}
