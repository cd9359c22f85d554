use bevy::prelude::*;

use crate::geometry::MercatorProjector;

use super::spawn_map;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MercatorProjector>()
            .add_systems(Startup, spawn_map);
    }
}
