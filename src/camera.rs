use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct CameraSystemPlugin;

impl Plugin for CameraSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (orbit_camera, zoom_camera));
    }
}

const CAMERA_START: Vec3 = Vec3::new(1.0, 1.0, 5.0);
const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.25;
const MIN_RADIUS: f32 = 0.5;
// Keep the orbit short of the poles so look_at stays stable.
const MAX_PITCH: f32 = 1.54;

/// Orbit state around a fixed focus, Z-up spherical coordinates.
#[derive(Component, Debug)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn from_translation(translation: Vec3, focus: Vec3) -> Self {
        let offset = translation - focus;
        Self {
            focus,
            radius: offset.length(),
            yaw: offset.y.atan2(offset.x),
            pitch: (offset.z / offset.length()).asin(),
        }
    }

    pub fn transform(&self) -> Transform {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vec3::new(
            self.radius * cos_pitch * cos_yaw,
            self.radius * cos_pitch * sin_yaw,
            self.radius * sin_pitch,
        );
        Transform::from_translation(self.focus + offset).looking_at(self.focus, Vec3::Z)
    }
}

fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::from_translation(CAMERA_START, Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        orbit.transform(),
        orbit,
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 5_000.0,
            ..default()
        },
        Transform::default(),
    ));
}

fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    if !buttons.pressed(MouseButton::Left) || delta == Vec2::ZERO {
        return;
    }
    for (mut orbit, mut transform) in &mut query {
        orbit.yaw -= delta.x * ORBIT_SENSITIVITY;
        orbit.pitch = (orbit.pitch + delta.y * ORBIT_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
        *transform = orbit.transform();
    }
}

fn zoom_camera(
    mut wheel: EventReader<MouseWheel>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let scroll: f32 = wheel.read().map(|event| event.y).sum();
    if scroll == 0.0 {
        return;
    }
    for (mut orbit, mut transform) in &mut query {
        orbit.radius = (orbit.radius - scroll * ZOOM_SENSITIVITY).max(MIN_RADIUS);
        *transform = orbit.transform();
    }
}
