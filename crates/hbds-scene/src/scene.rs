//! Scene setup - camera, lights, and background

use bevy::prelude::*;

use crate::camera::{orbit_offset, CameraSettings, MainCamera};
use crate::types::{to_color, ViewSettings};

/// Key light position (upper right, in front of the diagram)
const KEY_LIGHT_POSITION: Vec3 = Vec3::new(1.0, 2.5, 6.0);
/// Rim light position (lower left, behind the diagram)
const RIM_LIGHT_POSITION: Vec3 = Vec3::new(-1.0, -4.0, -2.0);
/// Strong white fill so card faces read evenly from every angle
const AMBIENT_BRIGHTNESS: f32 = 900.0;

/// Marker component for the key directional light
#[derive(Component)]
pub struct KeyLight;

/// Marker component for the rim directional light
#[derive(Component)]
pub struct RimLight;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(Update, sync_clear_color);
    }
}

fn setup_scene(mut commands: Commands, view: Res<ViewSettings>, mut settings: ResMut<CameraSettings>) {
    settings.distance = view.default_distance;
    settings.target_distance = view.default_distance;

    // Y is up; the diagram lies in the X-Y plane facing +Z
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: view.fov_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(orbit_offset(view.default_distance, 0.0, 0.0))
            .looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 9000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        KeyLight,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(RIM_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        RimLight,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });
    commands.insert_resource(ClearColor(to_color(view.background)));
}

fn sync_clear_color(view: Res<ViewSettings>, mut clear_color: ResMut<ClearColor>) {
    if view.is_changed() {
        clear_color.0 = to_color(view.background);
    }
}
