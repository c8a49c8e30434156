//! Camera controls: orbit navigation, zoom, and 2D framing

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use hbds_core::bounds::framing_distance;
use tracing::debug;

use crate::types::{DiagramBounds, DragState, ViewMode, ViewSettings};

/// Camera controller settings
///
/// The camera sits on a sphere around `target`; azimuth 0 and elevation 0
/// place it on +Z looking down -Z at the diagram plane.
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 10.0,
            target_distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.15,
        }
    }
}

impl CameraSettings {
    /// Face the diagram plane head-on from `distance`
    pub fn frame_2d(&mut self, focus: Vec3, distance: f32) {
        self.azimuth = 0.0;
        self.elevation = 0.0;
        self.target_focus = focus;
        self.target_distance = distance;
    }
}

/// Camera offset from the orbit target (Y up)
pub fn orbit_offset(distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    Vec3::new(
        distance * elevation.cos() * azimuth.sin(),
        distance * elevation.sin(),
        distance * elevation.cos() * azimuth.cos(),
    )
}

/// Whether pointer input may orbit the camera
pub fn orbit_enabled(mode: ViewMode, drag: &DragState, egui_wants_pointer: bool) -> bool {
    mode.allows_orbit() && !drag.is_dragging() && !egui_wants_pointer
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Update, (frame_diagram, update_camera).chain());
    }
}

/// Re-frame when the diagram or the view mode changes
fn frame_diagram(
    view: Res<ViewSettings>,
    bounds: Res<DiagramBounds>,
    mut settings: ResMut<CameraSettings>,
    mut projection_query: Query<&mut Projection, With<MainCamera>>,
) {
    if !view.is_changed() && !bounds.is_changed() {
        return;
    }

    if let Ok(mut projection) = projection_query.single_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = view.fov_radians();
        }
    }

    let distance = framing_distance(
        bounds.sphere.radius,
        view.fov_radians(),
        view.framing_margin,
        view.default_distance,
    );

    if view.mode.is_3d() {
        // Keep the user's angles, only follow the diagram
        if bounds.is_changed() {
            settings.target_focus = bounds.sphere.center;
            settings.target_distance = distance;
        }
    } else {
        settings.frame_2d(bounds.sphere.center, distance);
        debug!(distance, radius = bounds.sphere.radius, "Framed diagram in 2D");
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut settings: ResMut<CameraSettings>,
    view: Res<ViewSettings>,
    drag: Res<DragState>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    let can_orbit = orbit_enabled(view.mode, &drag, egui_wants_pointer);

    // Orbit with left mouse drag
    if can_orbit && mouse_button.pressed(MouseButton::Left) {
        settings.azimuth -= total_motion.x * settings.sensitivity;
        settings.elevation = (settings.elevation + total_motion.y * settings.sensitivity)
            .clamp(-1.5, 1.5);
    }

    // Pan with right mouse drag in the camera's view plane
    if mouse_button.pressed(MouseButton::Right) && !egui_wants_pointer && !drag.is_dragging() {
        let right = Vec3::new(settings.azimuth.cos(), 0.0, -settings.azimuth.sin());
        let pan_speed = settings.distance * 0.002;
        settings.target_focus -= right * total_motion.x * pan_speed;
        settings.target_focus += Vec3::Y * total_motion.y * pan_speed;
    }

    if !egui_wants_pointer {
        for scroll in mouse_wheel.read() {
            let zoom_factor = 1.0 - scroll.y * settings.zoom_speed * 0.3;
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.5, 500.0);
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Single-finger orbit
    if can_orbit && touch_input.iter().count() == 1 {
        for touch in touch_input.iter() {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                settings.azimuth -= delta.x * settings.sensitivity;
                settings.elevation = (settings.elevation + delta.y * settings.sensitivity)
                    .clamp(-1.5, 1.5);
            }
        }
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            let zoom_factor = prev_dist / curr_dist.max(1.0);
            settings.target_distance = (settings.target_distance * zoom_factor).clamp(0.5, 500.0);
        }
    }

    // Smooth interpolation for zoom and target
    let dt = time.delta_secs();
    let lerp_factor = 1.0 - (-settings.smooth_factor * 60.0 * dt).exp();
    settings.distance += (settings.target_distance - settings.distance) * lerp_factor;
    settings.target = settings.target + (settings.target_focus - settings.target) * lerp_factor;

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation =
            settings.target + orbit_offset(settings.distance, settings.azimuth, settings.elevation);
        transform.look_at(settings.target, Vec3::Y);
    }
}
