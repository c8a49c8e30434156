//! Card dragging in the 2D view
//!
//! Pointer drags that start on a card handle move the whole card across the
//! plane through its origin that faces the camera (+Z). Orbit stays disabled
//! while a drag is active.

use bevy::prelude::*;
use bevy_picking::events::{Drag, DragEnd, DragStart, Pointer};
use bevy_picking::pointer::PointerButton;
use hbds_core::bounds::ray_plane_intersection;
use tracing::debug;

use crate::camera::MainCamera;
use crate::diagram::CardHandle;
use crate::types::{ActiveDrag, DragState, ViewSettings};

/// Plugin for dragging class cards
pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
            .add_message::<Pointer<DragStart>>()
            .add_message::<Pointer<Drag>>()
            .add_message::<Pointer<DragEnd>>()
            .add_systems(
                Update,
                (begin_card_drag, move_dragged_card, end_card_drag).chain(),
            );
    }
}

/// Point under the cursor on the drag plane through `plane_point`
fn pointer_on_plane(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    cursor: Vec2,
    plane_point: Vec3,
) -> Option<Vec3> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    ray_plane_intersection(ray.origin, *ray.direction, plane_point, Vec3::Z)
}

/// Local translation that puts the card origin at `hit + grab_offset`
pub fn dragged_translation(hit: Vec3, grab_offset: Vec3, parent: &GlobalTransform) -> Vec3 {
    parent
        .affine()
        .inverse()
        .transform_point3(hit + grab_offset)
}

fn begin_card_drag(
    mut drag_starts: MessageReader<Pointer<DragStart>>,
    view: Res<ViewSettings>,
    mut drag: ResMut<DragState>,
    handles: Query<&CardHandle>,
    globals: Query<&GlobalTransform, Without<MainCamera>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    for event in drag_starts.read() {
        if event.event.button != PointerButton::Primary || !view.mode.allows_drag() {
            continue;
        }
        let Ok(handle) = handles.get(event.entity) else {
            continue;
        };
        let Ok(card_transform) = globals.get(handle.card) else {
            continue;
        };
        let Ok((camera, camera_transform)) = camera_query.single() else {
            continue;
        };

        let card_origin = card_transform.translation();
        let Some(hit) = pointer_on_plane(
            camera,
            camera_transform,
            event.pointer_location.position,
            card_origin,
        ) else {
            continue;
        };

        drag.active = Some(ActiveDrag {
            card: handle.card,
            plane_point: card_origin,
            grab_offset: card_origin - hit,
        });
        debug!(card = ?handle.card, "Started card drag");
    }
}

fn move_dragged_card(
    mut drags: MessageReader<Pointer<Drag>>,
    drag: Res<DragState>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    parents: Query<&ChildOf>,
    globals: Query<&GlobalTransform, Without<MainCamera>>,
    mut transforms: Query<&mut Transform, Without<MainCamera>>,
) {
    let Some(event) = drags.read().last() else {
        return;
    };
    let Some(active) = drag.active else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(hit) = pointer_on_plane(
        camera,
        camera_transform,
        event.pointer_location.position,
        active.plane_point,
    ) else {
        return;
    };

    let parent_transform = parents
        .get(active.card)
        .ok()
        .and_then(|child_of| globals.get(child_of.parent()).ok())
        .copied()
        .unwrap_or_default();

    if let Ok(mut transform) = transforms.get_mut(active.card) {
        transform.translation = dragged_translation(hit, active.grab_offset, &parent_transform);
    }
}

fn end_card_drag(
    mut drag_ends: MessageReader<Pointer<DragEnd>>,
    view: Res<ViewSettings>,
    mut drag: ResMut<DragState>,
) {
    let ended = drag_ends.read().count() > 0;
    if drag.active.is_some() && (ended || !view.mode.allows_drag()) {
        drag.active = None;
        debug!("Ended card drag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::orbit_enabled;
    use crate::types::ViewMode;
    use bevy::camera::{NormalizedRenderTarget, RenderTargetInfo};
    use bevy_picking::backend::HitData;
    use bevy_picking::pointer::{Location, PointerId};

    const CENTER: Vec2 = Vec2::new(400.0, 400.0);

    struct Scene {
        app: App,
        camera: Entity,
        card: Entity,
        body: Entity,
    }

    fn camera_transform() -> Transform {
        Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y)
    }

    fn viewport_camera() -> Camera {
        let mut camera = Camera::default();
        camera.computed.clip_from_view =
            Mat4::perspective_infinite_reverse_rh(50f32.to_radians(), 1.0, 0.1);
        camera.computed.target_info = Some(RenderTargetInfo {
            physical_size: UVec2::splat(800),
            scale_factor: 1.0,
        });
        camera
    }

    /// Camera on +Z, a recentred root, and one card whose origin is at world (0.5, 0, 0)
    fn drag_scene(mode: ViewMode) -> Scene {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(ViewSettings {
                mode,
                ..default()
            })
            .add_plugins(DragPlugin);

        let camera = app
            .world_mut()
            .spawn((
                viewport_camera(),
                camera_transform(),
                GlobalTransform::from(camera_transform()),
                MainCamera,
            ))
            .id();
        let root = app
            .world_mut()
            .spawn((Transform::from_xyz(-0.5, 0.0, 0.0), GlobalTransform::from_xyz(-0.5, 0.0, 0.0)))
            .id();
        let card = app
            .world_mut()
            .spawn((
                Transform::from_xyz(1.0, 0.0, 0.0),
                GlobalTransform::from_xyz(0.5, 0.0, 0.0),
                ChildOf(root),
            ))
            .id();
        let body = app
            .world_mut()
            .spawn((
                Transform::IDENTITY,
                GlobalTransform::from_xyz(0.5, 0.0, 0.0),
                CardHandle { card },
                ChildOf(card),
            ))
            .id();

        Scene {
            app,
            camera,
            card,
            body,
        }
    }

    fn location(position: Vec2) -> Location {
        Location {
            target: NormalizedRenderTarget::None {
                width: 800,
                height: 800,
            },
            position,
        }
    }

    impl Scene {
        fn start_drag(&mut self, target: Entity, button: PointerButton, position: Vec2) {
            let event = DragStart {
                button,
                hit: HitData::new(self.camera, 0.0, None, None),
            };
            self.app
                .world_mut()
                .write_message(Pointer::new(PointerId::Mouse, location(position), event, target));
            self.app.update();
        }

        fn drag_to(&mut self, position: Vec2) {
            let event = Drag {
                button: PointerButton::Primary,
                distance: position - CENTER,
                delta: position - CENTER,
            };
            self.app
                .world_mut()
                .write_message(Pointer::new(PointerId::Mouse, location(position), event, self.body));
            self.app.update();
        }

        fn end_drag(&mut self) {
            let event = DragEnd {
                button: PointerButton::Primary,
                distance: Vec2::ZERO,
            };
            self.app
                .world_mut()
                .write_message(Pointer::new(PointerId::Mouse, location(CENTER), event, self.body));
            self.app.update();
        }

        fn drag_state(&self) -> &DragState {
            self.app.world().resource::<DragState>()
        }

        fn translation(&self, entity: Entity) -> Vec3 {
            self.app.world().get::<Transform>(entity).unwrap().translation
        }

        /// World point under `position` on the z = 0 plane
        fn plane_hit(&self, position: Vec2) -> Vec3 {
            pointer_on_plane(
                &viewport_camera(),
                &GlobalTransform::from(camera_transform()),
                position,
                Vec3::ZERO,
            )
            .unwrap()
        }
    }

    #[test]
    fn test_drag_moves_card_root_not_body() {
        let mut scene = drag_scene(ViewMode::TwoD);
        scene.start_drag(scene.body, PointerButton::Primary, CENTER);

        let active = scene.drag_state().active.unwrap();
        assert_eq!(active.card, scene.card);
        // Grabbed at the screen centre (world origin), card origin at x = 0.5
        assert!((active.grab_offset - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-4);

        let target = CENTER + Vec2::new(120.0, -60.0);
        scene.drag_to(target);

        // New world origin is hit + offset; local is relative to the root at x = -0.5
        let expected = scene.plane_hit(target) + Vec3::new(0.5, 0.0, 0.0) - Vec3::new(-0.5, 0.0, 0.0);
        let moved = scene.translation(scene.card);
        assert!((moved - expected).length() < 1e-3);
        assert!(moved.x > 1.0 && moved.y > 0.0);
        assert_eq!(scene.translation(scene.body), Vec3::ZERO);

        scene.end_drag();
        assert!(!scene.drag_state().is_dragging());
    }

    #[test]
    fn test_drag_refused_in_3d() {
        let mut scene = drag_scene(ViewMode::ThreeD);
        scene.start_drag(scene.body, PointerButton::Primary, CENTER);
        assert!(!scene.drag_state().is_dragging());

        scene.drag_to(CENTER + Vec2::new(100.0, 0.0));
        assert_eq!(scene.translation(scene.card), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_drag_needs_primary_button_on_a_handle() {
        let mut scene = drag_scene(ViewMode::TwoD);
        scene.start_drag(scene.body, PointerButton::Secondary, CENTER);
        assert!(!scene.drag_state().is_dragging());

        // The card root itself is not a handle
        scene.start_drag(scene.card, PointerButton::Primary, CENTER);
        assert!(!scene.drag_state().is_dragging());
    }

    #[test]
    fn test_switching_to_3d_ends_drag() {
        let mut scene = drag_scene(ViewMode::TwoD);
        scene.start_drag(scene.body, PointerButton::Primary, CENTER);
        assert!(scene.drag_state().is_dragging());

        scene.app.world_mut().resource_mut::<ViewSettings>().mode = ViewMode::ThreeD;
        scene.app.update();
        assert!(!scene.drag_state().is_dragging());
    }

    #[test]
    fn test_orbit_suspended_during_drag() {
        let mut scene = drag_scene(ViewMode::TwoD);
        scene.start_drag(scene.body, PointerButton::Primary, CENTER);

        let drag = scene.drag_state();
        assert!(drag.is_dragging());
        assert!(!orbit_enabled(ViewMode::ThreeD, drag, false));

        scene.end_drag();
        assert!(orbit_enabled(ViewMode::ThreeD, scene.drag_state(), false));
    }

    #[test]
    fn test_dragged_translation_accounts_for_recentred_parent() {
        // Diagram root shifted by the recentring offset
        let parent = GlobalTransform::from_translation(Vec3::new(-1.0, 0.5, 0.0));
        let hit = Vec3::new(2.0, 2.0, 0.0);
        let grab_offset = Vec3::new(-0.25, 0.1, 0.0);

        let local = dragged_translation(hit, grab_offset, &parent);
        assert!((local - Vec3::new(2.75, 1.6, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_dragged_translation_identity_parent() {
        let local = dragged_translation(Vec3::new(1.0, 2.0, 0.0), Vec3::ZERO, &GlobalTransform::IDENTITY);
        assert_eq!(local, Vec3::new(1.0, 2.0, 0.0));
    }
}
