//! Overlay text labels kept in registration with the 3D scene

use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;
use bevy::ui::UiSystems;
use hbds_core::layout::LabelAnchor;

use crate::camera::MainCamera;

/// UI text node following a point on a class card
#[derive(Component, Debug, Clone, Copy)]
pub struct OverlayLabel {
    /// Card root the label belongs to
    pub card: Entity,
    /// Card-local position of the anchor point
    pub offset: Vec3,
    pub anchor: LabelAnchor,
}

/// Plugin that reprojects overlay labels every frame
///
/// Labels are placed before UI layout runs, from the `Transform` chains of
/// the camera and the cards, so they land in the same frame as the meshes.
pub struct LabelsPlugin;

impl Plugin for LabelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostUpdate, position_overlay_labels.before(UiSystems::Layout));
    }
}

/// Top-left corner of a label box of `size` whose anchor lands on `screen`
pub fn label_origin(screen: Vec2, size: Vec2, anchor: LabelAnchor) -> Vec2 {
    match anchor {
        LabelAnchor::Center => screen - size * 0.5,
        LabelAnchor::LeftMiddle => screen - Vec2::new(0.0, size.y * 0.5),
    }
}

fn position_overlay_labels(
    camera_query: Query<(Entity, &Camera), With<MainCamera>>,
    transforms: TransformHelper,
    mut labels: Query<(&OverlayLabel, &mut Node, &ComputedNode, &mut Visibility)>,
) {
    let Ok((camera_entity, camera)) = camera_query.single() else {
        return;
    };
    let Ok(camera_transform) = transforms.compute_global_transform(camera_entity) else {
        return;
    };

    for (label, mut node, computed, mut visibility) in labels.iter_mut() {
        let Ok(card_transform) = transforms.compute_global_transform(label.card) else {
            continue;
        };

        let world = card_transform.transform_point(label.offset);
        match camera.world_to_viewport(&camera_transform, world) {
            Ok(screen) => {
                let size = computed.size() * computed.inverse_scale_factor();
                let origin = label_origin(screen, size, label.anchor);
                node.left = Val::Px(origin.x);
                node.top = Val::Px(origin.y);
                visibility.set_if_neq(Visibility::Inherited);
            }
            Err(_) => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::camera::RenderTargetInfo;

    #[test]
    fn test_centered_label_origin() {
        let origin = label_origin(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0), LabelAnchor::Center);
        assert_eq!(origin, Vec2::new(80.0, 40.0));
    }

    #[test]
    fn test_left_middle_label_origin() {
        let origin = label_origin(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0), LabelAnchor::LeftMiddle);
        assert_eq!(origin, Vec2::new(100.0, 40.0));
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

    fn px(val: Val) -> f32 {
        match val {
            Val::Px(value) => value,
            other => panic!("expected pixels, got {other:?}"),
        }
    }

    #[test]
    fn test_labels_follow_this_frames_transforms() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(LabelsPlugin);

        // GlobalTransforms are never propagated here, so only the current
        // Transform chain can place the label
        let camera_transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        app.world_mut().spawn((viewport_camera(), camera_transform, MainCamera));
        let root = app.world_mut().spawn(Transform::from_xyz(0.5, 0.0, 0.0)).id();
        let card = app
            .world_mut()
            .spawn((Transform::from_xyz(-0.5, 0.0, 0.0), ChildOf(root)))
            .id();
        let label = app
            .world_mut()
            .spawn((
                Node::default(),
                ComputedNode::default(),
                Visibility::Hidden,
                OverlayLabel {
                    card,
                    offset: Vec3::ZERO,
                    anchor: LabelAnchor::Center,
                },
            ))
            .id();

        app.update();
        let node = app.world().get::<Node>(label).unwrap();
        assert!((px(node.left) - 400.0).abs() < 1e-3);
        assert!((px(node.top) - 400.0).abs() < 1e-3);
        assert_eq!(app.world().get::<Visibility>(label), Some(&Visibility::Inherited));

        // Move the card; the label must land in the same update
        app.world_mut().get_mut::<Transform>(card).unwrap().translation.x = 1.5;
        app.update();

        let expected = viewport_camera()
            .world_to_viewport(&GlobalTransform::from(camera_transform), Vec3::new(2.0, 0.0, 0.0))
            .unwrap();
        let node = app.world().get::<Node>(label).unwrap();
        assert!(expected.x > 400.0);
        assert!((px(node.left) - expected.x).abs() < 1e-3);
        assert!((px(node.top) - expected.y).abs() < 1e-3);
    }

    #[test]
    fn test_label_behind_camera_is_hidden() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(LabelsPlugin);

        let camera_transform = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        app.world_mut().spawn((viewport_camera(), camera_transform, MainCamera));
        let card = app.world_mut().spawn(Transform::from_xyz(0.0, 0.0, 20.0)).id();
        let label = app
            .world_mut()
            .spawn((
                Node::default(),
                ComputedNode::default(),
                Visibility::Inherited,
                OverlayLabel {
                    card,
                    offset: Vec3::ZERO,
                    anchor: LabelAnchor::LeftMiddle,
                },
            ))
            .id();

        app.update();
        assert_eq!(app.world().get::<Visibility>(label), Some(&Visibility::Hidden));
    }
}
