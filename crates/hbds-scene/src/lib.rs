//! HBDS Scene - Bevy rendering and interaction for class diagrams
//!
//! This crate turns an `hbds_core::Document` into ECS entities: one card per
//! class under a shared, recentred root, overlay labels that follow the
//! cards, an orbit camera with a 2D framing mode, and card dragging through
//! `bevy_picking`.

pub mod camera;
pub mod diagram;
pub mod drag;
pub mod labels;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the diagram scene, camera, and interaction
pub struct HbdsScenePlugin;

impl Plugin for HbdsScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewSettings>()
            .add_plugins(diagram::DiagramPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(labels::LabelsPlugin)
            .add_plugins(drag::DragPlugin);
    }
}

// Re-export commonly used types
pub use camera::{CameraSettings, MainCamera};
pub use diagram::{CardHandle, ClassCard, DiagramRoot};
pub use types::*;
