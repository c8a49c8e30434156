//! Shared resources for the diagram scene, view mode, and interaction state

use bevy::prelude::*;
use hbds_core::config::ViewConfig;
use hbds_core::{Aabb, Document, LayoutMetrics, Rgb, Sphere};
use serde::{Deserialize, Serialize};

/// How the user looks at the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Camera locked facing the diagram plane; cards can be dragged
    #[default]
    TwoD,
    /// Free orbit; dragging is disabled
    ThreeD,
}

impl ViewMode {
    pub fn from_3d_flag(is_3d: bool) -> Self {
        if is_3d {
            ViewMode::ThreeD
        } else {
            ViewMode::TwoD
        }
    }

    pub fn is_3d(self) -> bool {
        matches!(self, ViewMode::ThreeD)
    }

    pub fn allows_orbit(self) -> bool {
        self.is_3d()
    }

    pub fn allows_drag(self) -> bool {
        !self.is_3d()
    }
}

/// View settings (mode, projection, framing)
#[derive(Debug, Clone, Resource)]
pub struct ViewSettings {
    pub mode: ViewMode,
    pub fov_degrees: f32,
    /// Camera distance when there is nothing to frame
    pub default_distance: f32,
    pub framing_margin: f32,
    pub background: Rgb,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

impl ViewSettings {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            mode: ViewMode::from_3d_flag(config.start_in_3d),
            fov_degrees: config.fov_degrees,
            default_distance: config.default_distance,
            framing_margin: config.framing_margin,
            background: Rgb::parse_or(&config.background, Rgb::new(0.94, 0.94, 0.94)),
        }
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

/// The document currently shown; replacing it rebuilds the diagram
#[derive(Debug, Clone, Resource, Default)]
pub struct DiagramDocument {
    pub model_name: String,
    pub document: Option<Document>,
}

impl DiagramDocument {
    pub fn new(model_name: impl Into<String>, document: Document) -> Self {
        Self {
            model_name: model_name.into(),
            document: Some(document),
        }
    }

    pub fn class_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.classes().len())
    }
}

/// Layout metrics used when building class cards
#[derive(Debug, Clone, Resource, Default)]
pub struct DiagramLayout(pub LayoutMetrics);

/// Bounds of the assembled diagram before recentring
#[derive(Debug, Clone, Copy, Resource, Default)]
pub struct DiagramBounds {
    pub aabb: Aabb,
    /// Bounding sphere after recentring; radius 0 for an empty diagram
    pub sphere: Sphere,
}

/// Card drag in progress
#[derive(Debug, Clone, Copy)]
pub struct ActiveDrag {
    /// Card root being moved
    pub card: Entity,
    /// World-space point on the drag plane
    pub plane_point: Vec3,
    /// Card origin minus the grabbed point on the plane
    pub grab_offset: Vec3,
}

/// Drag state; orbit is suspended while a drag is active
#[derive(Debug, Clone, Resource, Default)]
pub struct DragState {
    pub active: Option<ActiveDrag>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

/// Convert a core colour to a Bevy colour
pub fn to_color(rgb: Rgb) -> Color {
    Color::srgb(rgb.r, rgb.g, rgb.b)
}
