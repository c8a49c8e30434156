//! Class card layout
//!
//! `build` turns one `ClassDescription` into a `ClassGraphic`: a complete,
//! engine-independent description of the card's parts in card-local
//! coordinates (origin at the centre of the body):
//!
//! ```text
//!   +------------------------------o  hub (0.9 * half extents)
//!   |          Title               |\---[] Attribute 0
//!   |                              | \--[] Attribute 1
//!   |                              |  \-[] Attribute 2
//!   +------------------------------+
//! ```
//!
//! Only the body is pickable; it is the drag handle of the card.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::bounds::Aabb;
use crate::color::Rgb;
use crate::geometry::Outline;
use crate::model::ClassDescription;

/// Hub disks are always red
pub const HUB_COLOR: Rgb = Rgb::new(1.0, 0.0, 0.0);

const DEFAULT_FILL: Rgb = Rgb::new(1.0, 215.0 / 255.0, 0.0);
const DEFAULT_BORDER: Rgb = Rgb::new(0.0, 0.0, 128.0 / 255.0);
const DEFAULT_MARKER: Rgb = Rgb::new(169.0 / 255.0, 169.0 / 255.0, 169.0 / 255.0);

/// Layout constants, all in scene units unless noted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Extrusion depth of the body (z from 0 to depth)
    pub body_depth: f32,
    /// Depth of the border loop, just above the body's front face
    pub border_z: f32,
    /// Depth of labels, hub, markers, and connectors
    pub overlay_z: f32,
    /// Distance of the title below the top edge
    pub title_margin: f32,
    /// Hub position as a fraction of the half extents
    pub hub_fraction: f32,
    pub hub_radius: f32,
    pub hub_segments: u32,
    /// Distance of the first attribute row below the top edge
    pub row_start: f32,
    /// Vertical distance between attribute rows
    pub row_gap: f32,
    /// Gap between the body's right edge and the marker column
    pub marker_column_offset: f32,
    /// Samples per rounded corner
    pub curve_divisions: usize,
    /// Title font size in logical pixels
    pub title_font_size: f32,
    /// Attribute font size in logical pixels
    pub attribute_font_size: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            body_depth: 0.05,
            border_z: 0.051,
            overlay_z: 0.06,
            title_margin: 0.25,
            hub_fraction: 0.9,
            hub_radius: 0.04,
            hub_segments: 32,
            row_start: 0.2,
            row_gap: 0.15,
            marker_column_offset: 0.2,
            curve_divisions: 12,
            title_font_size: 16.0,
            attribute_font_size: 12.0,
        }
    }
}

/// Whether a part takes part in pointer hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickability {
    /// The drag handle of the card
    Handle,
    /// Excluded from hit-testing
    Ignored,
}

impl Pickability {
    pub fn is_pickable(self) -> bool {
        matches!(self, Pickability::Handle)
    }
}

/// Kinds of parts a card is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Body,
    Border,
    Title,
    Hub,
    Marker,
    Connector,
    AttributeLabel,
}

impl PartKind {
    pub fn pickability(self) -> Pickability {
        match self {
            PartKind::Body => Pickability::Handle,
            _ => Pickability::Ignored,
        }
    }

    pub fn is_label(self) -> bool {
        matches!(self, PartKind::Title | PartKind::AttributeLabel)
    }
}

/// Extruded rounded rectangle; the card's drag handle
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Sampled outline polygon at z = 0
    pub outline: Vec<Vec2>,
    pub depth: f32,
    pub color: Rgb,
}

/// Closed line loop tracing the body outline
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub points: Vec<Vec3>,
    pub color: Rgb,
}

/// Which point of the label box sits on the label position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAnchor {
    Center,
    /// Left edge, vertically centred
    LeftMiddle,
}

/// Overlay text label
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vec3,
    pub anchor: LabelAnchor,
    pub font_size: f32,
    pub color: Rgb,
}

/// Anchor disk all connectors start from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hub {
    pub position: Vec3,
    pub radius: f32,
    pub segments: u32,
    pub color: Rgb,
}

/// Box marker in front of an attribute label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    /// Box extents (width, height, width)
    pub size: Vec3,
    pub color: Rgb,
}

/// Straight line from the hub to a marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Rgb,
    pub width: f32,
}

/// One attribute: marker, connector, and label
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRow {
    pub index: usize,
    pub marker: Marker,
    pub connector: Connector,
    pub label: Label,
}

/// Complete layout of one class card
#[derive(Debug, Clone, PartialEq)]
pub struct ClassGraphic {
    pub class_id: Number,
    pub name: String,
    /// Placement of the card root in the shared container
    pub position: Vec3,
    /// Body width and height
    pub size: Vec2,
    pub body: Body,
    pub border: Border,
    pub title: Label,
    pub hub: Hub,
    pub rows: Vec<AttributeRow>,
}

impl ClassGraphic {
    /// All parts in spawn order
    pub fn parts(&self) -> Vec<PartKind> {
        let mut parts = vec![PartKind::Body, PartKind::Border, PartKind::Title, PartKind::Hub];
        for _ in &self.rows {
            parts.extend([PartKind::Marker, PartKind::Connector, PartKind::AttributeLabel]);
        }
        parts
    }

    pub fn part_count(&self) -> usize {
        4 + 3 * self.rows.len()
    }

    /// Marker shapes: the hub plus one box per attribute
    pub fn marker_count(&self) -> usize {
        1 + self.rows.len()
    }

    pub fn connector_count(&self) -> usize {
        self.rows.len()
    }

    /// Title plus one label per attribute
    pub fn label_count(&self) -> usize {
        1 + self.rows.len()
    }

    /// Number of parts excluded from hit-testing
    pub fn pick_excluded_count(&self) -> usize {
        self.parts()
            .into_iter()
            .filter(|part| !part.pickability().is_pickable())
            .count()
    }

    /// Bounds of the card's geometry in card-local space
    ///
    /// Labels are screen-space overlays and are not included.
    pub fn local_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;

        for point in &self.body.outline {
            bounds.extend(point.extend(0.0));
            bounds.extend(point.extend(self.body.depth));
        }
        for point in &self.border.points {
            bounds.extend(*point);
        }

        let hub_half = Vec3::new(self.hub.radius, self.hub.radius, 0.0);
        bounds = bounds.union(&Aabb::from_center_half_extents(self.hub.position, hub_half));

        for row in &self.rows {
            bounds = bounds.union(&Aabb::from_center_half_extents(
                row.marker.position,
                row.marker.size * 0.5,
            ));
            bounds.extend(row.connector.from);
            bounds.extend(row.connector.to);
        }

        bounds
    }

    /// Bounds of the card's geometry in container space
    pub fn container_bounds(&self) -> Aabb {
        self.local_bounds().translated(self.position)
    }
}

/// Build a class card with the default metrics
pub fn build(class: &ClassDescription) -> ClassGraphic {
    build_with(class, &LayoutMetrics::default())
}

/// Build a class card
pub fn build_with(class: &ClassDescription, metrics: &LayoutMetrics) -> ClassGraphic {
    if !class.is_rounded_rectangle() {
        tracing::warn!(
            class = %class.name,
            shape = %class.shape,
            "Unsupported class shape, drawing a rounded rectangle"
        );
    }

    let style = &class.rendering;
    let width = class.size.width;
    let height = class.size.height;
    let half = Vec2::new(width / 2.0, height / 2.0);

    let fill = Rgb::parse_or(&style.class.color, DEFAULT_FILL);
    let border_color = Rgb::parse_or(&style.class.border_color, DEFAULT_BORDER);
    let marker_color = Rgb::parse_or(&style.attributes.checkbox_color, DEFAULT_MARKER);
    let line_color = Rgb::parse_or(&style.connections.line_color, Rgb::BLACK);
    let text_color = Rgb::parse_or(&style.text_color, Rgb::BLACK);

    // Body and border share one sampled outline
    let outline = Outline::rounded_rect(width, height, style.class.corner_radius)
        .sample(metrics.curve_divisions);
    let border_points = outline
        .iter()
        .map(|p| p.extend(metrics.border_z))
        .collect();

    let title = Label {
        text: class.name.clone(),
        position: Vec3::new(0.0, half.y - metrics.title_margin, metrics.overlay_z),
        anchor: LabelAnchor::Center,
        font_size: metrics.title_font_size,
        color: text_color,
    };

    let hub = Hub {
        position: (half * metrics.hub_fraction).extend(metrics.overlay_z),
        radius: metrics.hub_radius,
        segments: metrics.hub_segments,
        color: HUB_COLOR,
    };

    let marker_width = style.attributes.size.width;
    let marker_height = style.attributes.size.effective_height();
    let marker_x = half.x + metrics.marker_column_offset + marker_width / 2.0;
    let start_y = half.y - metrics.row_start;

    let rows = class
        .attributes
        .iter()
        .enumerate()
        .map(|(index, attribute)| {
            let y = start_y - index as f32 * metrics.row_gap;
            let marker_position = Vec3::new(marker_x, y, metrics.overlay_z);

            AttributeRow {
                index,
                marker: Marker {
                    position: marker_position,
                    size: Vec3::new(marker_width, marker_height, marker_width),
                    color: marker_color,
                },
                connector: Connector {
                    from: hub.position,
                    to: marker_position,
                    color: line_color,
                    width: style.connections.line_width,
                },
                label: Label {
                    text: attribute.clone(),
                    position: Vec3::new(marker_x + marker_width, y, metrics.overlay_z),
                    anchor: LabelAnchor::LeftMiddle,
                    font_size: metrics.attribute_font_size,
                    color: text_color,
                },
            }
        })
        .collect();

    ClassGraphic {
        class_id: class.id.clone(),
        name: class.name.clone(),
        position: Vec3::new(class.position.x, class.position.y, class.position.z),
        size: Vec2::new(width, height),
        body: Body {
            outline,
            depth: metrics.body_depth,
            color: fill,
        },
        border: Border {
            points: border_points,
            color: border_color,
        },
        title,
        hub,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::fallback_document;
    use crate::model::{Position, Size};

    fn class_with(attributes: &[&str], width: f32, height: f32) -> ClassDescription {
        let mut class = fallback_document().hypergraph.classes.remove(0);
        class.attributes = attributes.iter().map(|a| a.to_string()).collect();
        class.size = Size { width, height };
        class.position = Position { x: 3.0, y: -1.0, z: 0.5 };
        class
    }

    #[test]
    fn test_two_attribute_card() {
        let graphic = build(&class_with(&["A", "B"], 2.0, 2.0));

        assert_eq!(graphic.parts().iter().filter(|p| **p == PartKind::Body).count(), 1);
        assert_eq!(graphic.parts().iter().filter(|p| **p == PartKind::Title).count(), 1);
        assert_eq!(graphic.parts().iter().filter(|p| **p == PartKind::Hub).count(), 1);
        assert_eq!(graphic.rows.len(), 2);
        assert_eq!(graphic.marker_count(), 3);
        assert_eq!(graphic.connector_count(), 2);
        assert_eq!(graphic.label_count(), 3);

        assert!((graphic.hub.position.x - 0.9).abs() < 1e-6);
        assert!((graphic.hub.position.y - 0.9).abs() < 1e-6);
        assert!(graphic.rows[0].marker.position.y > graphic.rows[1].marker.position.y);
        assert_eq!(graphic.rows[0].label.text, "A");
        assert_eq!(graphic.rows[1].label.text, "B");
    }

    #[test]
    fn test_rows_strictly_decrease_by_gap() {
        let metrics = LayoutMetrics::default();
        let attributes: Vec<String> = (0..20).map(|i| format!("attr{i}")).collect();
        let refs: Vec<&str> = attributes.iter().map(String::as_str).collect();
        let graphic = build(&class_with(&refs, 2.2, 3.8));

        for pair in graphic.rows.windows(2) {
            let dy = pair[0].marker.position.y - pair[1].marker.position.y;
            assert!(dy > 0.0);
            assert!((dy - metrics.row_gap).abs() < 1e-5);
        }
        // Twenty rows overflow a 3.8-tall body; this is accepted
        assert!(graphic.rows[19].marker.position.y < -1.9);
    }

    #[test]
    fn test_only_body_is_pickable() {
        let graphic = build(&class_with(&["A", "B", "C"], 2.0, 1.0));
        let pickable: Vec<_> = graphic
            .parts()
            .into_iter()
            .filter(|p| p.pickability().is_pickable())
            .collect();
        assert_eq!(pickable, vec![PartKind::Body]);
        assert_eq!(graphic.pick_excluded_count(), graphic.part_count() - 1);
        assert_eq!(graphic.parts().len(), graphic.part_count());
    }

    #[test]
    fn test_zero_attributes() {
        let graphic = build(&class_with(&[], 2.0, 1.0));
        assert!(graphic.rows.is_empty());
        assert_eq!(graphic.parts(), vec![PartKind::Body, PartKind::Border, PartKind::Title, PartKind::Hub]);
        assert_eq!(graphic.marker_count(), 1);
        assert_eq!(graphic.connector_count(), 0);
    }

    #[test]
    fn test_connectors_run_from_hub_to_marker() {
        let graphic = build(&class_with(&["A", "B"], 2.0, 2.0));
        for row in &graphic.rows {
            assert_eq!(row.connector.from, graphic.hub.position);
            assert_eq!(row.connector.to, row.marker.position);
        }
    }

    #[test]
    fn test_marker_and_label_columns() {
        let metrics = LayoutMetrics::default();
        let graphic = build(&class_with(&["A"], 2.0, 2.0));
        let row = &graphic.rows[0];

        // Marker sits right of the body's right edge
        assert!(row.marker.position.x - row.marker.size.x / 2.0 > 1.0);
        assert!((row.marker.position.y - (1.0 - metrics.row_start)).abs() < 1e-6);
        assert!(row.label.position.x > row.marker.position.x);
        assert_eq!(row.label.position.y, row.marker.position.y);
        assert_eq!(row.label.anchor, LabelAnchor::LeftMiddle);
        assert_eq!(row.label.font_size, metrics.attribute_font_size);
    }

    #[test]
    fn test_title_and_depth_layers() {
        let metrics = LayoutMetrics::default();
        let graphic = build(&class_with(&["A"], 2.0, 3.0));

        assert_eq!(graphic.title.position, Vec3::new(0.0, 1.5 - metrics.title_margin, metrics.overlay_z));
        assert_eq!(graphic.title.anchor, LabelAnchor::Center);
        assert!(graphic.border.points.iter().all(|p| p.z > graphic.body.depth));
        assert!(graphic.hub.position.z > metrics.border_z);
    }

    #[test]
    fn test_styles_are_resolved() {
        let graphic = build(&class_with(&["A"], 2.0, 2.0));
        assert_eq!(graphic.body.color, Rgb::parse("#FFD700").unwrap());
        assert_eq!(graphic.border.color, Rgb::parse("#000080").unwrap());
        assert_eq!(graphic.rows[0].marker.color, Rgb::parse("#A9A9A9").unwrap());
        assert_eq!(graphic.hub.color, HUB_COLOR);
    }

    #[test]
    fn test_invalid_colour_uses_slot_default() {
        let mut class = class_with(&["A"], 2.0, 2.0);
        class.rendering.class.color = "not-a-colour".to_string();
        let graphic = build(&class);
        assert_eq!(graphic.body.color, DEFAULT_FILL);
    }

    #[test]
    fn test_marker_height_defaults_to_width() {
        let mut class = class_with(&["A"], 2.0, 2.0);
        class.rendering.attributes.size.width = 0.2;
        class.rendering.attributes.size.height = None;
        let graphic = build(&class);
        assert_eq!(graphic.rows[0].marker.size, Vec3::new(0.2, 0.2, 0.2));
    }

    #[test]
    fn test_bounds_cover_body_and_markers() {
        let graphic = build(&class_with(&["A", "B"], 2.0, 2.0));
        let local = graphic.local_bounds();
        assert!(local.min.x <= -1.0 + 1e-5);
        assert!(local.max.x >= graphic.rows[0].marker.position.x);
        assert_eq!(local.min.z, 0.0);

        let container = graphic.container_bounds();
        assert_eq!(container.min, local.min + graphic.position);
        assert_eq!(graphic.position, Vec3::new(3.0, -1.0, 0.5));
    }

    #[test]
    fn test_build_is_deterministic() {
        let class = class_with(&["A", "B", "A"], 2.0, 2.0);
        assert_eq!(build(&class), build(&class));
    }

    #[test]
    fn test_unknown_shape_still_builds() {
        let mut class = class_with(&["A"], 2.0, 2.0);
        class.shape = "hexagon".to_string();
        assert_eq!(build(&class).rows.len(), 1);
    }
}
