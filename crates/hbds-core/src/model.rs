//! Class document model
//!
//! Documents are JSON of the form `{ "hypergraph": { "class": [ ... ] } }`.
//! Field names follow the JSON exactly so a parsed document serializes back
//! to the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Shape tag for the only implemented card shape
pub const ROUNDED_RECTANGLE: &str = "roundedRectangle";

/// Top-level model document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub hypergraph: Hypergraph,
    /// Fields this viewer does not interpret, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Container for the classes of a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hypergraph {
    /// Classes in document order
    #[serde(rename = "class", default)]
    pub classes: Vec<ClassDescription>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One data-model class (rendered as a class card)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescription {
    /// Any JSON number, kept exactly as written
    pub id: Number,
    pub name: String,
    /// Shape tag; only `roundedRectangle` is implemented
    #[serde(rename = "type")]
    pub shape: String,
    /// Attribute names, top to bottom
    pub attributes: Vec<String>,
    pub position: Position,
    pub size: Size,
    pub rendering: Rendering,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Placement of a card root in the shared container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Width and height of a card body in scene units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Styling for a class card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendering {
    pub class: ClassStyle,
    pub attributes: AttributeStyle,
    pub connections: ConnectionStyle,
    pub text_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStyle {
    pub color: String,
    pub border_color: String,
    pub corner_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeStyle {
    /// Fill colour of the attribute marker boxes
    pub checkbox_color: String,
    pub size: MarkerSize,
}

/// Attribute marker box size; height falls back to width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSize {
    pub width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl MarkerSize {
    pub fn effective_height(&self) -> f32 {
        self.height.unwrap_or(self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStyle {
    pub line_color: String,
    pub line_width: f32,
}

impl Document {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn classes(&self) -> &[ClassDescription] {
        &self.hypergraph.classes
    }

    pub fn is_empty(&self) -> bool {
        self.hypergraph.classes.is_empty()
    }
}

impl ClassDescription {
    pub fn is_rounded_rectangle(&self) -> bool {
        self.shape == ROUNDED_RECTANGLE
    }
}
