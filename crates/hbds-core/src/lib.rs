//! HBDS Core - Class documents, model loading, and card layout
//!
//! This crate provides the engine-independent pieces of the HBDS viewer:
//! - Class document model (`{ hypergraph: { class: [...] } }`) and JSON parsing
//! - Model loading with a built-in fallback document
//! - Class card layout (body, border, title, hub, attribute rows)
//! - Outline and extrusion geometry for the card body
//! - Bounds, recentring, and camera framing math
//! - Load generations for discarding superseded loads
//! - Viewer configuration

pub mod bounds;
pub mod color;
pub mod config;
pub mod generation;
pub mod geometry;
pub mod layout;
pub mod loader;
pub mod model;

pub use bounds::{Aabb, Sphere};
pub use color::{ColorError, Rgb};
pub use config::{Config, ConfigError};
pub use generation::{LoadGeneration, LoadTicket};
pub use layout::{build, build_with, ClassGraphic, LayoutMetrics, Pickability};
pub use loader::{fallback_document, FileSource, LoadError, ModelLoader, ModelSource};
pub use model::{ClassDescription, Document};
