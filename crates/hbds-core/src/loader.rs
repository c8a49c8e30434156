//! Model loading with a built-in fallback
//!
//! Models are addressed by name and resolved to `<base>/<name>.json`. A load
//! never fails to the caller: transport errors, non-success statuses, and
//! malformed documents are logged and replaced by the fallback document, a
//! single "Human" class.

use serde_json::{Map, Number};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::{
    AttributeStyle, ClassDescription, ClassStyle, ConnectionStyle, Document, Hypergraph,
    MarkerSize, Position, Rendering, Size, ROUNDED_RECTANGLE,
};

/// Default location of model documents
pub const MODELS_DIR: &str = "./models";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request failed with status {status}: {text}")]
    Status { status: u16, text: String },
    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Location of model `name` under `base`
pub fn model_path(base: &str, name: &str) -> String {
    format!("{}/{}.json", base.trim_end_matches('/'), name)
}

/// Something that can retrieve the text of a model document
pub trait ModelSource {
    fn fetch(&self, location: &str) -> Result<String, LoadError>;
}

/// Reads model documents from the filesystem
#[derive(Debug, Clone, Default)]
pub struct FileSource;

impl ModelSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String, LoadError> {
        Ok(std::fs::read_to_string(PathBuf::from(location))?)
    }
}

/// Resolves model names to documents through a `ModelSource`
#[derive(Debug, Clone)]
pub struct ModelLoader<S> {
    source: S,
    base: String,
}

impl ModelLoader<FileSource> {
    /// Loader reading from the default models directory
    pub fn from_dir(base: impl Into<String>) -> Self {
        Self::new(FileSource, base)
    }
}

impl<S: ModelSource> ModelLoader<S> {
    pub fn new(source: S, base: impl Into<String>) -> Self {
        Self {
            source,
            base: base.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Load a model, returning the underlying error on failure
    pub fn try_load(&self, name: &str) -> Result<Document, LoadError> {
        let location = model_path(&self.base, name);
        let text = self.source.fetch(&location)?;
        parse_document(&text)
    }

    /// Load a model, substituting the fallback document on any failure
    pub fn load(&self, name: &str) -> Document {
        resolve(name, self.try_load(name))
    }
}

pub fn parse_document(text: &str) -> Result<Document, LoadError> {
    Ok(Document::from_json(text)?)
}

/// Apply the fallback policy to the body of a fetch performed elsewhere
pub fn resolve_fetch(name: &str, fetched: Result<String, LoadError>) -> Document {
    resolve(name, fetched.and_then(|text| parse_document(&text)))
}

fn resolve(name: &str, result: Result<Document, LoadError>) -> Document {
    match result {
        Ok(document) => {
            info!(model = %name, classes = document.classes().len(), "Loaded model");
            document
        }
        Err(e) => {
            warn!(model = %name, error = %e, "Failed to load model, using fallback");
            fallback_document()
        }
    }
}

/// The built-in "Human" document
pub fn fallback_document() -> Document {
    let attributes = [
        "Last name",
        "First name",
        "Middle name",
        "Age",
        "Weight",
        "Height",
        "Sex",
        "Date of birth",
        "Place of birth",
        "Nationality",
        "Marital status",
        "Occupation",
        "Education level",
        "Address",
        "Phone number",
        "Email",
    ];

    Document {
        hypergraph: Hypergraph {
            classes: vec![ClassDescription {
                id: Number::from(1),
                name: "Human".to_string(),
                shape: ROUNDED_RECTANGLE.to_string(),
                attributes: attributes.iter().map(|a| a.to_string()).collect(),
                position: Position::default(),
                size: Size {
                    width: 2.2,
                    height: 3.8,
                },
                rendering: Rendering {
                    class: ClassStyle {
                        color: "#FFD700".to_string(),
                        border_color: "#000080".to_string(),
                        corner_radius: 0.1,
                    },
                    attributes: AttributeStyle {
                        checkbox_color: "#A9A9A9".to_string(),
                        size: MarkerSize {
                            width: 0.1,
                            height: Some(0.1),
                        },
                    },
                    connections: ConnectionStyle {
                        line_color: "#000000".to_string(),
                        line_width: 0.01,
                    },
                    text_color: "#000000".to_string(),
                },
                extra: Map::new(),
            }],
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const LIBRARY: &str = r##"{
        "hypergraph": {
            "class": [
                {
                    "id": 1, "name": "Book", "type": "roundedRectangle",
                    "attributes": ["Title", "ISBN"],
                    "position": {"x": -2, "y": 0, "z": 0},
                    "size": {"width": 2, "height": 1.5},
                    "rendering": {
                        "class": {"color": "#87CEEB", "borderColor": "#000080", "cornerRadius": 0.1},
                        "attributes": {"checkboxColor": "#A9A9A9", "size": {"width": 0.1}},
                        "connections": {"lineColor": "#000000", "lineWidth": 0.01},
                        "textColor": "#000000"
                    }
                }
            ]
        }
    }"##;

    /// Source returning a canned result and recording requested locations
    struct CannedSource {
        result: fn() -> Result<String, LoadError>,
        requested: RefCell<Vec<String>>,
    }

    impl ModelSource for CannedSource {
        fn fetch(&self, location: &str) -> Result<String, LoadError> {
            self.requested.borrow_mut().push(location.to_string());
            (self.result)()
        }
    }

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("./models", "human"), "./models/human.json");
        assert_eq!(model_path("https://host/models/", "x"), "https://host/models/x.json");
    }

    #[test]
    fn test_missing_file_returns_fallback() {
        let dir = TempDir::new().unwrap();
        let loader = ModelLoader::from_dir(dir.path().to_string_lossy());

        assert!(matches!(loader.try_load("nonexistent"), Err(LoadError::Io(_))));
        assert_eq!(loader.load("nonexistent"), fallback_document());
    }

    #[test]
    fn test_well_formed_file_is_returned_unmodified() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("library.json"), LIBRARY).unwrap();
        let loader = ModelLoader::from_dir(dir.path().to_string_lossy());

        let document = loader.load("library");
        assert_eq!(document, Document::from_json(LIBRARY).unwrap());
        assert_eq!(document.classes()[0].name, "Book");
        assert_eq!(document.classes()[0].rendering.attributes.size.height, None);
    }

    #[test]
    fn test_any_numeric_id_loads() {
        let dir = TempDir::new().unwrap();
        let loader = ModelLoader::from_dir(dir.path().to_string_lossy());

        for id in ["1", "-1", "2.5"] {
            let text = LIBRARY.replace(r#""id": 1"#, &format!(r#""id": {}"#, id));
            std::fs::write(dir.path().join("library.json"), &text).unwrap();

            let document = loader.try_load("library").unwrap();
            assert_eq!(document.classes()[0].name, "Book");
            assert_eq!(document.classes()[0].id.to_string(), id);
            assert_eq!(loader.load("library"), document);
        }
    }

    #[test]
    fn test_unknown_fields_are_kept() {
        let dir = TempDir::new().unwrap();
        let text = LIBRARY
            .replacen(r#""hypergraph": {"#, r#""version": 2, "hypergraph": { "name": "Library","#, 1)
            .replace(r#""name": "Book","#, r#""name": "Book", "note": "loanable","#);
        std::fs::write(dir.path().join("library.json"), &text).unwrap();
        let loader = ModelLoader::from_dir(dir.path().to_string_lossy());

        let document = loader.load("library");
        assert_eq!(document.extra["version"], 2);
        assert_eq!(document.hypergraph.extra["name"], "Library");
        assert_eq!(document.classes()[0].extra["note"], "loanable");

        let original: serde_json::Value = serde_json::from_str(&text).unwrap();
        let reserialized: serde_json::Value =
            serde_json::from_str(&document.to_json().unwrap()).unwrap();
        assert_eq!(reserialized["version"], original["version"]);
        assert_eq!(reserialized["hypergraph"]["name"], original["hypergraph"]["name"]);
        assert_eq!(
            reserialized["hypergraph"]["class"][0]["note"],
            original["hypergraph"]["class"][0]["note"]
        );
    }

    #[test]
    fn test_malformed_file_returns_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ \"hypergraph\": ").unwrap();
        let loader = ModelLoader::from_dir(dir.path().to_string_lossy());

        assert!(matches!(loader.try_load("broken"), Err(LoadError::Parse(_))));
        assert_eq!(loader.load("broken"), fallback_document());
    }

    #[test]
    fn test_status_error_returns_fallback() {
        let source = CannedSource {
            result: || {
                Err(LoadError::Status {
                    status: 404,
                    text: "Not Found".to_string(),
                })
            },
            requested: RefCell::new(Vec::new()),
        };
        let loader = ModelLoader::new(source, "./models");

        assert_eq!(loader.load("missing"), fallback_document());
        assert_eq!(loader.source.requested.borrow().as_slice(), ["./models/missing.json"]);
    }

    #[test]
    fn test_resolve_fetch() {
        let ok = resolve_fetch("library", Ok(LIBRARY.to_string()));
        assert_eq!(ok.classes().len(), 1);

        let failed = resolve_fetch("library", Err(LoadError::Transport("offline".to_string())));
        assert_eq!(failed, fallback_document());
    }

    #[test]
    fn test_fallback_document() {
        let document = fallback_document();
        assert_eq!(document.classes().len(), 1);

        let human = &document.classes()[0];
        assert_eq!(human.name, "Human");
        assert_eq!(human.attributes.len(), 16);
        assert_eq!(human.attributes[0], "Last name");
        assert_eq!(human.attributes[15], "Email");
        assert_eq!(human.size.width, 2.2);
        assert!(human.is_rounded_rectangle());
    }
}
