//! HBDS Viewer - Interactive class diagram visualization
//!
//! Loads a class document by name (`./models/<name>.json`), renders one card
//! per class, and offers a model selector and a 2D/3D view toggle. Runs in
//! the browser (WASM entry point below) or natively (`src/main.rs`).

pub mod app;
pub mod model_loader;
pub mod ui;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    // Models are served next to the page; there is no config file on the web
    app::run(hbds_core::Config::default(), None);
}
