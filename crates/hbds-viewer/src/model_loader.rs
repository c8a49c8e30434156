//! Model requests and load completion
//!
//! Selecting a model issues a `ModelRequest`. Each request takes a
//! `LoadTicket`; the fetch (browser `fetch` on the web, a file read on
//! native) deposits its result into a shared pending list that an `Update`
//! system drains. Only the completion holding the latest ticket is applied,
//! so a slow earlier load can never replace a newer selection.

use bevy::prelude::*;
use hbds_core::loader::{model_path, resolve_fetch, LoadError};
use hbds_core::{LoadGeneration, LoadTicket};
use hbds_scene::DiagramDocument;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Request to (re)load the model with the given name
#[derive(Message, Debug, Clone)]
pub struct ModelRequest(pub String);

/// Raw outcome of one fetch
#[derive(Debug)]
pub struct CompletedLoad {
    pub ticket: LoadTicket,
    pub name: String,
    pub result: Result<String, LoadError>,
}

pub type PendingLoads = Arc<Mutex<Vec<CompletedLoad>>>;

/// Model selection and in-flight loads
#[derive(Resource)]
pub struct ModelLoadState {
    /// Directory or URL prefix holding `<name>.json`
    pub base: String,
    /// Models offered by the selector
    pub available: Vec<String>,
    /// Most recently requested model
    pub selected: String,
    pub loading: bool,
    generation: LoadGeneration,
    pending: PendingLoads,
}

impl ModelLoadState {
    pub fn new(base: impl Into<String>, available: Vec<String>, selected: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            available,
            selected: selected.into(),
            loading: false,
            generation: LoadGeneration::new(),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start loading `name`, superseding any load in flight
    pub fn request(&mut self, name: &str) -> LoadTicket {
        let ticket = self.generation.begin();
        self.selected = name.to_string();
        self.loading = true;
        info!(model = %name, ticket = ticket.id(), "Requesting model");
        fetch_model(
            model_path(&self.base, name),
            ticket,
            name.to_string(),
            self.pending.clone(),
        );
        ticket
    }

    fn take_completed(&self) -> Vec<CompletedLoad> {
        // Take the results and drop the lock immediately
        match self.pending.try_lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => Vec::new(),
        }
    }
}

/// Keep the completion for the current ticket, dropping superseded ones
pub fn select_current(
    generation: &LoadGeneration,
    completed: Vec<CompletedLoad>,
) -> Option<CompletedLoad> {
    let mut current = None;
    for load in completed {
        if generation.is_current(load.ticket) {
            current = Some(load);
        } else {
            debug!(
                model = %load.name,
                ticket = load.ticket.id(),
                "Discarding superseded model load"
            );
        }
    }
    current
}

/// Plugin for the model request pipeline
pub struct ModelLoaderPlugin;

impl Plugin for ModelLoaderPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ModelRequest>()
            .init_resource::<DiagramDocument>()
            .add_systems(Update, (handle_model_requests, apply_completed_loads).chain());
    }
}

fn handle_model_requests(mut requests: MessageReader<ModelRequest>, mut state: ResMut<ModelLoadState>) {
    for ModelRequest(name) in requests.read() {
        state.request(name);
    }
}

fn apply_completed_loads(mut state: ResMut<ModelLoadState>, mut diagram: ResMut<DiagramDocument>) {
    let completed = state.take_completed();
    if completed.is_empty() {
        return;
    }

    let Some(load) = select_current(&state.generation, completed) else {
        return;
    };

    state.loading = false;
    let document = resolve_fetch(&load.name, load.result);
    *diagram = DiagramDocument::new(load.name, document);
}

/// Fetch a model document over HTTP (async via wasm_bindgen_futures)
#[cfg(target_arch = "wasm32")]
fn fetch_model(location: String, ticket: LoadTicket, name: String, pending: PendingLoads) {
    use wasm_bindgen::JsCast;

    wasm_bindgen_futures::spawn_local(async move {
        let result = async {
            let window =
                web_sys::window().ok_or_else(|| LoadError::Transport("No window".to_string()))?;

            let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(&location))
                .await
                .map_err(|e| LoadError::Transport(format!("Fetch failed: {:?}", e)))?;

            let resp: web_sys::Response = resp
                .dyn_into()
                .map_err(|_| LoadError::Transport("Response cast failed".to_string()))?;

            if !resp.ok() {
                return Err(LoadError::Status {
                    status: resp.status(),
                    text: resp.status_text(),
                });
            }

            let text = wasm_bindgen_futures::JsFuture::from(
                resp.text()
                    .map_err(|_| LoadError::Transport("Failed to get text".to_string()))?,
            )
            .await
            .map_err(|e| LoadError::Transport(format!("Text extraction failed: {:?}", e)))?;

            text.as_string()
                .ok_or_else(|| LoadError::Transport("Not a string".to_string()))
        }
        .await;

        if let Ok(mut pending) = pending.lock() {
            pending.push(CompletedLoad { ticket, name, result });
        }
    });
}

/// Read a model document from the filesystem
#[cfg(not(target_arch = "wasm32"))]
fn fetch_model(location: String, ticket: LoadTicket, name: String, pending: PendingLoads) {
    use hbds_core::{FileSource, ModelSource};

    let result = FileSource.fetch(&location);
    if let Ok(mut pending) = pending.lock() {
        pending.push(CompletedLoad { ticket, name, result });
    }
}
