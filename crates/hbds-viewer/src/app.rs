//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use hbds_core::Config;
use hbds_scene::{DiagramLayout, HbdsScenePlugin, ViewSettings};

use crate::model_loader::{ModelLoadState, ModelLoaderPlugin, ModelRequest};
use crate::ui::UiPlugin;

/// Model to load at startup
#[derive(Debug, Clone, Resource)]
struct InitialModel(String);

/// Run the Bevy application
pub fn run(config: Config, initial_model: Option<String>) {
    let initial = initial_model
        .or_else(model_from_url)
        .unwrap_or_else(|| config.models.default.clone());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "HBDS Class Diagram Viewer".to_string(),
                canvas: Some("#hbds-canvas".to_string()),
                fit_canvas_to_parent: true,
                prevent_default_event_handling: false,
                ..default()
            }),
            ..default()
        }))
        // bevy_picking must be added before EguiPlugin so egui can detect it;
        // MeshPickingPlugin provides the 3D mesh raycasting backend
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(ViewSettings::from_config(&config.view))
        .insert_resource(DiagramLayout(config.layout.clone()))
        .insert_resource(ModelLoadState::new(
            config.models.base.clone(),
            config.models.available.clone(),
            initial.clone(),
        ))
        .insert_resource(InitialModel(initial))
        .add_plugins(HbdsScenePlugin)
        .add_plugins(ModelLoaderPlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, request_initial_model)
        .run();
}

fn request_initial_model(initial: Res<InitialModel>, mut requests: MessageWriter<ModelRequest>) {
    requests.write(ModelRequest(initial.0.clone()));
}

/// `?model=<name>` from the page URL
#[cfg(target_arch = "wasm32")]
fn model_from_url() -> Option<String> {
    let window = web_sys::window()?;
    let href = window.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    let model = url.search_params().get("model")?;
    tracing::info!(model = %model, "Model selected by URL parameter");
    Some(model)
}

#[cfg(not(target_arch = "wasm32"))]
fn model_from_url() -> Option<String> {
    None
}
