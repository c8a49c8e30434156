//! Control panel using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use hbds_scene::ui::{render_diagram_info, render_model_selector, render_view_toggle};
use hbds_scene::{DiagramBounds, DiagramDocument, ViewSettings};
use tracing::info;

use crate::model_loader::{ModelLoadState, ModelRequest};

/// Grouped system parameters for the control panel
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub view: ResMut<'w, ViewSettings>,
    pub diagram: Res<'w, DiagramDocument>,
    pub bounds: Res<'w, DiagramBounds>,
    pub models: Res<'w, ModelLoadState>,
    pub requests: MessageWriter<'w, ModelRequest>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn ui_system(mut params: UiParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    egui::Window::new("HBDS")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            if let Some(name) =
                render_model_selector(ui, &params.models.selected, &params.models.available)
            {
                params.requests.write(ModelRequest(name));
            }

            // Only touch the resource on an actual toggle so the camera
            // re-frames once
            if let Some(mode) = render_view_toggle(ui, params.view.mode) {
                params.view.mode = mode;
                info!(mode = ?mode, "View mode changed");
            }

            ui.separator();

            if params.models.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Loading {}...", params.models.selected));
                });
            } else {
                render_diagram_info(ui, &params.diagram, &params.bounds);
            }
        });
}
