//! Shared egui widgets for the diagram controls

use bevy_egui::egui;

use crate::types::{DiagramBounds, DiagramDocument, ViewMode};

/// "3D view" checkbox; returns the new mode when toggled
pub fn render_view_toggle(ui: &mut egui::Ui, mode: ViewMode) -> Option<ViewMode> {
    let mut is_3d = mode.is_3d();
    ui.checkbox(&mut is_3d, "3D view")
        .changed()
        .then(|| ViewMode::from_3d_flag(is_3d))
}

/// Model selector; returns the newly chosen model, if any
pub fn render_model_selector(ui: &mut egui::Ui, current: &str, available: &[String]) -> Option<String> {
    let mut selected = current.to_string();

    egui::ComboBox::from_label("Model")
        .selected_text(&selected)
        .show_ui(ui, |ui| {
            for name in available {
                ui.selectable_value(&mut selected, name.clone(), name);
            }
        });

    (selected != current).then_some(selected)
}

/// One-line summary of what is on screen
pub fn render_diagram_info(ui: &mut egui::Ui, diagram: &DiagramDocument, bounds: &DiagramBounds) {
    let count = diagram.class_count();
    let noun = if count == 1 { "class" } else { "classes" };
    ui.label(format!("{}: {} {}", diagram.model_name, count, noun));

    if !bounds.aabb.is_empty() {
        let size = bounds.aabb.size();
        ui.label(
            egui::RichText::new(format!("Extent: {:.2} x {:.2}", size.x, size.y))
                .small()
                .color(egui::Color32::GRAY),
        );
    }
}
