//! Toolbar rendering for `WorkspaceApp`.
//!
//! Draws the search field, status filter, add-task and view controls, and
//! the theme toggle. Every control dispatches a store command.

use eframe::egui;
use taskorbit::store::{StatusFilter, Theme};

use super::WorkspaceApp;

impl WorkspaceApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.strong("TaskOrbit");
            ui.separator();

            // Search
            let mut query = self.store.ui().search_query.clone();
            let response = ui.add_sized(
                [220.0, 24.0],
                egui::TextEdit::singleline(&mut query).hint_text("Search tasks..."),
            );
            if response.changed() {
                self.store.set_search_query(query);
            }

            // Status filter
            let mut filter = self.store.ui().status_filter;
            egui::ComboBox::from_id_salt("status_filter")
                .selected_text(filter.label())
                .show_ui(ui, |ui| {
                    for choice in StatusFilter::CHOICES {
                        ui.selectable_value(&mut filter, choice, choice.label());
                    }
                });
            self.store.set_status_filter(filter);

            let matches = self.store.filtered_tasks().len();
            ui.label(format!("{} tasks", matches));

            ui.separator();

            if ui.button("+ Task").clicked() {
                self.store.open_task_creator();
            }

            if let Some(id) = self.store.ui().selected_employee {
                if ui.button("Details").clicked() {
                    self.store.open_employee_detail(id);
                }
            }

            if ui.button("Reset view").clicked() {
                self.store.reset_camera();
            }

            ui.checkbox(&mut self.rig.auto_rotate, "Auto-rotate");
            ui.toggle_value(&mut self.show_stats, "Stats");

            // Dark mode toggle
            let theme_label = match self.store.ui().theme {
                Theme::Dark => "\u{263E}",
                Theme::Light => "\u{2600}",
            };
            if ui.button(theme_label).on_hover_text("Toggle theme").clicked() {
                self.store.toggle_theme();
            }
        });
    }
}
