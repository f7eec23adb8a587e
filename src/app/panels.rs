//! Side panel and modal windows for `WorkspaceApp`.
//!
//! - stats panel: workspace totals, completion bar, team list
//! - overlay: navigation tips or the focused employee summary
//! - employee window: profile, per-status counts, recent tasks
//! - task window: add/edit form with delete confirmation

use chrono::NaiveDate;
use eframe::egui;

use taskorbit::color::palette;
use taskorbit::render::animator::ProgressTier;
use taskorbit::scene;
use taskorbit::store::{EmployeeId, NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};

use super::content::to_color32;
use super::WorkspaceApp;

/// How many tasks the employee window lists.
const RECENT_TASKS: usize = 5;

fn status_color(status: TaskStatus) -> egui::Color32 {
    to_color32(match status {
        TaskStatus::Pending => palette::PENDING,
        TaskStatus::InProgress => palette::IN_PROGRESS,
        TaskStatus::Completed => palette::COMPLETED,
    })
}

/// Shown while nothing is focused.
const NAV_TIPS: [&str; 4] = [
    "Click employee cards to view tasks",
    "Drag to orbit camera",
    "Scroll to zoom in/out",
    "Click background to reset view",
];

fn short_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::InProgress => "Active",
        TaskStatus::Completed => "Done",
    }
}

// ── Task form ──

/// Editable copy of a task's fields. The due date stays text until submit.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: String,
    pub employee_id: EmployeeId,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self::from_new(NewTask::default())
    }
}

impl TaskDraft {
    fn from_new(t: NewTask) -> Self {
        Self {
            title: t.title,
            description: t.description,
            status: t.status,
            priority: t.priority,
            due_date: t.due_date.map(|d| d.to_string()).unwrap_or_default(),
            employee_id: t.employee_id,
        }
    }

    pub fn for_employee(employee_id: EmployeeId) -> Self {
        Self { employee_id, ..Self::default() }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(|d| d.to_string()).unwrap_or_default(),
            employee_id: task.employee_id,
        }
    }

    /// Blank means no date; anything else must be `YYYY-MM-DD`.
    pub fn parsed_due_date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            Ok(None)
        } else {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(Some)
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && self.parsed_due_date().is_ok()
    }

    pub fn to_new_task(&self) -> Result<NewTask, chrono::ParseError> {
        Ok(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            due_date: self.parsed_due_date()?,
            employee_id: self.employee_id,
        })
    }

    /// Full-field patch; merging it over the task yields the draft.
    pub fn to_patch(&self) -> Result<TaskPatch, chrono::ParseError> {
        let t = self.to_new_task()?;
        Ok(TaskPatch {
            title: Some(t.title),
            description: Some(t.description),
            status: Some(t.status),
            priority: Some(t.priority),
            due_date: Some(t.due_date),
            employee_id: Some(t.employee_id),
        })
    }
}

impl WorkspaceApp {
    /// Render the right-side statistics panel and team list.
    pub fn draw_stats_panel(&mut self, ui: &mut egui::Ui) {
        let stats = self.store.task_stats();

        ui.heading("Workspace");
        ui.separator();
        ui.label(format!("Total tasks: {}", stats.total));
        for status in TaskStatus::ALL {
            ui.colored_label(status_color(status), format!("{}: {}", status, stats.count(status)));
        }
        ui.add(
            egui::ProgressBar::new(stats.completion_ratio())
                .text(format!("{}% complete", stats.completed_percent)),
        );

        ui.separator();
        ui.heading("Team");

        let selected = self.store.ui().selected_employee;
        let mut clicked = None;
        for employee in self.store.employees() {
            let member = self.store.employee_task_stats(employee.id);
            let tier = ProgressTier::from_ratio(member.completion_ratio());
            ui.horizontal(|ui| {
                ui.colored_label(to_color32(tier.color()), "\u{25CF}");
                let label =
                    format!("{} {}  ({} tasks)", employee.avatar, employee.name, member.total);
                if ui.selectable_label(selected == Some(employee.id), label).clicked() {
                    clicked = Some(employee.id);
                }
            });
        }
        if let Some(id) = clicked {
            scene::toggle_focus(&mut self.store, &self.clock, id);
        }

        ui.separator();
        ui.small(format!(
            "Textures: {} cached, {:.0}% hits",
            self.textures.len(),
            self.textures.hit_rate() * 100.0
        ));
        ui.small(format!("Camera distance: {:.1}", self.rig.distance()));
    }

    pub fn draw_employee_window(&mut self, ctx: &egui::Context) {
        if !self.store.ui().employee_detail_open {
            return;
        }
        let Some(employee) = self.store.selected_employee() else {
            return;
        };
        let id = employee.id;
        let stats = self.store.employee_task_stats(id);

        let mut open = true;
        let mut close = false;
        let mut assign = false;
        egui::Window::new("Employee Details")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&employee.avatar).size(48.0));
                    ui.heading(&employee.name);
                    ui.colored_label(to_color32(palette::ROLE_TEXT), &employee.role);
                    ui.small(&employee.email);
                });
                ui.separator();
                ui.columns(3, |cols| {
                    for (col, status) in cols.iter_mut().zip(TaskStatus::ALL) {
                        col.vertical_centered(|ui| {
                            ui.colored_label(status_color(status), stats.count(status).to_string());
                            ui.small(status.label());
                        });
                    }
                });
                ui.separator();
                ui.strong("Recent Tasks");
                for task in self.store.employee_tasks(id).into_iter().take(RECENT_TASKS) {
                    ui.horizontal(|ui| {
                        ui.label(&task.title);
                        ui.colored_label(status_color(task.status), task.status.label());
                    });
                    if !task.description.is_empty() {
                        ui.small(&task.description);
                    }
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                    if ui.button("Assign Task").clicked() {
                        assign = true;
                    }
                });
            });

        if assign {
            self.store.close_employee_detail();
            self.draft = Some((None, TaskDraft::for_employee(id)));
            self.store.open_task_creator();
        } else if close || !open {
            self.store.close_employee_detail();
        }
    }

    /// Bottom-left card: navigation tips, or the focused employee with a
    /// close button that resets the view.
    pub fn draw_overlay(&mut self, ctx: &egui::Context) {
        let mut reset = false;
        egui::Area::new(egui::Id::new("overlay"))
            .anchor(egui::Align2::LEFT_BOTTOM, [12.0, -12.0])
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(220.0);
                    let Some(employee) = self.store.selected_employee() else {
                        ui.strong("Navigation Tips");
                        for tip in NAV_TIPS {
                            ui.small(format!("\u{2022} {}", tip));
                        }
                        return;
                    };
                    let stats = self.store.employee_task_stats(employee.id);
                    ui.horizontal(|ui| {
                        ui.strong(&employee.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("\u{1F5D9}").on_hover_text("Reset view").clicked() {
                                reset = true;
                            }
                        });
                    });
                    ui.colored_label(to_color32(palette::ROLE_TEXT), &employee.role);
                    ui.label(format!("Tasks: {}", stats.total));
                    ui.horizontal(|ui| {
                        for status in TaskStatus::ALL {
                            let text = format!("{}: {}", short_status(status), stats.count(status));
                            let text = egui::RichText::new(text).small();
                            ui.colored_label(status_color(status), text);
                        }
                    });
                });
            });
        if reset {
            self.store.reset_camera();
        }
    }

    pub fn draw_task_window(&mut self, ctx: &egui::Context) {
        let ui_state = self.store.ui();
        let editing = if ui_state.task_editor_open {
            ui_state.selected_task
        } else {
            None
        };
        if editing.is_none() && !ui_state.task_creator_open {
            self.draft = None;
            self.confirm_delete = false;
            return;
        }

        // (Re)seed the draft when the form opens or switches task
        let stale = match &self.draft {
            Some((for_task, _)) => *for_task != editing,
            None => true,
        };
        if stale {
            let draft = match editing.and_then(|id| self.store.task(id)) {
                Some(task) => TaskDraft::from_task(task),
                None => TaskDraft::default(),
            };
            self.draft = Some((editing, draft));
            self.confirm_delete = false;
        }
        let Some((_, draft)) = self.draft.as_mut() else {
            return;
        };

        let employees: Vec<(EmployeeId, String)> = self
            .store
            .employees()
            .iter()
            .map(|e| (e.id, format!("{} {}", e.avatar, e.name)))
            .collect();

        let title = if editing.is_some() { "Edit Task" } else { "Add New Task" };
        let mut open = true;
        let mut action = FormAction::None;
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                action = task_form(
                    ui,
                    draft,
                    &employees,
                    editing.is_some(),
                    &mut self.confirm_delete,
                );
            });
        if !open {
            action = FormAction::Cancel;
        }

        match action {
            FormAction::None => {}
            FormAction::Cancel => self.close_task_form(editing),
            FormAction::Submit => self.submit_task_form(editing),
            FormAction::Delete => {
                if let Some(id) = editing {
                    self.store.delete_task(id);
                }
                self.close_task_form(editing);
            }
        }
    }

    fn submit_task_form(&mut self, editing: Option<TaskId>) {
        let Some((_, draft)) = &self.draft else {
            return;
        };
        match editing {
            Some(id) => match draft.to_patch() {
                Ok(patch) => {
                    self.store.update_task(id, patch);
                }
                Err(e) => log::warn!("Task form has an invalid due date: {}", e),
            },
            None => match draft.to_new_task() {
                Ok(task) => {
                    self.store.add_task(task);
                }
                Err(e) => log::warn!("Task form has an invalid due date: {}", e),
            },
        }
        self.close_task_form(editing);
    }

    fn close_task_form(&mut self, editing: Option<TaskId>) {
        if editing.is_some() {
            self.store.close_task_editor();
        } else {
            self.store.close_task_creator();
        }
        self.draft = None;
        self.confirm_delete = false;
    }
}

enum FormAction {
    None,
    Cancel,
    Submit,
    Delete,
}

fn task_form(
    ui: &mut egui::Ui,
    draft: &mut TaskDraft,
    employees: &[(EmployeeId, String)],
    editing: bool,
    confirm_delete: &mut bool,
) -> FormAction {
    let mut action = FormAction::None;

    egui::Grid::new("task_form").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut draft.title).hint_text("Enter task title..."));
        ui.end_row();

        ui.label("Description");
        ui.add(egui::TextEdit::multiline(&mut draft.description).desired_rows(3));
        ui.end_row();

        ui.label("Status");
        egui::ComboBox::from_id_salt("form_status")
            .selected_text(draft.status.label())
            .show_ui(ui, |ui| {
                for s in TaskStatus::ALL {
                    ui.selectable_value(&mut draft.status, s, s.label());
                }
            });
        ui.end_row();

        ui.label("Priority");
        egui::ComboBox::from_id_salt("form_priority")
            .selected_text(draft.priority.label())
            .show_ui(ui, |ui| {
                for p in Priority::ALL {
                    ui.selectable_value(&mut draft.priority, p, p.label());
                }
            });
        ui.end_row();

        ui.label("Due date");
        ui.add(egui::TextEdit::singleline(&mut draft.due_date).hint_text("YYYY-MM-DD"));
        ui.end_row();

        ui.label("Assign to");
        let current = employees
            .iter()
            .find(|(id, _)| *id == draft.employee_id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| format!("#{}", draft.employee_id));
        egui::ComboBox::from_id_salt("form_employee")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (id, name) in employees {
                    ui.selectable_value(&mut draft.employee_id, *id, name);
                }
            });
        ui.end_row();
    });

    if draft.parsed_due_date().is_err() {
        ui.colored_label(to_color32(palette::LAGGING), "Due date must look like 2024-12-31");
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Cancel").clicked() {
            action = FormAction::Cancel;
        }
        if editing {
            if *confirm_delete {
                ui.label("Delete this task?");
                if ui.button("Yes, delete").clicked() {
                    action = FormAction::Delete;
                }
                if ui.button("No").clicked() {
                    *confirm_delete = false;
                }
            } else if ui.button("Delete").clicked() {
                *confirm_delete = true;
            }
        }
        let label = if editing { "Update Task" } else { "Add Task" };
        if ui
            .add_enabled(draft.is_submittable(), egui::Button::new(label))
            .clicked()
        {
            action = FormAction::Submit;
        }
    });

    action
}
