//! Scene composition: what is visible this frame and where it sits.
//!
//! Reads the store and one [`SceneClock`]; the same clock feeds drawing and
//! click-to-focus so a card is focused exactly where it is drawn.

use crate::fast_math::{add3, Vec3};
use crate::render::animator::{
    card_sway, note_float_offset, note_spawn_scale, orbital_position, task_note_position,
    ProgressTier,
};
use crate::store::{EmployeeId, TaskId, TaskStatus, WorkspaceStore};

/// Eye offset from a focused employee.
pub const FOCUS_OFFSET: Vec3 = [0.0, 0.0, 6.0];

/// Elapsed-time source for the whole scene.
///
/// `orbit_time` stops advancing while any employee is selected, which
/// freezes every card on the ring. `selection_time` restarts whenever the
/// selection changes and drives the note pop-in.
#[derive(Debug, Clone, Default)]
pub struct SceneClock {
    pub elapsed: f32,
    pub orbit_time: f32,
    pub selection_time: f32,
    selected: Option<EmployeeId>,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, dt: f32, selected: Option<EmployeeId>) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        if selected != self.selected {
            self.selected = selected;
            self.selection_time = 0.0;
        } else {
            self.selection_time += dt;
        }
        if selected.is_none() {
            self.orbit_time += dt;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeCard {
    pub id: EmployeeId,
    pub position: Vec3,
    /// Yaw in radians.
    pub sway: f32,
    pub selected: bool,
    pub task_count: usize,
    pub progress: ProgressTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskNote {
    pub task_id: TaskId,
    pub index: usize,
    pub status: TaskStatus,
    /// Resting slot on the ring.
    pub anchor: Vec3,
    /// Slot plus float offset.
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneFrame {
    pub cards: Vec<EmployeeCard>,
    pub notes: Vec<TaskNote>,
}

/// Where employee `id` is on the ring right now.
pub fn employee_position(clock: &SceneClock, id: EmployeeId) -> Vec3 {
    orbital_position(id, clock.orbit_time)
}

/// Cards for every employee, plus notes for the selected employee's tasks
/// that pass the status filter.
pub fn compose(store: &WorkspaceStore, clock: &SceneClock) -> SceneFrame {
    let selected = store.ui().selected_employee;

    let cards = store
        .employees()
        .iter()
        .map(|e| {
            let stats = store.employee_task_stats(e.id);
            EmployeeCard {
                id: e.id,
                position: employee_position(clock, e.id),
                sway: card_sway(clock.elapsed),
                selected: selected == Some(e.id),
                task_count: stats.total,
                progress: ProgressTier::from_ratio(stats.completion_ratio()),
            }
        })
        .collect();

    let notes = match selected {
        Some(id) => task_notes(store, clock, id),
        None => Vec::new(),
    };

    SceneFrame { cards, notes }
}

fn task_notes(store: &WorkspaceStore, clock: &SceneClock, id: EmployeeId) -> Vec<TaskNote> {
    let filter = store.ui().status_filter;
    let visible: Vec<_> = store
        .employee_tasks(id)
        .into_iter()
        .filter(|t| filter.accepts(t.status))
        .collect();
    let center = employee_position(clock, id);
    let count = visible.len();

    visible
        .into_iter()
        .enumerate()
        .map(|(index, task)| {
            let anchor = task_note_position(center, index, count);
            let lift = note_float_offset(index, clock.elapsed);
            TaskNote {
                task_id: task.id,
                index,
                status: task.status,
                anchor,
                position: add3(anchor, [0.0, lift, 0.0]),
                scale: note_spawn_scale(index, clock.selection_time),
            }
        })
        .collect()
}

/// Select employee `id` and aim the camera at its current ring position.
pub fn focus_employee(store: &mut WorkspaceStore, clock: &SceneClock, id: EmployeeId) {
    if store.employee(id).is_none() {
        log::debug!("focus_employee: unknown employee {}", id);
        return;
    }
    let target = employee_position(clock, id);
    store.select_employee(Some(id));
    store.set_camera_target(target);
    store.set_camera_position(add3(target, FOCUS_OFFSET));
}

/// Focus `id`, or reset the view when it is already focused.
pub fn toggle_focus(store: &mut WorkspaceStore, clock: &SceneClock, id: EmployeeId) {
    if store.ui().selected_employee == Some(id) {
        store.reset_camera();
    } else {
        focus_employee(store, clock, id);
    }
}
