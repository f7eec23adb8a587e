//! Workspace store: the single owner of employees, tasks and UI state.
//!
//! Tasks are held once, in insertion order, in a flat collection. Each
//! employee carries an ordered list of task ids over that collection, so the
//! per-employee view and the flat view can never disagree on field values.
//!
//! Every state-changing command bumps [`WorkspaceStore::revision`] and
//! notifies subscribers with the kinds of state it touched. Task commands
//! also write a snapshot to storage; storage failures are logged and kept
//! as [`WorkspaceStore::last_persistence_error`], never returned.

pub mod model;
pub mod persist;
pub mod seed;

pub use model::{
    Employee, EmployeeId, NewTask, Priority, StatusFilter, Task, TaskId, TaskPatch, TaskStats,
    TaskStatus, Theme,
};
pub use persist::{
    FileStorage, MemoryStorage, Snapshot, SnapshotEmployee, SnapshotStorage, StorageError,
    SNAPSHOT_VERSION,
};

use std::collections::HashSet;

use crate::fast_math::Vec3;

pub const DEFAULT_CAMERA_TARGET: Vec3 = [0.0, 0.0, 0.0];
pub const DEFAULT_CAMERA_POSITION: Vec3 = [0.0, 5.0, 10.0];

/// Which part of the state a command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Selection,
    Modal,
    Filter,
    Theme,
    Camera,
    Tasks,
}

/// Ephemeral view state. Read through [`WorkspaceStore::ui`]; written only
/// by store commands.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub selected_employee: Option<EmployeeId>,
    pub selected_task: Option<TaskId>,
    pub employee_detail_open: bool,
    pub task_editor_open: bool,
    pub task_creator_open: bool,
    pub status_filter: StatusFilter,
    pub search_query: String,
    pub theme: Theme,
    pub camera_target: Vec3,
    pub camera_position: Vec3,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_employee: None,
            selected_task: None,
            employee_detail_open: false,
            task_editor_open: false,
            task_creator_open: false,
            status_filter: StatusFilter::All,
            search_query: String::new(),
            theme: Theme::Dark,
            camera_target: DEFAULT_CAMERA_TARGET,
            camera_position: DEFAULT_CAMERA_POSITION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Change], u64)>;

pub struct WorkspaceStore {
    employees: Vec<Employee>,
    tasks: Vec<Task>,
    ui: UiState,
    next_task_id: TaskId,
    storage: Box<dyn SnapshotStorage>,
    last_persist_error: Option<StorageError>,
    revision: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl WorkspaceStore {
    /// Load the saved snapshot from `storage`, or seed from the bundled
    /// dataset when there is none or it cannot be read.
    pub fn open(storage: Box<dyn SnapshotStorage>) -> Self {
        let (snapshot, load_error) = match storage.load() {
            Ok(Some(snapshot)) => {
                log::info!(
                    "Loaded workspace snapshot: {} employees",
                    snapshot.employees.len()
                );
                (snapshot, None)
            }
            Ok(None) => {
                log::info!("No saved workspace, seeding defaults");
                (seed::default_snapshot(), None)
            }
            Err(e) => {
                log::warn!("Could not load workspace snapshot, seeding defaults: {}", e);
                (seed::default_snapshot(), Some(e))
            }
        };
        let mut store = Self::from_snapshot(snapshot, storage);
        store.last_persist_error = load_error;
        store
    }

    /// Build a store from an explicit snapshot; `storage` receives later writes.
    pub fn from_snapshot(snapshot: Snapshot, storage: Box<dyn SnapshotStorage>) -> Self {
        let (employees, tasks) = index_snapshot(&snapshot);
        let next_task_id = tasks.iter().map(|t| t.id).max().map_or(1, |id| id + 1);
        Self {
            employees,
            tasks,
            ui: UiState::default(),
            next_task_id,
            storage,
            last_persist_error: None,
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Default dataset backed by throwaway in-memory storage.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()))
    }

    // ── Observation ──

    /// Incremented by every command that changes state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[Change], u64) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Last snapshot read/write failure; cleared by the next successful write.
    pub fn last_persistence_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    fn commit(&mut self, changes: &[Change]) {
        self.revision += 1;
        let revision = self.revision;
        for (_, listener) in self.listeners.iter_mut() {
            listener(changes, revision);
        }
    }

    // ── Reads ──

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// The flat task collection in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected_employee(&self) -> Option<&Employee> {
        self.ui.selected_employee.and_then(|id| self.employee(id))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.ui.selected_task.and_then(|id| self.task(id))
    }

    /// An employee's tasks in their sequence order.
    pub fn employee_tasks(&self, id: EmployeeId) -> Vec<&Task> {
        self.employee(id)
            .map(|e| e.task_ids.iter().filter_map(|tid| self.task(*tid)).collect())
            .unwrap_or_default()
    }

    pub fn employee_task_stats(&self, id: EmployeeId) -> TaskStats {
        TaskStats::from_tasks(self.employee_tasks(id))
    }

    /// Flat tasks narrowed by the status filter, then by a case-insensitive
    /// match of the search query against title or description.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        let filter = self.ui.status_filter;
        let query = self.ui.search_query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| filter.accepts(t.status))
            .filter(|t| {
                query.is_empty()
                    || t.title.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn task_stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// The current state as a storable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let employees = self
            .employees
            .iter()
            .map(|e| SnapshotEmployee {
                id: e.id,
                name: e.name.clone(),
                role: e.role.clone(),
                avatar: e.avatar.clone(),
                email: e.email.clone(),
                tasks: self.employee_tasks(e.id).into_iter().cloned().collect(),
            })
            .collect();
        Snapshot {
            version: SNAPSHOT_VERSION,
            employees,
            all_tasks: Some(self.tasks.clone()),
        }
    }

    // ── Selection & modals ──

    /// Focus an employee, or clear focus with `None`. Unknown ids are ignored.
    pub fn select_employee(&mut self, id: Option<EmployeeId>) {
        if let Some(id) = id {
            if self.employee(id).is_none() {
                log::debug!("select_employee: unknown employee {}", id);
                return;
            }
        }
        if self.ui.selected_employee == id {
            return;
        }
        self.ui.selected_employee = id;
        self.commit(&[Change::Selection]);
    }

    pub fn open_employee_detail(&mut self, id: EmployeeId) {
        if self.employee(id).is_none() {
            log::debug!("open_employee_detail: unknown employee {}", id);
            return;
        }
        if self.ui.selected_employee == Some(id) && self.ui.employee_detail_open {
            return;
        }
        self.ui.selected_employee = Some(id);
        self.ui.employee_detail_open = true;
        self.commit(&[Change::Selection, Change::Modal]);
    }

    pub fn close_employee_detail(&mut self) {
        if !self.ui.employee_detail_open && self.ui.selected_employee.is_none() {
            return;
        }
        self.ui.employee_detail_open = false;
        self.ui.selected_employee = None;
        self.commit(&[Change::Selection, Change::Modal]);
    }

    pub fn open_task_editor(&mut self, id: TaskId) {
        if self.task(id).is_none() {
            log::debug!("open_task_editor: unknown task {}", id);
            return;
        }
        if self.ui.selected_task == Some(id) && self.ui.task_editor_open {
            return;
        }
        self.ui.selected_task = Some(id);
        self.ui.task_editor_open = true;
        self.commit(&[Change::Selection, Change::Modal]);
    }

    pub fn close_task_editor(&mut self) {
        if !self.ui.task_editor_open && self.ui.selected_task.is_none() {
            return;
        }
        self.ui.task_editor_open = false;
        self.ui.selected_task = None;
        self.commit(&[Change::Selection, Change::Modal]);
    }

    pub fn open_task_creator(&mut self) {
        if self.ui.task_creator_open {
            return;
        }
        self.ui.task_creator_open = true;
        self.commit(&[Change::Modal]);
    }

    pub fn close_task_creator(&mut self) {
        if !self.ui.task_creator_open {
            return;
        }
        self.ui.task_creator_open = false;
        self.commit(&[Change::Modal]);
    }

    // ── Filters & theme ──

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        if self.ui.status_filter == filter {
            return;
        }
        self.ui.status_filter = filter;
        self.commit(&[Change::Filter]);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.ui.search_query == query {
            return;
        }
        self.ui.search_query = query;
        self.commit(&[Change::Filter]);
    }

    pub fn toggle_theme(&mut self) {
        self.ui.theme = self.ui.theme.toggled();
        self.commit(&[Change::Theme]);
    }

    // ── Camera ──

    pub fn set_camera_target(&mut self, target: Vec3) {
        if self.ui.camera_target == target {
            return;
        }
        self.ui.camera_target = target;
        self.commit(&[Change::Camera]);
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        if self.ui.camera_position == position {
            return;
        }
        self.ui.camera_position = position;
        self.commit(&[Change::Camera]);
    }

    /// Default camera framing and no selected employee.
    pub fn reset_camera(&mut self) {
        if self.ui.camera_target == DEFAULT_CAMERA_TARGET
            && self.ui.camera_position == DEFAULT_CAMERA_POSITION
            && self.ui.selected_employee.is_none()
        {
            return;
        }
        self.ui.camera_target = DEFAULT_CAMERA_TARGET;
        self.ui.camera_position = DEFAULT_CAMERA_POSITION;
        self.ui.selected_employee = None;
        self.commit(&[Change::Camera, Change::Selection]);
    }

    // ── Tasks ──

    /// Store a new task and return its id.
    ///
    /// A task naming an unknown employee is kept in the flat collection only.
    pub fn add_task(&mut self, new_task: NewTask) -> TaskId {
        let id = self.next_task_id;
        self.next_task_id += 1;

        let task = new_task.into_task(id);
        match self.employees.iter_mut().find(|e| e.id == task.employee_id) {
            Some(owner) => owner.task_ids.push(id),
            None => log::warn!(
                "Task {} refers to unknown employee {}; kept unassigned",
                id,
                task.employee_id
            ),
        }
        log::debug!("add_task: {} \"{}\"", id, task.title);
        self.tasks.push(task);

        self.persist();
        self.commit(&[Change::Tasks]);
        id
    }

    /// Merge `patch` into task `id`. Returns false when no such task exists.
    ///
    /// A patch that changes nothing neither persists nor notifies.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            log::debug!("update_task: unknown task {}", id);
            return false;
        };

        if patch.is_empty() {
            log::debug!("update_task: empty patch for {}", id);
            return true;
        }
        let mut merged = self.tasks[pos].clone();
        patch.apply(&mut merged);
        if merged == self.tasks[pos] {
            log::debug!("update_task: nothing changed on {}", id);
            return true;
        }

        let old_owner = self.tasks[pos].employee_id;
        let new_owner = merged.employee_id;
        self.tasks[pos] = merged;

        if new_owner != old_owner {
            self.unindex_task(id);
            match self.employees.iter_mut().find(|e| e.id == new_owner) {
                Some(owner) => owner.task_ids.push(id),
                None => log::warn!(
                    "Task {} moved to unknown employee {}; kept unassigned",
                    id,
                    new_owner
                ),
            }
        }

        self.persist();
        self.commit(&[Change::Tasks]);
        true
    }

    /// Remove task `id` from both views. Returns false when no such task exists.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            log::debug!("delete_task: unknown task {}", id);
            return false;
        }
        self.unindex_task(id);

        let mut changes = vec![Change::Tasks];
        if self.ui.selected_task == Some(id) {
            self.ui.selected_task = None;
            self.ui.task_editor_open = false;
            changes.extend([Change::Selection, Change::Modal]);
        }

        self.persist();
        self.commit(&changes);
        true
    }

    fn unindex_task(&mut self, id: TaskId) {
        for employee in &mut self.employees {
            employee.task_ids.retain(|tid| *tid != id);
        }
    }

    fn persist(&mut self) {
        match self.storage.save(&self.snapshot()) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                log::warn!("Could not save workspace snapshot: {}", e);
                self.last_persist_error = Some(e);
            }
        }
    }
}

/// Split a snapshot into employees (with id indexes) and the flat task list.
///
/// The flat list is authoritative for field values. Each employee keeps the
/// order of its nested tasks; flat tasks owned by an employee but missing
/// from its nested list are appended. Duplicate ids keep the first task.
fn index_snapshot(snapshot: &Snapshot) -> (Vec<Employee>, Vec<Task>) {
    let mut seen = HashSet::new();
    let mut tasks = Vec::new();
    for task in snapshot.flat_tasks() {
        if seen.insert(task.id) {
            tasks.push(task);
        } else {
            log::warn!("Duplicate task id {} in snapshot; keeping the first", task.id);
        }
    }

    let mut indexed = HashSet::new();
    let mut employees: Vec<Employee> = snapshot
        .employees
        .iter()
        .map(|e| {
            let task_ids = e
                .tasks
                .iter()
                .map(|t| t.id)
                .filter(|tid| {
                    tasks.iter().any(|t| t.id == *tid && t.employee_id == e.id)
                        && indexed.insert(*tid)
                })
                .collect();
            Employee {
                id: e.id,
                name: e.name.clone(),
                role: e.role.clone(),
                avatar: e.avatar.clone(),
                email: e.email.clone(),
                task_ids,
            }
        })
        .collect();

    for task in &tasks {
        if indexed.contains(&task.id) {
            continue;
        }
        if let Some(owner) = employees.iter_mut().find(|e| e.id == task.employee_id) {
            owner.task_ids.push(task.id);
            indexed.insert(task.id);
        }
    }

    (employees, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn employee(id: EmployeeId, name: &str) -> SnapshotEmployee {
        SnapshotEmployee {
            id,
            name: name.into(),
            role: "Engineer".into(),
            avatar: "*".into(),
            email: format!("{}@example.com", name.to_lowercase()),
            tasks: Vec::new(),
        }
    }

    fn empty_workspace() -> WorkspaceStore {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            employees: vec![employee(1, "Ada"), employee(2, "Linus"), employee(3, "Grace")],
            all_tasks: Some(Vec::new()),
        };
        WorkspaceStore::from_snapshot(snapshot, Box::new(MemoryStorage::new()))
    }

    fn new_task(title: &str, employee_id: EmployeeId, status: TaskStatus) -> NewTask {
        NewTask {
            title: title.into(),
            description: format!("about {}", title),
            status,
            employee_id,
            ..Default::default()
        }
    }

    /// Flat collection equals the union of every employee's sequence.
    fn assert_views_in_sync(store: &WorkspaceStore) {
        let mut from_employees: Vec<&Task> = store
            .employees()
            .iter()
            .flat_map(|e| store.employee_tasks(e.id))
            .collect();
        let mut flat: Vec<&Task> = store.tasks().iter().collect();
        from_employees.sort_by_key(|t| t.id);
        flat.sort_by_key(|t| t.id);
        assert_eq!(from_employees, flat);
        for e in store.employees() {
            for t in store.employee_tasks(e.id) {
                assert_eq!(t.employee_id, e.id);
            }
        }
    }

    #[test]
    fn seeds_defaults_when_nothing_saved() {
        let store = WorkspaceStore::in_memory();
        let snap = seed::default_snapshot();
        assert_eq!(store.employees().len(), snap.employees.len());
        assert_eq!(store.tasks().to_vec(), snap.flat_tasks());
        assert!(store.last_persistence_error().is_none());
        assert_views_in_sync(&store);
    }

    #[test]
    fn ui_defaults() {
        let store = empty_workspace();
        let ui = store.ui();
        assert_eq!(ui.selected_employee, None);
        assert_eq!(ui.status_filter, StatusFilter::All);
        assert_eq!(ui.theme, Theme::Dark);
        assert_eq!(ui.camera_target, [0.0, 0.0, 0.0]);
        assert_eq!(ui.camera_position, [0.0, 5.0, 10.0]);
        assert!(!ui.employee_detail_open && !ui.task_editor_open && !ui.task_creator_open);
    }

    #[test]
    fn add_task_lands_once_in_both_views() {
        let mut store = empty_workspace();
        let id = store.add_task(new_task("Write docs", 2, TaskStatus::Pending));

        let flat: Vec<_> = store.tasks().iter().filter(|t| t.id == id).collect();
        let owned: Vec<_> = store.employee_tasks(2).into_iter().filter(|t| t.id == id).collect();
        assert_eq!(flat.len(), 1);
        assert_eq!(owned.len(), 1);
        assert_eq!(flat[0], owned[0]);
        assert!(store.employee_tasks(1).is_empty());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = WorkspaceStore::in_memory();
        let max_seed = store.tasks().iter().map(|t| t.id).max().unwrap();
        let a = store.add_task(new_task("a", 1, TaskStatus::Pending));
        let b = store.add_task(new_task("b", 1, TaskStatus::Pending));
        assert!(a > max_seed);
        assert!(b > a);
    }

    #[test]
    fn views_stay_in_sync_across_mutations() {
        let mut store = empty_workspace();
        let a = store.add_task(new_task("a", 1, TaskStatus::Pending));
        assert_views_in_sync(&store);
        let b = store.add_task(new_task("b", 2, TaskStatus::InProgress));
        assert_views_in_sync(&store);
        let c = store.add_task(new_task("c", 1, TaskStatus::Completed));
        assert_views_in_sync(&store);

        assert!(store.update_task(a, TaskPatch::status(TaskStatus::Completed)));
        assert_views_in_sync(&store);
        assert_eq!(store.employee_tasks(1)[0].status, TaskStatus::Completed);

        assert!(store.update_task(
            c,
            TaskPatch { employee_id: Some(3), ..Default::default() }
        ));
        assert_views_in_sync(&store);
        assert_eq!(store.employee_tasks(3).len(), 1);
        assert_eq!(store.employee_tasks(1).len(), 1);

        assert!(store.delete_task(b));
        assert_views_in_sync(&store);
        assert!(store.employee_tasks(2).is_empty());
        assert_eq!(store.tasks().len(), 2);

        assert!(!store.delete_task(b));
        assert!(!store.update_task(b, TaskPatch::status(TaskStatus::Pending)));
    }

    #[test]
    fn update_merges_partial_fields() {
        let mut store = empty_workspace();
        let id = store.add_task(new_task("draft", 1, TaskStatus::Pending));
        store.update_task(
            id,
            TaskPatch { title: Some("final".into()), priority: Some(Priority::High), ..Default::default() },
        );
        let t = store.task(id).unwrap();
        assert_eq!(t.title, "final");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.description, "about draft");
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn unknown_employee_keeps_task_flat_only() {
        let mut store = empty_workspace();
        let id = store.add_task(new_task("orphan", 42, TaskStatus::Pending));
        assert!(store.task(id).is_some());
        assert!(store.employees().iter().all(|e| !e.task_ids.contains(&id)));
        assert_eq!(store.task_stats().total, 1);
    }

    #[test]
    fn stats_percent_bounds() {
        let mut store = empty_workspace();
        assert_eq!(store.task_stats(), TaskStats::default());

        store.add_task(new_task("a", 1, TaskStatus::Completed));
        store.add_task(new_task("b", 1, TaskStatus::Completed));
        store.add_task(new_task("c", 2, TaskStatus::InProgress));
        let stats = store.task_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.completed_percent, 67);
        assert!(stats.completed_percent <= 100);

        assert_eq!(store.employee_task_stats(1).completed_percent, 100);
        assert_eq!(store.employee_task_stats(3).completed_percent, 0);
    }

    #[test]
    fn filter_and_search_intersect() {
        let mut store = empty_workspace();
        store.add_task(new_task("Deploy API", 1, TaskStatus::Completed));
        store.add_task(new_task("Deploy web", 1, TaskStatus::Pending));
        store.add_task(new_task("Write tests", 2, TaskStatus::Completed));

        store.set_status_filter(StatusFilter::Only(TaskStatus::Completed));
        let titles: Vec<_> = store.filtered_tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["Deploy API", "Write tests"]);

        store.set_search_query("DEPLOY");
        let titles: Vec<_> = store.filtered_tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["Deploy API"]);

        store.set_status_filter(StatusFilter::All);
        assert_eq!(store.filtered_tasks().len(), 2);

        // Description matches too
        store.set_search_query("about write");
        assert_eq!(store.filtered_tasks()[0].title, "Write tests");
    }

    #[test]
    fn completed_filter_ignores_search_text_for_status() {
        let mut store = empty_workspace();
        store.add_task(new_task("x", 1, TaskStatus::Completed));
        store.add_task(new_task("x", 1, TaskStatus::InProgress));
        store.set_status_filter(StatusFilter::Only(TaskStatus::Completed));
        for query in ["", "x", "nothing"] {
            store.set_search_query(query);
            assert!(store
                .filtered_tasks()
                .iter()
                .all(|t| t.status == TaskStatus::Completed));
        }
    }

    #[test]
    fn reset_camera_restores_defaults() {
        let mut store = empty_workspace();
        store.select_employee(Some(2));
        store.set_camera_target([4.0, 0.0, 1.0]);
        store.set_camera_position([4.0, 0.0, 7.0]);
        store.select_employee(Some(3));

        store.reset_camera();
        assert_eq!(store.ui().camera_target, [0.0, 0.0, 0.0]);
        assert_eq!(store.ui().camera_position, [0.0, 5.0, 10.0]);
        assert_eq!(store.ui().selected_employee, None);
    }

    #[test]
    fn modal_commands_manage_selection() {
        let mut store = WorkspaceStore::in_memory();
        let task_id = store.tasks()[0].id;

        store.open_employee_detail(1);
        assert!(store.ui().employee_detail_open);
        assert_eq!(store.selected_employee().map(|e| e.id), Some(1));
        store.close_employee_detail();
        assert!(!store.ui().employee_detail_open);
        assert!(store.selected_employee().is_none());

        store.open_task_editor(task_id);
        assert_eq!(store.selected_task().map(|t| t.id), Some(task_id));
        store.close_task_editor();
        assert!(store.selected_task().is_none());

        store.open_task_creator();
        assert!(store.ui().task_creator_open);
        store.close_task_creator();
        assert!(!store.ui().task_creator_open);
    }

    #[test]
    fn deleting_selected_task_closes_editor() {
        let mut store = empty_workspace();
        let id = store.add_task(new_task("doomed", 1, TaskStatus::Pending));
        store.open_task_editor(id);
        store.delete_task(id);
        assert_eq!(store.ui().selected_task, None);
        assert!(!store.ui().task_editor_open);
    }

    #[test]
    fn unknown_and_repeated_selection_is_a_no_op() {
        let mut store = empty_workspace();
        store.select_employee(Some(99));
        assert_eq!(store.ui().selected_employee, None);
        assert_eq!(store.revision(), 0);

        store.select_employee(Some(1));
        let rev = store.revision();
        store.select_employee(Some(1));
        assert_eq!(store.revision(), rev);
        store.open_task_editor(12345);
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn reset_at_defaults_does_not_notify() {
        let mut store = empty_workspace();
        store.reset_camera();
        assert_eq!(store.revision(), 0);

        store.select_employee(Some(2));
        store.reset_camera();
        assert_eq!(store.revision(), 2);
        assert_eq!(store.ui().selected_employee, None);
        store.reset_camera();
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn unchanged_update_neither_writes_nor_notifies() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = WorkspaceStore::open(Box::new(Rc::clone(&storage)));
        let id = store.add_task(new_task("a", 1, TaskStatus::Pending));
        let rev = store.revision();
        assert_eq!(storage.writes(), 1);

        assert!(store.update_task(id, TaskPatch::default()));
        assert!(store.update_task(id, TaskPatch::status(TaskStatus::Pending)));
        assert_eq!(store.revision(), rev);
        assert_eq!(storage.writes(), 1);

        assert!(store.update_task(id, TaskPatch::status(TaskStatus::Completed)));
        assert_eq!(store.revision(), rev + 1);
        assert_eq!(storage.writes(), 2);
    }

    #[test]
    fn toggle_theme_flips() {
        let mut store = empty_workspace();
        store.toggle_theme();
        assert_eq!(store.ui().theme, Theme::Light);
        store.toggle_theme();
        assert_eq!(store.ui().theme, Theme::Dark);
    }

    #[test]
    fn listeners_see_changes_until_unsubscribed() {
        let mut store = empty_workspace();
        let seen: Rc<RefCell<Vec<(Vec<Change>, u64)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |changes, rev| sink.borrow_mut().push((changes.to_vec(), rev)));

        store.set_search_query("abc");
        store.add_task(new_task("a", 1, TaskStatus::Pending));
        assert_eq!(
            *seen.borrow(),
            vec![(vec![Change::Filter], 1), (vec![Change::Tasks], 2)]
        );

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
        store.toggle_theme();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn task_commands_write_snapshots() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = WorkspaceStore::open(Box::new(Rc::clone(&storage)));
        assert_eq!(storage.writes(), 0);

        let id = store.add_task(new_task("a", 1, TaskStatus::Pending));
        store.update_task(id, TaskPatch::status(TaskStatus::Completed));
        store.delete_task(id);
        assert_eq!(storage.writes(), 3);

        // UI commands never write
        store.toggle_theme();
        store.set_search_query("zzz");
        assert_eq!(storage.writes(), 3);
    }

    #[test]
    fn persistence_failure_is_recorded_not_raised() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = WorkspaceStore::open(Box::new(Rc::clone(&storage)));

        storage.set_fail_writes(true);
        let id = store.add_task(new_task("offline", 1, TaskStatus::Pending));
        assert!(store.task(id).is_some());
        assert!(matches!(
            store.last_persistence_error(),
            Some(StorageError::Unavailable(_))
        ));

        storage.set_fail_writes(false);
        store.update_task(id, TaskPatch::status(TaskStatus::Completed));
        assert!(store.last_persistence_error().is_none());
    }

    #[test]
    fn snapshot_round_trip_reproduces_state() {
        let storage = Rc::new(MemoryStorage::new());
        let mut first = WorkspaceStore::open(Box::new(Rc::clone(&storage)));
        let id = first.add_task(new_task("persist me", 3, TaskStatus::InProgress));
        first.update_task(
            id,
            TaskPatch { due_date: Some(chrono::NaiveDate::from_ymd_opt(2024, 5, 4)), ..Default::default() },
        );
        let seed_task = first.tasks()[0].id;
        first.delete_task(seed_task);

        let saved = storage.load().unwrap().unwrap();
        let second = WorkspaceStore::from_snapshot(saved, Box::new(MemoryStorage::new()));
        assert_eq!(second.employees(), first.employees());
        assert_eq!(second.tasks(), first.tasks());

        let reopened = WorkspaceStore::open(Box::new(Rc::clone(&storage)));
        assert_eq!(reopened.tasks(), first.tasks());
    }

    #[test]
    fn corrupt_storage_falls_back_to_defaults() {
        let store = WorkspaceStore::open(Box::new(MemoryStorage::with_raw("{{{")));
        assert_eq!(store.employees().len(), seed::default_snapshot().employees.len());
        assert!(matches!(store.last_persistence_error(), Some(StorageError::Decode(_))));
    }

    #[test]
    fn newer_snapshot_version_falls_back_to_defaults() {
        let raw = r#"{"version": 7, "employees": [], "allTasks": []}"#;
        let store = WorkspaceStore::open(Box::new(MemoryStorage::with_raw(raw)));
        assert!(!store.employees().is_empty());
        assert!(matches!(
            store.last_persistence_error(),
            Some(StorageError::UnsupportedVersion { found: 7, .. })
        ));
    }

    #[test]
    fn index_prefers_flat_values_and_appends_missing() {
        let stale = Task {
            id: 10,
            title: "old title".into(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Low,
            due_date: None,
            employee_id: 1,
        };
        let fresh = Task { title: "new title".into(), ..stale.clone() };
        let extra = Task { id: 11, title: "unlisted".into(), ..stale.clone() };

        let mut ada = employee(1, "Ada");
        ada.tasks = vec![stale];
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            employees: vec![ada],
            all_tasks: Some(vec![fresh, extra.clone(), extra]),
        };
        let store = WorkspaceStore::from_snapshot(snapshot, Box::new(MemoryStorage::new()));
        let titles: Vec<_> = store.employee_tasks(1).iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["new title", "unlisted"]);
        assert_eq!(store.tasks().len(), 2);
        assert_views_in_sync(&store);
    }
}
