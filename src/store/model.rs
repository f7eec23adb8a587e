//! Workspace domain types: employees, tasks and the enums the overlay filters on.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type EmployeeId = u32;
pub type TaskId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status filter applied by the overlay and the sticky-note layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub const CHOICES: [StatusFilter; 4] = [
        Self::All,
        Self::Only(TaskStatus::Pending),
        Self::Only(TaskStatus::InProgress),
        Self::Only(TaskStatus::Completed),
    ];

    pub fn accepts(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => s == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(s) => s.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(
        default,
        deserialize_with = "deserialize_due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    pub employee_id: EmployeeId,
}

/// Older snapshots write `""` for "no due date".
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Fields of a task before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub employee_id: EmployeeId,
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date: None,
            employee_id: 1,
        }
    }
}

impl NewTask {
    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            employee_id: self.employee_id,
        }
    }
}

/// Partial update merged into an existing task. `None` leaves a field as is;
/// `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub employee_id: Option<EmployeeId>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(employee_id) = self.employee_id {
            task.employee_id = employee_id;
        }
    }
}

/// An employee as held by the store. Tasks live in the store's flat
/// collection; `task_ids` keeps this employee's insertion order over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub email: String,
    pub task_ids: Vec<TaskId>,
}

/// Aggregate counts over a set of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    /// `round(completed / total * 100)`, 0 for an empty set.
    pub completed_percent: u8,
}

impl TaskStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            let pct = (stats.completed as f64 / stats.total as f64 * 100.0).round();
            stats.completed_percent = pct.clamp(0.0, 100.0) as u8;
        }
        stats
    }

    /// Completed share in [0, 1]; 0 for an empty set.
    pub fn completion_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: TaskId, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("t{}", id),
            description: String::new(),
            status,
            priority: Priority::Low,
            due_date: None,
            employee_id: 1,
        }
    }

    #[test]
    fn status_serializes_with_space() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, TaskStatus::InProgress);
    }

    #[test]
    fn empty_due_date_reads_as_none() {
        let json = r#"{"id":5,"title":"x","description":"","status":"Pending",
                       "priority":"High","dueDate":"","employeeId":2}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.due_date, None);
        assert_eq!(t.employee_id, 2);
    }

    #[test]
    fn due_date_parses_iso() {
        let json = r#"{"id":5,"title":"x","dueDate":"2024-03-09","employeeId":2}"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(t.status, TaskStatus::Pending);
        assert_eq!(t.priority, Priority::Medium);
    }

    #[test]
    fn bad_due_date_is_an_error() {
        let json = r#"{"id":5,"title":"x","dueDate":"next week","employeeId":2}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut t = task(1, TaskStatus::Pending);
        TaskPatch {
            title: Some("renamed".into()),
            due_date: Some(NaiveDate::from_ymd_opt(2025, 1, 1)),
            ..Default::default()
        }
        .apply(&mut t);
        assert_eq!(t.title, "renamed");
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.due_date.is_some());

        TaskPatch { due_date: Some(None), ..Default::default() }.apply(&mut t);
        assert_eq!(t.due_date, None);
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn stats_rounding_and_empty() {
        assert_eq!(TaskStats::from_tasks(&Vec::<Task>::new()).completed_percent, 0);

        let tasks = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::Pending),
            task(3, TaskStatus::InProgress),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed_percent, 33);

        let two_thirds = vec![
            task(1, TaskStatus::Completed),
            task(2, TaskStatus::Completed),
            task(3, TaskStatus::Pending),
        ];
        assert_eq!(TaskStats::from_tasks(&two_thirds).completed_percent, 67);
    }

    #[test]
    fn filter_accepts() {
        assert!(StatusFilter::All.accepts(TaskStatus::Completed));
        assert!(StatusFilter::Only(TaskStatus::Pending).accepts(TaskStatus::Pending));
        assert!(!StatusFilter::Only(TaskStatus::Pending).accepts(TaskStatus::Completed));
        assert_eq!(StatusFilter::CHOICES[2].label(), "In Progress");
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
