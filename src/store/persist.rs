//! Durable workspace snapshots.
//!
//! A snapshot is the whole employees + allTasks record, rewritten on every
//! task mutation. Storage backends implement [`SnapshotStorage`]; the store
//! never lets their errors escape a command.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{EmployeeId, Task};

/// Schema version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File name of the snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "workspace_data.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("could not decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Employee record as it appears on disk, tasks nested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEmployee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub employees: Vec<SnapshotEmployee>,
    /// Absent in the bundled dataset; derived by flattening employees.
    #[serde(default)]
    pub all_tasks: Option<Vec<Task>>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let snapshot: Snapshot = serde_json::from_str(raw).map_err(StorageError::Decode)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self).map_err(StorageError::Encode)
    }

    /// The flat task list, flattening employees when `allTasks` is absent.
    pub fn flat_tasks(&self) -> Vec<Task> {
        match &self.all_tasks {
            Some(tasks) => tasks.clone(),
            None => self
                .employees
                .iter()
                .flat_map(|e| e.tasks.iter().cloned())
                .collect(),
        }
    }
}

/// Where snapshots are read from and written to.
pub trait SnapshotStorage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// JSON file on local disk. Writes go to a sibling temp file first and are
/// renamed into place so a crash never leaves a half-written snapshot.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Snapshot::from_json(&raw).map(Some)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        log::debug!("Snapshot written to {}", self.path.display());
        Ok(())
    }
}

/// In-process storage holding the serialized JSON, so round trips still go
/// through the real encoder. `fail_writes` simulates an unavailable disk.
#[derive(Default)]
pub struct MemoryStorage {
    raw: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with raw JSON (possibly malformed).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.raw.replace(Some(raw.into()));
        storage
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        match self.raw.borrow().as_deref() {
            None => Ok(None),
            Some(raw) => Snapshot::from_json(raw).map(Some),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        let json = snapshot.to_json()?;
        self.raw.replace(Some(json));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl<S: SnapshotStorage + ?Sized> SnapshotStorage for std::rc::Rc<S> {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::model::{Priority, TaskStatus};

    fn sample() -> Snapshot {
        let task = Task {
            id: 7,
            title: "Ship".into(),
            description: "release build".into(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1),
            employee_id: 1,
        };
        Snapshot {
            version: SNAPSHOT_VERSION,
            employees: vec![SnapshotEmployee {
                id: 1,
                name: "Ada".into(),
                role: "Engineer".into(),
                avatar: "A".into(),
                email: "ada@example.com".into(),
                tasks: vec![task.clone()],
            }],
            all_tasks: Some(vec![task]),
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"allTasks\""));
        assert!(json.contains("\"employeeId\""));
        assert!(json.contains("\"dueDate\": \"2024-06-01\""));
        assert!(json.contains("\"In Progress\""));
    }

    #[test]
    fn missing_version_reads_as_current() {
        let snap = Snapshot::from_json(r#"{"employees":[],"allTasks":[]}"#).unwrap();
        assert_eq!(snap.version, SNAPSHOT_VERSION);
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = Snapshot::from_json(r#"{"version":99,"employees":[]}"#).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn flat_tasks_derived_when_absent() {
        let mut snap = sample();
        snap.all_tasks = None;
        assert_eq!(snap.flat_tasks().len(), 1);
        assert_eq!(snap.flat_tasks()[0].id, 7);
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(&dir.path().join("nested"));
        assert!(storage.load().unwrap().is_none());

        storage.save(&sample()).unwrap();
        let back = storage.load().unwrap().unwrap();
        assert_eq!(back, sample());
        assert!(!storage.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn file_storage_corrupt_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "{ not json").unwrap();
        assert!(matches!(storage.load(), Err(StorageError::Decode(_))));
    }

    #[test]
    fn memory_storage_failure_switch() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(storage.save(&sample()).is_err());
        assert_eq!(storage.writes(), 0);
        storage.set_fail_writes(false);
        storage.save(&sample()).unwrap();
        assert_eq!(storage.writes(), 1);
        assert_eq!(storage.load().unwrap(), Some(sample()));
    }
}
