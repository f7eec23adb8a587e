//! Bundled default workspace, used when no snapshot has been saved yet.

use super::persist::{Snapshot, SNAPSHOT_VERSION};

const DEFAULT_WORKSPACE_JSON: &str = include_str!("../../assets/default_workspace.json");

/// The bundled dataset. A broken bundle degrades to an empty workspace.
pub fn default_snapshot() -> Snapshot {
    match Snapshot::from_json(DEFAULT_WORKSPACE_JSON) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::error!("Bundled workspace is unreadable, starting empty: {}", e);
            Snapshot {
                version: SNAPSHOT_VERSION,
                employees: Vec::new(),
                all_tasks: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bundle_parses_and_is_consistent() {
        let snap = Snapshot::from_json(DEFAULT_WORKSPACE_JSON).unwrap();
        assert_eq!(snap.employees.len(), 4);
        assert!(snap.all_tasks.is_none(), "flat list is derived at load");

        let mut ids = HashSet::new();
        for emp in &snap.employees {
            for task in &emp.tasks {
                assert_eq!(task.employee_id, emp.id, "task {} misfiled", task.id);
                assert!(ids.insert(task.id), "duplicate task id {}", task.id);
            }
        }
        assert_eq!(default_snapshot().flat_tasks().len(), ids.len());
    }

    #[test]
    fn bundled_avatars_are_single_glyphs() {
        // egui's bundled fonts have no ZWJ sequences or variation selectors
        for emp in default_snapshot().employees {
            assert_eq!(emp.avatar.chars().count(), 1, "avatar of {}", emp.name);
        }
    }
}
