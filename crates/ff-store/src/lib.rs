//! File-backed storage for FocusFlow.
//!
//! [`FileStore`] persists each storage key as one JSON document in a data
//! directory (`<dir>/<key>.json`), mirroring the independently keyed
//! partition the tracker was originally built on. Read and write failures
//! follow the tolerant store contract: they are logged and swallowed, and
//! callers fall back to default data.
//!
//! The crate also owns the one-time migration of the legacy single-list
//! session schema into the completed-sessions list.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use ff_core::{SessionStatus, Store, StudySession, keys};

/// Errors opening the store. Once open, operations never fail loudly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Key-value store writing one JSON file per key.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if necessary.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the per-key documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(key, path = %path.display(), %err, "failed to read document");
                None
            }
        }
    }

    fn write_raw(&self, key: &str, json: &str) {
        let path = self.path_for(key);
        if let Err(err) = std::fs::write(&path, json) {
            tracing::warn!(key, path = %path.display(), %err, "failed to write document");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(key, path = %path.display(), %err, "failed to remove document");
            }
        }
    }
}

/// Migrates the legacy single-list session key into the completed list.
///
/// Each legacy record absent (by ID) from the completed list is copied in
/// with `completed` status and a completion time defaulting to its creation
/// time, then the legacy key is deleted. Safe to invoke on every start:
/// once the key is gone this is a no-op, and re-running against a partially
/// migrated list never duplicates records.
///
/// Returns the number of records migrated.
pub fn migrate_legacy_sessions<S: Store>(store: &S) -> usize {
    let Some(legacy) = store.read::<Vec<StudySession>>(keys::LEGACY_SESSIONS) else {
        return 0;
    };

    let mut completed: Vec<StudySession> = store.read_list(keys::COMPLETED_SESSIONS);
    let existing: std::collections::HashSet<&str> =
        completed.iter().map(|s| s.id.as_str()).collect();

    let migrated: Vec<StudySession> = legacy
        .into_iter()
        .filter(|s| !existing.contains(s.id.as_str()))
        .map(|mut s| {
            s.status = SessionStatus::Completed;
            s.completed_at = s.completed_at.or(Some(s.created_at));
            s
        })
        .collect();

    let count = migrated.len();
    if count > 0 {
        completed.extend(migrated);
        store.write(keys::COMPLETED_SESSIONS, &completed);
    }
    store.remove(keys::LEGACY_SESSIONS);
    if count > 0 {
        tracing::info!(count, "migrated legacy sessions to completed list");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use ff_core::SessionId;

    fn store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    fn legacy_session(id: &str, minutes: u32) -> StudySession {
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        let mut s = StudySession::ad_hoc("algebra", created);
        s.id = SessionId::new(id).unwrap();
        s.date = Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        s.duration = Some(minutes);
        s.completed_at = None;
        s
    }

    #[test]
    fn write_read_remove_roundtrip() {
        let (_guard, store) = store();
        store.write("tasks", &vec!["a".to_string()]);
        assert_eq!(store.read::<Vec<String>>("tasks").unwrap(), ["a"]);

        store.remove("tasks");
        assert_eq!(store.read::<Vec<String>>("tasks"), None);
        store.remove("tasks"); // idempotent
    }

    #[test]
    fn malformed_file_reads_as_absent_value() {
        let (_guard, store) = store();
        std::fs::write(store.dir().join("habits.json"), "{broken").unwrap();
        assert_eq!(store.read::<Vec<String>>("habits"), None);
        assert!(store.read_list::<String>("habits").is_empty());
    }

    #[test]
    fn documents_land_in_per_key_files() {
        let (_guard, store) = store();
        store.write(keys::NOTES, &Vec::<String>::new());
        assert!(store.dir().join("notes.json").is_file());
    }

    #[test]
    fn migration_tags_records_completed_and_deletes_legacy_key() {
        let (_guard, store) = store();
        store.write(
            keys::LEGACY_SESSIONS,
            &vec![legacy_session("old-1", 30), legacy_session("old-2", 45)],
        );

        assert_eq!(migrate_legacy_sessions(&store), 2);

        let completed: Vec<StudySession> = store.read_list(keys::COMPLETED_SESSIONS);
        assert_eq!(completed.len(), 2);
        for s in &completed {
            assert_eq!(s.status, SessionStatus::Completed);
            assert_eq!(s.completed_at, Some(s.created_at));
        }
        assert!(!store.contains(keys::LEGACY_SESSIONS));
    }

    #[test]
    fn migration_twice_produces_no_duplicates() {
        let (_guard, store) = store();
        store.write(keys::LEGACY_SESSIONS, &vec![legacy_session("old-1", 30)]);

        assert_eq!(migrate_legacy_sessions(&store), 1);
        assert_eq!(migrate_legacy_sessions(&store), 0);
        let completed: Vec<StudySession> = store.read_list(keys::COMPLETED_SESSIONS);
        assert_eq!(completed.len(), 1);

        // Even with the legacy key restored, known IDs are skipped
        store.write(keys::LEGACY_SESSIONS, &vec![legacy_session("old-1", 30)]);
        assert_eq!(migrate_legacy_sessions(&store), 0);
        let completed: Vec<StudySession> = store.read_list(keys::COMPLETED_SESSIONS);
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn migration_without_legacy_key_is_noop() {
        let (_guard, store) = store();
        assert_eq!(migrate_legacy_sessions(&store), 0);
        assert!(!store.contains(keys::COMPLETED_SESSIONS));
    }

    #[test]
    fn migration_preserves_existing_completion_time() {
        let (_guard, store) = store();
        let mut s = legacy_session("old-1", 30);
        let done_at = Utc.with_ymd_and_hms(2025, 5, 2, 12, 0, 0).unwrap();
        s.completed_at = Some(done_at);
        store.write(keys::LEGACY_SESSIONS, &vec![s]);

        migrate_legacy_sessions(&store);
        let completed: Vec<StudySession> = store.read_list(keys::COMPLETED_SESSIONS);
        assert_eq!(completed[0].completed_at, Some(done_at));
    }
}
