//! Flat collaborator records: habits, habit logs, tasks, notes, resources.
//!
//! Plain CRUD over the store. These lists are consumed read-only by the
//! reporting functions; none of them interact with the session lifecycle.
//! Missing IDs on update/delete are silent no-ops throughout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Store, keys};
use crate::types::{HabitId, NoteId, ResourceId, TaskId};

/// A recurring habit tracked per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One completion of a habit on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// A one-off task with an optional due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A study resource (book, PDF, course, link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Manually entered completion percent. Superseded by page counts.
    #[serde(default)]
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Completion percent, derived from page counts when both are present,
    /// otherwise the manually entered value. Clamped to 100.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        match (self.current_page, self.total_pages) {
            (Some(current), Some(total)) if total > 0 => {
                let pct = (f64::from(current) / f64::from(total) * 100.0).round();
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "value is clamped to [0, 100] before the cast"
                )]
                let pct = pct.clamp(0.0, 100.0) as u32;
                pct
            }
            _ => self.progress.min(100),
        }
    }
}

// ========== Habits ==========

pub fn habits<S: Store>(store: &S) -> Vec<Habit> {
    store.read_list(keys::HABITS)
}

pub fn add_habit<S: Store>(store: &S, name: impl Into<String>, now: DateTime<Utc>) -> Habit {
    let habit = Habit {
        id: HabitId::generate(),
        name: name.into(),
        created_at: now,
    };
    let mut all = habits(store);
    all.push(habit.clone());
    store.write(keys::HABITS, &all);
    habit
}

/// Deletes a habit and every log belonging to it.
pub fn delete_habit<S: Store>(store: &S, id: &HabitId) -> bool {
    let all = habits(store);
    let before = all.len();
    let kept: Vec<Habit> = all.into_iter().filter(|h| &h.id != id).collect();
    if kept.len() == before {
        return false;
    }
    store.write(keys::HABITS, &kept);

    let logs: Vec<HabitLog> = store.read_list(keys::HABIT_LOGS);
    let kept_logs: Vec<HabitLog> = logs.into_iter().filter(|l| &l.habit_id != id).collect();
    store.write(keys::HABIT_LOGS, &kept_logs);
    true
}

// ========== Habit logs ==========

pub fn habit_logs<S: Store>(store: &S) -> Vec<HabitLog> {
    store.read_list(keys::HABIT_LOGS)
}

pub fn is_habit_done<S: Store>(store: &S, id: &HabitId, date: NaiveDate) -> bool {
    habit_logs(store)
        .iter()
        .any(|l| &l.habit_id == id && l.date == date)
}

/// Toggles the habit's log for a day. Returns true when the day is now logged.
pub fn toggle_habit_log<S: Store>(
    store: &S,
    id: &HabitId,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> bool {
    let mut logs = habit_logs(store);
    let before = logs.len();
    logs.retain(|l| !(&l.habit_id == id && l.date == date));
    let added = logs.len() == before;
    if added {
        logs.push(HabitLog {
            habit_id: id.clone(),
            date,
            completed_at: now,
        });
    }
    store.write(keys::HABIT_LOGS, &logs);
    added
}

// ========== Tasks ==========

pub fn tasks<S: Store>(store: &S) -> Vec<Task> {
    store.read_list(keys::TASKS)
}

pub fn add_task<S: Store>(
    store: &S,
    title: impl Into<String>,
    due_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Task {
    let task = Task {
        id: TaskId::generate(),
        title: title.into(),
        due_date,
        completed: false,
        created_at: now,
        updated_at: None,
    };
    let mut all = tasks(store);
    all.push(task.clone());
    store.write(keys::TASKS, &all);
    task
}

/// Flips a task's completion flag, stamping `updated_at`.
pub fn toggle_task<S: Store>(store: &S, id: &TaskId, now: DateTime<Utc>) -> bool {
    let mut all = tasks(store);
    let Some(task) = all.iter_mut().find(|t| &t.id == id) else {
        return false;
    };
    task.completed = !task.completed;
    task.updated_at = Some(now);
    store.write(keys::TASKS, &all);
    true
}

pub fn delete_task<S: Store>(store: &S, id: &TaskId) -> bool {
    let all = tasks(store);
    let before = all.len();
    let kept: Vec<Task> = all.into_iter().filter(|t| &t.id != id).collect();
    if kept.len() == before {
        return false;
    }
    store.write(keys::TASKS, &kept);
    true
}

// ========== Notes ==========

pub fn notes<S: Store>(store: &S) -> Vec<Note> {
    store.read_list(keys::NOTES)
}

/// Adds a note at the front of the list (newest first).
pub fn add_note<S: Store>(
    store: &S,
    title: impl Into<String>,
    body: impl Into<String>,
    now: DateTime<Utc>,
) -> Note {
    let note = Note {
        id: NoteId::generate(),
        title: title.into(),
        body: body.into(),
        created_at: now,
        updated_at: now,
    };
    let mut all = notes(store);
    all.insert(0, note.clone());
    store.write(keys::NOTES, &all);
    note
}

pub fn update_note<S: Store>(
    store: &S,
    id: &NoteId,
    title: Option<&str>,
    body: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    let mut all = notes(store);
    let Some(note) = all.iter_mut().find(|n| &n.id == id) else {
        return false;
    };
    if let Some(title) = title {
        note.title = title.to_string();
    }
    if let Some(body) = body {
        note.body = body.to_string();
    }
    note.updated_at = now;
    store.write(keys::NOTES, &all);
    true
}

pub fn delete_note<S: Store>(store: &S, id: &NoteId) -> bool {
    let all = notes(store);
    let before = all.len();
    let kept: Vec<Note> = all.into_iter().filter(|n| &n.id != id).collect();
    if kept.len() == before {
        return false;
    }
    store.write(keys::NOTES, &kept);
    true
}

// ========== Resources ==========

pub fn resources<S: Store>(store: &S) -> Vec<Resource> {
    store.read_list(keys::RESOURCES)
}

pub fn add_resource<S: Store>(store: &S, resource: Resource) -> Resource {
    let mut all = resources(store);
    all.push(resource.clone());
    store.write(keys::RESOURCES, &all);
    resource
}

/// Updates a resource's reading position.
pub fn update_resource_progress<S: Store>(
    store: &S,
    id: &ResourceId,
    current_page: Option<u32>,
    progress: Option<u32>,
) -> bool {
    let mut all = resources(store);
    let Some(resource) = all.iter_mut().find(|r| &r.id == id) else {
        return false;
    };
    if let Some(page) = current_page {
        resource.current_page = Some(page);
    }
    if let Some(pct) = progress {
        resource.progress = pct.min(100);
    }
    store.write(keys::RESOURCES, &all);
    true
}

pub fn delete_resource<S: Store>(store: &S, id: &ResourceId) -> bool {
    let all = resources(store);
    let before = all.len();
    let kept: Vec<Resource> = all.into_iter().filter(|r| &r.id != id).collect();
    if kept.len() == before {
        return false;
    }
    store.write(keys::RESOURCES, &kept);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn toggle_habit_log_flips_per_day() {
        let store = MemoryStore::new();
        let habit = add_habit(&store, "reading", now());

        assert!(toggle_habit_log(&store, &habit.id, day(), now()));
        assert!(is_habit_done(&store, &habit.id, day()));

        assert!(!toggle_habit_log(&store, &habit.id, day(), now()));
        assert!(!is_habit_done(&store, &habit.id, day()));
    }

    #[test]
    fn deleting_a_habit_cascades_to_its_logs() {
        let store = MemoryStore::new();
        let keep = add_habit(&store, "reading", now());
        let gone = add_habit(&store, "running", now());
        toggle_habit_log(&store, &keep.id, day(), now());
        toggle_habit_log(&store, &gone.id, day(), now());

        assert!(delete_habit(&store, &gone.id));
        let logs = habit_logs(&store);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].habit_id, keep.id);
    }

    #[test]
    fn delete_missing_habit_is_noop() {
        let store = MemoryStore::new();
        add_habit(&store, "reading", now());
        assert!(!delete_habit(&store, &HabitId::new("missing").unwrap()));
        assert_eq!(habits(&store).len(), 1);
    }

    #[test]
    fn toggle_task_stamps_updated_at() {
        let store = MemoryStore::new();
        let task = add_task(&store, "essay draft", Some(day()), now());
        assert!(!task.completed);

        assert!(toggle_task(&store, &task.id, now()));
        let stored = &tasks(&store)[0];
        assert!(stored.completed);
        assert_eq!(stored.updated_at, Some(now()));

        assert!(!toggle_task(&store, &TaskId::new("missing").unwrap(), now()));
    }

    #[test]
    fn notes_are_newest_first() {
        let store = MemoryStore::new();
        add_note(&store, "first", "", now());
        add_note(&store, "second", "", now());
        let all = notes(&store);
        assert_eq!(all[0].title, "second");
        assert_eq!(all[1].title, "first");
    }

    #[test]
    fn resource_progress_prefers_page_counts() {
        let resource = Resource {
            id: ResourceId::generate(),
            title: "calculus text".to_string(),
            kind: "PDF".to_string(),
            url: None,
            progress: 10,
            current_page: Some(150),
            total_pages: Some(300),
            created_at: now(),
        };
        assert_eq!(resource.progress_percent(), 50);

        let manual = Resource {
            current_page: None,
            total_pages: None,
            progress: 180,
            ..resource
        };
        assert_eq!(manual.progress_percent(), 100);
    }
}
