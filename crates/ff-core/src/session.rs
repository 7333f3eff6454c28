//! Study session records and their lifecycle states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ResourceId, SessionId};

/// Lifecycle state of a study session.
///
/// `scheduled → active → completed`, with `completed` terminal. An active
/// session may instead be discarded, leaving no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Active,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-marked checkpoint recording elapsed time at the moment of marking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub id: String,
    /// Sequential, starting at 1 for each session.
    pub lap_number: u32,
    pub elapsed_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// A study session in any lifecycle state.
///
/// All three states share one schema; which optional fields are populated
/// depends on the state. Serialized field names match the original
/// local-storage shape (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: SessionId,
    pub subject: String,
    pub status: SessionStatus,
    /// Planned calendar day for scheduled sessions; stamped from the
    /// completion time for ad-hoc sessions that never had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Weak reference to a resource. May dangle; resolved at read time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_resource_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Planned duration in minutes. For a scheduled session this is the
    /// hint that seeds the timer target; on completion it is overwritten
    /// with the actual duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Raw elapsed seconds, set only on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Meaningful while active; preserved once completed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub laps: Vec<Lap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl StudySession {
    /// Creates a scheduled session for a planned day.
    #[must_use]
    pub fn scheduled(
        subject: impl Into<String>,
        date: NaiveDate,
        planned_minutes: Option<u32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::generate(),
            subject: subject.into(),
            status: SessionStatus::Scheduled,
            date: Some(date),
            linked_resource_id: None,
            notes: String::new(),
            duration: planned_minutes,
            duration_seconds: None,
            laps: Vec::new(),
            started_at: None,
            completed_at: None,
            created_at,
        }
    }

    /// Creates a fresh ad-hoc active session, bypassing the scheduled list.
    #[must_use]
    pub fn ad_hoc(subject: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            subject: subject.into(),
            status: SessionStatus::Active,
            date: None,
            linked_resource_id: None,
            notes: String::new(),
            duration: None,
            duration_seconds: None,
            laps: Vec::new(),
            started_at: Some(started_at),
            completed_at: None,
            created_at: started_at,
        }
    }

    /// Planned timer ceiling in seconds, derived from the duration hint.
    #[must_use]
    pub fn planned_target_seconds(&self) -> Option<u64> {
        self.duration.map(|minutes| u64::from(minutes) * 60)
    }
}
