//! Session lifecycle state machine.
//!
//! [`Tracker`] owns every transition between the scheduled list, the
//! at-most-one active slot, and the completed list, plus the paired timer
//! slot. Callers never mutate those keys directly; centralizing transitions
//! here is what enforces the single-active-session invariant.
//!
//! The timer slot and the active-session record are created together when a
//! session starts, mutated together on pause/resume, and cleared together
//! when the session completes or is discarded.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::session::{Lap, SessionStatus, StudySession};
use crate::store::{Store, keys};
use crate::timer::{TimerState, TimerStatus, minutes_from_seconds};
use crate::types::{ResourceId, SessionId};

/// Attempt to start a session while another is already active.
///
/// This is the only hard error in the core: it is surfaced to the user and
/// leaves both the existing active session and the attempted source
/// untouched. Everything else degrades to a silent no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("a study session is already active")]
pub struct ConflictError;

/// Which terminal-adjacent list a delete targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionList {
    Scheduled,
    Completed,
}

/// Outcome of a timer poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// No timer slot, or the timer is idle.
    Idle,
    /// Timer running; current recomputed elapsed seconds.
    Running { elapsed: f64 },
    /// Timer paused; banked elapsed seconds.
    Paused { elapsed: f64 },
    /// The planned target was reached and the session auto-completed.
    Completed(StudySession),
}

/// Study session state machine over an injectable store.
pub struct Tracker<S> {
    store: S,
}

impl<S: Store> Tracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store, for collaborator record access.
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ========== Reads ==========

    pub fn scheduled_sessions(&self) -> Vec<StudySession> {
        self.store.read_list(keys::SCHEDULED_SESSIONS)
    }

    pub fn completed_sessions(&self) -> Vec<StudySession> {
        self.store.read_list(keys::COMPLETED_SESSIONS)
    }

    pub fn active_session(&self) -> Option<StudySession> {
        self.store.read(keys::ACTIVE_SESSION)
    }

    pub fn timer_state(&self) -> Option<TimerState> {
        self.store.read(keys::ACTIVE_TIMER)
    }

    // ========== Scheduling ==========

    /// Appends a new scheduled session. Does not touch the active slot.
    pub fn schedule(
        &self,
        subject: impl Into<String>,
        date: NaiveDate,
        planned_minutes: Option<u32>,
        notes: Option<&str>,
        linked_resource_id: Option<ResourceId>,
        now: DateTime<Utc>,
    ) -> StudySession {
        let mut session = StudySession::scheduled(subject, date, planned_minutes, now);
        session.notes = notes.unwrap_or_default().to_string();
        session.linked_resource_id = linked_resource_id;

        let mut scheduled = self.scheduled_sessions();
        scheduled.push(session.clone());
        self.store.write(keys::SCHEDULED_SESSIONS, &scheduled);
        tracing::debug!(id = %session.id, subject = %session.subject, "session scheduled");
        session
    }

    // ========== Starting ==========

    /// Starts the scheduled session with the given ID.
    ///
    /// The record moves (not copies) from the scheduled list to the active
    /// slot. A planned duration hint on the record seeds the timer target.
    ///
    /// Returns `Ok(None)` when no scheduled session has that ID.
    pub fn start_from_scheduled(
        &self,
        id: &SessionId,
        now: DateTime<Utc>,
    ) -> Result<Option<StudySession>, ConflictError> {
        self.ensure_no_active()?;

        let mut scheduled = self.scheduled_sessions();
        let Some(index) = scheduled.iter().position(|s| &s.id == id) else {
            tracing::debug!(%id, "no such scheduled session");
            return Ok(None);
        };
        let mut session = scheduled.remove(index);
        let target = session.planned_target_seconds();

        session.status = SessionStatus::Active;
        session.started_at = Some(now);
        session.laps.clear();

        self.store.write(keys::SCHEDULED_SESSIONS, &scheduled);
        self.store.write(keys::ACTIVE_SESSION, &session);
        self.store
            .write(keys::ACTIVE_TIMER, &TimerState::start(now, target));
        tracing::info!(id = %session.id, subject = %session.subject, ?target, "session started");
        Ok(Some(session))
    }

    /// Starts a fresh active session directly, bypassing the scheduled list.
    pub fn start_ad_hoc(
        &self,
        subject: impl Into<String>,
        linked_resource_id: Option<ResourceId>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<StudySession, ConflictError> {
        self.ensure_no_active()?;

        let mut session = StudySession::ad_hoc(subject, now);
        session.linked_resource_id = linked_resource_id;
        session.notes = notes.unwrap_or_default().to_string();

        self.store.write(keys::ACTIVE_SESSION, &session);
        self.store
            .write(keys::ACTIVE_TIMER, &TimerState::start(now, None));
        tracing::info!(id = %session.id, subject = %session.subject, "ad-hoc session started");
        Ok(session)
    }

    fn ensure_no_active(&self) -> Result<(), ConflictError> {
        if self.active_session().is_some() {
            return Err(ConflictError);
        }
        Ok(())
    }

    // ========== Pause / resume / laps ==========

    /// Pauses the running timer. Returns false (no-op) in any other state.
    pub fn pause(&self, now: DateTime<Utc>) -> bool {
        let Some(timer) = self.timer_state() else {
            return false;
        };
        if timer.status != TimerStatus::Running {
            return false;
        }
        self.store.write(keys::ACTIVE_TIMER, &timer.pause(now));
        true
    }

    /// Resumes the paused timer. Returns false (no-op) in any other state.
    pub fn resume(&self, now: DateTime<Utc>) -> bool {
        let Some(timer) = self.timer_state() else {
            return false;
        };
        if timer.status != TimerStatus::Paused {
            return false;
        }
        self.store.write(keys::ACTIVE_TIMER, &timer.resume(now));
        true
    }

    /// Records a lap on the active session.
    ///
    /// Valid only while a session is active and the timer is running;
    /// returns `None` otherwise. Lap numbers are sequential from 1.
    pub fn add_lap(&self, now: DateTime<Utc>) -> Option<Lap> {
        let mut session = self.active_session()?;
        let timer = self.timer_state()?;
        if timer.status != TimerStatus::Running {
            return None;
        }

        let lap = Lap {
            id: Uuid::new_v4().to_string(),
            lap_number: u32::try_from(session.laps.len()).unwrap_or(u32::MAX - 1) + 1,
            elapsed_seconds: timer.elapsed_at(now),
            timestamp: now,
        };
        session.laps.push(lap.clone());
        self.store.write(keys::ACTIVE_SESSION, &session);
        tracing::debug!(number = lap.lap_number, "lap recorded");
        Some(lap)
    }

    // ========== Completion ==========

    /// Completes the active session with the actual elapsed time.
    ///
    /// Valid while a session is active, running or paused. Returns `None`
    /// (no-op) when nothing is active.
    pub fn complete(&self, now: DateTime<Utc>) -> Option<StudySession> {
        let session = self.active_session()?;
        let elapsed = self
            .timer_state()
            .map_or(0.0, |timer| timer.elapsed_at(now));
        Some(self.finish(session, elapsed, now))
    }

    /// Discards the active session without producing a completed record.
    ///
    /// Irreversible. Returns false when nothing is active.
    pub fn discard(&self) -> bool {
        if self.active_session().is_none() {
            return false;
        }
        self.store.remove(keys::ACTIVE_SESSION);
        self.store.remove(keys::ACTIVE_TIMER);
        tracing::info!("active session discarded");
        true
    }

    /// Polls the timer, recomputing elapsed time from wall-clock stamps.
    ///
    /// Any poll doubles as the mount-time check: if the planned target was
    /// reached while nobody was watching, the session auto-completes here,
    /// with elapsed clamped to the target rather than the overshoot.
    pub fn tick(&self, now: DateTime<Utc>) -> Tick {
        let Some(timer) = self.timer_state() else {
            return Tick::Idle;
        };
        match timer.status {
            TimerStatus::Idle => Tick::Idle,
            TimerStatus::Paused => Tick::Paused {
                elapsed: timer.elapsed_at(now),
            },
            TimerStatus::Running => {
                let elapsed = timer.elapsed_at(now);
                if timer.target_reached(now) {
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "targets are user-scale durations"
                    )]
                    let capped = timer.target_seconds.map_or(elapsed, |t| t as f64);
                    match self.active_session() {
                        Some(session) => {
                            tracing::info!(id = %session.id, "target reached, auto-completing");
                            Tick::Completed(self.finish(session, capped, now))
                        }
                        // Orphaned timer with no session to complete
                        None => {
                            self.store.remove(keys::ACTIVE_TIMER);
                            Tick::Idle
                        }
                    }
                } else {
                    Tick::Running { elapsed }
                }
            }
        }
    }

    /// Moves the active record to the completed list and clears both slots.
    ///
    /// The only path by which a record enters the completed list from the
    /// active slot.
    fn finish(
        &self,
        mut session: StudySession,
        elapsed_seconds: f64,
        now: DateTime<Utc>,
    ) -> StudySession {
        session.status = SessionStatus::Completed;
        session.duration = Some(minutes_from_seconds(elapsed_seconds));
        session.duration_seconds = Some(elapsed_seconds);
        session.completed_at = Some(now);
        if session.date.is_none() {
            session.date = Some(now.date_naive());
        }

        let mut completed = self.completed_sessions();
        completed.push(session.clone());
        self.store.write(keys::COMPLETED_SESSIONS, &completed);
        self.store.remove(keys::ACTIVE_SESSION);
        self.store.remove(keys::ACTIVE_TIMER);
        tracing::info!(
            id = %session.id,
            minutes = session.duration,
            "session completed"
        );
        session
    }

    // ========== Deletion ==========

    /// Deletes a session from the scheduled or completed list by ID.
    ///
    /// Missing IDs are a silent no-op. Never touches the active slot.
    pub fn delete(&self, list: SessionList, id: &SessionId) -> bool {
        let key = match list {
            SessionList::Scheduled => keys::SCHEDULED_SESSIONS,
            SessionList::Completed => keys::COMPLETED_SESSIONS,
        };
        let sessions: Vec<StudySession> = self.store.read_list(key);
        let before = sessions.len();
        let kept: Vec<StudySession> = sessions.into_iter().filter(|s| &s.id != id).collect();
        if kept.len() == before {
            return false;
        }
        self.store.write(key, &kept);
        true
    }
}
