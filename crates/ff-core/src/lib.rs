//! Core domain logic for the FocusFlow study tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Storage: the injectable key-value [`Store`] interface and keys
//! - Sessions: the scheduled/active/completed lifecycle state machine
//! - Timer: timestamp-based elapsed-time computation
//! - Reporting: read-only aggregation over completed sessions

pub mod date;
pub mod records;
pub mod report;
pub mod session;
pub mod store;
pub mod timer;
pub mod tracker;
pub mod types;

pub use session::{Lap, SessionStatus, StudySession};
pub use store::{MemoryStore, Store, keys};
pub use timer::{TimerState, TimerStatus, format_elapsed, minutes_from_seconds};
pub use tracker::{ConflictError, SessionList, Tick, Tracker};
pub use types::{HabitId, NoteId, ResourceId, SessionId, TaskId, ValidationError};
