//! List and delete commands for the scheduled and completed session lists.

use std::io::Write;

use anyhow::{Context, Result};

use ff_core::date::format_minutes;
use ff_core::{SessionId, SessionList, Store, Tracker};

use crate::cli::ListKind;

impl From<ListKind> for SessionList {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Scheduled => Self::Scheduled,
            ListKind::Completed => Self::Completed,
        }
    }
}

pub fn run<S: Store, W: Write>(writer: &mut W, tracker: &Tracker<S>, kind: ListKind) -> Result<()> {
    let sessions = match kind {
        ListKind::Scheduled => tracker.scheduled_sessions(),
        ListKind::Completed => tracker.completed_sessions(),
    };
    if sessions.is_empty() {
        writeln!(writer, "No sessions.")?;
        return Ok(());
    }

    for session in sessions {
        let date = session
            .date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        let extent = match kind {
            ListKind::Scheduled => session
                .duration
                .map_or_else(String::new, |m| format!("  {} planned", format_minutes(m.into()))),
            ListKind::Completed => session
                .duration
                .map_or_else(String::new, |m| format!("  {}", format_minutes(m.into()))),
        };
        writeln!(writer, "{}  {}  {}{}", session.id, date, session.subject, extent)?;
    }
    Ok(())
}

pub fn delete<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    kind: ListKind,
    id: &str,
) -> Result<()> {
    let id = SessionId::new(id).context("invalid session ID")?;
    if tracker.delete(kind.into(), &id) {
        writeln!(writer, "Deleted {id}.")?;
    } else {
        writeln!(writer, "No session with ID {id}.")?;
    }
    Ok(())
}
