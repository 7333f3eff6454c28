//! Status command: the active session plus today's numbers.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ff_core::{Store, TimerStatus, Tracker, format_elapsed, records, report};
use ff_core::date::{format_minutes, last_n_days};

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    match tracker.active_session() {
        Some(session) => {
            let timer = tracker.timer_state();
            let status = timer
                .as_ref()
                .map_or(TimerStatus::Idle, |t| t.status);
            let elapsed = timer.as_ref().map_or(0.0, |t| t.elapsed_at(now));
            write!(
                writer,
                "Active: {} ({status}), {} elapsed",
                session.subject,
                format_elapsed(elapsed)
            )?;
            if let Some(target) = timer.as_ref().and_then(|t| t.target_seconds) {
                #[expect(clippy::cast_precision_loss, reason = "user-scale durations")]
                let target = target as f64;
                write!(writer, " / {}", format_elapsed(target))?;
            }
            writeln!(writer)?;
            if !session.laps.is_empty() {
                writeln!(writer, "Laps: {}", session.laps.len())?;
            }
        }
        None => writeln!(writer, "No active session.")?,
    }

    let today = now.date_naive();
    let store = tracker.store();
    let sessions = tracker.completed_sessions();
    let habits = records::habits(store);
    let logs = records::habit_logs(store);
    let tasks = records::tasks(store);
    let week = last_n_days(7, today);

    writeln!(
        writer,
        "Today: {} studied · habits {}% · streak {}d · {} tasks pending",
        format_minutes(report::minutes_on(&sessions, today)),
        report::habit_rate_on(&habits, &logs, today),
        report::best_streak(&habits, &logs, today),
        report::pending_tasks(&tasks),
    )?;
    writeln!(
        writer,
        "This week: {} across {} completed sessions",
        format_minutes(report::minutes_in_window(&sessions, &week)),
        sessions
            .iter()
            .filter(|s| s.date.is_some_and(|d| week.contains(&d)))
            .count(),
    )?;
    Ok(())
}
