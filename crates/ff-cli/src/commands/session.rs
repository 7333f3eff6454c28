//! Session lifecycle commands: schedule, start, pause, resume, lap, stop,
//! discard.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};

use ff_core::{ResourceId, SessionId, Store, Tracker, format_elapsed};

/// Plans a session for a future day.
pub fn schedule<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    subject: &str,
    date: Option<NaiveDate>,
    minutes: Option<u32>,
    notes: Option<&str>,
    resource: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let resource_id = parse_resource(resource)?;
    let date = date.unwrap_or_else(|| now.date_naive());
    let session = tracker.schedule(subject, date, minutes, notes, resource_id, now);
    let hint = minutes.map_or_else(String::new, |m| format!(" ({m}m planned)"));
    writeln!(
        writer,
        "Scheduled {} for {}{}, id {}",
        session.subject, date, hint, session.id
    )?;
    Ok(())
}

/// Starts a scheduled session by ID, or an ad-hoc one by subject.
pub fn start<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    from: Option<&str>,
    subject: Option<&str>,
    resource: Option<&str>,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let session = match (from, subject) {
        (Some(id), _) => {
            let id = SessionId::new(id).context("invalid session ID")?;
            match tracker.start_from_scheduled(&id, now)? {
                Some(session) => session,
                None => {
                    writeln!(writer, "No scheduled session with ID {id}.")?;
                    return Ok(());
                }
            }
        }
        (None, Some(subject)) => {
            let resource_id = parse_resource(resource)?;
            tracker.start_ad_hoc(subject, resource_id, notes, now)?
        }
        (None, None) => bail!("provide a subject, or --from <id> to start a scheduled session"),
    };

    match session.planned_target_seconds() {
        Some(target) => writeln!(
            writer,
            "Started {}, auto-completes at {}",
            session.subject,
            format_elapsed(to_secs_f64(target)),
        )?,
        None => writeln!(writer, "Started {}", session.subject)?,
    }
    Ok(())
}

/// Pauses the running timer.
pub fn pause<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    if tracker.pause(now) {
        let elapsed = tracker.timer_state().map_or(0.0, |t| t.elapsed_at(now));
        writeln!(writer, "Paused at {}", format_elapsed(elapsed))?;
    } else {
        writeln!(writer, "Nothing to pause.")?;
    }
    Ok(())
}

/// Resumes the paused timer.
pub fn resume<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    if tracker.resume(now) {
        writeln!(writer, "Resumed.")?;
    } else {
        writeln!(writer, "Nothing to resume.")?;
    }
    Ok(())
}

/// Records a lap on the running session.
pub fn lap<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    match tracker.add_lap(now) {
        Some(lap) => writeln!(
            writer,
            "Lap {} at {}",
            lap.lap_number,
            format_elapsed(lap.elapsed_seconds)
        )?,
        None => writeln!(writer, "No running session to lap.")?,
    }
    Ok(())
}

/// Completes the active session.
pub fn stop<S: Store, W: Write>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    match tracker.complete(now) {
        Some(session) => {
            let minutes = session.duration.unwrap_or(1);
            writeln!(
                writer,
                "Completed {}: {}m recorded",
                session.subject, minutes
            )?;
        }
        None => writeln!(writer, "No active session.")?,
    }
    Ok(())
}

/// Abandons the active session without keeping a record.
pub fn discard<S: Store, W: Write>(writer: &mut W, tracker: &Tracker<S>) -> Result<()> {
    if tracker.discard() {
        writeln!(writer, "Session discarded.")?;
    } else {
        writeln!(writer, "No active session.")?;
    }
    Ok(())
}

fn parse_resource(resource: Option<&str>) -> Result<Option<ResourceId>> {
    resource
        .map(|r| ResourceId::new(r).context("invalid resource ID"))
        .transpose()
}

#[expect(clippy::cast_precision_loss, reason = "targets are user-scale durations")]
const fn to_secs_f64(target: u64) -> f64 {
    target as f64
}
