//! Watch command: follow the running timer with a once-per-second tick.
//!
//! Each iteration recomputes elapsed time from the stored timestamps, so
//! the display self-corrects no matter how long the process was suspended.
//! The loop ends as soon as the timer leaves the running state.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use ff_core::{Store, Tick, Tracker, format_elapsed};

const TICK: Duration = Duration::from_secs(1);

pub fn run<S: Store>(tracker: &Tracker<S>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    loop {
        match tracker.tick(Utc::now()) {
            Tick::Idle => {
                writeln!(out, "No running session.")?;
                return Ok(());
            }
            Tick::Paused { elapsed } => {
                writeln!(out, "Paused at {}.", format_elapsed(elapsed))?;
                return Ok(());
            }
            Tick::Completed(session) => {
                writeln!(
                    out,
                    "\nTarget reached, completed {}: {}m recorded",
                    session.subject,
                    session.duration.unwrap_or(1)
                )?;
                return Ok(());
            }
            Tick::Running { elapsed } => {
                write!(out, "\r{}", format_elapsed(elapsed))?;
                out.flush()?;
            }
        }
        std::thread::sleep(TICK);
    }
}
