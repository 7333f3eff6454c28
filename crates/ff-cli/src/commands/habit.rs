//! Habit commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use ff_core::date::calc_streak;
use ff_core::{HabitId, Store, records};

use crate::cli::HabitAction;

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    store: &S,
    action: &HabitAction,
    now: DateTime<Utc>,
) -> Result<()> {
    let today = now.date_naive();
    match action {
        HabitAction::Add { name } => {
            let habit = records::add_habit(store, name.clone(), now);
            writeln!(writer, "Added habit {}, id {}", habit.name, habit.id)?;
        }
        HabitAction::List => list(writer, store, today)?,
        HabitAction::Toggle { id, date } => {
            let id = HabitId::new(id.clone()).context("invalid habit ID")?;
            let day = date.unwrap_or(today);
            if records::toggle_habit_log(store, &id, day, now) {
                writeln!(writer, "Logged for {day}.")?;
            } else {
                writeln!(writer, "Unlogged for {day}.")?;
            }
        }
        HabitAction::Remove { id } => {
            let id = HabitId::new(id.clone()).context("invalid habit ID")?;
            if records::delete_habit(store, &id) {
                writeln!(writer, "Deleted habit {id}.")?;
            } else {
                writeln!(writer, "No habit with ID {id}.")?;
            }
        }
    }
    Ok(())
}

fn list<S: Store, W: Write>(writer: &mut W, store: &S, today: NaiveDate) -> Result<()> {
    let habits = records::habits(store);
    if habits.is_empty() {
        writeln!(writer, "No habits.")?;
        return Ok(());
    }
    let logs = records::habit_logs(store);
    for habit in habits {
        let done = logs
            .iter()
            .any(|l| l.habit_id == habit.id && l.date == today);
        let dates: Vec<NaiveDate> = logs
            .iter()
            .filter(|l| l.habit_id == habit.id)
            .map(|l| l.date)
            .collect();
        let streak = calc_streak(&dates, today);
        writeln!(
            writer,
            "{}  [{}] {}  streak {streak}d",
            habit.id,
            if done { "x" } else { " " },
            habit.name
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ff_core::MemoryStore;

    #[test]
    fn toggle_logs_and_unlogs_today() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let habit = records::add_habit(&store, "reading", now);

        let mut out = Vec::new();
        let action = HabitAction::Toggle {
            id: habit.id.to_string(),
            date: None,
        };
        run(&mut out, &store, &action, now).unwrap();
        run(&mut out, &store, &action, now).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Logged for 2025-06-02."));
        assert!(output.contains("Unlogged for 2025-06-02."));
    }

    #[test]
    fn list_marks_done_habits_and_streaks() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let habit = records::add_habit(&store, "reading", now);
        records::toggle_habit_log(&store, &habit.id, now.date_naive(), now);

        let mut out = Vec::new();
        run(&mut out, &store, &HabitAction::List, now).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("[x] reading  streak 1d"));
    }
}
