//! Task commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ff_core::date::is_overdue;
use ff_core::{Store, TaskId, records};

use crate::cli::TaskAction;

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    store: &S,
    action: &TaskAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        TaskAction::Add { title, due } => {
            let task = records::add_task(store, title.clone(), *due, now);
            writeln!(writer, "Added task {}, id {}", task.title, task.id)?;
        }
        TaskAction::List => {
            let tasks = records::tasks(store);
            if tasks.is_empty() {
                writeln!(writer, "No tasks.")?;
                return Ok(());
            }
            let today = now.date_naive();
            for task in tasks {
                let due = task.due_date.map_or_else(String::new, |d| {
                    if !task.completed && is_overdue(d, today) {
                        format!("  due {d} (overdue)")
                    } else {
                        format!("  due {d}")
                    }
                });
                writeln!(
                    writer,
                    "{}  [{}] {}{due}",
                    task.id,
                    if task.completed { "x" } else { " " },
                    task.title
                )?;
            }
        }
        TaskAction::Done { id } => {
            let id = TaskId::new(id.clone()).context("invalid task ID")?;
            if records::toggle_task(store, &id, now) {
                writeln!(writer, "Toggled task {id}.")?;
            } else {
                writeln!(writer, "No task with ID {id}.")?;
            }
        }
        TaskAction::Remove { id } => {
            let id = TaskId::new(id.clone()).context("invalid task ID")?;
            if records::delete_task(store, &id) {
                writeln!(writer, "Deleted task {id}.")?;
            } else {
                writeln!(writer, "No task with ID {id}.")?;
            }
        }
    }
    Ok(())
}
