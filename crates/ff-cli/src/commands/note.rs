//! Note commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ff_core::{NoteId, Store, records};

use crate::cli::NoteAction;

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    store: &S,
    action: &NoteAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        NoteAction::Add { title, body } => {
            let note = records::add_note(store, title.clone(), body.clone(), now);
            writeln!(writer, "Added note {}, id {}", note.title, note.id)?;
        }
        NoteAction::List => {
            let notes = records::notes(store);
            if notes.is_empty() {
                writeln!(writer, "No notes.")?;
                return Ok(());
            }
            for note in notes {
                writeln!(
                    writer,
                    "{}  {}  ({})",
                    note.id,
                    note.title,
                    note.updated_at.format("%Y-%m-%d %H:%M")
                )?;
            }
        }
        NoteAction::Remove { id } => {
            let id = NoteId::new(id.clone()).context("invalid note ID")?;
            if records::delete_note(store, &id) {
                writeln!(writer, "Deleted note {id}.")?;
            } else {
                writeln!(writer, "No note with ID {id}.")?;
            }
        }
    }
    Ok(())
}
