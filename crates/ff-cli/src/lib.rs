//! FocusFlow CLI library.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, HabitAction, ListKind, NoteAction, ResourceAction, TaskAction};
pub use config::Config;
