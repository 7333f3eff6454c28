//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Personal study tracker.
///
/// Tracks habits, tasks, notes, study resources, and timed study sessions,
/// persisted as plain JSON in a local data directory.
#[derive(Debug, Parser)]
#[command(name = "ff", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a study session for a future day.
    Schedule {
        /// Subject to study.
        subject: String,

        /// Planned day (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Planned duration in minutes. Seeds the auto-complete target
        /// when the session is started.
        #[arg(long)]
        minutes: Option<u32>,

        /// Free-form notes.
        #[arg(long)]
        notes: Option<String>,

        /// ID of a linked study resource.
        #[arg(long)]
        resource: Option<String>,
    },

    /// Start a session: either a scheduled one by ID, or ad hoc by subject.
    Start {
        /// ID of a scheduled session to start.
        #[arg(long, conflicts_with = "subject")]
        from: Option<String>,

        /// Subject for an ad-hoc session.
        subject: Option<String>,

        /// ID of a linked study resource (ad hoc only).
        #[arg(long)]
        resource: Option<String>,

        /// Free-form notes (ad hoc only).
        #[arg(long)]
        notes: Option<String>,
    },

    /// Pause the running session timer.
    Pause,

    /// Resume the paused session timer.
    Resume,

    /// Record a lap on the running session.
    Lap,

    /// Stop the active session and record its final duration.
    Stop,

    /// Abandon the active session without keeping a record.
    Discard,

    /// Show the active session and today's numbers.
    Status,

    /// Follow the running timer, ticking once per second.
    Watch,

    /// List scheduled or completed sessions.
    List {
        #[arg(value_enum)]
        list: ListKind,
    },

    /// Delete a scheduled or completed session by ID.
    Delete {
        #[arg(value_enum)]
        list: ListKind,
        id: String,
    },

    /// Study-time and habit reports.
    Report {
        /// Aggregate by month (last six) instead of by day (last seven).
        #[arg(long)]
        monthly: bool,
    },

    /// Manage habits.
    Habit {
        #[command(subcommand)]
        action: HabitAction,
    },

    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage notes.
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Manage study resources.
    Resource {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

/// Which session list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Scheduled,
    Completed,
}

/// Habit subcommands.
#[derive(Debug, Subcommand)]
pub enum HabitAction {
    /// Add a habit.
    Add { name: String },
    /// List habits with today's state and streaks.
    List,
    /// Toggle a habit's log for a day (defaults to today).
    Toggle {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a habit and its logs.
    Remove { id: String },
}

/// Task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a task.
    Add {
        title: String,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks.
    List,
    /// Toggle a task's completion.
    Done { id: String },
    /// Delete a task.
    Remove { id: String },
}

/// Note subcommands.
#[derive(Debug, Subcommand)]
pub enum NoteAction {
    /// Add a note.
    Add {
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// List notes, newest first.
    List,
    /// Delete a note.
    Remove { id: String },
}

/// Resource subcommands.
#[derive(Debug, Subcommand)]
pub enum ResourceAction {
    /// Add a study resource.
    Add {
        title: String,
        /// Resource kind (book, PDF, course, link, ...).
        #[arg(long, default_value = "book")]
        kind: String,
        #[arg(long)]
        url: Option<String>,
        /// Total pages, for paged resources.
        #[arg(long)]
        pages: Option<u32>,
    },
    /// List resources with progress.
    List,
    /// Update reading position or completion percent.
    Progress {
        id: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        percent: Option<u32>,
    },
    /// Delete a resource.
    Remove { id: String },
}
