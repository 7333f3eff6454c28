use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ff_cli::commands::{habit, list, note, report, resource, session, status, task, watch};
use ff_cli::{Cli, Commands, Config};
use ff_core::{Tick, Tracker};
use ff_store::FileStore;

/// Load config and open the store, running the legacy migration.
fn open_tracker(config_path: Option<&Path>) -> Result<Tracker<FileStore>> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let store = FileStore::open(&config.data_dir).context("failed to open data directory")?;
    let migrated = ff_store::migrate_legacy_sessions(&store);
    if migrated > 0 {
        tracing::debug!(migrated, "legacy sessions migrated");
    }
    Ok(Tracker::new(store))
}

/// Mount-time timer check: a session whose target elapsed while no command
/// was running must auto-complete before anything else happens.
fn sync_timer<W: Write>(writer: &mut W, tracker: &Tracker<FileStore>) -> Result<()> {
    if let Tick::Completed(session) = tracker.tick(Utc::now()) {
        writeln!(
            writer,
            "Target reached, completed {}: {}m recorded",
            session.subject,
            session.duration.unwrap_or(1)
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let tracker = open_tracker(cli.config.as_deref())?;
    sync_timer(&mut out, &tracker)?;
    let now = Utc::now();

    match command {
        Commands::Schedule {
            subject,
            date,
            minutes,
            notes,
            resource,
        } => session::schedule(
            &mut out,
            &tracker,
            subject,
            *date,
            *minutes,
            notes.as_deref(),
            resource.as_deref(),
            now,
        )?,
        Commands::Start {
            from,
            subject,
            resource,
            notes,
        } => session::start(
            &mut out,
            &tracker,
            from.as_deref(),
            subject.as_deref(),
            resource.as_deref(),
            notes.as_deref(),
            now,
        )?,
        Commands::Pause => session::pause(&mut out, &tracker, now)?,
        Commands::Resume => session::resume(&mut out, &tracker, now)?,
        Commands::Lap => session::lap(&mut out, &tracker, now)?,
        Commands::Stop => session::stop(&mut out, &tracker, now)?,
        Commands::Discard => session::discard(&mut out, &tracker)?,
        Commands::Status => status::run(&mut out, &tracker, now)?,
        Commands::Watch => watch::run(&tracker)?,
        Commands::List { list: kind } => list::run(&mut out, &tracker, *kind)?,
        Commands::Delete { list: kind, id } => list::delete(&mut out, &tracker, *kind, id)?,
        Commands::Report { monthly } => {
            report::run(&mut out, &tracker, *monthly, now.date_naive())?;
        }
        Commands::Habit { action } => habit::run(&mut out, tracker.store(), action, now)?,
        Commands::Task { action } => task::run(&mut out, tracker.store(), action, now)?,
        Commands::Note { action } => note::run(&mut out, tracker.store(), action, now)?,
        Commands::Resource { action } => resource::run(&mut out, tracker.store(), action, now)?,
    }

    Ok(())
}
