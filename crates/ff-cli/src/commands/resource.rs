//! Study resource commands.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ff_core::records::{self, Resource};
use ff_core::{ResourceId, Store};

use crate::cli::ResourceAction;

pub fn run<S: Store, W: Write>(
    writer: &mut W,
    store: &S,
    action: &ResourceAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        ResourceAction::Add {
            title,
            kind,
            url,
            pages,
        } => {
            let resource = records::add_resource(
                store,
                Resource {
                    id: ResourceId::generate(),
                    title: title.clone(),
                    kind: kind.clone(),
                    url: url.clone(),
                    progress: 0,
                    current_page: pages.map(|_| 0),
                    total_pages: *pages,
                    created_at: now,
                },
            );
            writeln!(writer, "Added resource {}, id {}", resource.title, resource.id)?;
        }
        ResourceAction::List => {
            let resources = records::resources(store);
            if resources.is_empty() {
                writeln!(writer, "No resources.")?;
                return Ok(());
            }
            for resource in resources {
                writeln!(
                    writer,
                    "{}  {} ({})  {}%",
                    resource.id,
                    resource.title,
                    resource.kind,
                    resource.progress_percent()
                )?;
            }
        }
        ResourceAction::Progress { id, page, percent } => {
            let id = ResourceId::new(id.clone()).context("invalid resource ID")?;
            if records::update_resource_progress(store, &id, *page, *percent) {
                writeln!(writer, "Updated {id}.")?;
            } else {
                writeln!(writer, "No resource with ID {id}.")?;
            }
        }
        ResourceAction::Remove { id } => {
            let id = ResourceId::new(id.clone()).context("invalid resource ID")?;
            if records::delete_resource(store, &id) {
                writeln!(writer, "Deleted resource {id}.")?;
            } else {
                writeln!(writer, "No resource with ID {id}.")?;
            }
        }
    }
    Ok(())
}
