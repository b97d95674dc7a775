//! `slots`: inspect saved plans.

use anyhow::{bail, Result};
use colored::Colorize;

use super::context::CommandContext;
use super::display::{print_plan, print_unresolved};
use crate::fs::SlotState;

pub fn list(ctx: &CommandContext) -> Result<()> {
    // A missing catalog only costs the names of rows saved by id.
    let catalog = ctx.catalog().ok();
    let slots = ctx.slot_store();

    for summary in slots.list() {
        let label = format!("Slot {:>2}", summary.index);
        match &summary.state {
            SlotState::Empty => {
                println!("{}  {}", label.dimmed(), summary.preview(catalog.as_ref()).dimmed());
            }
            SlotState::Corrupted(_) => {
                println!("{}  {}", label.yellow(), summary.preview(catalog.as_ref()).yellow());
            }
            SlotState::Filled(record) => {
                let saved_at = record.saved_at().unwrap_or_default();
                let title = if record.title().is_empty() {
                    String::new()
                } else {
                    format!(" {}", record.title().bold())
                };
                println!(
                    "{}{}  {}  {}",
                    label.green(),
                    title,
                    summary.preview(catalog.as_ref()),
                    saved_at.dimmed()
                );
            }
        }
    }
    println!(
        "{} {} slots in {}",
        "─".dimmed(),
        slots.count(),
        slots.store().dir().display()
    );
    Ok(())
}

pub fn show(ctx: &CommandContext, index: usize) -> Result<()> {
    let slots = ctx.slot_store();
    let record = match slots.load(index)? {
        SlotState::Filled(record) => record,
        SlotState::Empty => bail!("Slot {index} is empty"),
        SlotState::Corrupted(reason) => bail!("Slot {index} holds unreadable data: {reason}"),
    };

    let catalog = ctx.catalog()?;
    let mut session = ctx.session(&catalog);
    let report = session.restore(&record.snapshot, ctx.config.restore.policy)?;

    if !record.title().is_empty() {
        println!("{}", record.title().bold());
    }
    if let Some(saved_at) = record.saved_at() {
        println!("{}", saved_at.dimmed());
    }
    print_plan(&session.view());
    print_unresolved(&report.unresolved);
    Ok(())
}

pub fn clear(ctx: &CommandContext, index: usize) -> Result<()> {
    let mut slots = ctx.slot_store();
    slots.clear(index)?;
    println!("{} Cleared slot {}", "✓".green().bold(), index);
    Ok(())
}
