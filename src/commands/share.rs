//! `share`: turn saved plans into links and back.

use anyhow::{bail, Context, Result};
use colored::Colorize;

use super::context::CommandContext;
use super::display::{print_plan, print_unresolved};
use crate::error::PlanError;
use crate::fs::SlotState;
use crate::share::{build_share_url, decode_payload, parse_share_url, Snapshot};

/// Print a share link for the plan in slot `index`.
pub fn encode(ctx: &CommandContext, index: usize, shorten: bool) -> Result<()> {
    let slots = ctx.slot_store();
    let snapshot = match slots.load(index)? {
        SlotState::Filled(record) => record.snapshot,
        SlotState::Empty => bail!("Slot {index} is empty"),
        SlotState::Corrupted(reason) => bail!("Slot {index} holds unreadable data: {reason}"),
    };

    let long_url = build_share_url(&ctx.config.share.base_url, &snapshot)?;
    println!("{}", ctx.shorten(&long_url, shorten));
    Ok(())
}

/// Read a share link (or a bare payload), print the plan and optionally
/// save it.
pub fn decode(
    ctx: &CommandContext,
    input: &str,
    save: Option<usize>,
    title: Option<&str>,
) -> Result<()> {
    let snapshot = match read_shared(input) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            println!("{} No shared data in input", "─".dimmed());
            return Ok(());
        }
        Err(e) if e.is_recoverable() => {
            println!("{} Shared data could not be read: {}", "!".yellow().bold(), e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read shared plan"),
    };

    let catalog = ctx.catalog()?;
    let mut session = ctx.session(&catalog);
    let report = session.restore(&snapshot, ctx.config.restore.policy)?;

    print_plan(&session.view());
    print_unresolved(&report.unresolved);

    if let Some(index) = save {
        let title = title.or(snapshot.title.as_deref()).unwrap_or("");
        let mut slots = ctx.slot_store();
        slots.save(index, &session.snapshot(None), title)?;
        println!("{} Saved to slot {}", "✓".green().bold(), index);
    }
    Ok(())
}

/// Snapshot from a URL, or from a payload when the input is not a URL.
pub fn read_shared(input: &str) -> crate::error::Result<Option<Snapshot>> {
    match parse_share_url(input) {
        Err(PlanError::InvalidUrl(_)) => decode_payload(input),
        other => other.map(|shared| shared.map(|s| s.snapshot)),
    }
}
