//! `compose`: build a plan from skill names or ids.

use anyhow::{bail, Result};
use colored::Colorize;

use super::context::CommandContext;
use super::display::{print_plan, print_unresolved};
use crate::plan::{PlannerSession, RowId, MAX_HINT_LEVEL};
use crate::share::build_share_url;
use crate::skills::find_best;

/// One requested skill: an id or a name, with an optional `@hint` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillArg {
    pub query: String,
    pub hint: u8,
}

impl SkillArg {
    /// Parse `name`, `id` or `name@hint`.
    pub fn parse(raw: &str) -> Result<Self> {
        let (query, hint) = match raw.rsplit_once('@') {
            Some((query, level)) if !level.is_empty() && level.chars().all(|c| c.is_ascii_digit()) => {
                let hint: u8 = level.parse()?;
                if hint > MAX_HINT_LEVEL {
                    bail!("Hint level in '{raw}' must be between 0 and {MAX_HINT_LEVEL}");
                }
                (query, hint)
            }
            _ => (raw, 0),
        };
        let query = query.trim();
        if query.is_empty() {
            bail!("Empty skill in '{raw}'");
        }
        Ok(Self {
            query: query.to_string(),
            hint,
        })
    }
}

#[derive(Debug, Default)]
pub struct ComposeOptions {
    pub special: bool,
    pub save: Option<usize>,
    pub title: Option<String>,
    pub share: bool,
    pub shorten: bool,
}

/// Add each skill to a fresh plan and print it.
pub fn execute(ctx: &CommandContext, skills: &[String], options: &ComposeOptions) -> Result<()> {
    let args = skills
        .iter()
        .map(|s| SkillArg::parse(s))
        .collect::<Result<Vec<_>>>()?;
    if args.is_empty() {
        bail!("No skills given");
    }

    let catalog = ctx.catalog()?;
    let mut session = ctx.session(&catalog);
    let mut unresolved = Vec::new();

    for arg in &args {
        if let Some(name) = add_skill(&mut session, arg)? {
            unresolved.push(name);
        }
    }
    session.on_toggle_changed(options.special);

    print_plan(&session.view());
    print_unresolved(&unresolved);

    if let Some(index) = options.save {
        let title = options.title.as_deref().unwrap_or("");
        let snapshot = session.snapshot(None);
        let mut slots = ctx.slot_store();
        slots.save(index, &snapshot, title)?;
        println!("{} Saved to slot {}", "✓".green().bold(), index);
    }

    if options.share {
        let long_url = build_share_url(&ctx.config.share.base_url, &session.snapshot(None))?;
        println!("{}", ctx.shorten(&long_url, options.shorten));
    }
    Ok(())
}

/// Add one skill. Returns the query when it stayed unresolved.
fn add_skill(session: &mut PlannerSession<'_>, arg: &SkillArg) -> Result<Option<String>> {
    let catalog = session.catalog();
    let skill = catalog
        .by_id(&arg.query)
        .or_else(|| find_best(catalog, &arg.query, ""));

    let Some(skill) = skill else {
        let row = target_row(session);
        session.on_row_committed(row, &arg.query)?;
        session.on_hint_level_changed(row, arg.hint)?;
        return Ok(Some(arg.query.clone()));
    };

    if let Some(existing) = session.composition().row_for_skill(&skill.id) {
        println!("{} {} is already in the plan", "─".dimmed(), skill.name);
        raise_hint(session, existing, arg.hint)?;
        return Ok(None);
    }

    let row = target_row(session);
    session.select_suggestion(row, &skill.id)?;
    session.on_hint_level_changed(row, arg.hint)?;
    Ok(None)
}

/// Keep the higher of the existing and requested hint levels.
fn raise_hint(session: &mut PlannerSession<'_>, row: RowId, hint: u8) -> Result<()> {
    let current = session
        .composition()
        .row(row)
        .map(|r| r.hint_level())
        .unwrap_or(0);
    if hint > current {
        session.on_hint_level_changed(row, hint)?;
    }
    Ok(())
}

/// The first blank row, or a new one at the end.
fn target_row(session: &mut PlannerSession<'_>) -> RowId {
    let blank = session
        .composition()
        .rows()
        .iter()
        .find(|r| r.is_blank())
        .map(|r| r.row_id());
    blank.unwrap_or_else(|| session.add_row())
}
