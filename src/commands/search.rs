//! `search` and `show`: look skills up in the catalog.

use anyhow::{bail, Result};
use colored::Colorize;

use super::context::CommandContext;
use super::display::print_skill_line;
use crate::plan::{compute_cost_with, MAX_HINT_LEVEL};
use crate::skills::{find, Category};

/// Parse a category label from the command line.
pub fn parse_category(label: &str) -> Result<Category> {
    match Category::parse(label) {
        Some(category) => Ok(category),
        None => {
            let options: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            bail!("Unknown category '{label}'. Expected one of: {}", options.join(", "))
        }
    }
}

pub fn execute(
    ctx: &CommandContext,
    query: &str,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let catalog = ctx.catalog()?;
    let category = category.map(parse_category).transpose()?;
    let filter = category.map(|c| c.as_str()).unwrap_or("");
    let limit = limit.unwrap_or(ctx.config.search.limit);

    let results = find(&catalog, query, filter, limit);
    if results.is_empty() {
        println!("{} No skills match '{}'", "─".dimmed(), query);
        return Ok(());
    }

    for skill in &results {
        print_skill_line(skill);
    }
    println!("{} {} result(s)", "─".dimmed(), results.len());
    Ok(())
}

pub fn show(ctx: &CommandContext, id: &str) -> Result<()> {
    let catalog = ctx.catalog()?;
    let Some(skill) = catalog.by_id(id) else {
        bail!("No skill with id '{id}'");
    };

    println!("{} {}", skill.name.bold(), format!("[{}]", skill.id).dimmed());
    if !skill.category.is_empty() {
        println!("  Category: {}", skill.category);
    }
    println!("  Base SP:  {}", skill.base_cost);
    if !skill.tags.is_empty() {
        println!("  Tags:     {}", skill.tags_display());
    }
    if !skill.description.is_empty() {
        println!("  {}", skill.description);
    }

    let costs: Vec<String> = (0..=MAX_HINT_LEVEL)
        .map(|lv| {
            let cost = compute_cost_with(ctx.config.cost.formula, skill.base_cost, lv, false);
            format!("Lv{lv}: {cost}")
        })
        .collect();
    println!("  Cost:     {}", costs.join("  "));

    if !skill.child_ids.is_empty() {
        println!("  Adds:");
        for child_id in &skill.child_ids {
            match catalog.by_id(child_id) {
                Some(child) => println!("    {} {}", "+".green(), child.name),
                None => println!("    {} {} (not in catalog)", "?".yellow(), child_id),
            }
        }
    }
    Ok(())
}
