//! Terminal rendering of plans and skills.

use colored::Colorize;

use crate::plan::{PlanView, RowView};
use crate::skills::SkillRecord;

/// Category label or a dash.
fn category_label(row: &RowView) -> String {
    row.category
        .map(|c| c.as_str().to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_plan(view: &PlanView) {
    println!(
        "{:>3}  {:<14} {:<28} {:>4} {:>6}",
        "#".bold(),
        "Category".bold(),
        "Skill".bold(),
        "Hint".bold(),
        "SP".bold()
    );

    for (idx, row) in view.rows.iter().enumerate() {
        let name = if row.resolved {
            row.name.normal()
        } else if row.name.trim().is_empty() {
            "(empty)".dimmed()
        } else {
            format!("{} (not in catalog)", row.name).yellow()
        };
        println!(
            "{:>3}  {:<14} {:<28} {:>4} {:>6}",
            idx + 1,
            category_label(row),
            name,
            row.hint_level,
            row.cost
        );
        if let Some(origin) = row.auto_added_by {
            let position = view.rows.iter().position(|r| r.row_id == origin);
            if let Some(position) = position {
                println!("     {} added with row {}", "↳".dimmed(), position + 1);
            }
        }
    }

    let toggle = if view.special_discount {
        " (special discount on)".cyan().to_string()
    } else {
        String::new()
    };
    println!();
    println!("{} {} SP{toggle}", "Total:".bold(), view.total_cost.to_string().green().bold());
}

pub fn print_skill_line(skill: &SkillRecord) {
    let category = if skill.category.is_empty() {
        "-"
    } else {
        skill.category.as_str()
    };
    println!(
        "{:>8}  {:<28} {:<14} {:>5} SP",
        skill.id.dimmed(),
        skill.name,
        category,
        skill.base_cost
    );
}

pub fn print_unresolved(names: &[String]) {
    for name in names {
        println!("{} '{}' is not in the catalog", "!".yellow().bold(), name);
    }
}
