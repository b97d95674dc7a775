//! Derived, display-ready view of a composition.

use serde::Serialize;

use super::composition::{Composition, CompositionRow, RowId};
use super::cost::{compute_cost_with, total_cost, CostFormula};
use crate::skills::{CatalogIndex, Category, SkillRecord};

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub row_id: RowId,
    pub category: Option<Category>,
    pub skill_id: Option<String>,
    /// Skill name for resolved rows, the typed text otherwise
    pub name: String,
    pub hint_level: u8,
    pub resolved: bool,
    /// Effective cost; 0 for unresolved rows
    pub cost: u32,
    /// Tags joined for display
    pub tags: String,
    pub description: String,
    pub auto_added_by: Option<RowId>,
}

/// Full view with the running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub rows: Vec<RowView>,
    pub total_cost: u32,
    pub special_discount: bool,
}

impl PlanView {
    /// Compute the view. A row whose skill id is missing from `catalog` is
    /// shown as unresolved.
    pub fn build(composition: &Composition, catalog: &CatalogIndex, formula: CostFormula) -> Self {
        let special = composition.special_discount();
        let rows: Vec<RowView> = composition
            .rows()
            .iter()
            .map(|row| {
                let skill = row.skill_ref().and_then(|id| catalog.by_id(id));
                row_view(row, skill, formula, special)
            })
            .collect();
        let total_cost = total_cost(rows.iter().map(|r| r.cost));

        Self {
            rows,
            total_cost,
            special_discount: special,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.rows.iter().filter(|r| r.resolved).count()
    }
}

fn row_view(
    row: &CompositionRow,
    skill: Option<&SkillRecord>,
    formula: CostFormula,
    special: bool,
) -> RowView {
    match skill {
        Some(skill) => RowView {
            row_id: row.row_id(),
            category: row.category(),
            skill_id: Some(skill.id.clone()),
            name: skill.name.clone(),
            hint_level: row.hint_level(),
            resolved: true,
            cost: compute_cost_with(formula, skill.base_cost, row.hint_level(), special),
            tags: skill.tags_display(),
            description: skill.description.clone(),
            auto_added_by: row.auto_added_by(),
        },
        None => RowView {
            row_id: row.row_id(),
            category: row.category(),
            skill_id: None,
            name: row.free_text().to_string(),
            hint_level: row.hint_level(),
            resolved: false,
            cost: 0,
            tags: String::new(),
            description: String::new(),
            auto_added_by: row.auto_added_by(),
        },
    }
}
