//! Dependency expansion: pull a skill's child skills into the composition.
//!
//! Each child is inserted after the previously placed sibling (the row being
//! expanded for the first child) and is then expanded itself, depth first.
//! Each recursion branch carries its own copy of the visited set, which keeps
//! cycles finite without letting one sibling's subtree hide skills from
//! another.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::composition::{Composition, RowId};
use crate::error::{PlanError, Result};
use crate::skills::{CatalogIndex, SkillRecord};

/// What an expansion did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Rows inserted, in insertion order
    pub inserted: Vec<RowId>,
    /// Child ids that are not in the catalog
    pub unresolved: Vec<String>,
}

impl ExpansionReport {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.unresolved.is_empty()
    }

    fn merge(&mut self, other: ExpansionReport) {
        self.inserted.extend(other.inserted);
        self.unresolved.extend(other.unresolved);
    }
}

/// Expand `skill`'s children below `row`.
///
/// # Arguments
/// * `composition` - Composition to insert into
/// * `catalog` - Catalog used to resolve child ids
/// * `row` - The row holding `skill`; inserted rows point back at it
/// * `skill` - The skill whose children are added
/// * `visited` - Skill ids already on the current branch
///
/// # Errors
/// [`PlanError::UnknownRow`] if `row` is not in the composition. Nothing is
/// changed in that case.
pub fn expand(
    composition: &mut Composition,
    catalog: &CatalogIndex,
    row: RowId,
    skill: &SkillRecord,
    visited: &HashSet<String>,
) -> Result<ExpansionReport> {
    if composition.position(row).is_none() {
        return Err(PlanError::UnknownRow(row));
    }

    let mut report = ExpansionReport::default();
    expand_branch(composition, catalog, row, skill, visited.clone(), &mut report)?;
    Ok(report)
}

/// Expand a freshly selected skill, starting with only itself visited.
pub fn expand_selection(
    composition: &mut Composition,
    catalog: &CatalogIndex,
    row: RowId,
    skill: &SkillRecord,
) -> Result<ExpansionReport> {
    let visited = HashSet::from([skill.id.clone()]);
    expand(composition, catalog, row, skill, &visited)
}

/// Re-run expansion for every resolved row, in order.
///
/// Only children missing from the composition are inserted, so running this
/// on a fully expanded composition changes nothing.
pub fn expand_all(composition: &mut Composition, catalog: &CatalogIndex) -> Result<ExpansionReport> {
    let roots: Vec<(RowId, String)> = composition
        .rows()
        .iter()
        .filter_map(|r| r.skill_ref().map(|id| (r.row_id(), id.to_string())))
        .collect();

    let mut report = ExpansionReport::default();
    for (row, skill_id) in roots {
        if let Some(skill) = catalog.by_id(&skill_id) {
            report.merge(expand_selection(composition, catalog, row, skill)?);
        }
    }
    Ok(report)
}

fn expand_branch(
    composition: &mut Composition,
    catalog: &CatalogIndex,
    row: RowId,
    skill: &SkillRecord,
    mut visited: HashSet<String>,
    report: &mut ExpansionReport,
) -> Result<()> {
    visited.insert(skill.id.clone());
    let mut anchor = row;

    for child_id in &skill.child_ids {
        if visited.contains(child_id) {
            continue;
        }

        let Some(child) = catalog.by_id(child_id) else {
            let err = PlanError::UnresolvedReference {
                reference: child_id.clone(),
                context: format!("child of skill {}", skill.id),
            };
            warn!("{err}");
            report.unresolved.push(child_id.clone());
            continue;
        };

        if let Some(existing) = composition.row_for_skill(&child.id) {
            anchor = existing;
            continue;
        }

        let inserted = composition.insert_after(anchor)?;
        composition.resolve_row(inserted, child)?;
        composition.set_auto_added_by(inserted, Some(row))?;
        debug!(parent = %skill.id, child = %child.id, row = %inserted, "Auto-added child skill");
        report.inserted.push(inserted);
        anchor = inserted;

        expand_branch(composition, catalog, inserted, child, visited.clone(), report)?;
    }

    Ok(())
}
