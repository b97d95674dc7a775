//! Planner session: the command interface over one composition.

use serde::Serialize;
use tracing::debug;

use super::composition::{Composition, RowId};
use super::cost::CostFormula;
use super::expand::{expand_selection, ExpansionReport};
use super::view::PlanView;
use crate::error::{PlanError, Result};
use crate::share::{restore, RestorePolicy, RestoreReport, Snapshot};
use crate::skills::{find, find_best, CatalogIndex, Category, SkillRecord, DEFAULT_MATCH_LIMIT};

/// One entry of the suggestion list shown while typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub skill_id: String,
    pub name: String,
    pub category: String,
    pub base_cost: u32,
}

impl From<&SkillRecord> for Suggestion {
    fn from(skill: &SkillRecord) -> Self {
        Self {
            skill_id: skill.id.clone(),
            name: skill.name.clone(),
            category: skill.category.clone(),
            base_cost: skill.base_cost,
        }
    }
}

/// A composition being edited against a catalog.
///
/// Every mutating command checks its arguments first, so a command that
/// returns an error has not changed anything.
pub struct PlannerSession<'c> {
    catalog: &'c CatalogIndex,
    composition: Composition,
    formula: CostFormula,
    match_limit: usize,
}

impl<'c> PlannerSession<'c> {
    pub fn new(catalog: &'c CatalogIndex) -> Self {
        Self {
            catalog,
            composition: Composition::new(),
            formula: CostFormula::default(),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }

    pub fn with_formula(mut self, formula: CostFormula) -> Self {
        self.formula = formula;
        self
    }

    pub fn with_match_limit(mut self, limit: usize) -> Self {
        self.match_limit = limit;
        self
    }

    pub fn catalog(&self) -> &'c CatalogIndex {
        self.catalog
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Rows with derived cost and details, plus the total.
    pub fn view(&self) -> PlanView {
        PlanView::build(&self.composition, self.catalog, self.formula)
    }

    fn require_row(&self, row: RowId) -> Result<()> {
        match self.composition.position(row) {
            Some(_) => Ok(()),
            None => Err(PlanError::UnknownRow(row)),
        }
    }

    fn row_category_filter(&self, row: RowId) -> Result<&'static str> {
        let row = self.composition.row(row).ok_or(PlanError::UnknownRow(row))?;
        Ok(row.category().map(|c| c.as_str()).unwrap_or(""))
    }

    /// Suggestions for the text typed into `row`, filtered by the row's
    /// category.
    pub fn on_query_changed(&self, row: RowId, text: &str) -> Result<Vec<Suggestion>> {
        let category = self.row_category_filter(row)?;
        Ok(find(self.catalog, text, category, self.match_limit)
            .into_iter()
            .map(Suggestion::from)
            .collect())
    }

    /// Put the chosen skill into `row` and pull in its children.
    pub fn select_suggestion(&mut self, row: RowId, skill_id: &str) -> Result<PlanView> {
        self.require_row(row)?;
        let catalog = self.catalog;
        let skill = catalog
            .by_id(skill_id)
            .ok_or_else(|| PlanError::UnresolvedReference {
                reference: skill_id.to_string(),
                context: "selected suggestion".to_string(),
            })?;
        self.apply_skill(row, skill)?;
        Ok(self.view())
    }

    /// The user finished typing without picking a suggestion: take the best
    /// match, or keep the text as an unresolved row.
    pub fn on_row_committed(&mut self, row: RowId, text: &str) -> Result<PlanView> {
        let category = self.row_category_filter(row)?;
        let best = if text.trim().is_empty() {
            None
        } else {
            find_best(self.catalog, text, category)
        };

        match best {
            Some(skill) => {
                self.apply_skill(row, skill)?;
            }
            None => {
                debug!(row = %row, text, "No skill matches committed text");
                self.composition.unresolve_row(row, text)?;
            }
        }
        Ok(self.view())
    }

    fn apply_skill(&mut self, row: RowId, skill: &SkillRecord) -> Result<ExpansionReport> {
        self.composition.resolve_row(row, skill)?;
        expand_selection(&mut self.composition, self.catalog, row, skill)
    }

    pub fn on_category_changed(&mut self, row: RowId, category: Option<Category>) -> Result<PlanView> {
        self.composition.set_category(row, category)?;
        Ok(self.view())
    }

    pub fn on_hint_level_changed(&mut self, row: RowId, level: u8) -> Result<PlanView> {
        self.composition.set_hint_level(row, level)?;
        Ok(self.view())
    }

    pub fn on_toggle_changed(&mut self, special: bool) -> PlanView {
        self.composition.set_special_discount(special);
        self.view()
    }

    pub fn add_row(&mut self) -> RowId {
        self.composition.push_row()
    }

    pub fn insert_row_after(&mut self, anchor: RowId) -> Result<RowId> {
        self.composition.insert_after(anchor)
    }

    pub fn remove_row(&mut self, row: RowId) -> Result<PlanView> {
        self.composition.remove_row(row)?;
        Ok(self.view())
    }

    pub fn clear_row(&mut self, row: RowId) -> Result<PlanView> {
        self.composition.clear_row(row)?;
        Ok(self.view())
    }

    pub fn move_row_before(&mut self, dragged: RowId, target: RowId) -> Result<PlanView> {
        self.composition.move_before(dragged, target)?;
        Ok(self.view())
    }

    pub fn move_row_to_end(&mut self, dragged: RowId) -> Result<PlanView> {
        self.composition.move_to_end(dragged)?;
        Ok(self.view())
    }

    /// Capture the current composition.
    pub fn snapshot(&self, title: Option<&str>) -> Snapshot {
        let snapshot = Snapshot::capture(&self.composition);
        match title {
            Some(title) => snapshot.with_title(title),
            None => snapshot,
        }
    }

    /// Replace the composition with a saved one.
    pub fn restore(&mut self, snapshot: &Snapshot, policy: RestorePolicy) -> Result<RestoreReport> {
        restore(&mut self.composition, self.catalog, snapshot, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
id,skill,sp,category,reading,child_id
1,Corner Recovery,180,緑スキル,こーなーかいふく,2
2,Corner Recovery Lite,100,緑スキル,,
3,Straightaway,120,通常スキル,,
";

    fn catalog() -> CatalogIndex {
        CatalogIndex::from_csv(CATALOG).unwrap()
    }

    fn first_row(session: &PlannerSession<'_>) -> RowId {
        session.composition().rows()[0].row_id()
    }

    #[test]
    fn test_suggestions_follow_row_category() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);

        let all = session.on_query_changed(row, "").unwrap();
        assert_eq!(all.len(), 3);

        session.on_category_changed(row, Some(Category::Normal)).unwrap();
        let filtered = session.on_query_changed(row, "").unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].skill_id, "3");

        let limited = PlannerSession::new(&catalog).with_match_limit(1);
        let row = first_row(&limited);
        assert_eq!(limited.on_query_changed(row, "corner").unwrap().len(), 1);
    }

    #[test]
    fn test_select_suggestion_expands_children() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);

        let view = session.select_suggestion(row, "1").unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].name, "Corner Recovery");
        assert_eq!(view.rows[0].category, Some(Category::Green));
        assert_eq!(view.rows[1].auto_added_by, Some(row));
        assert_eq!(view.total_cost, 280);
    }

    #[test]
    fn test_select_unknown_skill_changes_nothing() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);
        assert!(matches!(
            session.select_suggestion(row, "404"),
            Err(PlanError::UnresolvedReference { .. })
        ));
        assert!(session.composition().rows()[0].is_blank());
    }

    #[test]
    fn test_commit_uses_best_match_or_keeps_text() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);

        let view = session.on_row_committed(row, "コーナーカイフク").unwrap();
        assert_eq!(view.rows[0].skill_id.as_deref(), Some("1"));
        assert_eq!(view.rows.len(), 2);

        let other = session.add_row();
        let view = session.on_row_committed(other, "unknown thing").unwrap();
        let last = view.rows.last().unwrap();
        assert!(!last.resolved);
        assert_eq!(last.name, "unknown thing");
        assert_eq!(last.cost, 0);

        let view = session.on_row_committed(other, "   ").unwrap();
        assert!(!view.rows.last().unwrap().resolved);
    }

    #[test]
    fn test_hint_and_toggle_update_total() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);
        session.select_suggestion(row, "3").unwrap();

        let view = session.on_hint_level_changed(row, 5).unwrap();
        assert_eq!(view.total_cost, 72);
        let view = session.on_toggle_changed(true);
        assert_eq!(view.total_cost, 60);

        assert!(session.on_hint_level_changed(row, 6).is_err());
        assert_eq!(session.view().total_cost, 60);
    }

    #[test]
    fn test_sequential_formula() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog).with_formula(CostFormula::Sequential);
        let row = first_row(&session);
        session.select_suggestion(row, "3").unwrap();
        session.on_hint_level_changed(row, 5).unwrap();
        // floor(floor(120 * 0.6) * 0.9) = floor(72 * 0.9) = 64
        assert_eq!(session.on_toggle_changed(true).total_cost, 64);
    }

    #[test]
    fn test_row_commands() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let a = first_row(&session);
        let b = session.add_row();
        let c = session.insert_row_after(a).unwrap();

        let order = |s: &PlannerSession<'_>| -> Vec<RowId> {
            s.view().rows.iter().map(|r| r.row_id).collect()
        };
        assert_eq!(order(&session), vec![a, c, b]);

        session.move_row_to_end(a).unwrap();
        assert_eq!(order(&session), vec![c, b, a]);
        session.move_row_before(a, c).unwrap();
        assert_eq!(order(&session), vec![a, c, b]);

        session.remove_row(c).unwrap();
        session.remove_row(b).unwrap();
        session.select_suggestion(a, "3").unwrap();
        let view = session.remove_row(a).unwrap();
        assert_eq!(view.rows.len(), 1);
        assert!(!view.rows[0].resolved);

        assert!(session.clear_row(b).is_err());
    }

    #[test]
    fn test_snapshot_and_restore() {
        let catalog = catalog();
        let mut session = PlannerSession::new(&catalog);
        let row = first_row(&session);
        session.select_suggestion(row, "1").unwrap();
        session.on_hint_level_changed(row, 2).unwrap();
        session.on_toggle_changed(true);
        let snapshot = session.snapshot(Some("mile build"));
        assert_eq!(snapshot.title.as_deref(), Some("mile build"));

        let mut other = PlannerSession::new(&catalog);
        let report = other.restore(&snapshot, RestorePolicy::Verbatim).unwrap();
        assert!(report.unresolved.is_empty());

        let summary = |view: PlanView| -> Vec<(String, u8, u32)> {
            view.rows
                .into_iter()
                .map(|r| (r.name, r.hint_level, r.cost))
                .collect()
        };
        assert_eq!(summary(other.view()), summary(session.view()));
        assert_eq!(other.view().total_cost, session.view().total_cost);
        assert!(other.composition().special_discount());
    }
}
