use super::catalog;
use skillplan::plan::{expand_all, Composition, CostFormula, PlannerSession, RowId};

fn names(session: &PlannerSession<'_>) -> Vec<String> {
    session.view().rows.into_iter().map(|r| r.name).collect()
}

fn first_row(session: &PlannerSession<'_>) -> RowId {
    session.composition().rows()[0].row_id()
}

#[test]
fn test_selection_pulls_in_dependencies_once() {
    let catalog = catalog();
    let mut session = PlannerSession::new(&catalog);
    let row = first_row(&session);

    // 200 -> [201, 202] and 201 -> [202]; 202 must appear only once.
    let view = session.select_suggestion(row, "200").unwrap();
    assert_eq!(
        names(&session),
        vec!["Corner Recovery", "Corner Recovery Lite", "Breath of Fresh Air"]
    );
    assert_eq!(view.rows[1].auto_added_by, Some(row));
    assert_eq!(view.rows[2].auto_added_by, Some(view.rows[1].row_id));
    assert_eq!(view.total_cost, 180 + 100 + 80);
}

#[test]
fn test_costs_follow_hints_and_toggle() {
    let catalog = catalog();
    let mut session = PlannerSession::new(&catalog);
    let row = first_row(&session);
    session.select_suggestion(row, "101").unwrap();

    assert_eq!(session.view().total_cost, 90);
    assert_eq!(session.on_hint_level_changed(row, 2).unwrap().total_cost, 72);
    // 90 * 0.7 evaluates just below 63 in double precision.
    assert_eq!(session.on_toggle_changed(true).total_cost, 62);

    let mut sequential = PlannerSession::new(&catalog).with_formula(CostFormula::Sequential);
    let row = first_row(&sequential);
    sequential.select_suggestion(row, "101").unwrap();
    sequential.on_hint_level_changed(row, 2).unwrap();
    // floor(floor(90 * 0.8) * 0.9) = floor(72 * 0.9) = 64
    assert_eq!(sequential.on_toggle_changed(true).total_cost, 64);
}

#[test]
fn test_typed_rows_resolve_or_stay_free_text() {
    let catalog = catalog();
    let mut session = PlannerSession::new(&catalog);
    let row = first_row(&session);

    session.on_row_committed(row, "みぎまわりにじゅうまる").unwrap();
    assert_eq!(names(&session), vec!["右回り◎", "右回り○"]);

    let extra = session.add_row();
    let view = session.on_row_committed(extra, "Mystery Skill").unwrap();
    let last = view.rows.last().unwrap();
    assert!(!last.resolved);
    assert_eq!(last.cost, 0);
    assert_eq!(view.resolved_count(), 2);
}

#[test]
fn test_expand_all_fills_missing_children() {
    let catalog = catalog();
    let mut composition = Composition::new();
    let row = composition.rows()[0].row_id();
    composition
        .resolve_row(row, catalog.by_id("201").unwrap())
        .unwrap();

    let report = expand_all(&mut composition, &catalog).unwrap();
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(composition.skill_ids(), vec!["201", "202"]);

    let again = expand_all(&mut composition, &catalog).unwrap();
    assert!(again.is_empty());
}
