use super::catalog;
use skillplan::fs::{FileStore, SlotState, SlotStore};
use skillplan::plan::PlannerSession;
use skillplan::share::RestorePolicy;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_and_reload_plan_from_disk() {
    let temp = TempDir::new().unwrap();
    let catalog = catalog();

    let mut session = PlannerSession::new(&catalog);
    let row = session.composition().rows()[0].row_id();
    session.select_suggestion(row, "100").unwrap();
    session.on_hint_level_changed(row, 3).unwrap();
    let before = session.view();

    let mut slots = SlotStore::new(FileStore::new(temp.path()));
    slots.save(2, &session.snapshot(None), "right-handed").unwrap();
    assert!(temp.path().join("umamusume_slot_2.json").exists());

    // A fresh store over the same directory sees the saved plan.
    let slots = SlotStore::new(FileStore::new(temp.path()));
    let record = match slots.load(2).unwrap() {
        SlotState::Filled(record) => record,
        other => panic!("expected filled slot, got {other:?}"),
    };
    assert_eq!(record.title(), "right-handed");
    assert!(record.saved_at().is_some());

    let mut restored = PlannerSession::new(&catalog);
    restored
        .restore(&record.snapshot, RestorePolicy::Verbatim)
        .unwrap();
    let after = restored.view();
    assert_eq!(after.total_cost, before.total_cost);
    assert_eq!(after.rows.len(), before.rows.len());
    assert_eq!(after.rows[0].hint_level, 3);
}

#[test]
fn test_listing_reports_every_slot() {
    let temp = TempDir::new().unwrap();
    let catalog = catalog();

    let mut session = PlannerSession::new(&catalog);
    let row = session.composition().rows()[0].row_id();
    session.select_suggestion(row, "200").unwrap();

    let mut slots = SlotStore::with_layout(FileStore::new(temp.path()), "plan_", 3);
    slots.save(0, &session.snapshot(None), "green").unwrap();
    fs::write(temp.path().join("plan_1.json"), "not json").unwrap();

    let listing = slots.list();
    assert_eq!(listing.len(), 3);
    assert_eq!(
        listing[0].preview(Some(&catalog)),
        "3 rows: Corner Recovery / Corner Recovery Lite / Breath of Fresh Air"
    );
    assert_eq!(listing[1].preview(Some(&catalog)), "corrupted data");
    assert_eq!(listing[2].preview(Some(&catalog)), "not saved");

    slots.clear(0).unwrap();
    assert_eq!(slots.load(0).unwrap(), SlotState::Empty);
}
