use super::catalog;
use skillplan::error::PlanError;
use skillplan::plan::PlannerSession;
use skillplan::share::{
    build_share_url, compress, decompress, parse_share_url, RestorePolicy, Snapshot, SnapshotRow,
};

#[test]
fn test_share_link_round_trip_through_session() {
    let catalog = catalog();
    let mut session = PlannerSession::new(&catalog);
    let row = session.composition().rows()[0].row_id();
    session.select_suggestion(row, "200").unwrap();
    session.on_hint_level_changed(row, 1).unwrap();
    session.on_toggle_changed(true);

    let url = build_share_url("https://plans.example.com/skills/", &session.snapshot(None)).unwrap();
    assert!(url.starts_with("https://plans.example.com/skills/?data="));

    let shared = parse_share_url(&url).unwrap().unwrap();
    assert_eq!(shared.clean_url, "https://plans.example.com/skills/");

    let mut other = PlannerSession::new(&catalog);
    let report = other.restore(&shared.snapshot, RestorePolicy::Verbatim).unwrap();
    assert_eq!(report.rows, 3);
    assert!(report.unresolved.is_empty());
    assert_eq!(other.view().total_cost, session.view().total_cost);
    assert!(other.view().special_discount);
}

#[test]
fn test_shared_rows_missing_from_catalog_survive() {
    let catalog = catalog();
    let snapshot = Snapshot {
        rows: vec![
            SnapshotRow {
                skill_id: "999".to_string(),
                skill_name: "Retired Skill".to_string(),
                hint_lv: 4,
                ..Default::default()
            },
            SnapshotRow {
                skill_name: "Straightaway Adept".to_string(),
                ..Default::default()
            },
        ],
        ..Default::default()
    };

    let mut session = PlannerSession::new(&catalog);
    let report = session.restore(&snapshot, RestorePolicy::Verbatim).unwrap();
    assert_eq!(report.unresolved, vec!["Retired Skill".to_string()]);

    let view = session.view();
    assert_eq!(view.rows[0].name, "Retired Skill");
    assert_eq!(view.rows[0].hint_level, 4);
    assert!(!view.rows[0].resolved);
    assert_eq!(view.rows[1].skill_id.as_deref(), Some("300"));
    assert_eq!(view.total_cost, 120);
}

#[test]
fn test_reexpand_policy_adds_new_children() {
    let catalog = catalog();
    let snapshot = Snapshot {
        rows: vec![SnapshotRow {
            skill_id: "100".to_string(),
            skill_name: "右回り◎".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let mut verbatim = PlannerSession::new(&catalog);
    verbatim.restore(&snapshot, RestorePolicy::Verbatim).unwrap();
    assert_eq!(verbatim.view().rows.len(), 1);

    let mut reexpanded = PlannerSession::new(&catalog);
    let report = reexpanded.restore(&snapshot, RestorePolicy::Reexpand).unwrap();
    assert_eq!(report.expansion.inserted.len(), 1);
    assert_eq!(reexpanded.composition().skill_ids(), vec!["100", "101"]);
}

#[test]
fn test_codec_handles_non_ascii_text() {
    let text = r#"{"rows":[{"skillName":"右回り◎ 🏇"}]}"#;
    let encoded = compress(text);
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '$')));
    assert_eq!(decompress(&encoded).unwrap().as_deref(), Some(text));
}

#[test]
fn test_tampered_link_is_rejected() {
    let err = parse_share_url("https://plans.example.com/?data=!!!").unwrap_err();
    assert!(matches!(err, PlanError::CorruptPersistedState(_)));
}
