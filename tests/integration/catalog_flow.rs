use super::{catalog, write_catalog};
use skillplan::error::PlanError;
use skillplan::skills::{find, find_best, CatalogIndex, Category};
use tempfile::TempDir;

#[test]
fn test_catalog_loads_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = write_catalog(temp.path());

    let catalog = CatalogIndex::load_from_path(&path).unwrap();
    assert_eq!(catalog.len(), 6);
    assert!(catalog.warnings().is_empty());

    let skill = catalog.by_id("200").unwrap();
    assert_eq!(skill.name, "Corner Recovery");
    assert_eq!(skill.base_cost, 180);
    assert_eq!(skill.category_kind(), Some(Category::Green));
    assert_eq!(skill.child_ids, vec!["201".to_string(), "202".to_string()]);
}

#[test]
fn test_missing_catalog_is_load_failure() {
    let temp = TempDir::new().unwrap();
    let err = CatalogIndex::load_from_path(&temp.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, PlanError::CatalogLoadFailure(_)));
}

#[test]
fn test_search_by_reading_and_width() {
    let catalog = catalog();

    let best = find_best(&catalog, "ミギマワリ", "").unwrap();
    assert!(best.name.starts_with("右回り"));

    let best = find_best(&catalog, "ｃｏｒｎｅｒ ｒｅｃｏｖｅｒｙ", "").unwrap();
    assert_eq!(best.id, "200");
}

#[test]
fn test_search_with_category_filter() {
    let catalog = catalog();
    let green = find(&catalog, "", Category::Green.as_str(), 10);
    assert_eq!(green.len(), 3);
    assert!(green.iter().all(|s| s.category == "緑スキル"));

    assert!(find(&catalog, "Straightaway", Category::Green.as_str(), 10).is_empty());
    assert_eq!(find(&catalog, "", "", 2).len(), 2);
}
