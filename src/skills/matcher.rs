//! Query matching against the catalog.
//!
//! Every candidate that passes the category filter gets the first tier it
//! qualifies for (see [`MatchTier`]); results are ordered by tier and then by
//! display name.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

use super::index::CatalogIndex;
use super::normalize::{has_phonetic, normalize};
use super::types::{MatchTier, SkillMatch, SkillRecord};

/// Default number of suggestions returned for a query.
pub const DEFAULT_MATCH_LIMIT: usize = 200;

/// Find catalog entries matching `query`.
///
/// # Arguments
/// * `catalog` - The catalog to search
/// * `query` - Raw user input
/// * `category` - Exact category to restrict to; empty means any
/// * `limit` - Maximum number of results
///
/// # Returns
/// Matching records, best first. A blank query returns the filtered catalog
/// in load order.
pub fn find<'a>(
    catalog: &'a CatalogIndex,
    query: &str,
    category: &str,
    limit: usize,
) -> Vec<&'a SkillRecord> {
    let category = category.trim();
    let in_category =
        |skill: &SkillRecord| category.is_empty() || skill.category == category;

    if normalize(query.trim()).is_empty() {
        return catalog
            .all()
            .iter()
            .filter(|s| in_category(*s))
            .take(limit)
            .collect();
    }

    rank(catalog, query, category)
        .into_iter()
        .take(limit)
        .map(|m| m.skill)
        .collect()
}

/// Best single match for `query`, used when a row is committed without
/// picking a suggestion.
pub fn find_best<'a>(
    catalog: &'a CatalogIndex,
    query: &str,
    category: &str,
) -> Option<&'a SkillRecord> {
    find(catalog, query, category, 1).into_iter().next()
}

/// Rank every matching record with its tier.
///
/// Unlike [`find`], a blank query yields no matches.
pub fn rank<'a>(catalog: &'a CatalogIndex, query: &str, category: &str) -> Vec<SkillMatch<'a>> {
    let raw = query.trim();
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return Vec::new();
    }

    let category = category.trim();
    let phonetic = has_phonetic(raw);
    let raw_lower = raw.to_lowercase();

    let mut matches: Vec<SkillMatch<'a>> = catalog
        .all()
        .iter()
        .filter(|skill| category.is_empty() || skill.category == category)
        .filter_map(|skill| {
            match_tier(skill, &normalized, &raw_lower, phonetic)
                .map(|tier| SkillMatch { skill, tier })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| compare_names(&a.skill.name, &b.skill.name))
    });
    matches
}

fn match_tier(
    skill: &SkillRecord,
    query: &str,
    raw_lower: &str,
    phonetic: bool,
) -> Option<MatchTier> {
    let name = skill.normalized_name();

    if name == query {
        return Some(MatchTier::ExactName);
    }
    if skill.readings.iter().any(|r| r == query) {
        return Some(MatchTier::ExactReading);
    }

    let reading_hit = skill.readings.iter().any(|r| r.contains(query));
    let name_hit = name.contains(query);
    let (primary, secondary) = if phonetic {
        (reading_hit, name_hit)
    } else {
        (name_hit, reading_hit)
    };
    if primary {
        return Some(MatchTier::PrimarySubstring);
    }
    if secondary {
        return Some(MatchTier::SecondarySubstring);
    }

    // Normalization can strip a query down to something that no longer
    // appears in the normalized name.
    if skill.name.to_lowercase().contains(raw_lower) {
        return Some(MatchTier::RawSubstring);
    }
    None
}

/// Collation used for ties: case-insensitive over compatibility-folded text,
/// then raw code points so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.nfkc().collect::<String>().to_lowercase();
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::tabular::Table;

    fn catalog(rows: &[[&str; 4]]) -> CatalogIndex {
        let table = Table::from_rows(
            ["id", "skill", "category", "reading"],
            rows.iter().map(|r| r.to_vec()),
        );
        CatalogIndex::load(&table).unwrap()
    }

    fn names(records: &[&SkillRecord]) -> Vec<String> {
        records.iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let index = catalog(&[
            ["1", "backward run", "", ""],
            ["2", "forward run", "", "fr"],
        ]);
        let results = find(&index, "forward run", "", 10);
        assert_eq!(names(&results), vec!["forward run"]);
    }

    #[test]
    fn test_substring_ties_sorted_by_name() {
        let index = catalog(&[
            ["1", "forward run", "", "fr"],
            ["2", "backward run", "", ""],
        ]);
        let results = find(&index, "run", "", 10);
        assert_eq!(names(&results), vec!["backward run", "forward run"]);
    }

    #[test]
    fn test_exact_reading_beats_substring() {
        let index = catalog(&[
            ["1", "Alpha fr", "", ""],
            ["2", "forward run", "", "fr"],
        ]);
        let ranked = rank(&index, "fr", "");
        assert_eq!(ranked[0].skill.name, "forward run");
        assert_eq!(ranked[0].tier, MatchTier::ExactReading);
        assert_eq!(ranked[1].tier, MatchTier::PrimarySubstring);
    }

    #[test]
    fn test_kana_query_prefers_reading_substring() {
        let index = catalog(&[
            ["1", "みぎ特化", "", ""],
            ["2", "右回り◎", "", "みぎまわり"],
        ]);
        let ranked = rank(&index, "ミギ", "");
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].skill.name, "右回り◎");
        assert_eq!(ranked[0].tier, MatchTier::PrimarySubstring);
        assert_eq!(ranked[1].tier, MatchTier::SecondarySubstring);
    }

    #[test]
    fn test_latin_query_prefers_name_substring() {
        let index = catalog(&[
            ["1", "Zeta", "", "speedster"],
            ["2", "Speed Up", "", ""],
        ]);
        let ranked = rank(&index, "speed", "");
        assert_eq!(ranked[0].skill.name, "Speed Up");
        assert_eq!(ranked[0].tier, MatchTier::PrimarySubstring);
        assert_eq!(ranked[1].tier, MatchTier::SecondarySubstring);
    }

    #[test]
    fn test_raw_substring_fallback() {
        // NFKC composes the decomposed accent in the name but not in the query.
        let index = catalog(&[["1", "Cafe\u{301} Dash", "", ""]]);
        let ranked = rank(&index, "cafe", "");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].tier, MatchTier::RawSubstring);
    }

    #[test]
    fn test_category_filter() {
        let index = catalog(&[
            ["1", "Sprint", "緑スキル", ""],
            ["2", "Sprint Plus", "通常スキル", ""],
        ]);
        let results = find(&index, "sprint", "通常スキル", 10);
        assert_eq!(names(&results), vec!["Sprint Plus"]);

        let results = find(&index, "sprint", " ", 10);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_blank_query_returns_catalog_order() {
        let index = catalog(&[
            ["1", "Zeta", "緑スキル", ""],
            ["2", "Alpha", "", ""],
            ["3", "Beta", "緑スキル", ""],
        ]);
        assert_eq!(names(&find(&index, "  ", "", 10)), vec!["Zeta", "Alpha", "Beta"]);
        assert_eq!(names(&find(&index, "", "緑スキル", 1)), vec!["Zeta"]);
    }

    #[test]
    fn test_limit_truncates() {
        let index = catalog(&[
            ["1", "run a", "", ""],
            ["2", "run b", "", ""],
            ["3", "run c", "", ""],
        ]);
        assert_eq!(find(&index, "run", "", 2).len(), 2);
        assert_eq!(find_best(&index, "run", "").unwrap().name, "run a");
    }

    #[test]
    fn test_no_match() {
        let index = catalog(&[["1", "Alpha", "", ""]]);
        assert!(find(&index, "omega", "", 10).is_empty());
        assert!(find_best(&index, "omega", "").is_none());
    }

    #[test]
    fn test_compare_names_case_insensitive() {
        assert_eq!(compare_names("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_names("Ａlpha", "beta"), Ordering::Less);
        assert_ne!(compare_names("a", "A"), Ordering::Equal);
    }
}
