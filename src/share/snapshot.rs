//! Serializable plan snapshots and restoring them into a composition.
//!
//! The JSON layout is shared by slots and share links:
//!
//! ```json
//! { "rows": [ { "category": "", "skillId": "101", "skillName": "...",
//!               "hintLv": 2, "autoAddedBy": "", "rowId": "1" } ],
//!   "specialFlag": false, "title": "...", "timestamp": 1700000000000 }
//! ```
//!
//! Older payloads carry the toggle as `kiremono` and have no `rowId`; both
//! are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{PlanError, Result};
use crate::plan::{
    expand_all, Composition, ExpansionReport, RowDraft, MAX_HINT_LEVEL,
};
use crate::skills::{find_best, CatalogIndex, Category, SkillRecord};

/// One saved row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    /// Category label; empty for none
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Resolved skill id; empty for free-text rows
    #[serde(default, deserialize_with = "lenient_string")]
    pub skill_id: String,
    /// Skill name or typed text
    #[serde(default, deserialize_with = "lenient_string")]
    pub skill_name: String,
    /// Hint level; anything outside 0-5 reads as 0
    #[serde(default, deserialize_with = "lenient_hint_level")]
    pub hint_lv: u8,
    /// `rowId` of the row that auto-added this one; empty for none
    #[serde(default, deserialize_with = "lenient_string")]
    pub auto_added_by: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub row_id: Option<String>,
}

/// A saved plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub rows: Vec<SnapshotRow>,
    /// Special-discount toggle; `None` leaves the target's toggle alone
    #[serde(default, alias = "kiremono", skip_serializing_if = "Option::is_none")]
    pub special_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Save time in milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Snapshot {
    /// Capture every row of `composition`, blank rows included.
    pub fn capture(composition: &Composition) -> Self {
        let rows = composition
            .rows()
            .iter()
            .map(|row| SnapshotRow {
                category: row.category().map(|c| c.as_str().to_string()).unwrap_or_default(),
                skill_id: row.skill_ref().unwrap_or_default().to_string(),
                skill_name: row.free_text().to_string(),
                hint_lv: row.hint_level(),
                auto_added_by: row
                    .auto_added_by()
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                row_id: Some(row.row_id().to_string()),
            })
            .collect();

        Self {
            rows,
            special_flag: Some(composition.special_discount()),
            title: None,
            timestamp: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse snapshot JSON.
    ///
    /// # Errors
    /// [`PlanError::CorruptPersistedState`] if the text is not a snapshot.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| PlanError::CorruptPersistedState(format!("invalid plan data: {e}")))
    }

    /// Display names of the first `count` rows that have one.
    pub fn sample_names(&self, count: usize, catalog: Option<&CatalogIndex>) -> Vec<String> {
        self.rows
            .iter()
            .take(count)
            .filter_map(|row| {
                if !row.skill_name.is_empty() {
                    return Some(row.skill_name.clone());
                }
                catalog
                    .and_then(|c| c.by_id(&row.skill_id))
                    .map(|s| s.name.clone())
            })
            .collect()
    }
}

/// What to do after rows are restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestorePolicy {
    /// Reproduce the saved rows exactly.
    #[default]
    Verbatim,
    /// Restore verbatim, then expand every resolved row so children added
    /// to the catalog since the save show up.
    Reexpand,
}

/// Outcome of a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Number of rows restored
    pub rows: usize,
    /// Names (or ids) of saved rows that no longer resolve
    pub unresolved: Vec<String>,
    /// Rows added by [`RestorePolicy::Reexpand`]
    pub expansion: ExpansionReport,
}

/// Replace the rows of `composition` with the contents of `snapshot`.
///
/// Rows resolve by skill id first, then by name through the matcher with
/// the saved category as filter; rows that resolve neither way are kept as
/// unresolved free text. The composition is only touched once every row has
/// been worked out.
pub fn restore(
    composition: &mut Composition,
    catalog: &CatalogIndex,
    snapshot: &Snapshot,
    policy: RestorePolicy,
) -> Result<RestoreReport> {
    let positions: HashMap<&str, usize> = snapshot
        .rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| row.row_id.as_deref().map(|id| (id.trim(), idx)))
        .collect();

    let mut report = RestoreReport {
        rows: snapshot.rows.len(),
        ..Default::default()
    };

    let drafts: Vec<RowDraft> = snapshot
        .rows
        .iter()
        .map(|row| {
            let draft = draft_row(row, catalog, &positions);
            if draft.skill_ref.is_none() {
                let reference = if row.skill_name.trim().is_empty() {
                    row.skill_id.trim()
                } else {
                    row.skill_name.as_str()
                };
                if !reference.is_empty() {
                    let err = PlanError::UnresolvedReference {
                        reference: reference.to_string(),
                        context: "saved row".to_string(),
                    };
                    warn!("{err}");
                    report.unresolved.push(reference.to_string());
                }
            }
            draft
        })
        .collect();

    composition.replace_rows(drafts);
    if let Some(flag) = snapshot.special_flag {
        composition.set_special_discount(flag);
    }
    debug!(
        rows = report.rows,
        unresolved = report.unresolved.len(),
        ?policy,
        "Restored plan"
    );

    if policy == RestorePolicy::Reexpand {
        report.expansion = expand_all(composition, catalog)?;
    }
    Ok(report)
}

fn draft_row(
    row: &SnapshotRow,
    catalog: &CatalogIndex,
    positions: &HashMap<&str, usize>,
) -> RowDraft {
    let category = Category::parse(&row.category);
    let auto_added_by = Some(row.auto_added_by.trim())
        .filter(|id| !id.is_empty())
        .and_then(|id| positions.get(id).copied());

    match resolve_saved(row, catalog) {
        Some(skill) => RowDraft {
            skill_ref: Some(skill.id.clone()),
            category: skill.category_kind().or(category),
            hint_level: row.hint_lv,
            free_text: skill.name.clone(),
            auto_added_by,
        },
        None => RowDraft {
            skill_ref: None,
            category,
            hint_level: row.hint_lv,
            free_text: row.skill_name.clone(),
            auto_added_by,
        },
    }
}

fn resolve_saved<'a>(row: &SnapshotRow, catalog: &'a CatalogIndex) -> Option<&'a SkillRecord> {
    if !row.skill_id.trim().is_empty() {
        if let Some(skill) = catalog.by_id(&row.skill_id) {
            return Some(skill);
        }
    }
    if row.skill_name.trim().is_empty() {
        return None;
    }
    find_best(catalog, &row.skill_name, &row.category)
}

/// Strings, numbers and booleans as text; null as empty.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_string(deserializer)?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

fn lenient_hint_level<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let level = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => leading_integer(&s),
        _ => None,
    };
    Ok(level
        .filter(|&l| l <= u64::from(MAX_HINT_LEVEL))
        .map(|l| l as u8)
        .unwrap_or(0))
}

/// Integer prefix of `text`, so `"2.0"` and `"3lv"` read as 2 and 3.
fn leading_integer(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
