//! Catalog index: skill records keyed by id.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::normalize::normalize;
use super::tabular::{parse_table, Table};
use super::types::SkillRecord;
use crate::error::{PlanError, Result};

const ID_COLUMNS: &[&str] = &["id"];
const NAME_COLUMNS: &[&str] = &["skill", "name"];
const COST_COLUMNS: &[&str] = &["sp", "cost", "base_cost"];
const CATEGORY_COLUMNS: &[&str] = &["category"];
const READING_COLUMNS: &[&str] = &["reading", "readings"];
const CHILD_COLUMNS: &[&str] = &["child_id", "child_ids"];
const TAG_COLUMNS: &[&str] = &["tags"];
const DESCRIPTION_COLUMNS: &[&str] = &["explain", "description"];

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    name: usize,
    cost: Option<usize>,
    category: Option<usize>,
    readings: Option<usize>,
    children: Option<usize>,
    tags: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Result<Self> {
        let id = table.column(ID_COLUMNS).ok_or_else(|| {
            PlanError::CatalogLoadFailure("header has no 'id' column".to_string())
        })?;
        let name = table.column(NAME_COLUMNS).ok_or_else(|| {
            PlanError::CatalogLoadFailure("header has no 'skill' or 'name' column".to_string())
        })?;

        Ok(Self {
            id,
            name,
            cost: table.column(COST_COLUMNS),
            category: table.column(CATEGORY_COLUMNS),
            readings: table.column(READING_COLUMNS),
            children: table.column(CHILD_COLUMNS),
            tags: table.column(TAG_COLUMNS),
            description: table.column(DESCRIPTION_COLUMNS),
        })
    }
}

/// Immutable skill catalog with O(1) lookup by id.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    records: Vec<SkillRecord>,
    by_id: HashMap<String, usize>,
    warnings: Vec<PlanError>,
}

impl CatalogIndex {
    /// Build the index from a parsed table.
    ///
    /// Short rows are padded with empty cells and recorded as
    /// [`PlanError::MalformedCatalogRow`] warnings. Duplicate ids keep every
    /// record in [`all`](Self::all) but [`by_id`](Self::by_id) returns the
    /// last one loaded.
    ///
    /// # Errors
    /// [`PlanError::CatalogLoadFailure`] when the header lacks an id or name column.
    pub fn load(table: &Table) -> Result<Self> {
        let columns = Columns::resolve(table)?;
        let width = table.headers.len();

        let mut index = CatalogIndex::default();

        for row in &table.rows {
            let mut cells = row.cells.clone();
            if cells.len() < width {
                let err = PlanError::MalformedCatalogRow {
                    line: row.line,
                    expected: width,
                    found: cells.len(),
                };
                warn!("{err}");
                index.warnings.push(err);
                cells.resize(width, String::new());
            }

            let record = build_record(
                &cells[columns.id],
                &cells[columns.name],
                cell(&cells, columns.cost),
                cell(&cells, columns.category),
                cell(&cells, columns.readings),
                cell(&cells, columns.children),
                cell(&cells, columns.tags),
                cell(&cells, columns.description),
            );

            index.by_id.insert(record.id.clone(), index.records.len());
            index.records.push(record);
        }

        debug!(
            records = index.records.len(),
            warnings = index.warnings.len(),
            "Loaded skill catalog"
        );
        Ok(index)
    }

    /// Parse CSV text and build the index.
    pub fn from_csv(text: &str) -> Result<Self> {
        let table = parse_table(text)
            .ok_or_else(|| PlanError::CatalogLoadFailure("catalog has no header row".into()))?;
        Self::load(&table)
    }

    /// Read and index a catalog file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            PlanError::CatalogLoadFailure(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_csv(&text)
    }

    pub fn by_id(&self, id: &str) -> Option<&SkillRecord> {
        self.by_id.get(id.trim()).map(|&idx| &self.records[idx])
    }

    /// All records in load order.
    pub fn all(&self) -> &[SkillRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Problems recovered from while loading.
    pub fn warnings(&self) -> &[PlanError] {
        &self.warnings
    }
}

fn cell(cells: &[String], column: Option<usize>) -> &str {
    column.map(|c| cells[c].as_str()).unwrap_or("")
}

#[allow(clippy::too_many_arguments)]
fn build_record(
    id: &str,
    name: &str,
    cost: &str,
    category: &str,
    readings: &str,
    children: &str,
    tags: &str,
    description: &str,
) -> SkillRecord {
    SkillRecord {
        id: id.trim().to_string(),
        name: name.to_string(),
        category: category.trim().to_string(),
        base_cost: parse_cost(cost),
        tags: split_list(tags, &['|']),
        description: description.to_string(),
        readings: readings
            .split('|')
            .map(normalize)
            .filter(|r| !r.is_empty())
            .collect(),
        child_ids: split_list(children, &['|', ',']),
        normalized_name: normalize(name),
    }
}

/// Leading integer of `raw`; anything negative or unparsable is 0 and
/// values past `u32::MAX` saturate.
fn parse_cost(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return 0;
    }
    let digits: String = raw
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

fn split_list(raw: &str, separators: &[char]) -> Vec<String> {
    raw.split(separators)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
