//! The ordered list of rows a user has composed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cost::MAX_HINT_LEVEL;
use crate::error::{PlanError, Result};
use crate::skills::{Category, SkillRecord};

/// Row identifier, unique within a [`Composition`] and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(u64);

impl RowId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(RowId)
    }
}

/// One composed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRow {
    row_id: RowId,
    skill_ref: Option<String>,
    category: Option<Category>,
    hint_level: u8,
    free_text: String,
    auto_added_by: Option<RowId>,
}

impl CompositionRow {
    fn empty(row_id: RowId) -> Self {
        Self {
            row_id,
            skill_ref: None,
            category: None,
            hint_level: 0,
            free_text: String::new(),
            auto_added_by: None,
        }
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    /// Id of the resolved skill; `None` for free text.
    pub fn skill_ref(&self) -> Option<&str> {
        self.skill_ref.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn hint_level(&self) -> u8 {
        self.hint_level
    }

    /// Text typed into the row. For resolved rows this is the skill name at
    /// the time it was resolved.
    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Row whose dependency expansion inserted this row.
    pub fn auto_added_by(&self) -> Option<RowId> {
        self.auto_added_by
    }

    pub fn is_resolved(&self) -> bool {
        self.skill_ref.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.skill_ref.is_none() && self.free_text.trim().is_empty()
    }
}

/// Row contents used when replacing all rows at once (restores).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDraft {
    pub skill_ref: Option<String>,
    pub category: Option<Category>,
    pub hint_level: u8,
    pub free_text: String,
    /// Index into the same draft list of the row that auto-added this one
    pub auto_added_by: Option<usize>,
}

/// Ordered rows plus the global special-discount toggle.
///
/// # Invariants
///
/// - At least one row exists; removing the last row clears it instead.
/// - Row ids are assigned from a counter that only moves forward.
#[derive(Debug, Clone)]
pub struct Composition {
    rows: Vec<CompositionRow>,
    special_discount: bool,
    next_row_id: u64,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Composition {
    /// A composition holding a single empty row.
    pub fn new() -> Self {
        let mut composition = Self {
            rows: Vec::new(),
            special_discount: false,
            next_row_id: 1,
        };
        composition.push_row();
        composition
    }

    pub fn rows(&self) -> &[CompositionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn special_discount(&self) -> bool {
        self.special_discount
    }

    pub fn set_special_discount(&mut self, enabled: bool) {
        self.special_discount = enabled;
    }

    pub fn row(&self, id: RowId) -> Option<&CompositionRow> {
        self.rows.iter().find(|r| r.row_id == id)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.row_id == id)
    }

    /// Row currently holding `skill_id`, if any.
    pub fn row_for_skill(&self, skill_id: &str) -> Option<RowId> {
        self.rows
            .iter()
            .find(|r| r.skill_ref.as_deref() == Some(skill_id))
            .map(|r| r.row_id)
    }

    /// Skill ids of resolved rows in display order.
    pub fn skill_ids(&self) -> Vec<&str> {
        self.rows.iter().filter_map(|r| r.skill_ref()).collect()
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        id
    }

    fn index_of(&self, id: RowId) -> Result<usize> {
        self.position(id).ok_or(PlanError::UnknownRow(id))
    }

    fn row_mut(&mut self, id: RowId) -> Result<&mut CompositionRow> {
        let idx = self.index_of(id)?;
        Ok(&mut self.rows[idx])
    }

    /// Append an empty row.
    pub fn push_row(&mut self) -> RowId {
        let id = self.allocate_id();
        self.rows.push(CompositionRow::empty(id));
        id
    }

    /// Insert an empty row immediately after `anchor`.
    pub fn insert_after(&mut self, anchor: RowId) -> Result<RowId> {
        let idx = self.index_of(anchor)?;
        let id = self.allocate_id();
        self.rows.insert(idx + 1, CompositionRow::empty(id));
        Ok(id)
    }

    /// Remove a row. The last remaining row is cleared in place instead,
    /// including its hint level.
    ///
    /// Rows auto-added by the removed row are left alone.
    pub fn remove_row(&mut self, id: RowId) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.rows.len() <= 1 {
            self.rows[idx] = CompositionRow::empty(id);
        } else {
            self.rows.remove(idx);
        }
        Ok(())
    }

    /// Clear skill, text and category of a row; the hint level is kept.
    pub fn clear_row(&mut self, id: RowId) -> Result<()> {
        let row = self.row_mut(id)?;
        row.skill_ref = None;
        row.free_text.clear();
        row.category = None;
        Ok(())
    }

    /// Point a row at `skill`. A skill with a known category sets the row's
    /// category.
    pub fn resolve_row(&mut self, id: RowId, skill: &SkillRecord) -> Result<()> {
        let row = self.row_mut(id)?;
        row.skill_ref = Some(skill.id.clone());
        row.free_text = skill.name.clone();
        if let Some(category) = skill.category_kind() {
            row.category = Some(category);
        }
        Ok(())
    }

    /// Keep `text` as an unresolved entry.
    pub fn unresolve_row(&mut self, id: RowId, text: &str) -> Result<()> {
        let row = self.row_mut(id)?;
        row.skill_ref = None;
        row.free_text = text.to_string();
        Ok(())
    }

    pub fn set_category(&mut self, id: RowId, category: Option<Category>) -> Result<()> {
        self.row_mut(id)?.category = category;
        Ok(())
    }

    pub fn set_hint_level(&mut self, id: RowId, level: u8) -> Result<()> {
        if level > MAX_HINT_LEVEL {
            return Err(PlanError::InvalidHintLevel(level));
        }
        self.row_mut(id)?.hint_level = level;
        Ok(())
    }

    pub(crate) fn set_auto_added_by(&mut self, id: RowId, origin: Option<RowId>) -> Result<()> {
        self.row_mut(id)?.auto_added_by = origin;
        Ok(())
    }

    /// Move `dragged` so it sits directly before `target`.
    pub fn move_before(&mut self, dragged: RowId, target: RowId) -> Result<()> {
        let from = self.index_of(dragged)?;
        self.index_of(target)?;
        if dragged == target {
            return Ok(());
        }
        let row = self.rows.remove(from);
        let to = self.index_of(target)?;
        self.rows.insert(to, row);
        Ok(())
    }

    /// Move `dragged` to the end of the list.
    pub fn move_to_end(&mut self, dragged: RowId) -> Result<()> {
        let from = self.index_of(dragged)?;
        let row = self.rows.remove(from);
        self.rows.push(row);
        Ok(())
    }

    /// Replace every row with `drafts`, assigning fresh ids.
    ///
    /// `auto_added_by` indexes are remapped onto the new ids; indexes that do
    /// not point at another draft are dropped. An empty draft list leaves a
    /// single empty row.
    ///
    /// # Returns
    /// The new row ids, in draft order.
    pub fn replace_rows(&mut self, drafts: Vec<RowDraft>) -> Vec<RowId> {
        self.rows.clear();

        let ids: Vec<RowId> = drafts.iter().map(|_| self.allocate_id()).collect();
        for (idx, draft) in drafts.into_iter().enumerate() {
            let origin = draft
                .auto_added_by
                .filter(|&origin| origin != idx)
                .and_then(|origin| ids.get(origin).copied());
            self.rows.push(CompositionRow {
                row_id: ids[idx],
                skill_ref: draft.skill_ref,
                category: draft.category,
                hint_level: draft.hint_level.min(MAX_HINT_LEVEL),
                free_text: draft.free_text,
                auto_added_by: origin,
            });
        }

        if self.rows.is_empty() {
            self.push_row();
        }
        ids
    }
}
