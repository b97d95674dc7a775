//! Type definitions for skill records and matching

use serde::{Deserialize, Serialize};
use std::fmt;

/// A skill loaded from the catalog. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRecord {
    /// Stable identifier, unique within a [`super::CatalogIndex`]
    pub id: String,
    /// Display name
    pub name: String,
    /// Trimmed category text; empty when unset
    pub category: String,
    /// Skill point cost before discounts
    pub base_cost: u32,
    /// Short labels in catalog order
    pub tags: Vec<String>,
    /// Free-text effect description
    pub description: String,
    /// Normalized alternate spellings
    pub readings: Vec<String>,
    /// Ids of skills added alongside this one; may dangle or form cycles
    pub child_ids: Vec<String>,
    /// Normalized display name
    pub(crate) normalized_name: String,
}

impl SkillRecord {
    /// The known category for this record, if the catalog value is one.
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    /// Tags joined the way the planner table shows them.
    pub fn tags_display(&self) -> String {
        self.tags.join("・")
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

/// Skill categories offered by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "継承固有")]
    InheritedUnique,
    #[serde(rename = "緑スキル")]
    Green,
    #[serde(rename = "通常スキル")]
    Normal,
    #[serde(rename = "シナリオ・特殊")]
    ScenarioSpecial,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::InheritedUnique,
        Category::Green,
        Category::Normal,
        Category::ScenarioSpecial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::InheritedUnique => "継承固有",
            Category::Green => "緑スキル",
            Category::Normal => "通常スキル",
            Category::ScenarioSpecial => "シナリオ・特殊",
        }
    }

    /// Parse a category label; surrounding whitespace is ignored.
    ///
    /// Returns `None` for the empty label and for unknown labels.
    pub fn parse(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Match tier assigned by the matcher; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Normalized name equals the normalized query
    ExactName = 0,
    /// A reading equals the normalized query
    ExactReading = 1,
    /// Preferred substring rule (reading for kana queries, name otherwise)
    PrimarySubstring = 2,
    /// The other substring rule
    SecondarySubstring = 3,
    /// Raw case-insensitive substring of the display name
    RawSubstring = 4,
}

/// A matched skill with its tier
#[derive(Debug, Clone, Copy)]
pub struct SkillMatch<'a> {
    pub skill: &'a SkillRecord,
    pub tier: MatchTier,
}
