//! Skill catalog loading and search.
//!
//! This module provides functionality to:
//! - Parse the delimited catalog export into [`SkillRecord`]s
//! - Canonicalize names, readings and queries for comparison
//! - Rank catalog entries against a query and category filter
//!
//! # Example
//!
//! ```ignore
//! use skillplan::skills::{find, CatalogIndex};
//! use std::path::Path;
//!
//! let catalog = CatalogIndex::load_from_path(Path::new("skills.csv"))?;
//! for skill in find(&catalog, "みぎまわり", "", 5) {
//!     println!("{} ({} sp)", skill.name, skill.base_cost);
//! }
//! ```

mod index;
mod matcher;
mod normalize;
pub mod tabular;
mod types;

pub use index::CatalogIndex;
pub use matcher::{compare_names, find, find_best, rank, DEFAULT_MATCH_LIMIT};
pub use normalize::{has_phonetic, normalize};
pub use tabular::{parse_table, Table, TableRow};
pub use types::{Category, MatchTier, SkillMatch, SkillRecord};
