//! Error types for the planner core.
//!
//! Catalog, expansion and restore problems that the planner can recover from
//! are still modelled here so they can be collected as warnings; only I/O and
//! caller mistakes are returned as `Err` from the public operations.

use thiserror::Error;

use crate::plan::composition::RowId;
use crate::share::codec::CodecError;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors produced by the planner core.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A catalog row had fewer cells than the header; it was padded.
    #[error("Catalog row {line} has {found} of {expected} fields; missing fields left empty")]
    MalformedCatalogRow {
        /// 1-based line number of the row in the source table (header is line 1).
        line: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells actually present.
        found: usize,
    },

    /// A child id or skill-by-name lookup did not resolve.
    #[error("Unresolved reference '{reference}' ({context})")]
    UnresolvedReference {
        /// The id or name that failed to resolve.
        reference: String,
        /// Where the reference came from.
        context: String,
    },

    /// A slot or shared link could not be decoded.
    #[error("Could not load saved plan: {0}")]
    CorruptPersistedState(String),

    /// The catalog could not be loaded at all.
    #[error("Failed to load skill catalog: {0}")]
    CatalogLoadFailure(String),

    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    #[error("Invalid hint level {0} (expected 0-5)")]
    InvalidHintLevel(u8),

    #[error("Slot {index} is out of range (0-{})", .count.saturating_sub(1))]
    SlotOutOfRange { index: usize, count: usize },

    #[error("Invalid storage key '{0}'")]
    InvalidStoreKey(String),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// The shortener answered, but not with a URL.
    #[error("URL shortener returned an unexpected response: {0}")]
    ShortenerRejected(String),

    /// Storage read/write failure.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// URL shortener transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CodecError> for PlanError {
    fn from(err: CodecError) -> Self {
        PlanError::CorruptPersistedState(err.to_string())
    }
}

impl PlanError {
    /// Returns true for problems the planner recovers from on its own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanError::MalformedCatalogRow { .. }
                | PlanError::UnresolvedReference { .. }
                | PlanError::CorruptPersistedState(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_out_of_range_message() {
        let err = PlanError::SlotOutOfRange {
            index: 12,
            count: 10,
        };
        assert_eq!(err.to_string(), "Slot 12 is out of range (0-9)");
    }

    #[test]
    fn test_codec_error_becomes_corrupt_state() {
        let err: PlanError = CodecError::MissingTerminator.into();
        assert!(matches!(err, PlanError::CorruptPersistedState(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_catalog_load_failure_is_fatal() {
        let err = PlanError::CatalogLoadFailure("empty file".to_string());
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("empty file"));
    }
}
