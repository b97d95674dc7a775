//! Saving and sharing plans.
//!
//! Plans leave the process as [`Snapshot`] JSON, either compressed into a
//! share link or written to a slot by [`crate::fs::SlotStore`].

pub mod codec;
mod link;
mod snapshot;

pub use codec::{compress, decompress, CodecError};
pub use link::{
    build_share_url, decode_payload, encode_payload, parse_share_url, shorten_or_original,
    SharedPlan, TinyUrlShortener, UrlShortener, SHARE_PARAM, TINYURL_ENDPOINT,
};
pub use snapshot::{restore, RestorePolicy, RestoreReport, Snapshot, SnapshotRow};
