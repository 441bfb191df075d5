//! Data models for the media asset server.
//!
//! There is no persistent data model beyond the files themselves; this
//! module holds the asset kinds and the request/response types.

mod asset;

pub use asset::*;
