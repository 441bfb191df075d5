//! Service layer for the media asset server.
//!
//! - File storage operations over the image and video directories

pub mod storage;

pub use storage::{AssetStats, AssetStore, AssetWriter, StorageService, StorageStats};
