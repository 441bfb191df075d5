//! HTTP request handlers for the media asset server.
//!
//! - `assets`: List, upload and delete, shared by images and videos
//! - `serve`: Static file serving
//! - `health`: Health check endpoints

pub mod assets;
pub mod health;
pub mod serve;

pub use assets::asset_routes;
pub use health::health_routes;
pub use serve::static_files;
