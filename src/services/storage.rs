//! Storage service for file operations.
//!
//! Each asset kind owns one flat directory on local disk. There is no index
//! or manifest: the directory listing is the catalogue.
//!
//! ```text
//! src/
//! ├── images/          # jpg, jpeg, png, gif
//! │   └── cat.png
//! └── videos/          # mp4, avi, mov
//!     └── clip.mp4
//! ```
//!
//! Every request performs exactly one filesystem operation. Concurrent
//! writes to the same name are not coordinated: the last writer wins.

use crate::config::StorageConfig;
use crate::error::{AppError, Result, StorageOp};
use crate::models::{AssetKind, AssetName};
use axum::body::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// One asset kind bound to its storage directory
#[derive(Debug, Clone)]
pub struct AssetStore {
    kind: AssetKind,
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(kind: AssetKind, dir: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            dir: dir.into(),
        }
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a file with this name is stored at
    pub fn path_for(&self, name: &AssetName) -> PathBuf {
        self.dir.join(name)
    }

    fn fail(&self, op: StorageOp) -> impl FnOnce(std::io::Error) -> AppError {
        let kind = self.kind;
        move |source| AppError::storage(kind, op, source)
    }

    /// List files whose extension is in this kind's allow-list.
    ///
    /// Names come back in directory-read order. Entries whose names are not
    /// valid UTF-8 are skipped.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(self.fail(StorageOp::List))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(self.fail(StorageOp::List))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };

            if self.kind.matches(&name) {
                names.push(name);
            }
        }

        debug!(kind = %self.kind, count = names.len(), "Listed assets");

        Ok(names)
    }

    /// Open a writer for streaming an upload into `name`.
    ///
    /// The target is created or truncated immediately.
    pub async fn create(&self, name: &AssetName) -> Result<AssetWriter> {
        let path = self.path_for(name);
        let file = fs::File::create(&path)
            .await
            .map_err(self.fail(StorageOp::Save))?;

        Ok(AssetWriter {
            kind: self.kind,
            path,
            file,
            written: 0,
        })
    }

    /// Remove a file
    pub async fn delete(&self, name: &AssetName) -> Result<()> {
        let path = self.path_for(name);

        fs::remove_file(&path)
            .await
            .map_err(self.fail(StorageOp::Delete))?;

        debug!(kind = %self.kind, path = %path.display(), "Deleted asset");

        Ok(())
    }

    /// Count and total size of the allow-listed files
    pub async fn stats(&self) -> Result<AssetStats> {
        let mut stats = AssetStats::default();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(self.fail(StorageOp::List))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(self.fail(StorageOp::List))?
        {
            let matches = entry
                .file_name()
                .to_str()
                .map(|name| self.kind.matches(name))
                .unwrap_or(false);
            if !matches {
                continue;
            }

            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                stats.count += 1;
                stats.total_size += metadata.len();
            }
        }

        Ok(stats)
    }

    /// Whether the storage directory can currently be read
    pub async fn is_readable(&self) -> bool {
        fs::read_dir(&self.dir).await.is_ok()
    }
}

/// Streams an upload into its target file
#[derive(Debug)]
pub struct AssetWriter {
    kind: AssetKind,
    path: PathBuf,
    file: fs::File,
    written: u64,
}

impl AssetWriter {
    /// Append a chunk
    pub async fn write_chunk(&mut self, chunk: &Bytes) -> Result<()> {
        let kind = self.kind;
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| AppError::storage(kind, StorageOp::Save, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush to disk and return the number of bytes written.
    ///
    /// On failure the partial file is removed.
    pub async fn finish(mut self) -> Result<u64> {
        if let Err(e) = self.file.flush().await {
            let err = AppError::storage(self.kind, StorageOp::Save, e);
            self.discard().await;
            return Err(err);
        }

        debug!(
            kind = %self.kind,
            path = %self.path.display(),
            size = self.written,
            "Saved asset"
        );

        Ok(self.written)
    }

    /// Remove the partially written file
    pub async fn discard(self) {
        drop(self.file);
        if let Err(e) = fs::remove_file(&self.path).await {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove partial upload"
            );
        }
    }
}

/// Service holding the store of every asset kind
#[derive(Debug, Clone)]
pub struct StorageService {
    images: AssetStore,
    videos: AssetStore,
}

impl StorageService {
    /// Create a new storage service, creating directories if configured to
    ///
    /// # Errors
    /// Returns error if directories cannot be created
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let service = Self {
            images: AssetStore::new(AssetKind::Image, &config.images_dir),
            videos: AssetStore::new(AssetKind::Video, &config.videos_dir),
        };

        if config.create_dirs {
            service.init_directories().await?;
        }

        info!(
            images = %service.images.dir.display(),
            videos = %service.videos.dir.display(),
            "Storage service initialized"
        );

        Ok(service)
    }

    /// Initialize storage directories
    async fn init_directories(&self) -> Result<()> {
        for store in self.stores() {
            if !store.dir.exists() {
                fs::create_dir_all(&store.dir).await?;
                debug!(path = %store.dir.display(), "Created storage directory");
            }
        }
        Ok(())
    }

    /// Store for the given asset kind
    pub fn store(&self, kind: AssetKind) -> &AssetStore {
        match kind {
            AssetKind::Image => &self.images,
            AssetKind::Video => &self.videos,
        }
    }

    pub fn stores(&self) -> [&AssetStore; 2] {
        [&self.images, &self.videos]
    }

    /// Get storage statistics
    pub async fn get_stats(&self) -> Result<StorageStats> {
        Ok(StorageStats {
            images: self.images.stats().await?,
            videos: self.videos.stats().await?,
        })
    }
}

/// Statistics for one asset kind
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AssetStats {
    /// Number of allow-listed files
    pub count: usize,
    /// Their total size in bytes
    pub total_size: u64,
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub images: AssetStats,
    pub videos: AssetStats,
}
