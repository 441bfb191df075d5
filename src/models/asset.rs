//! Asset kinds and asset filenames.
//!
//! The image and video route families differ only in a handful of
//! properties. [`AssetKind`] bundles them so the handlers and the storage
//! layer are written once.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};

/// Media type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Image file (JPEG, PNG, GIF)
    Image,
    /// Video file (MP4, AVI, MOV)
    Video,
}

impl AssetKind {
    /// All kinds served by the application
    pub const ALL: [AssetKind; 2] = [AssetKind::Image, AssetKind::Video];

    /// Extensions recognized when listing, lowercase
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Image => &["jpg", "jpeg", "png", "gif"],
            Self::Video => &["mp4", "avi", "mov"],
        }
    }

    /// Multipart field carrying the uploaded file
    pub fn form_field(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Path under which the JSON API for this kind is mounted
    pub fn api_prefix(&self) -> &'static str {
        match self {
            Self::Image => "/api/images",
            Self::Video => "/api/videos",
        }
    }

    /// Path under which files of this kind are served statically
    pub fn static_prefix(&self) -> &'static str {
        match self {
            Self::Image => "/images",
            Self::Video => "/videos",
        }
    }

    /// Singular noun used in client-facing messages
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Plural noun used in client-facing messages
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Check whether a filename carries one of this kind's extensions.
    ///
    /// The comparison is case-insensitive, so `CAT.PNG` counts as an image.
    pub fn matches(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.allowed_extensions()
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// A client-supplied filename that is safe to join onto a storage directory.
///
/// Names are used as-is otherwise: no normalization, no collision handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName(String);

impl AssetName {
    /// Validate a filename.
    ///
    /// Accepts exactly one path component. Rejects empty names, `.` and `..`,
    /// anything containing `/`, `\` or NUL.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(AppError::invalid_filename("filename is empty"));
        }

        if name == "." || name == ".." {
            return Err(AppError::invalid_filename(format!(
                "{:?} is not a file name",
                name
            )));
        }

        if name.contains(['/', '\\', '\0']) {
            return Err(AppError::invalid_filename(format!(
                "{:?} must not contain path separators",
                name
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<Path> for AssetName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response body for successful upload and delete requests
#[derive(Debug, Clone, Serialize)]
pub struct FilenameResponse {
    pub filename: String,
}

impl From<AssetName> for FilenameResponse {
    fn from(name: AssetName) -> Self {
        Self {
            filename: name.into_string(),
        }
    }
}
