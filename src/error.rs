//! Crate-wide error type
//!
//! SDL reports failures as plain `String`s; they are wrapped here at the
//! backend boundary so callers only ever see [`Error`].

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An image or audio file is missing or could not be decoded
    #[error("failed to load {}: {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },

    /// Decoded pixel data uses a channel layout we cannot represent
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    /// A checked write addressed a cell outside the buffer
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// Zero-sized buffer, or raw image bytes that do not match the declared size
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Creating the window, renderer, audio device or controller subsystem failed
    #[error("backend initialisation failed: {0}")]
    BackendInit(String),

    /// A per-frame backend call (texture upload, present) failed
    #[error("backend error: {0}")]
    Backend(String),

    /// A sound name that was never loaded (or already unloaded)
    #[error("no sound named '{0}' is loaded")]
    UnknownSound(String),

    #[error("bad config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn resource(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ResourceLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures that happen while acquiring one-time startup resources
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            Self::BackendInit(_)
                | Self::ResourceLoad { .. }
                | Self::UnsupportedLayout(_)
                | Self::InvalidDimensions(_)
        )
    }
}
