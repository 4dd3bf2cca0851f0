//! Error types for ItemSetCopier.
//!
//! Library crates use [`ItemSetError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! An item that cannot be resolved is *not* an `ItemSetError`: it is an
//! expected outcome reported alongside the item set (see the catalog crate's
//! `ResolveError`).

use std::path::PathBuf;

/// Top-level error type for all ItemSetCopier operations.
#[derive(Debug, thiserror::Error)]
pub enum ItemSetError {
    /// Malformed request (title length, missing field, bad URL). Never retried.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The reference-data service is unreachable or returned malformed data,
    /// and no earlier snapshot exists to fall back on.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The requested champion has no entry in the catalog.
    #[error("champion not found in catalog: <{0}>")]
    ChampionNotFound(String),

    /// An item name or ID has no catalog entry. Translation records these as
    /// outdated; this variant is for callers that ask about a single item.
    #[error("item unresolved: {0}")]
    ItemUnresolved(String),

    /// Network/HTTP error.
    #[error("network error: {0}")]
    Network(String),

    /// Source document or payload could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ItemSetError>;

impl ItemSetError {
    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the whole translation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CatalogUnavailable(_) | Self::Network(_))
    }
}
