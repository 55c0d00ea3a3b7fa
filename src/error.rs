//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror` (e.g.
//! [`CatalogError`]), while the CLI and `main` use `anyhow` for convenient
//! propagation.
//!
//! Per-track search/add failures never show up here: the sync driver turns
//! them into outcome records. What's left are the errors that end a run.
//!
//! # Example
//!
//! ```ignore
//! use music_export::error::{Result, ResultExt};
//!
//! fn save(path: &Path, json: &str) -> Result<()> {
//!     std::fs::write(path, json).with_context("writing report")?;
//!     Ok(())
//! }
//! ```

use crate::catalog::CatalogError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source playlist couldn't be fetched - nothing to reconcile
    #[error("Failed to fetch source playlist: {0}")]
    Fetch(#[source] CatalogError),

    /// A destination catalog call outside the batch driver failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report (de)serialization error
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, CatalogError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalog(e).context(ctx))
    }
}
