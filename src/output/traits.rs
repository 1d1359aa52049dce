//! Report writer trait and error types
//!
//! This module defines the interface for turning a `CrawlResult` into a
//! report artifact on disk.

use crate::output::types::CrawlResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report writers
///
/// A writer renders the complete result into a single document. Writers never
/// see partial crawl state.
pub trait ReportWriter {
    /// Renders the result into the report's text form
    fn render(&self, result: &CrawlResult) -> OutputResult<String>;

    /// Renders the result and writes it to `path`
    fn write_to(&self, result: &CrawlResult, path: &Path) -> OutputResult<()> {
        let rendered = self.render(result)?;

        let mut file = File::create(path)?;
        file.write_all(rendered.as_bytes())?;

        Ok(())
    }
}
