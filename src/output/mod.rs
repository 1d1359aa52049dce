//! Output module for crawl results and reports
//!
//! This module handles:
//! - Accumulating per-page and per-domain results during a crawl
//! - The final `CrawlResult` data structure
//! - Writing report artifacts (JSON or markdown)

mod aggregator;
mod json;
mod markdown;
mod traits;
mod types;

pub use aggregator::Aggregator;
pub use json::JsonReport;
pub use markdown::{format_markdown_summary, MarkdownReport};
pub use traits::{OutputError, OutputResult, ReportWriter};
pub use types::{
    CrawlResult, DomainSummary, ErrorRecord, ExternalLink, PageRecord, MAX_ANCHOR_CHARS,
    NO_ANCHOR_TEXT,
};

use std::path::Path;

/// Report artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
}

impl ReportFormat {
    /// Picks the format from the output file extension
    ///
    /// `.md` and `.markdown` produce markdown; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            _ => Self::Json,
        }
    }
}

/// Writes a crawl result to `path` in the format implied by its extension
///
/// # Returns
///
/// * `Ok(ReportFormat)` - The format that was written
/// * `Err(OutputError)` - Failed to render or write the report
pub fn write_report(result: &CrawlResult, path: &Path) -> OutputResult<ReportFormat> {
    let format = ReportFormat::from_path(path);

    match format {
        ReportFormat::Json => JsonReport.write_to(result, path)?,
        ReportFormat::Markdown => MarkdownReport.write_to(result, path)?,
    }

    tracing::info!("Report saved to: {}", path.display());
    Ok(format)
}
