use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::types::CrawlResult;

/// Writes the crawl result verbatim as pretty-printed JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

impl ReportWriter for JsonReport {
    fn render(&self, result: &CrawlResult) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}
