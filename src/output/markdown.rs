//! Markdown summary generation
//!
//! This module renders a human-readable markdown summary of a crawl: totals,
//! the external domains table, per-page link counts, and fetch errors.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::types::CrawlResult;

/// Number of domains listed in the domains table
const TOP_DOMAINS: usize = 50;

/// Number of pages listed in the pages table
const TOP_PAGES: usize = 100;

/// Writes a markdown summary
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReport;

impl ReportWriter for MarkdownReport {
    fn render(&self, result: &CrawlResult) -> OutputResult<String> {
        Ok(format_markdown_summary(result))
    }
}

/// Escapes characters that would break a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Formats a crawl result as markdown
///
/// # Arguments
///
/// * `result` - The crawl result
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(result: &CrawlResult) -> String {
    let mut md = String::new();

    md.push_str("# External Link Audit\n\n");

    // Run metadata
    md.push_str("## Crawl Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", result.site));
    md.push_str(&format!("- **Base Domain**: {}\n", result.base_domain));
    md.push_str(&format!("- **Crawled**: {}\n\n", result.crawl_date.to_rfc3339()));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", result.pages_visited));
    md.push_str(&format!("- **Pages Reported**: {}\n", result.total_pages));
    md.push_str(&format!(
        "- **Pages With External Links**: {}\n",
        result.pages_with_external_links()
    ));
    md.push_str(&format!(
        "- **External Links**: {}\n",
        result.total_external_links
    ));
    md.push_str(&format!(
        "- **Authority Links**: {}\n",
        result.authority_link_count()
    ));
    md.push_str(&format!("- **Unique Domains**: {}\n", result.total_domains));
    md.push_str(&format!("- **Errors**: {}\n\n", result.errors.len()));

    // Domains
    if !result.domains.is_empty() {
        md.push_str(&format!(
            "## Top {} External Domains\n\n",
            result.domains.len().min(TOP_DOMAINS)
        ));
        md.push_str("| Domain | Links | Pages | Authority |\n");
        md.push_str("|--------|-------|-------|-----------|\n");

        for domain in result.domains.iter().take(TOP_DOMAINS) {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&domain.domain),
                domain.count,
                domain.pages_count,
                if domain.is_authority { "yes" } else { "" }
            ));
        }
        if result.domains.len() > TOP_DOMAINS {
            md.push_str(&format!(
                "\n... and {} more\n",
                result.domains.len() - TOP_DOMAINS
            ));
        }
        md.push('\n');
    }

    // Pages
    if !result.pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Page | Title | External Links |\n");
        md.push_str("|------|-------|----------------|\n");

        for page in result.pages.iter().take(TOP_PAGES) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&page.url),
                cell(&page.title),
                page.external_count
            ));
        }
        if result.pages.len() > TOP_PAGES {
            md.push_str(&format!(
                "\n... and {} more\n",
                result.pages.len() - TOP_PAGES
            ));
        }
        md.push('\n');
    }

    // Errors
    if !result.errors.is_empty() {
        md.push_str("## Errors\n\n");
        md.push_str("| URL | Error |\n");
        md.push_str("|-----|-------|\n");

        for error in &result.errors {
            md.push_str(&format!("| {} | {} |\n", cell(&error.url), cell(&error.error)));
        }
        md.push('\n');
    }

    md
}
