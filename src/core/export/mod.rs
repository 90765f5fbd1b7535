//! Report exporters
//!
//! Every format implements [`ReportExporter`], turning a [`Report`] into the
//! bytes of a downloadable file. Exporters take the report by shared
//! reference and never modify it.

pub mod csv;
pub mod guard;
pub mod html;
pub mod markdown;
pub mod pdf;

pub use csv::CsvExporter;
pub use guard::{ExportGuard, ExportTicket};
pub use html::HtmlExporter;
pub use markdown::MarkdownExporter;
pub use pdf::PdfExporter;

use crate::core::models::Report;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while producing or saving an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF backend failed to build the document
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// An export for the same trigger is still running
    #[error("An export is already in progress")]
    Busy,

    /// There is no loaded report to export
    #[error("No report loaded")]
    NoReport,
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma-separated values, one table per report section
    Csv,
    /// Paginated A4 document
    Pdf,
    /// Markdown tables
    Markdown,
    /// Self-contained HTML page
    Html,
}

impl ExportFormat {
    /// All formats in menu order
    pub const ALL: [Self; 4] = [Self::Csv, Self::Pdf, Self::Markdown, Self::Html];

    /// File extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// Exporter implementing this format
    #[must_use]
    pub fn exporter(self) -> Box<dyn ReportExporter> {
        match self {
            Self::Csv => Box::new(CsvExporter::new()),
            Self::Pdf => Box::new(PdfExporter::new()),
            Self::Markdown => Box::new(MarkdownExporter::new()),
            Self::Html => Box::new(HtmlExporter::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(format!(
                "Unknown export format: {s} (expected csv, pdf, markdown or html)"
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Pdf => write!(f, "pdf"),
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Trait for report exporters
pub trait ReportExporter: Send + Sync {
    /// Format produced by this exporter
    fn format(&self) -> ExportFormat;

    /// Render the complete file contents
    ///
    /// # Errors
    /// Returns an error if the document cannot be produced
    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError>;
}

/// Default download name: `seo-report-<host>-<YYYY-MM-DD>.<ext>`
///
/// The date is the report's analysis date; reports without a parseable
/// timestamp use `undated`. Characters outside `[A-Za-z0-9.-]` in the host
/// become `-`.
#[must_use]
pub fn default_file_name(report: &Report, format: ExportFormat) -> String {
    let host: String = report
        .host()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let host = if host.is_empty() { "site".to_string() } else { host };
    let date = report
        .created_at_utc()
        .map_or_else(|| "undated".to_string(), |ts| ts.format("%Y-%m-%d").to_string());
    format!("seo-report-{host}-{date}.{}", format.extension())
}

/// Render `report` and write it to `path`, creating parent directories
///
/// # Errors
/// Returns an error if rendering or writing fails
pub async fn export_to_file(
    report: &Report,
    format: ExportFormat,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = format.exporter().render(report)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, &bytes).await?;

    logger::info!(
        "Exported {} report for {} to {} ({} bytes)",
        format,
        report.url,
        path.display(),
        bytes.len()
    );
    Ok(path.to_path_buf())
}

/// Substitute `{{name}}` placeholders in one pass
///
/// Substituted values are not rescanned, so report text that happens to
/// contain `{{...}}` is emitted literally. Unknown placeholders are kept.
pub(crate) fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Escape the characters HTML treats specially
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing_accepts_aliases() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("htm".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn exporter_matches_requested_format() {
        for format in ExportFormat::ALL {
            assert_eq!(format.exporter().format(), format);
        }
    }

    #[test]
    fn file_name_uses_host_and_date() {
        let report = Report::new("https://www.example.com/blog?page=2", 70)
            .with_created_at("2024-03-05T10:20:30.000Z");
        assert_eq!(
            default_file_name(&report, ExportFormat::Pdf),
            "seo-report-www.example.com-2024-03-05.pdf"
        );
    }

    #[test]
    fn file_name_sanitizes_host() {
        let report = Report::new("http://localhost:8080/", 1);
        assert_eq!(
            default_file_name(&report, ExportFormat::Csv),
            "seo-report-localhost-8080-undated.csv"
        );
    }

    #[test]
    fn template_values_are_not_rescanned() {
        let out = fill_template(
            "{{a}} / {{b}} / {{missing}}",
            &[("a", "{{b}}".to_string()), ("b", "B".to_string())],
        );
        assert_eq!(out, "{{b}} / B / {{missing}}");
    }

    #[test]
    fn html_escaping() {
        assert_eq!(
            escape_html(r#"<img alt="x"> & 'y'"#),
            "&lt;img alt=&quot;x&quot;&gt; &amp; &#39;y&#39;"
        );
    }
}
