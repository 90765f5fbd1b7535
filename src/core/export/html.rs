//! HTML exporter
//!
//! Generates a self-contained page (inline CSS, no scripts) laid out like the
//! results view: score card, issues, recommendations, performance.

use super::{escape_html, fill_template, ExportError, ExportFormat, ReportExporter};
use crate::core::models::{IssueKind, Report};
use crate::core::views::{Band, ReportSummary};
use std::fmt::Write;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("templates/report.html");

/// HTML exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    /// Create a new HTML exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report as an HTML document
    #[must_use]
    pub fn to_html(report: &Report) -> String {
        let summary = ReportSummary::of(report);

        fill_template(
            HTML_TEMPLATE,
            &[
                ("url", escape_html(&report.url)),
                ("score", report.score.to_string()),
                ("band", summary.band.as_str().to_string()),
                ("score_label", summary.band.label().to_string()),
                ("analyzed_at", escape_html(&summary.analyzed_at)),
                ("error_count", summary.issues.errors.to_string()),
                ("warning_count", summary.issues.warnings.to_string()),
                ("info_count", summary.issues.info.to_string()),
                ("issues", Self::issues_html(report)),
                ("recommendations", Self::recommendations_html(report)),
                ("performance", Self::performance_html(report)),
                ("version", crate::core::get_version().to_string()),
            ],
        )
    }

    fn issues_html(report: &Report) -> String {
        if report.issues.is_empty() {
            return r#"<p class="empty">No issues found</p>"#.to_string();
        }
        let mut html = String::from("<table>\n<tr><th>Type</th><th>Issue</th><th>Details</th></tr>\n");
        for issue in &report.issues {
            let band = match issue.kind {
                IssueKind::Error => "bad",
                IssueKind::Warning => "warning",
                IssueKind::Info => "",
            };
            let _ = writeln!(
                html,
                r#"<tr><td><span class="badge {band}">{}</span></td><td>{}</td><td>{}</td></tr>"#,
                issue.kind,
                escape_html(&issue.title),
                escape_html(&issue.description)
            );
        }
        html.push_str("</table>");
        html
    }

    fn recommendations_html(report: &Report) -> String {
        if report.recommendations.is_empty() {
            return r#"<p class="empty">No recommendations</p>"#.to_string();
        }
        let mut html =
            String::from("<table>\n<tr><th>Priority</th><th>Recommendation</th><th>Details</th></tr>\n");
        for rec in &report.recommendations {
            let _ = writeln!(
                html,
                r#"<tr><td><span class="badge">{}</span></td><td>{}</td><td>{}</td></tr>"#,
                rec.priority,
                escape_html(&rec.title),
                escape_html(&rec.description)
            );
        }
        html.push_str("</table>");
        html
    }

    fn performance_html(report: &Report) -> String {
        if report.performance.is_empty() {
            return r#"<p class="empty">No performance data</p>"#.to_string();
        }
        let mut html = String::from("<table>\n<tr><th>Metric</th><th>Value</th><th>Status</th></tr>\n");
        for metric in &report.performance {
            let class = Band::for_status(metric.status).as_str();
            let _ = writeln!(
                html,
                r#"<tr><td>{}</td><td>{}</td><td class="{class}">{}</td></tr>"#,
                escape_html(&metric.metric),
                escape_html(&metric.value),
                metric.status
            );
        }
        html.push_str("</table>");
        html
    }
}

impl ReportExporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        Ok(Self::to_html(report).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Issue, MetricStatus, PerformanceMetric};

    #[test]
    fn score_card_uses_band_class() {
        let html = HtmlExporter::to_html(&Report::new("https://example.com", 42));
        assert!(html.contains(r#"<div class="score bad">42</div>"#));
        assert!(html.contains("<h1>Poor SEO Health</h1>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn report_text_is_escaped() {
        let report = Report::new("https://example.com/?a=<b>", 90).with_issue(Issue::new(
            IssueKind::Warning,
            "<script>alert(1)</script>",
            "",
        ));
        let html = HtmlExporter::to_html(&report);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("?a=&lt;b&gt;"));
    }

    #[test]
    fn performance_rows_keep_report_order() {
        let report = Report::new("u", 60)
            .with_metric(PerformanceMetric::new("Page Load Time", "5s", MetricStatus::Bad))
            .with_metric(PerformanceMetric::new("HTTPS", "on", MetricStatus::Good));
        let html = HtmlExporter::to_html(&report);
        let slow = html.find("Page Load Time").unwrap();
        let https = html.find("HTTPS").unwrap();
        assert!(slow < https);
        assert!(html.contains(r#"<td class="bad">bad</td>"#));
        assert!(html.contains(r#"<td class="good">good</td>"#));
    }

    #[test]
    fn html_and_markdown_agree_on_metric_order() {
        let report = Report::new("u", 60)
            .with_metric(PerformanceMetric::new("Page Load Time", "5s", MetricStatus::Bad))
            .with_metric(PerformanceMetric::new("HTTPS", "on", MetricStatus::Good));
        let html = HtmlExporter::to_html(&report);
        let markdown = crate::core::export::MarkdownExporter::to_markdown(&report);
        assert!(html.find("Page Load Time") < html.find("HTTPS"));
        assert!(markdown.find("Page Load Time") < markdown.find("HTTPS"));
    }
}
