//! CSV exporter
//!
//! The file holds three tables, one per report section, each introduced by a
//! title row and a header row and separated by a blank line:
//!
//! ```text
//! Issues
//! type,title,description
//! ...
//!
//! Recommendations
//! priority,title,description
//! ...
//!
//! Performance
//! metric,value,status
//! ...
//! ```
//!
//! Rows keep the report's order. Fields containing a comma, quote, CR or LF
//! are quoted with embedded quotes doubled (RFC 4180). Lines end in CRLF.

use super::{ExportError, ExportFormat, ReportExporter};
use crate::core::models::Report;

/// Column set of the issues table
pub const ISSUE_COLUMNS: [&str; 3] = ["type", "title", "description"];
/// Column set of the recommendations table
pub const RECOMMENDATION_COLUMNS: [&str; 3] = ["priority", "title", "description"];
/// Column set of the performance table
pub const PERFORMANCE_COLUMNS: [&str; 3] = ["metric", "value", "status"];

const LINE_END: &str = "\r\n";

/// CSV exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CSV exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the CSV document as text
    #[must_use]
    pub fn to_csv(report: &Report) -> String {
        let mut out = String::new();

        push_section(
            &mut out,
            "Issues",
            &ISSUE_COLUMNS,
            report
                .issues
                .iter()
                .map(|i| [i.kind.as_str(), i.title.as_str(), i.description.as_str()]),
        );
        out.push_str(LINE_END);
        push_section(
            &mut out,
            "Recommendations",
            &RECOMMENDATION_COLUMNS,
            report
                .recommendations
                .iter()
                .map(|r| [r.priority.as_str(), r.title.as_str(), r.description.as_str()]),
        );
        out.push_str(LINE_END);
        push_section(
            &mut out,
            "Performance",
            &PERFORMANCE_COLUMNS,
            report
                .performance
                .iter()
                .map(|p| [p.metric.as_str(), p.value.as_str(), p.status.as_str()]),
        );

        out
    }
}

impl ReportExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        Ok(Self::to_csv(report).into_bytes())
    }
}

fn push_section<'a, I>(out: &mut String, title: &str, columns: &[&str], rows: I)
where
    I: Iterator<Item = [&'a str; 3]>,
{
    push_record(out, &[title]);
    push_record(out, columns);
    for row in rows {
        push_record(out, &row);
    }
}

fn push_record(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str(LINE_END);
}

/// Quote a field when it contains a delimiter, quote or line break
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records of unescaped fields
///
/// Understands quoted fields spanning lines and both LF and CRLF endings.
/// Blank lines produce no record.
#[must_use]
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if field_started || !field.is_empty() || !record.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }
    if field_started || !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Issue, IssueKind, MetricStatus, PerformanceMetric, Priority, Recommendation};

    fn sample() -> Report {
        Report::new("https://example.com", 72)
            .with_issue(Issue::new(
                IssueKind::Warning,
                "Missing \"alt\" text, check images",
                "3 images lack alt text",
            ))
            .with_issue(Issue::new(IssueKind::Error, "No title", "Line one\nLine two"))
            .with_recommendation(Recommendation::new(Priority::High, "Add a title", "Keep it short"))
            .with_metric(PerformanceMetric::new("HTTPS", "Enabled", MetricStatus::Good))
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape_field("Enabled"), "Enabled");
    }

    #[test]
    fn special_fields_are_quoted() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("x\ny"), "\"x\ny\"");
    }

    #[test]
    fn sections_appear_in_order() {
        let csv = CsvExporter::to_csv(&sample());
        let issues = csv.find("Issues").unwrap();
        let recs = csv.find("Recommendations").unwrap();
        let perf = csv.find("Performance").unwrap();
        assert!(issues < recs && recs < perf);
        assert!(csv.contains("type,title,description\r\n"));
        assert!(csv.contains("priority,title,description\r\n"));
        assert!(csv.contains("metric,value,status\r\n"));
    }

    #[test]
    fn quoted_title_survives_reparse() {
        let report = sample();
        let records = parse_records(&CsvExporter::to_csv(&report));
        assert_eq!(
            records[2],
            vec![
                "warning".to_string(),
                "Missing \"alt\" text, check images".to_string(),
                "3 images lack alt text".to_string(),
            ]
        );
        assert_eq!(records[3][2], "Line one\nLine two");
    }

    #[test]
    fn empty_report_still_has_headers() {
        let records = parse_records(&CsvExporter::to_csv(&Report::new("u", 0)));
        assert_eq!(
            records,
            vec![
                vec!["Issues".to_string()],
                ISSUE_COLUMNS.map(String::from).to_vec(),
                vec!["Recommendations".to_string()],
                RECOMMENDATION_COLUMNS.map(String::from).to_vec(),
                vec!["Performance".to_string()],
                PERFORMANCE_COLUMNS.map(String::from).to_vec(),
            ]
        );
    }

    #[test]
    fn parse_handles_empty_fields() {
        assert_eq!(
            parse_records("a,,\"\"\n"),
            vec![vec!["a".to_string(), String::new(), String::new()]]
        );
    }

    #[test]
    fn export_does_not_touch_report() {
        let report = sample();
        let before = report.clone();
        let _ = CsvExporter::new().render(&report).unwrap();
        assert_eq!(report, before);
    }
}
