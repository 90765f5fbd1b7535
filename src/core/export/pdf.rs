//! PDF exporter built on `printpdf`
//!
//! Lays the report out on A4 pages with the builtin Helvetica family:
//! header (url, score, timestamp), then issues, recommendations and
//! performance in that order. A new page starts whenever the next block
//! would cross the bottom margin.

use super::{ExportError, ExportFormat, ReportExporter};
use crate::core::models::{IssueKind, Priority, Report};
use crate::core::views::{Band, ReportSummary};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rect, Rgb,
};
use std::io::{BufWriter, Cursor};

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const LEFT: Mm = Mm(20.0);
const RIGHT: Mm = Mm(190.0);
const TOP: Mm = Mm(277.0);
const BOTTOM: Mm = Mm(20.0);
const LINE: Mm = Mm(5.0);

/// Characters per wrapped line of 9pt body text
const WRAP_WIDTH: usize = 92;
/// Characters per line of the 10pt bold entry titles
const TITLE_WRAP_WIDTH: usize = 72;
/// Characters per line of the 10pt report URL under the heading
const URL_WRAP_WIDTH: usize = 95;

/// PDF exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl PdfExporter {
    /// Create a new PDF exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report as PDF bytes
    ///
    /// # Errors
    /// Returns [`ExportError::Pdf`] if the document cannot be built or saved
    pub fn to_pdf(report: &Report) -> Result<Vec<u8>, ExportError> {
        let title = pdf_safe(&format!("SEO Report - {}", report.url));
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");

        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("font error: {e}")))?;

        let mut pen = Pen {
            doc,
            page,
            layer,
            y: TOP,
            bold,
            regular,
        };

        pen.header(report);
        pen.issues(report);
        pen.recommendations(report);
        pen.performance(report);
        pen.footer();

        let mut buf = BufWriter::new(Cursor::new(Vec::new()));
        pen.doc
            .save(&mut buf)
            .map_err(|e| ExportError::Pdf(format!("save error: {e}")))?;
        let cursor = buf
            .into_inner()
            .map_err(|e| ExportError::Pdf(format!("flush error: {e}")))?;
        Ok(cursor.into_inner())
    }
}

impl ReportExporter for PdfExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        Self::to_pdf(report)
    }
}

/// Write position within the document
struct Pen {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    y: Mm,
    bold: IndirectFontRef,
    regular: IndirectFontRef,
}

impl Pen {
    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    /// Start a new page unless `needed` still fits above the bottom margin
    fn reserve(&mut self, needed: Mm) {
        if self.y - needed < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.page = page;
            self.layer = layer;
            self.y = TOP;
        }
    }

    fn text(&self, text: &str, size: f32, x: Mm, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer().use_text(pdf_safe(text), size, x, self.y, font);
    }

    fn rule(&self) {
        self.layer().add_line(Line {
            points: vec![
                (Point::new(LEFT, self.y), false),
                (Point::new(RIGHT, self.y), false),
            ],
            is_closed: false,
        });
    }

    fn header(&mut self, report: &Report) {
        let summary = ReportSummary::of(report);
        let layer = self.layer();

        layer.set_fill_color(ink());
        self.text("SEO Analysis Report", 20.0, LEFT, true);
        self.y -= Mm(9.0);
        for (i, line) in wrap_text(&report.url, URL_WRAP_WIDTH).iter().enumerate() {
            if i > 0 {
                self.y -= LINE;
            }
            self.text(line, 10.0, LEFT, false);
        }
        self.y -= Mm(4.0);
        self.rule();
        self.y -= Mm(14.0);

        layer.set_fill_color(band_tint(summary.band));
        layer.add_rect(Rect::new(LEFT, self.y - Mm(4.0), RIGHT, self.y + Mm(10.0)));
        layer.set_fill_color(band_color(summary.band));
        self.text(&format!("{}/100", report.score), 22.0, LEFT + Mm(3.0), true);
        self.text(&summary.headline(), 13.0, Mm(62.0), true);

        layer.set_fill_color(ink());
        self.y -= Mm(11.0);
        self.text(
            &format!(
                "Analyzed: {}    Errors: {}    Warnings: {}    Info: {}",
                summary.analyzed_at,
                summary.issues.errors,
                summary.issues.warnings,
                summary.issues.info
            ),
            9.0,
            LEFT,
            false,
        );
        self.y -= Mm(10.0);
    }

    fn section(&mut self, title: &str) {
        self.reserve(Mm(20.0));
        self.layer().set_fill_color(ink());
        self.text(title, 13.0, LEFT, true);
        self.y -= Mm(2.0);
        self.rule();
        self.y -= Mm(6.0);
    }

    /// One entry: bold tag and wrapped title, then the wrapped description
    fn entry(&mut self, tag: &str, tag_color: Color, title: &str, description: &str) {
        let title_lines = wrap_text(title, TITLE_WRAP_WIDTH);
        let lines = wrap_text(description, WRAP_WIDTH);
        #[allow(clippy::cast_precision_loss)]
        let needed = Mm(LINE.0 * (title_lines.len().max(1) + lines.len()) as f32 + 3.0);
        self.reserve(needed);

        let layer = self.layer();
        layer.set_fill_color(tag_color);
        self.text(&tag.to_uppercase(), 8.0, LEFT, true);
        layer.set_fill_color(ink());
        for line in &title_lines {
            self.text(line, 10.0, LEFT + Mm(22.0), true);
            self.y -= LINE;
        }
        if title_lines.is_empty() {
            self.y -= LINE;
        }

        for line in &lines {
            self.reserve(LINE);
            self.layer().set_fill_color(muted());
            self.text(line, 9.0, LEFT + Mm(22.0), false);
            self.y -= LINE;
        }
        self.y -= Mm(3.0);
    }

    fn empty(&mut self, text: &str) {
        self.layer().set_fill_color(muted());
        self.text(text, 9.0, LEFT, false);
        self.y -= Mm(10.0);
    }

    fn issues(&mut self, report: &Report) {
        self.section("Issues Found");
        if report.issues.is_empty() {
            self.empty("No issues found");
            return;
        }
        for issue in &report.issues {
            let color = match issue.kind {
                IssueKind::Error => band_color(Band::Bad),
                IssueKind::Warning => band_color(Band::Warning),
                IssueKind::Info => info_color(),
            };
            self.entry(issue.kind.as_str(), color, &issue.title, &issue.description);
        }
        self.y -= Mm(4.0);
    }

    fn recommendations(&mut self, report: &Report) {
        self.section("Recommendations");
        if report.recommendations.is_empty() {
            self.empty("No recommendations");
            return;
        }
        for rec in &report.recommendations {
            let color = match rec.priority {
                Priority::High => band_color(Band::Bad),
                Priority::Medium => band_color(Band::Warning),
                Priority::Low => info_color(),
            };
            self.entry(rec.priority.as_str(), color, &rec.title, &rec.description);
        }
        self.y -= Mm(4.0);
    }

    fn performance(&mut self, report: &Report) {
        self.section("Performance Metrics");
        if report.performance.is_empty() {
            self.empty("No performance data");
            return;
        }
        for metric in &report.performance {
            self.reserve(Mm(7.0));
            let layer = self.layer();
            layer.set_fill_color(ink());
            self.text(&metric.metric, 10.0, LEFT, false);
            self.text(&metric.value, 10.0, Mm(110.0), true);
            layer.set_fill_color(band_color(Band::for_status(metric.status)));
            self.text(metric.status.as_str(), 9.0, Mm(160.0), true);
            self.y -= Mm(7.0);
        }
    }

    fn footer(&self) {
        let layer = self.layer();
        layer.set_fill_color(muted());
        layer.use_text(
            format!("Generated by seoanalyzer {}", crate::core::get_version()),
            7.0,
            LEFT,
            Mm(10.0),
            &self.regular,
        );
    }
}

fn ink() -> Color {
    Color::Rgb(Rgb::new(0.10, 0.10, 0.12, None))
}

fn muted() -> Color {
    Color::Rgb(Rgb::new(0.40, 0.42, 0.46, None))
}

fn info_color() -> Color {
    Color::Rgb(Rgb::new(0.15, 0.39, 0.92, None))
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Good => Color::Rgb(Rgb::new(0.13, 0.60, 0.33, None)),
        Band::Warning => Color::Rgb(Rgb::new(0.80, 0.55, 0.05, None)),
        Band::Bad => Color::Rgb(Rgb::new(0.80, 0.15, 0.15, None)),
    }
}

fn band_tint(band: Band) -> Color {
    match band {
        Band::Good => Color::Rgb(Rgb::new(0.90, 0.97, 0.92, None)),
        Band::Warning => Color::Rgb(Rgb::new(1.0, 0.97, 0.88, None)),
        Band::Bad => Color::Rgb(Rgb::new(0.99, 0.91, 0.91, None)),
    }
}

/// Replace characters the builtin fonts cannot encode
fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('*'),
            '\t' | '\n' | '\r' => out.push(' '),
            c if (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap; words longer than `width` are split
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            let rest = word.split_off(split);
            lines.push(word);
            word = rest;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
