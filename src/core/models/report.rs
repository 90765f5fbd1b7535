//! Report data model
//!
//! A [`Report`] is the result of one SEO analysis of one URL, as returned by
//! the backend. Decoding is lenient: missing sections become empty lists,
//! scores are rounded and clamped to `0..=100`, and unknown enum values fall
//! back to the least severe display category.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lowest valid score
pub const MIN_SCORE: u8 = 0;
/// Highest valid score
pub const MAX_SCORE: u8 = 100;

/// Severity of a detected issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Something that actively hurts ranking
    Error,
    /// Something worth fixing
    Warning,
    /// Informational finding; also used for unrecognised types
    #[default]
    #[serde(other)]
    Info,
}

impl IssueKind {
    /// All kinds in display order
    pub const ALL: [Self; 3] = [Self::Error, Self::Warning, Self::Info];

    /// Wire name of the kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Do this first
    High,
    /// Worth scheduling
    Medium,
    /// Nice to have; also used for unrecognised priorities
    #[default]
    #[serde(other)]
    Low,
}

impl Priority {
    /// All priorities in display order
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Wire name of the priority
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single performance metric
///
/// The backend sometimes reports `"error"` instead of `"bad"`; that and any
/// other unknown value decode as [`MetricStatus::Bad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// Within target
    Good,
    /// Borderline
    Warning,
    /// Out of target
    #[default]
    #[serde(other)]
    Bad,
}

impl MetricStatus {
    /// All statuses in display order
    pub const ALL: [Self; 3] = [Self::Good, Self::Warning, Self::Bad];

    /// Wire name of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found on the analyzed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: IssueKind,
    /// Short headline
    #[serde(default)]
    pub title: String,
    /// Free-form explanation
    #[serde(default)]
    pub description: String,
}

impl Issue {
    /// Create a new issue
    #[must_use]
    pub fn new(kind: IssueKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// An actionable suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Priority
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Priority,
    /// Short headline
    #[serde(default)]
    pub title: String,
    /// Free-form explanation
    #[serde(default)]
    pub description: String,
}

impl Recommendation {
    /// Create a new recommendation
    #[must_use]
    pub fn new(
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A named measurement with a unit-bearing display value such as `"1.2s"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    /// Metric name
    #[serde(default)]
    pub metric: String,
    /// Display value
    #[serde(default)]
    pub value: String,
    /// Status as judged by the backend
    #[serde(default, deserialize_with = "nullable")]
    pub status: MetricStatus,
}

impl PerformanceMetric {
    /// Create a new metric
    #[must_use]
    pub fn new(metric: impl Into<String>, value: impl Into<String>, status: MetricStatus) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
            status,
        }
    }
}

/// Result of one SEO analysis of one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Backend-assigned identifier; `None` until persisted
    #[serde(
        default,
        deserialize_with = "opaque_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Fully qualified analyzed address
    #[serde(default)]
    pub url: String,
    /// Overall score, always within `0..=100`
    #[serde(default, deserialize_with = "clamped_score")]
    pub score: u8,
    /// When the analysis ran (ISO-8601)
    #[serde(default)]
    pub created_at: String,
    /// Issues in display order
    #[serde(default, deserialize_with = "nullable_seq")]
    pub issues: Vec<Issue>,
    /// Recommendations in display order
    #[serde(default, deserialize_with = "nullable_seq")]
    pub recommendations: Vec<Recommendation>,
    /// Performance metrics in display order
    #[serde(default, deserialize_with = "nullable_seq")]
    pub performance: Vec<PerformanceMetric>,
}

impl Report {
    /// Create an empty report for `url`
    #[must_use]
    pub fn new(url: impl Into<String>, score: u8) -> Self {
        Self {
            id: None,
            url: url.into(),
            score: score.min(MAX_SCORE),
            created_at: String::new(),
            issues: Vec::new(),
            recommendations: Vec::new(),
            performance: Vec::new(),
        }
    }

    /// Set the identifier
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Append an issue
    #[must_use]
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Append a recommendation
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendations.push(recommendation);
        self
    }

    /// Append a performance metric
    #[must_use]
    pub fn with_metric(mut self, metric: PerformanceMetric) -> Self {
        self.performance.push(metric);
        self
    }

    /// Fill in `url` and `created_at` when the backend left them out.
    ///
    /// Fresh analyze responses carry neither; history rows carry both, which
    /// are kept as-is.
    pub fn stamp(&mut self, url: &str, now: chrono::DateTime<chrono::Utc>) {
        if self.url.is_empty() {
            self.url = url.to_string();
        }
        if self.created_at.is_empty() {
            self.created_at = now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        }
    }

    /// Parse `created_at` into a UTC timestamp.
    ///
    /// Accepts RFC 3339 as well as the naive `YYYY-MM-DDTHH:MM:SS[.frac]`
    /// form (treated as UTC).
    #[must_use]
    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.created_at.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&chrono::Utc));
        }
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Human-readable timestamp, falling back to the raw string
    #[must_use]
    pub fn created_at_display(&self) -> String {
        self.created_at_utc().map_or_else(
            || self.created_at.clone(),
            |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
    }

    /// Host part of the URL, used for file names
    #[must_use]
    pub fn host(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        rest.split(['/', '?', '#']).next().unwrap_or(rest)
    }
}

/// Round and clamp a raw score into `0..=100`. NaN becomes 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

fn clamped_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map_or(MIN_SCORE, clamp_score))
}

/// `null` decodes as the type's default, like a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifiers arrive as strings or as bare numbers depending on the store.
fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) if !s.is_empty() => Some(s),
        Some(RawId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
