//! Derived display categories
//!
//! Pure functions mapping a report, or a list of reports, to what a page
//! shows: score bands and labels, per-kind counts, performance grouping,
//! average score and remaining quota.

use crate::core::models::{
    IssueKind, MetricStatus, PerformanceMetric, Priority, Report, Subscription, MAX_SCORE,
};
use std::fmt;

/// Lowest score in the "good" band
pub const GOOD_THRESHOLD: u8 = 80;
/// Lowest score in the "warning" band
pub const WARNING_THRESHOLD: u8 = 50;

/// Placeholder shown instead of a statistic that cannot be computed
pub const PLACEHOLDER: &str = "—";

/// Three-way display category shared by scores and performance metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// 80 and above
    Good,
    /// 50 to 79
    Warning,
    /// Below 50
    Bad,
}

impl Band {
    /// Band for an overall score. Values above 100 are treated as 100.
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        let score = score.min(MAX_SCORE);
        if score >= GOOD_THRESHOLD {
            Self::Good
        } else if score >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Bad
        }
    }

    /// Band for a performance metric, taken from its own status
    #[must_use]
    pub const fn for_status(status: MetricStatus) -> Self {
        match status {
            MetricStatus::Good => Self::Good,
            MetricStatus::Warning => Self::Warning,
            MetricStatus::Bad => Self::Bad,
        }
    }

    /// Lowercase band name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        }
    }

    /// Headline label used next to an overall score
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Excellent",
            Self::Warning => "Needs Work",
            Self::Bad => "Poor",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for [`Band::for_score`]
#[must_use]
pub fn band(score: u8) -> Band {
    Band::for_score(score)
}

/// Issue totals per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueCounts {
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of informational findings
    pub info: usize,
}

impl IssueCounts {
    /// Count the issues of `report` by kind
    #[must_use]
    pub fn of(report: &Report) -> Self {
        report
            .issues
            .iter()
            .fold(Self::default(), |mut acc, issue| {
                match issue.kind {
                    IssueKind::Error => acc.errors += 1,
                    IssueKind::Warning => acc.warnings += 1,
                    IssueKind::Info => acc.info += 1,
                }
                acc
            })
    }

    /// Count for a single kind
    #[must_use]
    pub const fn get(&self, kind: IssueKind) -> usize {
        match kind {
            IssueKind::Error => self.errors,
            IssueKind::Warning => self.warnings,
            IssueKind::Info => self.info,
        }
    }
}

/// Recommendation totals per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationCounts {
    /// High priority
    pub high: usize,
    /// Medium priority
    pub medium: usize,
    /// Low priority
    pub low: usize,
}

impl RecommendationCounts {
    /// Count the recommendations of `report` by priority
    #[must_use]
    pub fn of(report: &Report) -> Self {
        report
            .recommendations
            .iter()
            .fold(Self::default(), |mut acc, rec| {
                match rec.priority {
                    Priority::High => acc.high += 1,
                    Priority::Medium => acc.medium += 1,
                    Priority::Low => acc.low += 1,
                }
                acc
            })
    }

    /// Count for a single priority
    #[must_use]
    pub const fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Performance metrics grouped by status, each group in report order
#[must_use]
pub fn group_performance(report: &Report) -> Vec<(MetricStatus, Vec<&PerformanceMetric>)> {
    MetricStatus::ALL
        .iter()
        .map(|&status| {
            let metrics = report
                .performance
                .iter()
                .filter(|m| m.status == status)
                .collect();
            (status, metrics)
        })
        .collect()
}

/// Mean score over `reports`, rounded half away from zero.
/// `None` for an empty list; callers display [`PLACEHOLDER`].
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn average_score(reports: &[Report]) -> Option<u8> {
    if reports.is_empty() {
        return None;
    }
    let total: u64 = reports.iter().map(|r| u64::from(r.score)).sum();
    Some((total as f64 / reports.len() as f64).round() as u8)
}

/// Average score formatted for display
#[must_use]
pub fn average_score_display(reports: &[Report]) -> String {
    average_score(reports).map_or_else(|| PLACEHOLDER.to_string(), |s| s.to_string())
}

/// Analyses left in the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    /// Pro plan
    Unlimited,
    /// Free plan: analyses left, never negative
    Remaining(u32),
}

impl Quota {
    /// Whether another analysis is expected to be accepted
    #[must_use]
    pub const fn allows_analysis(self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Remaining(n) => n > 0,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("∞"),
            Self::Remaining(n) => write!(f, "{n}"),
        }
    }
}

/// Remaining quota for a subscription snapshot
#[must_use]
pub const fn remaining_quota(subscription: &Subscription) -> Quota {
    if subscription.is_pro() {
        Quota::Unlimited
    } else {
        Quota::Remaining(
            subscription
                .analyses_limit
                .saturating_sub(subscription.analyses_used),
        )
    }
}

/// Everything the results page header shows about one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Analyzed address
    pub url: String,
    /// Overall score
    pub score: u8,
    /// Score band
    pub band: Band,
    /// Issue totals
    pub issues: IssueCounts,
    /// Recommendation totals
    pub recommendations: RecommendationCounts,
    /// Human-readable analysis time
    pub analyzed_at: String,
}

impl ReportSummary {
    /// Derive the summary of `report`
    #[must_use]
    pub fn of(report: &Report) -> Self {
        Self {
            url: report.url.clone(),
            score: report.score,
            band: band(report.score),
            issues: IssueCounts::of(report),
            recommendations: RecommendationCounts::of(report),
            analyzed_at: report.created_at_display(),
        }
    }

    /// Headline such as `"Needs Work SEO Health"`
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} SEO Health", self.band.label())
    }
}
