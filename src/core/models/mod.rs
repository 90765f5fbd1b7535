//! Data models for SEO analysis results and account state

pub mod report;
pub mod subscription;

pub use report::{
    clamp_score, Issue, IssueKind, MetricStatus, PerformanceMetric, Priority, Recommendation,
    Report, MAX_SCORE, MIN_SCORE,
};
pub use subscription::{Plan, Subscription, FREE_TIER_LIMIT};
