//! Error taxonomy for backend calls

use thiserror::Error;

/// Message shown when the backend rejects an analysis without saying why
pub const GENERIC_ANALYSIS_FAILURE: &str = "Failed to analyze URL. Please try again.";

/// Message shown when the free-tier quota is exhausted
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "You've reached your free analysis limit. Upgrade to Pro for unlimited analyses.";

/// Message shown when a report cannot be loaded
pub const REPORT_NOT_FOUND_MESSAGE: &str =
    "Failed to load report. It may not exist or you may not have access.";

/// Errors surfaced by the API client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The user submitted an empty URL; never reaches the network
    #[error("Please enter a URL")]
    EmptyInput,

    /// Free-tier analysis limit reached (HTTP 403)
    #[error("{}", QUOTA_EXCEEDED_MESSAGE)]
    QuotaExceeded,

    /// The report does not exist or belongs to someone else
    #[error("{}", REPORT_NOT_FOUND_MESSAGE)]
    NotFound,

    /// Analysis rejected by the backend; carries its message when present
    #[error("{0}")]
    AnalysisFailed(String),

    /// Transport failure or unexpected server response
    #[error("Network or server error: {0}")]
    NetworkOrServerError(String),
}

impl ApiError {
    /// Whether the inline error should offer the upgrade path
    #[must_use]
    pub const fn offers_upgrade(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    /// Text rendered next to the control that triggered the call
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Build an [`ApiError::AnalysisFailed`] from an optional backend detail
    #[must_use]
    pub fn analysis_failed(detail: Option<String>) -> Self {
        Self::AnalysisFailed(
            detail
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| GENERIC_ANALYSIS_FAILURE.to_string()),
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkOrServerError("request timed out".to_string())
        } else if err.is_connect() {
            Self::NetworkOrServerError(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::NetworkOrServerError(format!("unexpected response body: {err}"))
        } else {
            Self::NetworkOrServerError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_quota_offers_upgrade() {
        assert!(ApiError::QuotaExceeded.offers_upgrade());
        assert!(!ApiError::NotFound.offers_upgrade());
        assert!(!ApiError::EmptyInput.offers_upgrade());
        assert!(!ApiError::analysis_failed(None).offers_upgrade());
    }

    #[test]
    fn analysis_failed_prefers_backend_detail() {
        assert_eq!(
            ApiError::analysis_failed(Some("Invalid URL".into())).user_message(),
            "Invalid URL"
        );
        assert_eq!(
            ApiError::analysis_failed(Some("   ".into())).user_message(),
            GENERIC_ANALYSIS_FAILURE
        );
        assert_eq!(
            ApiError::analysis_failed(None).user_message(),
            GENERIC_ANALYSIS_FAILURE
        );
    }

    #[test]
    fn quota_message_mentions_upgrade() {
        assert!(ApiError::QuotaExceeded.user_message().contains("Upgrade"));
    }
}
