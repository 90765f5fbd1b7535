//! Backend API access
//!
//! [`ReportBackend`] is the seam between page controllers and the remote
//! analysis service. [`HttpBackend`] is the production implementation; tests
//! substitute in-memory fakes or point it at a mock server.

pub mod client;
pub mod error;
pub mod normalize;

pub use client::HttpBackend;
pub use error::ApiError;
pub use normalize::normalize_url;

use crate::core::models::{Report, Subscription};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /billing/create-checkout-session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    /// Account to upgrade
    pub user_id: String,
    /// Billing email
    pub email: String,
    /// Where the hosted checkout returns on success
    pub success_url: String,
    /// Where the hosted checkout returns on cancel
    pub cancel_url: String,
}

/// Address of a hosted checkout or billing portal page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectUrl {
    /// Full address to navigate to
    pub url: String,
}

/// Operations offered by the analysis backend
///
/// Implementations are pass-through: no retries, no caching.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Analyze an already normalized URL on behalf of `user_id`.
    ///
    /// The returned report always carries `url` and `created_at`.
    ///
    /// # Errors
    /// [`ApiError::QuotaExceeded`] when the free tier is exhausted,
    /// [`ApiError::AnalysisFailed`] for any other failure.
    async fn analyze(&self, url: &str, user_id: &str) -> Result<Report, ApiError>;

    /// All stored reports for `user_id`, newest first as sent by the backend.
    ///
    /// # Errors
    /// [`ApiError::NetworkOrServerError`] on transport or server failure.
    /// Having no history is not an error.
    async fn list_history(&self, user_id: &str) -> Result<Vec<Report>, ApiError>;

    /// A single stored report.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] when the report is missing or not accessible.
    async fn get_report(&self, id: &str, user_id: &str) -> Result<Report, ApiError>;

    /// Current plan and usage.
    ///
    /// # Errors
    /// [`ApiError::NetworkOrServerError`]; callers substitute
    /// [`Subscription::default`].
    async fn get_subscription(&self, user_id: &str) -> Result<Subscription, ApiError>;

    /// Start a hosted checkout session for the pro plan.
    ///
    /// # Errors
    /// [`ApiError::NetworkOrServerError`] when the backend refuses.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<RedirectUrl, ApiError>;

    /// Open the hosted billing portal.
    ///
    /// # Errors
    /// [`ApiError::NetworkOrServerError`] when the backend refuses.
    async fn create_portal_session(
        &self,
        user_id: &str,
        return_url: &str,
    ) -> Result<RedirectUrl, ApiError>;
}
