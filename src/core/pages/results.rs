//! Results page: one report, with export

use super::Route;
use crate::core::api::error::REPORT_NOT_FOUND_MESSAGE;
use crate::core::api::ReportBackend;
use crate::core::export::{default_file_name, export_to_file, ExportError, ExportFormat, ExportGuard};
use crate::core::models::Report;
use crate::core::views::ReportSummary;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the results page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsState {
    /// Fetching by id
    Loading,
    /// Report available
    Loaded(Report),
    /// Nothing to show; offer a way back
    NoReport {
        /// Explanation shown to the user
        message: String,
        /// Where the "back" link goes
        back: Route,
    },
}

impl ResultsState {
    fn no_report() -> Self {
        Self::NoReport {
            message: REPORT_NOT_FOUND_MESSAGE.to_string(),
            back: Route::Dashboard,
        }
    }
}

/// State and actions of the results page
pub struct ResultsController {
    backend: Arc<dyn ReportBackend>,
    user_id: String,
    state: ResultsState,
    guard: ExportGuard,
}

impl ResultsController {
    /// Controller with nothing loaded yet
    #[must_use]
    pub fn new(backend: Arc<dyn ReportBackend>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
            state: ResultsState::Loading,
            guard: ExportGuard::new(),
        }
    }

    /// Controller for a report handed over by the dashboard; no fetch needed
    #[must_use]
    pub fn with_report(
        backend: Arc<dyn ReportBackend>,
        user_id: impl Into<String>,
        report: Report,
    ) -> Self {
        let mut controller = Self::new(backend, user_id);
        controller.state = ResultsState::Loaded(report);
        controller
    }

    /// Fetch report `id`. Any failure leads to the "no report" state.
    pub async fn load(&mut self, id: &str) -> &ResultsState {
        if id.trim().is_empty() {
            self.state = ResultsState::no_report();
            return &self.state;
        }

        self.state = ResultsState::Loading;
        self.state = match self.backend.get_report(id, &self.user_id).await {
            Ok(report) => ResultsState::Loaded(report),
            Err(e) => {
                logger::warn!("Failed to fetch report {id}: {e}");
                ResultsState::no_report()
            }
        };
        &self.state
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &ResultsState {
        &self.state
    }

    /// The loaded report, if any
    #[must_use]
    pub const fn report(&self) -> Option<&Report> {
        match &self.state {
            ResultsState::Loaded(report) => Some(report),
            _ => None,
        }
    }

    /// Header values for the loaded report
    #[must_use]
    pub fn summary(&self) -> Option<ReportSummary> {
        self.report().map(ReportSummary::of)
    }

    /// Guard shared by the export buttons
    #[must_use]
    pub const fn export_guard(&self) -> &ExportGuard {
        &self.guard
    }

    /// Default export location for `format` inside `dir`
    #[must_use]
    pub fn default_export_path(&self, format: ExportFormat, dir: &Path) -> Option<PathBuf> {
        self.report()
            .map(|report| dir.join(default_file_name(report, format)))
    }

    /// Export the loaded report to `path`
    ///
    /// # Errors
    /// [`ExportError::Busy`] while another export runs,
    /// [`ExportError::NoReport`] when nothing is loaded, or a render/write
    /// failure
    pub async fn export(&self, format: ExportFormat, path: &Path) -> Result<PathBuf, ExportError> {
        let _ticket = self.guard.try_begin()?;
        let report = self.report().ok_or(ExportError::NoReport)?;
        export_to_file(report, format, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::{ApiError, CheckoutRequest, RedirectUrl};
    use crate::core::models::Subscription;
    use async_trait::async_trait;

    struct OneReport;

    #[async_trait]
    impl ReportBackend for OneReport {
        async fn analyze(&self, _url: &str, _user_id: &str) -> Result<Report, ApiError> {
            Err(ApiError::analysis_failed(None))
        }
        async fn list_history(&self, _user_id: &str) -> Result<Vec<Report>, ApiError> {
            Ok(Vec::new())
        }
        async fn get_report(&self, id: &str, _user_id: &str) -> Result<Report, ApiError> {
            if id == "r1" {
                Ok(Report::new("https://example.com", 88).with_id("r1"))
            } else {
                Err(ApiError::NotFound)
            }
        }
        async fn get_subscription(&self, _user_id: &str) -> Result<Subscription, ApiError> {
            Ok(Subscription::default())
        }
        async fn create_checkout_session(
            &self,
            _request: &CheckoutRequest,
        ) -> Result<RedirectUrl, ApiError> {
            Err(ApiError::NotFound)
        }
        async fn create_portal_session(
            &self,
            _user_id: &str,
            _return_url: &str,
        ) -> Result<RedirectUrl, ApiError> {
            Err(ApiError::NotFound)
        }
    }

    fn controller() -> ResultsController {
        ResultsController::new(Arc::new(OneReport), "demo-user")
    }

    #[tokio::test]
    async fn loads_existing_report() {
        let mut results = controller();
        results.load("r1").await;
        assert_eq!(results.report().map(|r| r.score), Some(88));
        assert_eq!(results.summary().unwrap().headline(), "Excellent SEO Health");
    }

    #[tokio::test]
    async fn missing_report_points_back_to_dashboard() {
        let mut results = controller();
        let state = results.load("nope").await.clone();
        assert_eq!(
            state,
            ResultsState::NoReport {
                message: REPORT_NOT_FOUND_MESSAGE.to_string(),
                back: Route::Dashboard,
            }
        );
        assert!(results.report().is_none());
    }

    #[tokio::test]
    async fn blank_id_skips_the_request() {
        let mut results = controller();
        assert!(matches!(
            results.load("  ").await,
            ResultsState::NoReport { .. }
        ));
    }

    #[tokio::test]
    async fn export_without_report_fails() {
        let results = controller();
        let err = results
            .export(ExportFormat::Csv, Path::new("unused.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NoReport));
        assert!(!results.export_guard().is_busy());
    }

    #[tokio::test]
    async fn export_is_rejected_while_busy() {
        let results = ResultsController::with_report(
            Arc::new(OneReport),
            "demo-user",
            Report::new("https://example.com", 50),
        );
        let _held = results.export_guard().try_begin().unwrap();
        let err = results
            .export(ExportFormat::Csv, Path::new("unused.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Busy));
    }

    #[test]
    fn default_export_path_uses_file_name() {
        let results = ResultsController::with_report(
            Arc::new(OneReport),
            "demo-user",
            Report::new("https://example.com", 50).with_created_at("2024-06-01T00:00:00Z"),
        );
        let path = results
            .default_export_path(ExportFormat::Pdf, Path::new("/tmp/out"))
            .unwrap();
        assert_eq!(
            path,
            Path::new("/tmp/out/seo-report-example.com-2024-06-01.pdf")
        );
    }
}
