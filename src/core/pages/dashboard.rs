//! Dashboard: analyze form, stats and history
//!
//! History and subscription are fetched concurrently and land
//! independently. Every load gets a [`FetchCycle`]; a result is applied to a
//! field only if it is newer than the one that produced the field's current
//! value, so a slow response can never overwrite a fresher one.

use super::InlineError;
use crate::core::api::{normalize_url, ApiError, ReportBackend};
use crate::core::models::{Report, Subscription};
use crate::core::session::User;
use crate::core::views::{average_score_display, remaining_quota, Quota};
use std::sync::Arc;

/// Sequence number of one dashboard load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchCycle(u64);

/// Results of one concurrent history + subscription fetch
#[derive(Debug)]
pub struct DashboardLoad {
    cycle: FetchCycle,
    history: Result<Vec<Report>, ApiError>,
    subscription: Result<Subscription, ApiError>,
}

/// Result of submitting the analyze form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Navigate to the results page with this report
    ShowReport(Report),
    /// Stay on the dashboard and show this error under the form
    Inline(InlineError),
}

/// Numbers shown in the dashboard stat cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Number of stored reports
    pub total_analyses: usize,
    /// Average score, or the placeholder when there is no history
    pub average_score: String,
    /// Analyses left this period
    pub remaining: Quota,
    /// `"2/3 analyses used"` on the free plan
    pub usage_line: Option<String>,
}

/// State and actions of the dashboard page
pub struct DashboardController {
    backend: Arc<dyn ReportBackend>,
    user: User,
    history: Vec<Report>,
    subscription: Subscription,
    loading: bool,
    analyzing: bool,
    error: Option<InlineError>,
    issued: u64,
    history_cycle: u64,
    subscription_cycle: u64,
}

impl DashboardController {
    /// Create the controller for `user`; nothing is fetched yet
    #[must_use]
    pub fn new(backend: Arc<dyn ReportBackend>, user: User) -> Self {
        Self {
            backend,
            user,
            history: Vec::new(),
            subscription: Subscription::default(),
            loading: false,
            analyzing: false,
            error: None,
            issued: 0,
            history_cycle: 0,
            subscription_cycle: 0,
        }
    }

    /// Fetch history and subscription and apply both
    pub async fn load(&mut self) {
        let cycle = self.begin_load();
        let backend = Arc::clone(&self.backend);
        let result = Self::fetch(backend.as_ref(), &self.user.id, cycle).await;
        self.apply(result);
    }

    /// Start a load and mark the page as loading
    pub fn begin_load(&mut self) -> FetchCycle {
        self.issued += 1;
        self.loading = true;
        FetchCycle(self.issued)
    }

    /// Issue both requests concurrently; each completes or fails on its own
    pub async fn fetch(
        backend: &dyn ReportBackend,
        user_id: &str,
        cycle: FetchCycle,
    ) -> DashboardLoad {
        let (history, subscription) = tokio::join!(
            backend.list_history(user_id),
            backend.get_subscription(user_id)
        );
        DashboardLoad {
            cycle,
            history,
            subscription,
        }
    }

    /// Apply a finished load, skipping fields that already hold newer data.
    ///
    /// A failed history fetch keeps the current list; a failed subscription
    /// fetch falls back to the free-plan default. Neither is shown to the
    /// user.
    pub fn apply(&mut self, load: DashboardLoad) {
        let FetchCycle(cycle) = load.cycle;

        if cycle > self.history_cycle {
            self.history_cycle = cycle;
            match load.history {
                Ok(history) => self.history = history,
                Err(e) => logger::warn!("Failed to load history: {e}"),
            }
        } else {
            logger::debug!("Discarding stale history from cycle {cycle}");
        }

        if cycle > self.subscription_cycle {
            self.subscription_cycle = cycle;
            self.subscription = load.subscription.unwrap_or_else(|e| {
                logger::warn!("Failed to load subscription: {e}");
                Subscription::default()
            });
        } else {
            logger::debug!("Discarding stale subscription from cycle {cycle}");
        }

        if cycle == self.issued {
            self.loading = false;
        }
    }

    /// Submit the analyze form
    ///
    /// Empty input is rejected without a request. On success the report
    /// (already carrying `url` and `created_at`) is handed back for the
    /// results page; on failure the inline error is stored and returned.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        self.error = None;

        let url = match normalize_url(input) {
            Ok(url) => url,
            Err(e) => return self.fail(&e),
        };

        self.analyzing = true;
        let backend = Arc::clone(&self.backend);
        let result = backend.analyze(&url, &self.user.id).await;
        self.analyzing = false;

        match result {
            Ok(report) => {
                logger::info!("Analyzed {} (score {})", report.url, report.score);
                SubmitOutcome::ShowReport(report)
            }
            Err(e) => {
                logger::warn!("Analysis of {url} failed: {e}");
                self.fail(&e)
            }
        }
    }

    fn fail(&mut self, err: &ApiError) -> SubmitOutcome {
        let inline = InlineError::from(err);
        self.error = Some(inline.clone());
        SubmitOutcome::Inline(inline)
    }

    /// Stat card values
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total_analyses: self.history.len(),
            average_score: average_score_display(&self.history),
            remaining: remaining_quota(&self.subscription),
            usage_line: self.subscription.usage_line(),
        }
    }

    /// Signed-in user
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Stored reports, as ordered by the backend
    #[must_use]
    pub fn history(&self) -> &[Report] {
        &self.history
    }

    /// Current plan snapshot
    #[must_use]
    pub const fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Whether the latest load is still running
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether an analysis is running
    #[must_use]
    pub const fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Inline error under the analyze form
    #[must_use]
    pub const fn error(&self) -> Option<&InlineError> {
        self.error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::{CheckoutRequest, RedirectUrl};
    use crate::core::models::Plan;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend whose answers are set per test
    #[derive(Default)]
    struct Scripted {
        history: Mutex<Option<Result<Vec<Report>, ApiError>>>,
        subscription: Mutex<Option<Result<Subscription, ApiError>>>,
        analyze: Mutex<Option<Result<Report, ApiError>>>,
        analyze_calls: Mutex<Vec<String>>,
    }

    fn take<T>(slot: &Mutex<Option<Result<T, ApiError>>>) -> Result<T, ApiError> {
        slot.lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ApiError::NetworkOrServerError("unscripted".into())))
    }

    #[async_trait]
    impl ReportBackend for Scripted {
        async fn analyze(&self, url: &str, _user_id: &str) -> Result<Report, ApiError> {
            self.analyze_calls.lock().unwrap().push(url.to_string());
            take(&self.analyze)
        }
        async fn list_history(&self, _user_id: &str) -> Result<Vec<Report>, ApiError> {
            take(&self.history)
        }
        async fn get_report(&self, _id: &str, _user_id: &str) -> Result<Report, ApiError> {
            Err(ApiError::NotFound)
        }
        async fn get_subscription(&self, _user_id: &str) -> Result<Subscription, ApiError> {
            take(&self.subscription)
        }
        async fn create_checkout_session(
            &self,
            _request: &CheckoutRequest,
        ) -> Result<RedirectUrl, ApiError> {
            Err(ApiError::NetworkOrServerError("unused".into()))
        }
        async fn create_portal_session(
            &self,
            _user_id: &str,
            _return_url: &str,
        ) -> Result<RedirectUrl, ApiError> {
            Err(ApiError::NetworkOrServerError("unused".into()))
        }
    }

    fn controller(backend: Scripted) -> (Arc<Scripted>, DashboardController) {
        let backend = Arc::new(backend);
        let dyn_backend: Arc<dyn ReportBackend> = backend.clone();
        (backend, DashboardController::new(dyn_backend, User::demo()))
    }

    #[tokio::test]
    async fn failed_loads_are_masked() {
        let (_, mut dash) = controller(Scripted::default());
        dash.load().await;
        assert!(dash.history().is_empty());
        assert_eq!(dash.subscription(), &Subscription::default());
        assert!(!dash.is_loading());
        assert!(dash.error().is_none());
        assert_eq!(dash.stats().average_score, "—");
    }

    #[tokio::test]
    async fn fields_land_independently() {
        let backend = Scripted::default();
        *backend.history.lock().unwrap() =
            Some(Ok(vec![Report::new("a", 80), Report::new("b", 50)]));
        let (_, mut dash) = controller(backend);
        dash.load().await;

        let stats = dash.stats();
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.average_score, "65");
        assert_eq!(stats.remaining, Quota::Remaining(3));
    }

    #[test]
    fn stale_results_are_discarded() {
        let (_, mut dash) = controller(Scripted::default());
        let first = dash.begin_load();
        let second = dash.begin_load();

        dash.apply(DashboardLoad {
            cycle: second,
            history: Ok(vec![Report::new("new", 90)]),
            subscription: Ok(Subscription::pro()),
        });
        assert!(!dash.is_loading());

        dash.apply(DashboardLoad {
            cycle: first,
            history: Ok(vec![Report::new("old", 10)]),
            subscription: Ok(Subscription::free(3, 3)),
        });
        assert_eq!(dash.history()[0].url, "new");
        assert_eq!(dash.subscription().plan, Plan::Pro);
    }

    #[test]
    fn older_cycle_still_fills_untouched_field() {
        let (_, mut dash) = controller(Scripted::default());
        let first = dash.begin_load();
        let _second = dash.begin_load();

        dash.apply(DashboardLoad {
            cycle: first,
            history: Ok(vec![Report::new("only", 70)]),
            subscription: Err(ApiError::NetworkOrServerError("down".into())),
        });
        assert_eq!(dash.history().len(), 1);
        assert!(dash.is_loading());
    }

    #[tokio::test]
    async fn empty_input_never_reaches_backend() {
        let (backend, mut dash) = controller(Scripted::default());
        let outcome = dash.submit("   ").await;
        assert_eq!(
            outcome,
            SubmitOutcome::Inline(InlineError {
                message: "Please enter a URL".into(),
                offers_upgrade: false,
            })
        );
        assert!(backend.analyze_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_normalizes_before_sending() {
        let backend = Scripted::default();
        *backend.analyze.lock().unwrap() = Some(Ok(Report::new("https://example.com", 77)));
        let (backend, mut dash) = controller(backend);

        let outcome = dash.submit(" example.com ").await;
        assert!(matches!(outcome, SubmitOutcome::ShowReport(ref r) if r.score == 77));
        assert_eq!(
            backend.analyze_calls.lock().unwrap().as_slice(),
            ["https://example.com"]
        );
        assert!(!dash.is_analyzing());
    }

    #[tokio::test]
    async fn quota_error_offers_upgrade() {
        let backend = Scripted::default();
        *backend.analyze.lock().unwrap() = Some(Err(ApiError::QuotaExceeded));
        let (_, mut dash) = controller(backend);

        let outcome = dash.submit("example.com").await;
        let SubmitOutcome::Inline(err) = outcome else {
            panic!("expected inline error");
        };
        assert!(err.offers_upgrade);
        assert_eq!(dash.error(), Some(&err));
    }
}
