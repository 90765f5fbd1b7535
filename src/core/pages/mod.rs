//! Page controllers
//!
//! Each controller owns the state of one page and talks to the backend
//! through [`ReportBackend`](crate::core::api::ReportBackend). Front ends
//! (the CLI here) render from the controller state and forward user actions.

pub mod billing;
pub mod dashboard;
pub mod results;

pub use billing::{BillingController, BillingOutcome, Banner};
pub use dashboard::{DashboardController, DashboardStats, FetchCycle, SubmitOutcome};
pub use results::{ResultsController, ResultsState};

use std::fmt;

/// Pages a controller can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public landing page
    Landing,
    /// Identity provider sign-in
    Login,
    /// Analyze form, stats and history
    Dashboard,
    /// A single report
    Results,
    /// Plan and billing management
    Billing,
}

impl Route {
    /// Path of the page in the web app
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Results => "/results",
            Self::Billing => "/billing",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error rendered next to the control that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineError {
    /// Text to show
    pub message: String,
    /// Whether to show the upgrade call to action
    pub offers_upgrade: bool,
}

impl From<&crate::core::api::ApiError> for InlineError {
    fn from(err: &crate::core::api::ApiError) -> Self {
        Self {
            message: err.user_message(),
            offers_upgrade: err.offers_upgrade(),
        }
    }
}
