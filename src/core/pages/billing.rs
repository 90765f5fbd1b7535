//! Billing page: plan card, upgrade and billing portal
//!
//! Checkout and portal sessions are hosted elsewhere; this controller only
//! asks the backend for the address to send the user to. Failures become a
//! one-line alert and the user may click again. Nothing retries on its own.

use crate::core::api::{CheckoutRequest, ReportBackend};
use crate::core::models::Subscription;
use crate::core::session::User;
use std::sync::Arc;

/// Alert shown when a checkout session cannot be created
pub const CHECKOUT_FAILED_ALERT: &str = "Failed to start upgrade process. Please try again.";
/// Alert shown when the billing portal cannot be opened
pub const PORTAL_FAILED_ALERT: &str = "Failed to open billing portal. Please try again.";

/// Result of a billing action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingOutcome {
    /// Send the user to this hosted page
    Redirect(String),
    /// Show this alert and stay on the page
    Alert(String),
}

/// Confirmation shown after returning from a successful checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
}

impl Banner {
    fn payment_success() -> Self {
        Self {
            title: "Payment Successful!".to_string(),
            message: "Welcome to Pro! You now have access to all premium features."
                .to_string(),
        }
    }
}

/// State and actions of the billing page
pub struct BillingController {
    backend: Arc<dyn ReportBackend>,
    user: User,
    app_origin: String,
    subscription: Option<Subscription>,
    upgrading: bool,
    banner: Option<Banner>,
}

impl BillingController {
    /// Create the controller; `app_origin` is where hosted pages return to
    #[must_use]
    pub fn new(backend: Arc<dyn ReportBackend>, user: User, app_origin: &str) -> Self {
        Self {
            backend,
            user,
            app_origin: app_origin.trim_end_matches('/').to_string(),
            subscription: None,
            upgrading: false,
            banner: None,
        }
    }

    /// Address checkout returns to after payment
    #[must_use]
    pub fn success_url(&self) -> String {
        format!("{}/billing?success=true", self.app_origin)
    }

    /// Address checkout returns to when abandoned
    #[must_use]
    pub fn cancel_url(&self) -> String {
        format!("{}/billing?cancelled=true", self.app_origin)
    }

    /// Address the billing portal returns to
    #[must_use]
    pub fn return_url(&self) -> String {
        format!("{}/billing", self.app_origin)
    }

    /// Inspect the query string the page was opened with.
    ///
    /// `success=true` arms the payment banner. Returns whether it did.
    pub fn note_return(&mut self, query: &str) -> bool {
        let success = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == "success" && value == "true");
        if success {
            self.banner = Some(Banner::payment_success());
        }
        success
    }

    /// Take the pending banner; later calls return `None` until the page is
    /// reopened with `success=true`
    pub fn take_banner(&mut self) -> Option<Banner> {
        self.banner.take()
    }

    /// Fetch the plan; failures fall back to the free-plan default
    pub async fn load(&mut self) -> &Subscription {
        let subscription = self
            .backend
            .get_subscription(&self.user.id)
            .await
            .unwrap_or_else(|e| {
                logger::warn!("Failed to load subscription: {e}");
                Subscription::default()
            });
        self.subscription.insert(subscription)
    }

    /// Plan snapshot; the free-plan default until [`load`](Self::load) ran
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        self.subscription.clone().unwrap_or_default()
    }

    /// Whether a checkout request is in flight
    #[must_use]
    pub const fn is_upgrading(&self) -> bool {
        self.upgrading
    }

    /// Ask for a checkout session for the pro plan
    pub async fn start_checkout(&mut self) -> BillingOutcome {
        let request = CheckoutRequest {
            user_id: self.user.id.clone(),
            email: self.user.email.clone(),
            success_url: self.success_url(),
            cancel_url: self.cancel_url(),
        };

        self.upgrading = true;
        let result = self.backend.create_checkout_session(&request).await;
        self.upgrading = false;

        match result {
            Ok(redirect) if !redirect.url.is_empty() => BillingOutcome::Redirect(redirect.url),
            Ok(_) => {
                logger::warn!("Checkout session returned no address");
                BillingOutcome::Alert(CHECKOUT_FAILED_ALERT.to_string())
            }
            Err(e) => {
                logger::warn!("Failed to create checkout session: {e}");
                BillingOutcome::Alert(CHECKOUT_FAILED_ALERT.to_string())
            }
        }
    }

    /// Ask for a billing portal session
    pub async fn open_portal(&self) -> BillingOutcome {
        let return_url = self.return_url();
        match self
            .backend
            .create_portal_session(&self.user.id, &return_url)
            .await
        {
            Ok(redirect) if !redirect.url.is_empty() => BillingOutcome::Redirect(redirect.url),
            Ok(_) => {
                logger::warn!("Portal session returned no address");
                BillingOutcome::Alert(PORTAL_FAILED_ALERT.to_string())
            }
            Err(e) => {
                logger::warn!("Failed to open billing portal: {e}");
                BillingOutcome::Alert(PORTAL_FAILED_ALERT.to_string())
            }
        }
    }
}
