//! Session and identity
//!
//! The identity source is picked once at startup from
//! [`Config::session_mode`](crate::config::Config::session_mode):
//!
//! - provider mode walks `Loading -> SignedIn | SignedOut` when the provider
//!   reports readiness, and `SignedIn -> SignedOut` on sign-out. It never
//!   returns to `Loading`.
//! - demo mode always yields the fixed demo account; signing out only
//!   navigates to the landing page.

use crate::config::{AuthConfig, Config, SessionMode};
use crate::core::pages::Route;
use thiserror::Error;

/// Account id used when no identity provider is configured
pub const DEMO_USER_ID: &str = "demo-user";
/// Email of the demo account
pub const DEMO_EMAIL: &str = "demo@example.com";
/// Display name of the demo account
pub const DEMO_NAME: &str = "Demo User";

/// Errors from invalid session transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The provider has not reported readiness yet
    #[error("Session is still loading")]
    NotReady,

    /// Readiness was already reported once
    #[error("Session was already resolved")]
    AlreadyResolved,
}

/// The signed-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Opaque account id sent to the backend
    pub id: String,
    /// Primary email, used for billing
    pub email: String,
    /// Name shown in the header
    pub display_name: String,
}

impl User {
    /// The fixed demo account
    #[must_use]
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            email: DEMO_EMAIL.to_string(),
            display_name: DEMO_NAME.to_string(),
        }
    }

    /// Identity reported through the `[auth]` config section, if any.
    ///
    /// Missing email falls back to the demo email, missing name to the id,
    /// matching how the pages fill gaps in a provider profile.
    #[must_use]
    pub fn from_auth(auth: &AuthConfig) -> Option<Self> {
        let id = auth.user_id.trim();
        if id.is_empty() {
            return None;
        }
        let email = if auth.email.trim().is_empty() {
            DEMO_EMAIL.to_string()
        } else {
            auth.email.trim().to_string()
        };
        let display_name = if auth.display_name.trim().is_empty() {
            id.to_string()
        } else {
            auth.display_name.trim().to_string()
        };
        Some(Self {
            id: id.to_string(),
            email,
            display_name,
        })
    }
}

/// Lifecycle of a provider-backed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderState {
    /// Waiting for the provider
    Loading,
    /// Provider reported a user
    SignedIn(User),
    /// Provider reported no user, or the user signed out
    SignedOut,
}

/// What a protected page should do for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// Show a spinner until the session resolves
    Wait,
    /// Render for this user
    Allow(&'a User),
    /// Leave for another page
    Redirect(Route),
}

/// Session backed by an external identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    state: ProviderState,
}

impl ProviderSession {
    /// A session waiting for the provider
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ProviderState::Loading,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &ProviderState {
        &self.state
    }

    /// Record the provider's readiness result
    ///
    /// # Errors
    /// [`SessionError::AlreadyResolved`] unless the session is still loading
    pub fn resolve(&mut self, user: Option<User>) -> Result<(), SessionError> {
        if self.state != ProviderState::Loading {
            return Err(SessionError::AlreadyResolved);
        }
        self.state = user.map_or(ProviderState::SignedOut, ProviderState::SignedIn);
        logger::debug!("Provider session resolved: {:?}", self.state);
        Ok(())
    }

    /// Sign out and go to the landing page
    ///
    /// Signing out twice is harmless.
    ///
    /// # Errors
    /// [`SessionError::NotReady`] while still loading
    pub fn sign_out(&mut self) -> Result<Route, SessionError> {
        match self.state {
            ProviderState::Loading => Err(SessionError::NotReady),
            ProviderState::SignedIn(_) | ProviderState::SignedOut => {
                self.state = ProviderState::SignedOut;
                logger::debug!("Provider session signed out");
                Ok(Route::Landing)
            }
        }
    }
}

impl Default for ProviderSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session source, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Identity provider configured
    Provider(ProviderSession),
    /// No provider; fixed demo identity
    Demo(User),
}

impl Session {
    /// Pick the session source from the configured mode.
    ///
    /// A provider session starts in `Loading`; call [`Session::resolve`]
    /// once the provider answers.
    #[must_use]
    pub fn for_mode(mode: SessionMode) -> Self {
        match mode {
            SessionMode::Provider => Self::Provider(ProviderSession::new()),
            SessionMode::Demo => Self::Demo(User::demo()),
        }
    }

    /// Build and resolve the session from configuration.
    ///
    /// In provider mode the `[auth]` identity stands in for the provider's
    /// readiness answer: a configured `user_id` signs in, none signs out.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::for_mode(config.session_mode());
        // A fresh session is always loading, so this cannot fail.
        let _ = session.resolve(User::from_auth(&config.auth));
        session
    }

    /// Mode this session was created for
    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        match self {
            Self::Provider(_) => SessionMode::Provider,
            Self::Demo(_) => SessionMode::Demo,
        }
    }

    /// Forward the provider's readiness result. No-op in demo mode.
    ///
    /// # Errors
    /// See [`ProviderSession::resolve`]
    pub fn resolve(&mut self, user: Option<User>) -> Result<(), SessionError> {
        match self {
            Self::Provider(provider) => provider.resolve(user),
            Self::Demo(_) => Ok(()),
        }
    }

    /// The current user, if any
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Provider(ProviderSession {
                state: ProviderState::SignedIn(user),
            })
            | Self::Demo(user) => Some(user),
            Self::Provider(_) => None,
        }
    }

    /// Gate for pages that need a user
    #[must_use]
    pub const fn access(&self) -> Access<'_> {
        match self {
            Self::Demo(user) => Access::Allow(user),
            Self::Provider(provider) => match &provider.state {
                ProviderState::Loading => Access::Wait,
                ProviderState::SignedIn(user) => Access::Allow(user),
                ProviderState::SignedOut => Access::Redirect(Route::Login),
            },
        }
    }

    /// Sign out and return where to navigate
    ///
    /// # Errors
    /// See [`ProviderSession::sign_out`]
    pub fn sign_out(&mut self) -> Result<Route, SessionError> {
        match self {
            Self::Provider(provider) => provider.sign_out(),
            Self::Demo(_) => {
                logger::debug!("Demo session sign-out: identity unchanged");
                Ok(Route::Landing)
            }
        }
    }
}
