//! Client-side activation after returning from checkout.
//!
//! The payment provider redirects the buyer back to the site with
//! `?session_id=cs_...`. On page load the handler:
//!
//! 1. Reads `session_id` from the page URL (no-op when absent)
//! 2. Exchanges it for a license via the verification endpoint
//! 3. Persists the token under [`LICENSE_STORAGE_KEY`]
//! 4. Marks Pro active and notifies registered listeners
//! 5. Returns the page URL without `session_id` so a reload does not
//!    verify again
//!
//! Any failure leaves storage and Pro state untouched and sets
//! [`ACTIVATION_FAILED_MESSAGE`]. Nothing is retried.

use async_trait::async_trait;
use linktopics_types::{LicensePlan, SessionId, VerifyEnvelope};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{LicenseError, LicenseResult};
use crate::storage::LicenseStorage;

/// Storage key holding the most recent license token.
pub const LICENSE_STORAGE_KEY: &str = "ltp_license";

/// Query parameter carrying the checkout session on return.
pub const SESSION_ID_PARAM: &str = "session_id";

/// Type tag of the activation broadcast.
pub const ACTIVATION_MESSAGE_TYPE: &str = "LTP_LICENSE_UPDATE";

/// User-facing message shown when activation fails.
pub const ACTIVATION_FAILED_MESSAGE: &str =
    "We couldn't activate Pro automatically. Please contact support.";

/// Message delivered to the companion extension after activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationMessage {
    /// Always [`ACTIVATION_MESSAGE_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// The newly stored token.
    pub token: String,
}

impl ActivationMessage {
    /// A license update carrying `token`.
    #[must_use]
    pub fn license_update(token: impl Into<String>) -> Self {
        Self {
            kind: ACTIVATION_MESSAGE_TYPE.to_string(),
            token: token.into(),
        }
    }
}

/// Receives activation broadcasts.
pub trait ActivationListener: Send + Sync {
    /// Called once per successful activation, after the token is stored.
    fn on_activated(&self, message: &ActivationMessage);
}

impl<F> ActivationListener for F
where
    F: Fn(&ActivationMessage) + Send + Sync,
{
    fn on_activated(&self, message: &ActivationMessage) {
        self(message);
    }
}

/// The verification endpoint as seen from the client.
#[async_trait]
pub trait VerifyApi: Send + Sync {
    /// Exchanges a session id for a response envelope.
    ///
    /// Non-success HTTP statuses and unreadable bodies are errors.
    async fn verify(&self, session_id: &SessionId) -> LicenseResult<VerifyEnvelope>;
}

/// Pro state as the page renders it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProState {
    /// A license is stored on this client.
    pub pro_active: bool,
    /// A verification request is in flight.
    pub verifying: bool,
    /// Message to show after a failed activation.
    pub error_message: Option<String>,
}

/// Result of one activation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The page URL had no session id.
    NoSession,
    /// Activation already ran for this page load.
    AlreadyRan,
    /// A license was issued and stored.
    Activated {
        /// The stored token.
        token: String,
        /// Plan reported by the endpoint.
        plan: Option<LicensePlan>,
        /// Page URL with `session_id` removed.
        cleaned_url: String,
    },
    /// Activation failed; nothing was stored.
    Failed {
        /// The user-facing message.
        message: &'static str,
    },
}

/// Extracts a usable session id from a page URL.
#[must_use]
pub fn session_id_from_url(page_url: &str) -> Option<SessionId> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == SESSION_ID_PARAM)
        .and_then(|(_, value)| SessionId::parse(&value).ok())
}

/// Returns `page_url` with every `key` query parameter removed.
///
/// Other parameters and the fragment are kept; an emptied query is dropped
/// entirely.
pub fn remove_query_param(page_url: &str, key: &str) -> LicenseResult<String> {
    let mut url = Url::parse(page_url)
        .map_err(|e| LicenseError::ActivationFailed(format!("invalid page URL: {e}")))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(retained);
    }

    Ok(url.to_string())
}

/// Runs the activation flow for one page load.
pub struct ActivationHandler<A, S> {
    api: A,
    storage: S,
    listeners: Vec<Box<dyn ActivationListener>>,
    state: ProState,
    ran: bool,
}

impl<A: VerifyApi, S: LicenseStorage> ActivationHandler<A, S> {
    /// Creates a handler. Pro is active if a license is already stored.
    pub fn new(api: A, storage: S) -> Self {
        let pro_active = storage
            .get(LICENSE_STORAGE_KEY)
            .is_some_and(|token| !token.is_empty());

        Self {
            api,
            storage,
            listeners: Vec::new(),
            state: ProState {
                pro_active,
                ..ProState::default()
            },
            ran: false,
        }
    }

    /// Registers a listener for activation broadcasts.
    pub fn subscribe(&mut self, listener: impl ActivationListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns the current Pro state.
    pub fn state(&self) -> &ProState {
        &self.state
    }

    /// Returns the stored license token, if any.
    pub fn stored_license(&self) -> Option<String> {
        self.storage
            .get(LICENSE_STORAGE_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Returns the backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs activation for the page at `page_url`.
    ///
    /// Only the first call with a session id does any work; later calls
    /// return [`ActivationOutcome::AlreadyRan`].
    pub async fn activate_from_url(&mut self, page_url: &str) -> ActivationOutcome {
        if self.ran {
            return ActivationOutcome::AlreadyRan;
        }

        let Some(session_id) = session_id_from_url(page_url) else {
            return ActivationOutcome::NoSession;
        };
        self.ran = true;

        self.state.verifying = true;
        self.state.error_message = None;
        let response = self.api.verify(&session_id).await;
        self.state.verifying = false;

        let envelope = match response {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("License verification request failed: {}", e);
                return self.fail();
            }
        };

        let Some(token) = envelope.issued_token().map(str::to_string) else {
            warn!(
                "License verification rejected: {}",
                envelope.error.map_or("invalid response", |c| c.as_str())
            );
            return self.fail();
        };

        self.store(&token);

        let cleaned_url = remove_query_param(page_url, SESSION_ID_PARAM)
            .unwrap_or_else(|_| page_url.to_string());

        info!("Pro activated ({})", envelope.plan.map_or("unknown plan", |p| p.as_str()));
        ActivationOutcome::Activated {
            token,
            plan: envelope.plan,
            cleaned_url,
        }
    }

    /// Deletes the stored license and turns Pro off.
    pub fn clear_license(&mut self) -> LicenseResult<()> {
        self.storage.remove(LICENSE_STORAGE_KEY)?;
        self.state.pro_active = false;
        debug!("Stored license cleared");
        Ok(())
    }

    /// Persists the token, then broadcasts. A storage failure skips the
    /// broadcast but Pro stays active for this page.
    fn store(&mut self, token: &str) {
        match self.storage.set(LICENSE_STORAGE_KEY, token) {
            Ok(()) => {
                let message = ActivationMessage::license_update(token);
                for listener in &self.listeners {
                    listener.on_activated(&message);
                }
            }
            Err(e) => warn!("Failed to persist license: {}", e),
        }
        self.state.pro_active = true;
    }

    fn fail(&mut self) -> ActivationOutcome {
        self.state.error_message = Some(ACTIVATION_FAILED_MESSAGE.to_string());
        ActivationOutcome::Failed {
            message: ACTIVATION_FAILED_MESSAGE,
        }
    }
}
