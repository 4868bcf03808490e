//! HTTP client for the verification endpoint.

use async_trait::async_trait;
use linktopics_types::{SessionId, VerifyEnvelope};
use reqwest::{header, Client, Url};
use tracing::debug;

use crate::activation::{VerifyApi, SESSION_ID_PARAM};
use crate::error::{LicenseError, LicenseResult};

/// [`VerifyApi`] over HTTP (`GET {endpoint}?session_id=...`).
#[derive(Debug, Clone)]
pub struct HttpVerifyApi {
    client: Client,
    endpoint: Url,
}

impl HttpVerifyApi {
    /// Creates a client for the endpoint at `endpoint`
    /// (e.g. `https://www.linktopics.me/api/stripe-verify`).
    pub fn new(endpoint: &str) -> LicenseResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| LicenseError::Config(format!("invalid verify endpoint: {e}")))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl VerifyApi for HttpVerifyApi {
    async fn verify(&self, session_id: &SessionId) -> LicenseResult<VerifyEnvelope> {
        debug!("Requesting license for session {}", session_id);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[(SESSION_ID_PARAM, session_id.as_str())])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LicenseError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LicenseError::ActivationFailed(format!(
                "verification failed with HTTP {status}"
            )));
        }

        response
            .json::<VerifyEnvelope>()
            .await
            .map_err(|e| LicenseError::ActivationFailed(format!("invalid response: {e}")))
    }
}
