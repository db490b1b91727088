//! # Tournament HTTP Client
//!
//! Wraps a `reqwest::Client` configured with the request timeout and user
//! agent. Endpoint URLs come from each match descriptor, so a single client
//! can serve matches from different tournaments.
//!
//! ## Error Handling
//!
//! Transport failures, non-2xx statuses and undecodable responses map to
//! distinct [`ClientError`] variants carrying the endpoint, status and
//! response body. There is no automatic retry: every failure is reported to
//! the operator, who decides whether to try again.

use std::time::Duration;

use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{RegistrationRequest, RegistrationResponse, ResultSubmission};

/// Path of the registration endpoint, relative to the tournament `baseUri`.
pub const REGISTER_PATH: &str = "/api/submitter/register";

/// HTTP client for a tournament system.
#[derive(Debug, Clone)]
pub struct TournamentClient {
    http: reqwest::Client,
}

impl TournamentClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { http })
    }

    /// Register this device under `name` and return the issued credential.
    ///
    /// The name is trimmed; a blank name is rejected before any request is
    /// made.
    pub async fn register_device(
        &self,
        base_uri: &str,
        name: &str,
    ) -> Result<RegistrationResponse, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyDeviceName);
        }
        let endpoint = registration_url(base_uri)?;
        let body = RegistrationRequest {
            name: name.to_string(),
        };

        tracing::info!(endpoint = %endpoint, "registering device");
        let resp = self.post_json(&endpoint, &body).await?;
        resp.json::<RegistrationResponse>()
            .await
            .map_err(|source| ClientError::Deserialization {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    /// Submit a match result to the descriptor's `submitUrl`.
    pub async fn submit_result(
        &self,
        submit_url: &str,
        submission: &ResultSubmission,
    ) -> Result<(), ClientError> {
        let endpoint = parse_url(submit_url)?;

        tracing::info!(
            endpoint = %endpoint,
            match_id = %submission.match_id,
            player1_hits = submission.player1_hits,
            player2_hits = submission.player2_hits,
            with_identity = submission.device_token.is_some(),
            "submitting match result"
        );
        let resp = self.post_json(&endpoint, submission).await?;
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(endpoint = %endpoint, %body, "match result accepted");
        Ok(())
    }

    /// POST a JSON body and turn non-2xx statuses into [`ClientError::ApiError`].
    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &Url,
        body: &T,
    ) -> Result<reqwest::Response, ClientError> {
        let resp = self
            .http
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(endpoint = %endpoint, status = status.as_u16(), "tournament API error");
            return Err(ClientError::ApiError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

fn parse_url(raw: &str) -> Result<Url, ClientError> {
    Url::parse(raw.trim()).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// `{baseUri}/api/submitter/register`, tolerating a trailing slash.
pub fn registration_url(base_uri: &str) -> Result<Url, ClientError> {
    let base = base_uri.trim().trim_end_matches('/');
    parse_url(&format!("{base}{REGISTER_PATH}"))
}
