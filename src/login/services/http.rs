//! # HTTP Auth Service
//!
//! Talks to the OTP service over HTTP: one POST to issue a code and one POST
//! to verify it, both with small JSON bodies.

use crate::config::{REQUEST_TIMEOUT, SEND_CODE_PATH, VERIFY_CODE_PATH};
use crate::login::error::ServiceError;
use crate::login::events::DeliveryChannel;
use crate::login::services::remote::RemoteAuthService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

/// Body of the issue-code request
#[derive(Debug, Serialize)]
struct IssueCodeRequest<'a> {
    mobile_number: &'a str,
    method: DeliveryChannel,
}

/// Body of the verify-code request
#[derive(Debug, Serialize)]
struct VerifyCodeRequest<'a> {
    mobile_number: &'a str,
    otp: &'a str,
}

/// Message body the service attaches to its answers
#[derive(Debug, Default, Deserialize)]
struct ServiceMessage {
    message: Option<String>,
    error: Option<String>,
}

/// [`RemoteAuthService`] backed by the OTP service's HTTP API
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: Client,
    issue_url: Url,
    verify_url: Url,
}

impl HttpAuthService {
    /// Create a service for the server at `server_url`
    pub fn new(server_url: &str) -> Result<Self> {
        tracing::debug!("Creating HttpAuthService for {}", server_url);
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(client, server_url)
    }

    /// Create a service reusing an existing client
    pub fn with_client(client: Client, server_url: &str) -> Result<Self> {
        let issue_url = endpoint(server_url, SEND_CODE_PATH)?;
        let verify_url = endpoint(server_url, VERIFY_CODE_PATH)?;
        tracing::info!("OTP endpoints: issue={} verify={}", issue_url, verify_url);

        Ok(Self {
            client,
            issue_url,
            verify_url,
        })
    }

    pub fn issue_url(&self) -> &Url {
        &self.issue_url
    }

    pub fn verify_url(&self) -> &Url {
        &self.verify_url
    }
}

/// Join an endpoint path onto the server URL, keeping any path prefix
fn endpoint(server_url: &str, path: &str) -> Result<Url> {
    let joined = format!("{}{}", server_url.trim_end_matches('/'), path);
    Url::parse(&joined).with_context(|| format!("Invalid server URL: {server_url}"))
}

/// Turn a non-accepted response into a [`ServiceError::Rejected`]
async fn rejection(response: Response) -> ServiceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ServiceMessage>(&body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error));

    ServiceError::Rejected { status, message }
}

#[async_trait]
impl RemoteAuthService for HttpAuthService {
    async fn issue_code(
        &self,
        mobile_number: &str,
        channel: DeliveryChannel,
    ) -> Result<(), ServiceError> {
        tracing::debug!("POST {} via {}", self.issue_url, channel.wire_value());

        let response = self
            .client
            .post(self.issue_url.clone())
            .json(&IssueCodeRequest {
                mobile_number,
                method: channel,
            })
            .send()
            .await
            .inspect_err(|e| tracing::error!("Issue code request failed: {e}"))?;

        if response.status().is_success() {
            tracing::debug!("Code issued, status {}", response.status());
            Ok(())
        } else {
            let err = rejection(response).await;
            tracing::warn!("Issue code rejected: {err}");
            Err(err)
        }
    }

    async fn verify_code(&self, mobile_number: &str, code: &str) -> Result<(), ServiceError> {
        tracing::debug!("POST {}", self.verify_url);

        let response = self
            .client
            .post(self.verify_url.clone())
            .json(&VerifyCodeRequest {
                mobile_number,
                otp: code,
            })
            .send()
            .await
            .inspect_err(|e| tracing::error!("Verify code request failed: {e}"))?;

        // Only a plain 200 counts as verified
        if response.status() == StatusCode::OK {
            tracing::debug!("Code verified");
            Ok(())
        } else {
            let err = rejection(response).await;
            tracing::warn!("Verify code rejected: {err}");
            Err(err)
        }
    }
}
