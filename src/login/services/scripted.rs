//! # Scripted Auth Service
//!
//! In-process [`RemoteAuthService`] with queued answers. Used by tests and by
//! the binary's offline mode, where it accepts a single fixed code.

use crate::login::error::ServiceError;
use crate::login::events::DeliveryChannel;
use crate::login::services::remote::RemoteAuthService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Scripted answer for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accept,
    /// Answer with this HTTP-like status
    Reject(u16),
    /// Fail as if the service could not be reached
    Unreachable,
}

impl Outcome {
    fn into_result(self) -> Result<(), ServiceError> {
        match self {
            Outcome::Accept => Ok(()),
            Outcome::Reject(status) => Err(ServiceError::Rejected {
                status,
                message: None,
            }),
            Outcome::Unreachable => Err(ServiceError::Unavailable(
                "scripted service unreachable".to_string(),
            )),
        }
    }
}

/// A call the service received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    IssueCode {
        mobile_number: String,
        channel: DeliveryChannel,
    },
    VerifyCode {
        mobile_number: String,
        code: String,
    },
}

#[derive(Debug, Default)]
struct Script {
    issue: VecDeque<Outcome>,
    verify: VecDeque<Outcome>,
    calls: Vec<ServiceCall>,
}

/// Deterministic [`RemoteAuthService`]
///
/// Queued outcomes are consumed in order; once a queue is empty, issuing
/// succeeds and verifying succeeds for the accepted code (or any code when
/// none was configured).
#[derive(Debug, Default)]
pub struct ScriptedAuthService {
    script: Mutex<Script>,
    accepted_code: Option<String>,
    latency: Duration,
}

impl ScriptedAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service that only verifies `code`
    pub fn accepting_code(code: impl Into<String>) -> Self {
        Self {
            accepted_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue the outcome of the next unanswered issue-code call
    pub fn push_issue(&self, outcome: Outcome) {
        self.lock().issue.push_back(outcome);
    }

    /// Queue the outcome of the next unanswered verify-code call
    pub fn push_verify(&self, outcome: Outcome) {
        self.lock().verify.push_back(outcome);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl RemoteAuthService for ScriptedAuthService {
    async fn issue_code(
        &self,
        mobile_number: &str,
        channel: DeliveryChannel,
    ) -> Result<(), ServiceError> {
        let outcome = {
            let mut script = self.lock();
            script.calls.push(ServiceCall::IssueCode {
                mobile_number: mobile_number.to_string(),
                channel,
            });
            script.issue.pop_front().unwrap_or(Outcome::Accept)
        };
        tracing::debug!("Scripted issue_code for {} -> {:?}", mobile_number, outcome);

        self.delay().await;
        outcome.into_result()
    }

    async fn verify_code(&self, mobile_number: &str, code: &str) -> Result<(), ServiceError> {
        let outcome = {
            let mut script = self.lock();
            script.calls.push(ServiceCall::VerifyCode {
                mobile_number: mobile_number.to_string(),
                code: code.to_string(),
            });
            script.verify.pop_front().unwrap_or_else(|| {
                match &self.accepted_code {
                    Some(accepted) if accepted != code => Outcome::Reject(400),
                    _ => Outcome::Accept,
                }
            })
        };
        tracing::debug!("Scripted verify_code for {} -> {:?}", mobile_number, outcome);

        self.delay().await;
        outcome.into_result()
    }
}
