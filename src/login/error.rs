//! # Login Errors
//!
//! Error taxonomy of the login flow. Only validation and service failures
//! carry a user-visible message; state rejections are silent no-ops for the UI.

use crate::login::events::FlowState;
use thiserror::Error;

/// Input problems detected locally, before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("mobile number required")]
    MobileNumberRequired,
    #[error("incomplete code")]
    IncompleteCode,
    #[error("mobile number is locked while a code is pending")]
    NumberLocked,
}

impl ValidationError {
    /// Message shown to the user
    pub fn user_message(self) -> &'static str {
        match self {
            ValidationError::MobileNumberRequired => "Please enter your mobile number",
            ValidationError::IncompleteCode => "Please enter the complete 6-digit OTP",
            ValidationError::NumberLocked => {
                "Mobile number cannot change while a code is pending"
            }
        }
    }
}

/// Failures reported by a remote auth service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service rejected the request with status {status}{}", detail(.message))]
    Rejected { status: u16, message: Option<String> },
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Errors returned by flow operations
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to dispatch code")]
    DispatchFailed(#[source] ServiceError),
    #[error("failed to verify code")]
    VerificationFailed(#[source] ServiceError),
    #[error("{operation} is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: FlowState,
    },
    #[error("resend is blocked for another {remaining}s")]
    ResendCooldown { remaining: u32 },
    #[error("operation was cancelled by teardown")]
    Cancelled,
}

/// Shown when the service does not issue a code
pub const DISPATCH_FAILURE_MESSAGE: &str = "Failed to send OTP. Please try again.";

/// Shown when the service does not accept the code
pub const VERIFICATION_FAILURE_MESSAGE: &str = "Invalid OTP. Please try again.";

impl AuthError {
    /// Message for the error banner, if this error should surface one
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            AuthError::Validation(err) => Some(err.user_message()),
            AuthError::DispatchFailed(_) => Some(DISPATCH_FAILURE_MESSAGE),
            AuthError::VerificationFailed(_) => Some(VERIFICATION_FAILURE_MESSAGE),
            AuthError::InvalidState { .. }
            | AuthError::ResendCooldown { .. }
            | AuthError::Cancelled => None,
        }
    }
}
