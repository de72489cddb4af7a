//! # Auth Snapshot
//!
//! Immutable picture of the login flow, published after every change so a
//! presentation layer can render without reaching into the controller.

use crate::login::events::{DeliveryChannel, FlowState};
use crate::login::models::code_buffer::CODE_LENGTH;

/// Read-only state of the login flow at one instant
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub flow: FlowState,
    pub mobile_number: String,
    pub channel: DeliveryChannel,
    pub code: [Option<char>; CODE_LENGTH],
    /// Last focus request emitted for the code input slots
    pub focus: Option<usize>,
    pub cooldown_remaining: u32,
    pub resend_allowed: bool,
    /// Decorative progress, present only while dispatching or verifying
    pub progress: Option<u8>,
    pub error: Option<String>,
}

impl AuthSnapshot {
    pub fn is_busy(&self) -> bool {
        self.flow.is_busy()
    }

    pub fn can_edit_number(&self) -> bool {
        self.flow == FlowState::Idle
    }

    pub fn can_select_channel(&self) -> bool {
        self.flow == FlowState::Idle
    }

    pub fn can_request_code(&self) -> bool {
        self.flow == FlowState::Idle
    }

    pub fn can_edit_code(&self) -> bool {
        self.flow == FlowState::CodeEntry
    }

    pub fn can_submit_code(&self) -> bool {
        self.flow == FlowState::CodeEntry
    }

    pub fn can_resend(&self) -> bool {
        self.flow == FlowState::CodeEntry && self.resend_allowed
    }

    pub fn can_change_number(&self) -> bool {
        self.flow == FlowState::CodeEntry
    }

    pub fn can_logout(&self) -> bool {
        self.flow == FlowState::Verified
    }

    /// The typed code, once every slot is filled
    pub fn code_value(&self) -> Option<String> {
        if self.code.iter().all(Option::is_some) {
            Some(self.code.iter().flatten().collect())
        } else {
            None
        }
    }

    /// Message shown under the progress bar
    pub fn loading_message(&self) -> Option<&'static str> {
        match self.flow {
            FlowState::Dispatching => Some("Sending verification code..."),
            FlowState::Verifying => Some("Verifying your OTP..."),
            _ => None,
        }
    }
}
