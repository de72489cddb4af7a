//! # Core Event Types
//!
//! Common types shared by the event system, the models and the controller:
//! the flow state and the code delivery channel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which step of the login flow is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowState {
    /// Mobile number and channel are editable
    #[default]
    Idle,
    /// Waiting for the service to issue a code
    Dispatching,
    /// Code was sent, digits are being typed
    CodeEntry,
    /// Waiting for the service to verify the code
    Verifying,
    /// Login succeeded, landing view is shown
    Verified,
}

impl FlowState {
    /// True while a network round trip (plus its progress display) is running
    pub fn is_busy(self) -> bool {
        matches!(self, FlowState::Dispatching | FlowState::Verifying)
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Idle => "idle",
            FlowState::Dispatching => "dispatching",
            FlowState::CodeEntry => "code entry",
            FlowState::Verifying => "verifying",
            FlowState::Verified => "verified",
        };
        f.write_str(name)
    }
}

/// How the one-time code is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    #[default]
    Sms,
    WhatsApp,
}

impl DeliveryChannel {
    /// Value sent in the `method` field of the issue-code request
    pub fn wire_value(self) -> &'static str {
        match self {
            DeliveryChannel::Sms => "sms",
            DeliveryChannel::WhatsApp => "whatsapp",
        }
    }

    /// Name shown to the user
    pub fn display_name(self) -> &'static str {
        match self {
            DeliveryChannel::Sms => "SMS",
            DeliveryChannel::WhatsApp => "WhatsApp",
        }
    }

    /// The other channel
    pub fn toggled(self) -> Self {
        match self {
            DeliveryChannel::Sms => DeliveryChannel::WhatsApp,
            DeliveryChannel::WhatsApp => DeliveryChannel::Sms,
        }
    }
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DeliveryChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" => Ok(DeliveryChannel::Sms),
            "whatsapp" => Ok(DeliveryChannel::WhatsApp),
            other => Err(format!(
                "unknown delivery channel '{other}', expected 'sms' or 'whatsapp'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_state_should_default_to_idle() {
        assert_eq!(FlowState::default(), FlowState::Idle);
    }

    #[test]
    fn only_network_states_should_be_busy() {
        assert!(FlowState::Dispatching.is_busy());
        assert!(FlowState::Verifying.is_busy());
        assert!(!FlowState::Idle.is_busy());
        assert!(!FlowState::CodeEntry.is_busy());
        assert!(!FlowState::Verified.is_busy());
    }

    #[test]
    fn delivery_channel_should_default_to_sms() {
        assert_eq!(DeliveryChannel::default(), DeliveryChannel::Sms);
    }

    #[test]
    fn delivery_channel_should_serialize_to_wire_values() {
        assert_eq!(
            serde_json::to_string(&DeliveryChannel::Sms).unwrap(),
            "\"sms\""
        );
        assert_eq!(
            serde_json::to_string(&DeliveryChannel::WhatsApp).unwrap(),
            "\"whatsapp\""
        );
        assert_eq!(DeliveryChannel::WhatsApp.wire_value(), "whatsapp");
    }

    #[test]
    fn delivery_channel_should_parse_case_insensitively() {
        assert_eq!("SMS".parse::<DeliveryChannel>(), Ok(DeliveryChannel::Sms));
        assert_eq!(
            "WhatsApp".parse::<DeliveryChannel>(),
            Ok(DeliveryChannel::WhatsApp)
        );
        assert!("pigeon".parse::<DeliveryChannel>().is_err());
    }

    #[test]
    fn toggled_should_switch_between_channels() {
        assert_eq!(DeliveryChannel::Sms.toggled(), DeliveryChannel::WhatsApp);
        assert_eq!(DeliveryChannel::WhatsApp.toggled(), DeliveryChannel::Sms);
    }
}
