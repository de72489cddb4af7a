//! # Command Events
//!
//! What a key press asks for. Commands only describe the request; the app
//! controller decides how to carry it out against the flow.

use crate::login::events::DeliveryChannel;

/// Requests produced by commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Replace the mobile number text
    NumberChanged { text: String },

    /// Switch the delivery channel
    ChannelSelected { channel: DeliveryChannel },

    /// Send a code to the number being edited
    CodeRequested,

    /// Write `digit` into `slot`
    DigitEntered { slot: usize, digit: String },

    /// Backspace on `slot`
    DigitDeleted { slot: usize },

    /// Move the code cursor without editing
    FocusMoved { slot: usize },

    /// Verify the typed code
    CodeSubmitted,

    /// Send a fresh code once the cooldown allows it
    ResendRequested,

    /// Go back to editing the number
    ChangeNumberRequested,

    /// Leave the landing view
    LogoutRequested,

    /// Exit the application
    QuitRequested,
}
