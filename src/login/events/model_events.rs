//! # Model Events
//!
//! Discrete events emitted by the login flow when its state changes.
//! Snapshots describe *what is*; these events describe *what just happened*,
//! which is what one-shot signals such as focus requests need.

use super::types::FlowState;

/// Events emitted by the flow controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Flow moved from one state to another
    FlowChanged { from: FlowState, to: FlowState },

    /// The code input slot at `slot` should receive input focus
    FocusRequested { slot: usize },

    /// Decorative progress advanced
    ProgressAdvanced { percent: u8 },

    /// Resend cooldown counted down one step
    CooldownTicked { remaining: u32 },

    /// A user-visible error was raised
    ErrorRaised { message: String },
}
