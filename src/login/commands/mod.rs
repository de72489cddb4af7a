//! # Key Commands
//!
//! Each command recognises the key presses it cares about in the current flow
//! state and turns them into [`CommandEvent`]s. The [`CommandRegistry`] asks
//! every command in turn and runs the first relevant one.
//!
//! Commands never touch the flow directly, so they can be tested with nothing
//! more than a snapshot and a key event.

use anyhow::Result;
use crossterm::event::KeyEvent;

use crate::login::models::AuthSnapshot;

pub mod app;
pub mod code;
pub mod events;
pub mod landing;
pub mod number;
pub mod registry;

pub use app::AppTerminateCommand;
pub use code::{
    ChangeNumberCommand, DigitDeleteCommand, DigitInsertCommand, FocusMoveCommand,
    ResendCodeCommand, SubmitCodeCommand,
};
pub use events::CommandEvent;
pub use landing::{LandingQuitCommand, LogoutCommand};
pub use number::{
    ChannelToggleCommand, NumberBackspaceCommand, NumberInsertCommand, RequestCodeCommand,
};
pub use registry::CommandRegistry;

/// State a command can look at while deciding what a key means
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub state: AuthSnapshot,
    /// Code slot the cursor is on
    pub focused_slot: usize,
}

impl CommandContext {
    pub fn new(state: AuthSnapshot, focused_slot: usize) -> Self {
        Self {
            state,
            focused_slot,
        }
    }
}

/// A key binding in the login UI
pub trait Command: Send + Sync {
    /// Whether this command handles `event` in the current state
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool;

    /// Produce the events for `event`. Only called when relevant.
    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>>;

    /// Name for logging
    fn name(&self) -> &'static str;
}

/// Plain character typed without Ctrl or Alt
pub(crate) fn typed_char(event: &KeyEvent) -> Option<char> {
    use crossterm::event::{KeyCode, KeyModifiers};

    match event.code {
        KeyCode::Char(ch)
            if !event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(ch)
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::CommandContext;
    use crate::login::events::FlowState;
    use crate::login::models::AuthSnapshot;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn context_in(flow: FlowState) -> CommandContext {
        CommandContext::new(
            AuthSnapshot {
                flow,
                resend_allowed: true,
                ..AuthSnapshot::default()
            },
            0,
        )
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }
}
