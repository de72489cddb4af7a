//! # Number Entry Commands
//!
//! Key bindings while the flow is idle: editing the mobile number, choosing
//! the delivery channel and asking for a code.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{typed_char, Command, CommandContext, CommandEvent};

/// Append a typed character to the mobile number
pub struct NumberInsertCommand;

impl Command for NumberInsertCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_edit_number() && typed_char(event).is_some_and(|ch| !ch.is_control())
    }

    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let Some(ch) = typed_char(&event) else {
            return Ok(vec![]);
        };
        let mut text = context.state.mobile_number.clone();
        text.push(ch);
        Ok(vec![CommandEvent::NumberChanged { text }])
    }

    fn name(&self) -> &'static str {
        "NumberInsert"
    }
}

/// Remove the last character of the mobile number
pub struct NumberBackspaceCommand;

impl Command for NumberBackspaceCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_edit_number() && event.code == KeyCode::Backspace
    }

    fn execute(&self, _event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let mut text = context.state.mobile_number.clone();
        if text.pop().is_none() {
            return Ok(vec![]);
        }
        Ok(vec![CommandEvent::NumberChanged { text }])
    }

    fn name(&self) -> &'static str {
        "NumberBackspace"
    }
}

/// Flip between SMS and WhatsApp (Tab or arrow keys)
pub struct ChannelToggleCommand;

impl Command for ChannelToggleCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_select_channel()
            && matches!(
                event.code,
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right
            )
    }

    fn execute(&self, _event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::ChannelSelected {
            channel: context.state.channel.toggled(),
        }])
    }

    fn name(&self) -> &'static str {
        "ChannelToggle"
    }
}

/// Ask for a code (Enter)
pub struct RequestCodeCommand;

impl Command for RequestCodeCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_request_code() && event.code == KeyCode::Enter
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::CodeRequested])
    }

    fn name(&self) -> &'static str {
        "RequestCode"
    }
}
