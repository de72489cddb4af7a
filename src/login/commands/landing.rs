//! # Landing Commands

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::{typed_char, Command, CommandContext, CommandEvent};

/// Log out from the landing view ('l' or Enter)
pub struct LogoutCommand;

impl Command for LogoutCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_logout()
            && (event.code == KeyCode::Enter
                || matches!(typed_char(event), Some('l') | Some('L')))
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::LogoutRequested])
    }

    fn name(&self) -> &'static str {
        "Logout"
    }
}

/// Quit from the landing view ('q')
pub struct LandingQuitCommand;

impl Command for LandingQuitCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_logout() && matches!(typed_char(event), Some('q') | Some('Q'))
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::QuitRequested])
    }

    fn name(&self) -> &'static str {
        "LandingQuit"
    }
}
