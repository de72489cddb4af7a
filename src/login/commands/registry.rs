//! # Command Registry
//!
//! Holds every key command and dispatches a key event to the first one that
//! reports itself relevant.

use anyhow::Result;
use crossterm::event::KeyEvent;
use std::sync::Arc;

use super::{
    AppTerminateCommand, ChangeNumberCommand, ChannelToggleCommand, Command, CommandContext,
    CommandEvent, DigitDeleteCommand, DigitInsertCommand, FocusMoveCommand, LandingQuitCommand,
    LogoutCommand, NumberBackspaceCommand, NumberInsertCommand, RequestCodeCommand,
    ResendCodeCommand, SubmitCodeCommand,
};

type CommandArc = Arc<dyn Command>;

/// Ordered list of commands
pub struct CommandRegistry {
    commands: Vec<CommandArc>,
}

impl CommandRegistry {
    /// Registry with the default key bindings
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Chords first so they never reach the text inputs
        registry.add_command(Arc::new(AppTerminateCommand));
        registry.add_command(Arc::new(ResendCodeCommand));
        registry.add_command(Arc::new(ChangeNumberCommand));

        registry.add_command(Arc::new(ChannelToggleCommand));
        registry.add_command(Arc::new(RequestCodeCommand));
        registry.add_command(Arc::new(NumberBackspaceCommand));
        registry.add_command(Arc::new(NumberInsertCommand));

        registry.add_command(Arc::new(SubmitCodeCommand));
        registry.add_command(Arc::new(FocusMoveCommand));
        registry.add_command(Arc::new(DigitDeleteCommand));

        // Landing keys before the generic digit input
        registry.add_command(Arc::new(LogoutCommand));
        registry.add_command(Arc::new(LandingQuitCommand));
        registry.add_command(Arc::new(DigitInsertCommand));

        registry
    }

    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: CommandArc) {
        self.commands.push(command);
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Events from the first relevant command, or none
    pub fn process_event(
        &self,
        event: KeyEvent,
        context: &CommandContext,
    ) -> Result<Vec<CommandEvent>> {
        for command in &self.commands {
            if command.is_relevant(context, &event) {
                tracing::debug!(
                    "Command {} handles {:?} while {}",
                    command.name(),
                    event.code,
                    context.state.flow
                );
                return command.execute(event, context);
            }
        }

        tracing::trace!("No command for {:?} while {}", event.code, context.state.flow);
        Ok(vec![])
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::commands::testing::{context_in, ctrl, key};
    use crate::login::events::FlowState;
    use crossterm::event::KeyCode;

    #[test]
    fn registry_should_route_keys_by_flow_state() {
        let registry = CommandRegistry::new();

        assert_eq!(
            registry
                .process_event(key(KeyCode::Enter), &context_in(FlowState::Idle))
                .unwrap(),
            vec![CommandEvent::CodeRequested]
        );
        assert_eq!(
            registry
                .process_event(key(KeyCode::Enter), &context_in(FlowState::CodeEntry))
                .unwrap(),
            vec![CommandEvent::CodeSubmitted]
        );
        assert_eq!(
            registry
                .process_event(key(KeyCode::Enter), &context_in(FlowState::Verified))
                .unwrap(),
            vec![CommandEvent::LogoutRequested]
        );
    }

    #[test]
    fn registry_should_ignore_input_while_busy() {
        let registry = CommandRegistry::new();
        for flow in [FlowState::Dispatching, FlowState::Verifying] {
            let context = context_in(flow);
            assert!(registry
                .process_event(key(KeyCode::Char('1')), &context)
                .unwrap()
                .is_empty());
            assert!(registry
                .process_event(key(KeyCode::Enter), &context)
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn registry_should_quit_on_ctrl_c_before_text_input() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry
                .process_event(ctrl('c'), &context_in(FlowState::CodeEntry))
                .unwrap(),
            vec![CommandEvent::QuitRequested]
        );
    }

    #[test]
    fn empty_registry_should_produce_nothing() {
        let registry = CommandRegistry::empty();
        assert_eq!(registry.command_count(), 0);
        assert!(registry
            .process_event(key(KeyCode::Enter), &context_in(FlowState::Idle))
            .unwrap()
            .is_empty());
    }
}
