//! # Code Entry Commands
//!
//! Key bindings while a code is pending. Digits go to the focused slot;
//! the flow decides what is accepted and where focus moves next.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{typed_char, Command, CommandContext, CommandEvent};
use crate::login::models::CODE_LENGTH;

/// Type into the focused slot
pub struct DigitInsertCommand;

impl Command for DigitInsertCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_edit_code() && typed_char(event).is_some()
    }

    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let Some(ch) = typed_char(&event) else {
            return Ok(vec![]);
        };
        Ok(vec![CommandEvent::DigitEntered {
            slot: context.focused_slot,
            digit: ch.to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "DigitInsert"
    }
}

/// Backspace in the focused slot
pub struct DigitDeleteCommand;

impl Command for DigitDeleteCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_edit_code() && event.code == KeyCode::Backspace
    }

    fn execute(&self, _event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::DigitDeleted {
            slot: context.focused_slot,
        }])
    }

    fn name(&self) -> &'static str {
        "DigitDelete"
    }
}

/// Move between slots with the arrow keys
pub struct FocusMoveCommand;

impl Command for FocusMoveCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_edit_code()
            && matches!(
                event.code,
                KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End
            )
    }

    fn execute(&self, event: KeyEvent, context: &CommandContext) -> Result<Vec<CommandEvent>> {
        let current = context.focused_slot;
        let slot = match event.code {
            KeyCode::Left => current.saturating_sub(1),
            KeyCode::Right => (current + 1).min(CODE_LENGTH - 1),
            KeyCode::Home => 0,
            _ => CODE_LENGTH - 1,
        };
        if slot == current {
            return Ok(vec![]);
        }
        Ok(vec![CommandEvent::FocusMoved { slot }])
    }

    fn name(&self) -> &'static str {
        "FocusMove"
    }
}

/// Verify the typed code (Enter)
pub struct SubmitCodeCommand;

impl Command for SubmitCodeCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_submit_code() && event.code == KeyCode::Enter
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::CodeSubmitted])
    }

    fn name(&self) -> &'static str {
        "SubmitCode"
    }
}

/// Resend the code (Ctrl+R), only once the cooldown has run out
pub struct ResendCodeCommand;

impl Command for ResendCodeCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_resend()
            && event.code == KeyCode::Char('r')
            && event.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::ResendRequested])
    }

    fn name(&self) -> &'static str {
        "ResendCode"
    }
}

/// Go back to the number form (Esc or Ctrl+N)
pub struct ChangeNumberCommand;

impl Command for ChangeNumberCommand {
    fn is_relevant(&self, context: &CommandContext, event: &KeyEvent) -> bool {
        context.state.can_change_number()
            && (event.code == KeyCode::Esc
                || (event.code == KeyCode::Char('n')
                    && event.modifiers.contains(KeyModifiers::CONTROL)))
    }

    fn execute(&self, _event: KeyEvent, _context: &CommandContext) -> Result<Vec<CommandEvent>> {
        Ok(vec![CommandEvent::ChangeNumberRequested])
    }

    fn name(&self) -> &'static str {
        "ChangeNumber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::commands::testing::{context_in, ctrl, key};
    use crate::login::events::FlowState;

    fn code_entry_at(slot: usize) -> CommandContext {
        let mut context = context_in(FlowState::CodeEntry);
        context.focused_slot = slot;
        context
    }

    #[test]
    fn digit_insert_should_target_focused_slot() {
        let context = code_entry_at(3);
        let event = key(KeyCode::Char('7'));

        assert!(DigitInsertCommand.is_relevant(&context, &event));
        assert_eq!(
            DigitInsertCommand.execute(event, &context).unwrap(),
            vec![CommandEvent::DigitEntered {
                slot: 3,
                digit: "7".to_string()
            }]
        );
    }

    #[test]
    fn digit_insert_should_pass_non_digits_through_for_rejection() {
        let context = code_entry_at(0);
        assert!(DigitInsertCommand.is_relevant(&context, &key(KeyCode::Char('a'))));
    }

    #[test]
    fn digit_insert_should_not_apply_while_verifying() {
        assert!(!DigitInsertCommand
            .is_relevant(&context_in(FlowState::Verifying), &key(KeyCode::Char('1'))));
    }

    #[test]
    fn digit_delete_should_target_focused_slot() {
        assert_eq!(
            DigitDeleteCommand
                .execute(key(KeyCode::Backspace), &code_entry_at(4))
                .unwrap(),
            vec![CommandEvent::DigitDeleted { slot: 4 }]
        );
    }

    #[test]
    fn focus_move_should_stay_within_slots() {
        assert_eq!(
            FocusMoveCommand
                .execute(key(KeyCode::Right), &code_entry_at(2))
                .unwrap(),
            vec![CommandEvent::FocusMoved { slot: 3 }]
        );
        assert!(FocusMoveCommand
            .execute(key(KeyCode::Right), &code_entry_at(5))
            .unwrap()
            .is_empty());
        assert!(FocusMoveCommand
            .execute(key(KeyCode::Left), &code_entry_at(0))
            .unwrap()
            .is_empty());
        assert_eq!(
            FocusMoveCommand
                .execute(key(KeyCode::Home), &code_entry_at(4))
                .unwrap(),
            vec![CommandEvent::FocusMoved { slot: 0 }]
        );
    }

    #[test]
    fn resend_should_only_be_relevant_after_cooldown() {
        let mut context = code_entry_at(0);
        assert!(ResendCodeCommand.is_relevant(&context, &ctrl('r')));

        context.state.resend_allowed = false;
        context.state.cooldown_remaining = 42;
        assert!(!ResendCodeCommand.is_relevant(&context, &ctrl('r')));
    }

    #[test]
    fn change_number_should_respond_to_escape_and_ctrl_n() {
        let context = code_entry_at(0);
        assert!(ChangeNumberCommand.is_relevant(&context, &key(KeyCode::Esc)));
        assert!(ChangeNumberCommand.is_relevant(&context, &ctrl('n')));
        assert!(!ChangeNumberCommand.is_relevant(&context_in(FlowState::Idle), &key(KeyCode::Esc)));
    }

    #[test]
    fn submit_should_fire_on_enter_in_code_entry() {
        assert!(SubmitCodeCommand.is_relevant(&code_entry_at(0), &key(KeyCode::Enter)));
        assert!(!SubmitCodeCommand.is_relevant(&context_in(FlowState::Idle), &key(KeyCode::Enter)));
    }
}
