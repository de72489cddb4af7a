//! # Models Module
//!
//! Re-exports all model implementations organized by category.

pub mod code_buffer;
pub mod cooldown;
pub mod snapshot;

// Re-export all models for easy access
pub use code_buffer::{is_valid_code, CodeInputBuffer, Deletion, DigitInput, CODE_LENGTH};
pub use cooldown::CooldownTimer;
pub use snapshot::AuthSnapshot;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_models_should_create_with_defaults() {
        let buffer = CodeInputBuffer::new();
        let timer = CooldownTimer::new();
        let snapshot = AuthSnapshot::default();

        assert_eq!(buffer.slots(), &snapshot.code);
        assert_eq!(timer.remaining(), snapshot.cooldown_remaining);
    }
}
