//! # Code Input Buffer
//!
//! Fixed-length buffer for the one-time code as it is typed, one digit per
//! slot. Instead of moving focus itself, every edit reports where focus should
//! go next so any front end can honour it with its own focus API.

/// Number of digits in a one-time code
pub const CODE_LENGTH: usize = 6;

/// Result of writing into a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitInput {
    /// Slot was updated; `focus` names the slot that should receive focus next
    Accepted { focus: Option<usize> },
    /// Input was not a digit or the index was out of range; nothing changed
    Rejected,
}

/// Result of a backspace on a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The slot's own content was cleared (or it was already empty at slot 0)
    Cleared,
    /// The slot was already empty, focus should retreat to `focus`
    MoveFocus { focus: usize },
    /// Index out of range; nothing changed
    Ignored,
}

/// Six single-digit slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeInputBuffer {
    slots: [Option<char>; CODE_LENGTH],
}

impl CodeInputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the first character of `raw` into slot `index`.
    ///
    /// An empty `raw` clears the slot. A non-digit leaves the buffer untouched.
    /// A digit written below the last slot asks for focus on the next slot.
    pub fn set_digit(&mut self, index: usize, raw: &str) -> DigitInput {
        if index >= CODE_LENGTH {
            tracing::warn!("Ignoring code input for out-of-range slot {}", index);
            return DigitInput::Rejected;
        }

        match raw.chars().next() {
            None => {
                self.slots[index] = None;
                DigitInput::Accepted { focus: None }
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.slots[index] = Some(ch);
                let focus = (index + 1 < CODE_LENGTH).then_some(index + 1);
                DigitInput::Accepted { focus }
            }
            Some(ch) => {
                tracing::debug!("Rejected non-digit '{}' for slot {}", ch, index);
                DigitInput::Rejected
            }
        }
    }

    /// Handle a backspace on slot `index`
    pub fn handle_deletion(&mut self, index: usize) -> Deletion {
        if index >= CODE_LENGTH {
            return Deletion::Ignored;
        }

        if self.slots[index].is_none() && index > 0 {
            Deletion::MoveFocus { focus: index - 1 }
        } else {
            self.slots[index] = None;
            Deletion::Cleared
        }
    }

    /// True when no slot is empty
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The typed code, only once every slot holds a digit
    pub fn value(&self) -> Option<String> {
        if self.is_complete() {
            Some(self.slots.iter().flatten().collect())
        } else {
            None
        }
    }

    pub fn slots(&self) -> &[Option<char>; CODE_LENGTH] {
        &self.slots
    }

    /// Number of filled slots
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn reset(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }
}

/// True when `code` is exactly [`CODE_LENGTH`] ASCII digits
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|ch| ch.is_ascii_digit())
}
