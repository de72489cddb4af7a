//! # Cooldown Timer Model
//!
//! Countdown that gates the resend action. This is only the counter; the
//! periodic schedule that drives [`CooldownTimer::tick`] is owned by the flow
//! controller so it can be torn down when the flow leaves code entry.

/// Seconds-remaining counter for the resend cooldown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownTimer {
    remaining: u32,
    active: bool,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the counter to `seconds` and mark the countdown active
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.active = seconds > 0;
    }

    /// Count down one second, never below zero. Returns the new value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
        }
        self.remaining
    }

    /// Halt the countdown, keeping the current value
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Continue a stopped countdown if any time is left
    pub fn resume(&mut self) {
        self.active = self.remaining > 0;
    }

    /// Halt the countdown and drop the remaining time
    pub fn clear(&mut self) {
        self.remaining = 0;
        self.active = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True while there is time left to count down
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_resend_allowed(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_should_allow_resend() {
        let timer = CooldownTimer::new();
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_active());
        assert!(timer.is_resend_allowed());
    }

    #[test]
    fn start_should_activate_and_block_resend() {
        let mut timer = CooldownTimer::new();
        timer.start(60);
        assert_eq!(timer.remaining(), 60);
        assert!(timer.is_active());
        assert!(!timer.is_resend_allowed());
    }

    #[test]
    fn sixty_ticks_should_reach_zero_and_stay_there() {
        let mut timer = CooldownTimer::new();
        timer.start(60);

        for expected in (0..60).rev() {
            assert_eq!(timer.tick(), expected);
        }
        assert_eq!(timer.remaining(), 0);
        assert!(timer.is_resend_allowed());
        assert!(!timer.is_active());

        for _ in 0..5 {
            assert_eq!(timer.tick(), 0);
        }
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn start_with_zero_should_be_inactive() {
        let mut timer = CooldownTimer::new();
        timer.start(0);
        assert!(!timer.is_active());
        assert!(timer.is_resend_allowed());
    }

    #[test]
    fn stop_should_keep_remaining_time() {
        let mut timer = CooldownTimer::new();
        timer.start(60);
        timer.tick();
        timer.stop();
        assert_eq!(timer.remaining(), 59);
        assert!(!timer.is_active());
        assert!(!timer.is_resend_allowed());

        timer.resume();
        assert!(timer.is_active());
        assert_eq!(timer.tick(), 58);
    }

    #[test]
    fn resume_without_time_left_should_stay_inactive() {
        let mut timer = CooldownTimer::new();
        timer.resume();
        assert!(!timer.is_active());
    }

    #[test]
    fn clear_should_drop_remaining_time() {
        let mut timer = CooldownTimer::new();
        timer.start(60);
        timer.clear();
        assert_eq!(timer, CooldownTimer::new());
    }

    #[test]
    fn restart_should_reset_counter() {
        let mut timer = CooldownTimer::new();
        timer.start(3);
        timer.tick();
        timer.tick();
        timer.start(60);
        assert_eq!(timer.remaining(), 60);
        assert!(timer.is_active());
    }
}
