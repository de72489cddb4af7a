//! # Screen Composition
//!
//! Turns an [`AuthSnapshot`] into the lines of one frame. Pure functions, so
//! the screens can be tested without a terminal.

use super::ansi::{styled, BOLD, DIM, FG_CYAN, FG_RED, REVERSE};
use super::landing;
use crate::login::events::{DeliveryChannel, FlowState};
use crate::login::models::AuthSnapshot;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Lines of the frame for `snapshot`, with the code cursor on `focused_slot`
pub fn compose(snapshot: &AuthSnapshot, focused_slot: usize) -> Vec<String> {
    match snapshot.flow {
        FlowState::Idle => number_form(snapshot),
        FlowState::Dispatching | FlowState::Verifying => loading(snapshot),
        FlowState::CodeEntry => code_form(snapshot, focused_slot),
        FlowState::Verified => landing::lines(&snapshot.mobile_number),
    }
}

fn error_line(snapshot: &AuthSnapshot, lines: &mut Vec<String>) {
    if let Some(error) = &snapshot.error {
        lines.push(styled(FG_RED, error));
        lines.push(String::new());
    }
}

fn number_form(snapshot: &AuthSnapshot) -> Vec<String> {
    let mut lines = vec![styled(BOLD, "Login"), String::new()];
    error_line(snapshot, &mut lines);

    let number = if snapshot.mobile_number.is_empty() {
        styled(DIM, "Enter your mobile number")
    } else {
        snapshot.mobile_number.clone()
    };
    lines.push(format!("Mobile number: {number}"));
    lines.push(String::new());
    lines.push("Receive OTP via:".to_string());
    lines.push(format!(
        "  {}   {}",
        channel_option(DeliveryChannel::Sms, snapshot.channel),
        channel_option(DeliveryChannel::WhatsApp, snapshot.channel)
    ));
    lines.push(String::new());
    lines.push(styled(
        DIM,
        "[Enter] Send OTP   [Tab] Switch channel   [Ctrl+C] Quit",
    ));
    lines
}

fn channel_option(channel: DeliveryChannel, selected: DeliveryChannel) -> String {
    if channel == selected {
        styled(REVERSE, &format!("(*) {}", channel.display_name()))
    } else {
        format!("( ) {}", channel.display_name())
    }
}

fn loading(snapshot: &AuthSnapshot) -> Vec<String> {
    let percent = snapshot.progress.unwrap_or(0).min(100);
    let filled = usize::from(percent) * PROGRESS_BAR_WIDTH / 100;
    let bar = format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled)
    );

    vec![
        styled(FG_CYAN, &bar),
        format!("{percent}% Complete"),
        snapshot.loading_message().unwrap_or_default().to_string(),
    ]
}

fn code_form(snapshot: &AuthSnapshot, focused_slot: usize) -> Vec<String> {
    let mut lines = vec![styled(BOLD, "OTP Verification"), String::new()];
    error_line(snapshot, &mut lines);

    lines.push(format!(
        "Verification code has been sent to {} via {}",
        snapshot.mobile_number,
        snapshot.channel.display_name()
    ));
    lines.push(String::new());

    let slots: Vec<String> = snapshot
        .code
        .iter()
        .enumerate()
        .map(|(index, digit)| {
            let cell = format!("[{}]", digit.unwrap_or('_'));
            if index == focused_slot {
                styled(REVERSE, &cell)
            } else {
                cell
            }
        })
        .collect();
    lines.push(slots.join(" "));
    lines.push(String::new());

    if snapshot.resend_allowed {
        lines.push("Didn't receive the OTP? [Ctrl+R] Resend OTP".to_string());
    } else {
        lines.push(format!("Resend OTP in {}s", snapshot.cooldown_remaining));
    }
    lines.push(String::new());
    lines.push(styled(
        DIM,
        "[Enter] Verify OTP   [Esc] Change number   [Ctrl+C] Quit",
    ));
    lines
}
