//! # Landing View
//!
//! What a verified user sees: a welcome header and four dashboard cards.

use super::ansi::{styled, BOLD, DIM, FG_GREEN};

pub const WELCOME_TITLE: &str = "Welcome to Your Dashboard";

/// (title, description) of every dashboard card, in display order
pub const DASHBOARD_CARDS: [(&str, &str); 4] = [
    (
        "Profile",
        "Manage your personal information and account settings",
    ),
    ("Activity", "View your recent activity and transactions"),
    ("Settings", "Configure your preferences and notifications"),
    ("Help", "Get support and answers to your questions"),
];

pub(crate) fn lines(mobile_number: &str) -> Vec<String> {
    let mut lines = vec![
        styled(BOLD, WELCOME_TITLE),
        styled(FG_GREEN, &format!("Signed in as {mobile_number}")),
        String::new(),
    ];
    for (title, description) in DASHBOARD_CARDS {
        lines.push(styled(BOLD, title));
        lines.push(format!("  {description}"));
        lines.push(String::new());
    }
    lines.push(styled(DIM, "[L] Logout   [Q] Quit"));
    lines
}
