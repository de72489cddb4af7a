//! # Views
//!
//! Everything that turns flow state into terminal output.

pub mod ansi;
pub mod landing;
pub mod screens;
pub mod terminal_renderer;

pub use landing::{DASHBOARD_CARDS, WELCOME_TITLE};
pub use screens::compose;
pub use terminal_renderer::TerminalRenderer;
