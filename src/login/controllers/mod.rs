//! # Controllers
//!
//! [`AuthFlowController`] owns the login state machine; [`AppController`]
//! connects it to a terminal.

pub mod app_controller;
pub mod auth_controller;

pub use app_controller::AppController;
pub use auth_controller::{AuthFlowBuilder, AuthFlowController};
