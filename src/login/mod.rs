//! # Login Flow
//!
//! Mobile-number login with a one-time code, organised the same way as the
//! rest of the crate: models and events at the bottom, services behind traits,
//! controllers on top, and a terminal front end built from commands and views.

pub mod commands;
pub mod controllers;
pub mod error;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod views;

pub use controllers::{AppController, AuthFlowBuilder, AuthFlowController};
pub use error::{AuthError, ServiceError, ValidationError};
pub use events::{AuthEvent, DeliveryChannel, FlowState};
pub use models::{AuthSnapshot, CodeInputBuffer, CooldownTimer, CODE_LENGTH};
pub use services::{
    HttpAuthService, ProgressSimulator, RemoteAuthService, ScriptedAuthService,
};
