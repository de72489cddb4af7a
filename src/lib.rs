//! # otpline - Mobile Number OTP Login for the Terminal
//!
//! Sign in with a mobile number and a six digit one-time code delivered by SMS
//! or WhatsApp.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  snapshots   ┌────────────────────┐   async   ┌───────────────────┐
//! │    Views    │◄─────────────│ AuthFlowController │──────────▶│ RemoteAuthService │
//! │             │              │                    │           │                   │
//! │ - Screens   │              │ - State machine    │           │ - HTTP            │
//! │ - Renderer  │              │ - Cooldown task    │           │ - Scripted        │
//! └─────────────┘              │ - Progress task    │           └───────────────────┘
//!                              └────────────────────┘
//!                                        ▲
//!                                        │ CommandEvents
//!                                        │
//!                               ┌─────────────────┐
//!                               │  AppController  │
//!                               │                 │
//!                               │ - Key commands  │
//!                               │ - Event loop    │
//!                               └─────────────────┘
//! ```
//!
//! The flow controller can be driven without the terminal layer; every
//! operation is an ordinary method and every state change is published as an
//! [`AuthSnapshot`].

pub mod cmd_args;
pub mod config;
pub mod logging;
pub mod login;

// Re-export main types for easy access
pub use login::*;
