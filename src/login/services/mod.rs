//! # Services Layer
//!
//! Services the flow controller depends on: the remote auth service seam with
//! its HTTP and scripted implementations, and the progress simulator.
//!
//! Services should only exist when they add real value by:
//! - Managing their own state (like the progress task)
//! - Abstracting external resources (like the OTP service)

pub mod http;
pub mod progress;
pub mod remote;
pub mod scripted;

// Re-export service types
pub use http::HttpAuthService;
pub use progress::{
    InstantProgress, ProgressSimulator, ProgressStep, ProgressStrategy, ProgressTask,
    SteppedProgress,
};
pub use remote::RemoteAuthService;
pub use scripted::{Outcome, ScriptedAuthService, ServiceCall};

use crate::config::OFFLINE_CODE;
use anyhow::Result;
use std::sync::Arc;

/// The service the binary talks to: the OTP server at `server_url`, or the
/// built-in one accepting [`OFFLINE_CODE`] when `offline` is set
pub fn auth_service(offline: bool, server_url: &str) -> Result<Arc<dyn RemoteAuthService>> {
    if offline {
        tracing::info!("Offline mode, the code is {}", OFFLINE_CODE);
        return Ok(Arc::new(ScriptedAuthService::accepting_code(OFFLINE_CODE)));
    }
    Ok(Arc::new(HttpAuthService::new(server_url)?))
}
