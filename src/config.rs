//! Configuration constants and utilities for otpline
//!
//! This module contains the OTP service endpoints, flow timing constants and
//! environment-variable lookups used by the binary and the login flow.

use std::time::Duration;

/// Default OTP service base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Environment variable name for overriding the OTP service base URL
pub const SERVER_URL_ENV_VAR: &str = "OTPLINE_SERVER_URL";

/// Path of the code issuing endpoint, relative to the server URL
pub const SEND_CODE_PATH: &str = "/api/send-otp/";

/// Path of the code verification endpoint, relative to the server URL
pub const VERIFY_CODE_PATH: &str = "/api/verify-otp/";

/// Seconds the user must wait before a code can be resent
pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// Period of one cooldown tick
pub const COOLDOWN_TICK: Duration = Duration::from_secs(1);

/// Percentage added by each progress step
pub const PROGRESS_INCREMENT: u8 = 5;

/// Delay between two progress steps (150ms x 20 steps = 3 seconds)
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(150);

/// Timeout applied to every OTP service request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Code accepted by the built-in service in offline mode
pub const OFFLINE_CODE: &str = "123456";

/// Default log file path
pub const DEFAULT_LOG_PATH: &str = "~/.otpline/otpline.log";

/// Environment variable name for overriding the log file path
pub const LOG_PATH_ENV_VAR: &str = "OTPLINE_LOG_PATH";

/// Environment variable name for enabling logging at a given level
pub const LOG_LEVEL_ENV_VAR: &str = "OTPLINE_LOG_LEVEL";

/// Get the server URL, checking environment variable first, then falling back to default
pub fn get_server_url() -> String {
    std::env::var_os(SERVER_URL_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
}

/// Get the log file path with `~` expanded
pub fn get_log_path() -> String {
    let raw = std::env::var_os(LOG_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string());
    shellexpand::tilde(&raw).into_owned()
}

/// Get the log level requested through the environment, if any
pub fn get_log_level() -> Option<String> {
    std::env::var_os(LOG_LEVEL_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .filter(|level| !level.trim().is_empty())
}

/// Timing knobs handed to the login flow controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    /// Cooldown length applied after every successful dispatch
    pub cooldown_seconds: u32,
    /// Period between two cooldown ticks
    pub cooldown_tick: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            cooldown_seconds: RESEND_COOLDOWN_SECS,
            cooldown_tick: COOLDOWN_TICK,
        }
    }
}
