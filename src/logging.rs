//! File logging for the binary.
//!
//! The terminal UI owns stdout, so log records go to a file. Logging stays off
//! unless a level is requested.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

/// Crates whose chatter is capped at warn regardless of the requested level
const QUIET_TARGETS: [&str; 6] = ["reqwest", "hyper", "hyper_util", "rustls", "tokio", "mio"];

/// Filter for `level`, with the noisy dependencies held at warn
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"))?;
    for target in QUIET_TARGETS {
        filter = filter.add_directive(format!("{target}=warn").parse()?);
    }
    Ok(filter)
}

/// Install the global subscriber writing to `path`
pub fn init_logging(level: &str, path: &str) -> Result<()> {
    let filter = build_filter(level)?;

    let path = Path::new(path);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::info!("Logging to {} at level {}", path.display(), level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_should_accept_levels_and_directives() {
        assert!(build_filter("debug").is_ok());
        assert!(build_filter("otpline=trace,warn").is_ok());
    }

    #[test]
    fn build_filter_should_reject_garbage() {
        let err = build_filter("otpline=loud").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn init_logging_should_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("otpline.log");
        let path = path.to_str().unwrap();

        init_logging("info", path).unwrap();
        tracing::info!("hello from the log test");

        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("hello from the log test"));
    }
}
