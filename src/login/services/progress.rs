//! # Progress Simulator
//!
//! Produces the percentage shown while a request is "in progress". The real
//! response has already arrived when the simulator starts, so this is purely a
//! pacing device. The step plan comes from a [`ProgressStrategy`] so the delay
//! can be turned off without touching the flow.

use crate::config::{PROGRESS_INCREMENT, PROGRESS_INTERVAL};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};

/// One step of the progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    /// Wait before showing this step
    pub delay: Duration,
    /// Percentage reached at this step
    pub percent: u8,
}

/// Plans the steps from 0 to 100 percent
pub trait ProgressStrategy: Send + Sync {
    /// Steps in order; the last one must reach 100
    fn steps(&self) -> Vec<ProgressStep>;
}

/// Fixed increment at a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteppedProgress {
    increment: u8,
    interval: Duration,
}

impl SteppedProgress {
    pub fn new(increment: u8, interval: Duration) -> Self {
        Self {
            increment: increment.clamp(1, 100),
            interval,
        }
    }
}

impl Default for SteppedProgress {
    fn default() -> Self {
        Self::new(PROGRESS_INCREMENT, PROGRESS_INTERVAL)
    }
}

impl ProgressStrategy for SteppedProgress {
    fn steps(&self) -> Vec<ProgressStep> {
        let mut steps = Vec::new();
        let mut percent = 0u8;
        while percent < 100 {
            percent = percent.saturating_add(self.increment).min(100);
            steps.push(ProgressStep {
                delay: self.interval,
                percent,
            });
        }
        steps
    }
}

/// Jumps straight to 100 percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstantProgress;

impl ProgressStrategy for InstantProgress {
    fn steps(&self) -> Vec<ProgressStep> {
        vec![ProgressStep {
            delay: Duration::ZERO,
            percent: 100,
        }]
    }
}

/// Runs a [`ProgressStrategy`] on a spawned task
#[derive(Clone)]
pub struct ProgressSimulator {
    strategy: Arc<dyn ProgressStrategy>,
}

impl ProgressSimulator {
    pub fn new(strategy: Arc<dyn ProgressStrategy>) -> Self {
        Self { strategy }
    }

    /// Simulator without any delay
    pub fn instant() -> Self {
        Self::new(Arc::new(InstantProgress))
    }

    /// Start stepping. `on_step` sees every percentage in order and
    /// `on_complete` runs once after 100 is reached, unless the task is
    /// cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<S, C>(&self, mut on_step: S, on_complete: C) -> ProgressTask
    where
        S: FnMut(u8) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let steps = self.strategy.steps();
        tracing::debug!("Starting progress simulation with {} steps", steps.len());

        let handle = tokio::spawn(async move {
            for step in steps {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                on_step(step.percent);
            }
            on_complete();
        });

        ProgressTask { handle }
    }
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new(Arc::new(SteppedProgress::default()))
    }
}

impl std::fmt::Debug for ProgressSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSimulator")
            .field("steps", &self.strategy.steps().len())
            .finish()
    }
}

/// Handle to a running simulation
#[derive(Debug)]
pub struct ProgressTask {
    handle: JoinHandle<()>,
}

impl ProgressTask {
    /// Stop stepping without running the completion callback
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Handle that can cancel the task from elsewhere
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    /// Wait for the task; true if it ran to completion
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                tracing::error!("Progress task failed: {e}");
                false
            }
        }
    }
}
