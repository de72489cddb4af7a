//! # Auth Flow Controller
//!
//! Finite state machine for the mobile-number login:
//!
//! ```text
//!            request_code              progress done
//!   Idle ───────────────▶ Dispatching ─────────────▶ CodeEntry ◀──┐
//!    ▲  ◀─── failure ───────┘                        │  │  │      │ failure
//!    │                          change_number        │  │  └──────┤
//!    ├───────────────────────────────────────────────┘  │ submit  │
//!    │                                                  ▼         │
//!    │          logout                 progress done  Verifying ──┘
//!    └──────────────── Verified ◀────────────────────────┘
//! ```
//!
//! Every mutation happens under one lock and is followed by an immutable
//! [`AuthSnapshot`] on a watch channel. Operations that wait (network, progress,
//! cooldown) never hold the lock across an `.await`. Each transition bumps an
//! epoch; spawned tasks drop their update when the epoch they captured is stale.

use crate::config::FlowSettings;
use crate::login::error::{
    AuthError, ValidationError, DISPATCH_FAILURE_MESSAGE, VERIFICATION_FAILURE_MESSAGE,
};
use crate::login::events::{
    AuthEvent, AuthEventHandler, DeliveryChannel, EventBus, FlowState, SimpleEventBus,
};
use crate::login::models::{
    is_valid_code, AuthSnapshot, CodeInputBuffer, CooldownTimer, Deletion, DigitInput,
};
use crate::login::services::{ProgressSimulator, ProgressTask, RemoteAuthService};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Mutable flow state, only touched under the controller lock
struct FlowCore {
    flow: FlowState,
    mobile_number: String,
    channel: DeliveryChannel,
    code: CodeInputBuffer,
    cooldown: CooldownTimer,
    error: Option<String>,
    progress: Option<u8>,
    focus: Option<usize>,
    epoch: u64,
    shut_down: bool,
    progress_task: Option<AbortHandle>,
    cooldown_task: Option<AbortHandle>,
    events: SimpleEventBus,
}

impl FlowCore {
    fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            flow: self.flow,
            mobile_number: self.mobile_number.clone(),
            channel: self.channel,
            code: *self.code.slots(),
            focus: self.focus,
            cooldown_remaining: self.cooldown.remaining(),
            resend_allowed: self.cooldown.is_resend_allowed(),
            progress: self.progress,
            error: self.error.clone(),
        }
    }

    fn transition(&mut self, to: FlowState) {
        let from = self.flow;
        if from == FlowState::CodeEntry && to != FlowState::CodeEntry {
            self.stop_cooldown();
        }
        self.flow = to;
        self.epoch += 1;
        tracing::debug!("Flow transition {} -> {} (epoch {})", from, to, self.epoch);
        self.events.publish(AuthEvent::FlowChanged { from, to });
    }

    fn stop_cooldown(&mut self) {
        if let Some(task) = self.cooldown_task.take() {
            task.abort();
        }
        self.cooldown.stop();
    }

    fn cancel_progress(&mut self) {
        if let Some(task) = self.progress_task.take() {
            task.abort();
        }
    }

    fn raise_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.events.publish(AuthEvent::ErrorRaised {
            message: message.to_string(),
        });
    }

    fn request_focus(&mut self, slot: usize) {
        self.focus = Some(slot);
        self.events.publish(AuthEvent::FocusRequested { slot });
    }
}

/// State shared between the controller and the tasks it spawns
struct Shared {
    core: Mutex<FlowCore>,
    snapshots: watch::Sender<AuthSnapshot>,
    service: Arc<dyn RemoteAuthService>,
    progress: ProgressSimulator,
    settings: FlowSettings,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FlowCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, core: &FlowCore) {
        self.snapshots.send_replace(core.snapshot());
    }
}

type Commit = fn(&Arc<Shared>, &mut FlowCore);

/// Builder for [`AuthFlowController`]
pub struct AuthFlowBuilder {
    service: Arc<dyn RemoteAuthService>,
    progress: ProgressSimulator,
    settings: FlowSettings,
    mobile_number: String,
    channel: DeliveryChannel,
}

impl AuthFlowBuilder {
    pub fn progress(mut self, progress: ProgressSimulator) -> Self {
        self.progress = progress;
        self
    }

    pub fn settings(mut self, settings: FlowSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Prefill the mobile number shown in Idle
    pub fn mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = mobile_number.into();
        self
    }

    pub fn channel(mut self, channel: DeliveryChannel) -> Self {
        self.channel = channel;
        self
    }

    pub fn build(self) -> AuthFlowController {
        let core = FlowCore {
            flow: FlowState::Idle,
            mobile_number: self.mobile_number,
            channel: self.channel,
            code: CodeInputBuffer::new(),
            cooldown: CooldownTimer::new(),
            error: None,
            progress: None,
            focus: None,
            epoch: 0,
            shut_down: false,
            progress_task: None,
            cooldown_task: None,
            events: SimpleEventBus::new(),
        };
        let (snapshots, _) = watch::channel(core.snapshot());

        AuthFlowController {
            shared: Arc::new(Shared {
                core: Mutex::new(core),
                snapshots,
                service: self.service,
                progress: self.progress,
                settings: self.settings,
            }),
        }
    }
}

/// Orchestrates the login flow against a [`RemoteAuthService`]
pub struct AuthFlowController {
    shared: Arc<Shared>,
}

impl AuthFlowController {
    /// Controller with the default progress display and timings
    pub fn new(service: Arc<dyn RemoteAuthService>) -> Self {
        Self::builder(service).build()
    }

    pub fn builder(service: Arc<dyn RemoteAuthService>) -> AuthFlowBuilder {
        AuthFlowBuilder {
            service,
            progress: ProgressSimulator::default(),
            settings: FlowSettings::default(),
            mobile_number: String::new(),
            channel: DeliveryChannel::default(),
        }
    }

    // === Observers ===

    /// Receiver that always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Register a handler for discrete flow events.
    ///
    /// Handlers run while the controller lock is held and must not call back
    /// into the controller.
    pub fn subscribe_events(&self, handler: AuthEventHandler) {
        self.shared.lock().events.subscribe(handler);
    }

    // === Idle editing ===

    /// Replace the mobile number text. Only honoured in Idle.
    pub fn set_mobile_number(&self, mobile_number: &str) -> bool {
        let mut core = self.shared.lock();
        if core.flow != FlowState::Idle {
            tracing::debug!("Ignoring number edit while {}", core.flow);
            return false;
        }
        core.mobile_number = mobile_number.to_string();
        self.shared.publish(&core);
        true
    }

    /// Pick the delivery channel. Only honoured in Idle.
    pub fn select_channel(&self, channel: DeliveryChannel) -> bool {
        let mut core = self.shared.lock();
        if core.flow != FlowState::Idle {
            tracing::debug!("Ignoring channel selection while {}", core.flow);
            return false;
        }
        core.channel = channel;
        self.shared.publish(&core);
        true
    }

    // === Code dispatch ===

    /// Ask the service to send a code, from Idle or as a resend from CodeEntry.
    ///
    /// Resolves once the flow has entered CodeEntry or the attempt failed.
    pub async fn request_code(
        &self,
        mobile_number: &str,
        channel: DeliveryChannel,
    ) -> Result<(), AuthError> {
        let (epoch, origin) = {
            let mut core = self.shared.lock();
            let origin = core.flow;
            if core.shut_down {
                return Err(AuthError::Cancelled);
            }
            if !matches!(origin, FlowState::Idle | FlowState::CodeEntry) {
                return Err(reject("request code", origin));
            }
            if origin == FlowState::CodeEntry && !core.cooldown.is_resend_allowed() {
                let remaining = core.cooldown.remaining();
                tracing::debug!("Resend blocked, {}s of cooldown left", remaining);
                return Err(AuthError::ResendCooldown { remaining });
            }

            core.error = None;
            if mobile_number.is_empty() {
                return Err(self.invalid(&mut core, ValidationError::MobileNumberRequired));
            }
            if origin == FlowState::CodeEntry
                && (mobile_number != core.mobile_number || channel != core.channel)
            {
                return Err(self.invalid(&mut core, ValidationError::NumberLocked));
            }

            core.mobile_number = mobile_number.to_string();
            core.channel = channel;
            core.transition(FlowState::Dispatching);
            core.progress = Some(0);
            self.shared.publish(&core);
            (core.epoch, origin)
        };

        tracing::info!("Requesting code for {} via {}", mobile_number, channel);
        let result = self.shared.service.issue_code(mobile_number, channel).await;

        let task = {
            let mut core = self.shared.lock();
            if core.epoch != epoch {
                return Err(AuthError::Cancelled);
            }
            if let Err(e) = result {
                tracing::warn!("Code dispatch failed: {e}");
                core.transition(origin);
                core.progress = None;
                if origin == FlowState::CodeEntry {
                    core.cooldown.resume();
                    spawn_cooldown(&self.shared, &mut core);
                }
                core.raise_error(DISPATCH_FAILURE_MESSAGE);
                self.shared.publish(&core);
                return Err(AuthError::DispatchFailed(e));
            }
            self.start_progress(&mut core, epoch, commit_code_entry)
        };

        self.finish(task).await
    }

    /// Resend using the number and channel the pending code was sent with
    pub async fn resend_code(&self) -> Result<(), AuthError> {
        let (mobile_number, channel) = {
            let core = self.shared.lock();
            (core.mobile_number.clone(), core.channel)
        };
        self.request_code(&mobile_number, channel).await
    }

    // === Code entry ===

    /// Type into slot `index`. Ignored outside CodeEntry.
    pub fn set_digit(&self, index: usize, raw: &str) -> DigitInput {
        let mut core = self.shared.lock();
        if core.flow != FlowState::CodeEntry {
            return DigitInput::Rejected;
        }
        let outcome = core.code.set_digit(index, raw);
        if let DigitInput::Accepted { focus } = outcome {
            if let Some(slot) = focus {
                core.request_focus(slot);
            }
            self.shared.publish(&core);
        }
        outcome
    }

    /// Backspace on slot `index`. Ignored outside CodeEntry.
    pub fn handle_deletion(&self, index: usize) -> Deletion {
        let mut core = self.shared.lock();
        if core.flow != FlowState::CodeEntry {
            return Deletion::Ignored;
        }
        let outcome = core.code.handle_deletion(index);
        match outcome {
            Deletion::MoveFocus { focus } => core.request_focus(focus),
            Deletion::Cleared => {}
            Deletion::Ignored => return outcome,
        }
        self.shared.publish(&core);
        outcome
    }

    /// Verify `code` for `mobile_number`. Only valid in CodeEntry.
    ///
    /// Resolves once the flow reached Verified or fell back to CodeEntry.
    pub async fn submit_code(&self, mobile_number: &str, code: &str) -> Result<(), AuthError> {
        let epoch = {
            let mut core = self.shared.lock();
            if core.shut_down {
                return Err(AuthError::Cancelled);
            }
            if core.flow != FlowState::CodeEntry {
                return Err(reject("submit code", core.flow));
            }

            core.error = None;
            if mobile_number != core.mobile_number {
                return Err(self.invalid(&mut core, ValidationError::NumberLocked));
            }
            if !is_valid_code(code) {
                return Err(self.invalid(&mut core, ValidationError::IncompleteCode));
            }

            core.transition(FlowState::Verifying);
            core.progress = Some(0);
            self.shared.publish(&core);
            core.epoch
        };

        tracing::info!("Verifying code for {}", mobile_number);
        let result = self.shared.service.verify_code(mobile_number, code).await;

        let task = {
            let mut core = self.shared.lock();
            if core.epoch != epoch {
                return Err(AuthError::Cancelled);
            }
            if let Err(e) = result {
                tracing::warn!("Code verification failed: {e}");
                // Typed digits stay in place so the user can fix them
                core.transition(FlowState::CodeEntry);
                core.progress = None;
                core.cooldown.resume();
                spawn_cooldown(&self.shared, &mut core);
                core.raise_error(VERIFICATION_FAILURE_MESSAGE);
                self.shared.publish(&core);
                return Err(AuthError::VerificationFailed(e));
            }
            self.start_progress(&mut core, epoch, commit_verified)
        };

        self.finish(task).await
    }

    /// Submit whatever is in the code buffer for the stored number
    pub async fn submit_entered_code(&self) -> Result<(), AuthError> {
        let (mobile_number, code) = {
            let core = self.shared.lock();
            let code: String = core.code.slots().iter().flatten().collect();
            (core.mobile_number.clone(), code)
        };
        self.submit_code(&mobile_number, &code).await
    }

    /// Abandon the pending code and go back to editing the number
    pub fn change_number(&self) -> Result<(), AuthError> {
        let mut core = self.shared.lock();
        if core.flow != FlowState::CodeEntry {
            return Err(reject("change number", core.flow));
        }
        core.transition(FlowState::Idle);
        core.cooldown.clear();
        core.code.reset();
        core.error = None;
        core.focus = None;
        self.shared.publish(&core);
        tracing::info!("Changing number, keeping '{}' for editing", core.mobile_number);
        Ok(())
    }

    /// Leave the landing view. The number is kept for the next login.
    pub fn logout(&self) -> Result<(), AuthError> {
        let mut core = self.shared.lock();
        if core.flow != FlowState::Verified {
            return Err(reject("logout", core.flow));
        }
        core.transition(FlowState::Idle);
        core.cooldown.clear();
        core.code.reset();
        core.error = None;
        core.focus = None;
        self.shared.publish(&core);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Stop every task the flow owns. Pending operations resolve with
    /// [`AuthError::Cancelled`] and later operations are refused.
    pub fn shutdown(&self) {
        let mut core = self.shared.lock();
        if core.shut_down {
            return;
        }
        core.shut_down = true;
        core.epoch += 1;
        core.cancel_progress();
        core.stop_cooldown();
        tracing::debug!("Auth flow shut down while {}", core.flow);
    }

    fn invalid(&self, core: &mut FlowCore, err: ValidationError) -> AuthError {
        tracing::warn!("Rejected input: {err}");
        core.raise_error(err.user_message());
        self.shared.publish(core);
        AuthError::Validation(err)
    }

    fn start_progress(&self, core: &mut FlowCore, epoch: u64, commit: Commit) -> ProgressTask {
        let step_target = Arc::downgrade(&self.shared);
        let on_step = move |percent: u8| {
            let Some(shared) = step_target.upgrade() else {
                return;
            };
            let mut core = shared.lock();
            if core.epoch != epoch {
                return;
            }
            core.progress = Some(percent);
            core.events.publish(AuthEvent::ProgressAdvanced { percent });
            shared.publish(&core);
        };

        let commit_target = Arc::downgrade(&self.shared);
        let on_complete = move || {
            let Some(shared) = commit_target.upgrade() else {
                return;
            };
            let mut core = shared.lock();
            if core.epoch != epoch {
                tracing::debug!("Dropping stale progress completion");
                return;
            }
            core.progress_task = None;
            commit(&shared, &mut core);
            shared.publish(&core);
        };

        let task = self.shared.progress.start(on_step, on_complete);
        core.progress_task = Some(task.abort_handle());
        task
    }

    async fn finish(&self, task: ProgressTask) -> Result<(), AuthError> {
        let completed = task.wait().await;
        if completed && !self.shared.lock().shut_down {
            Ok(())
        } else {
            Err(AuthError::Cancelled)
        }
    }
}

impl Drop for AuthFlowController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn reject(operation: &'static str, state: FlowState) -> AuthError {
    tracing::debug!("Rejected {} while {}", operation, state);
    AuthError::InvalidState { operation, state }
}

fn commit_code_entry(shared: &Arc<Shared>, core: &mut FlowCore) {
    core.transition(FlowState::CodeEntry);
    core.progress = None;
    core.code.reset();
    core.cooldown.start(shared.settings.cooldown_seconds);
    core.request_focus(0);
    spawn_cooldown(shared, core);
    tracing::info!("Code sent to {} via {}", core.mobile_number, core.channel);
}

fn commit_verified(_shared: &Arc<Shared>, core: &mut FlowCore) {
    core.transition(FlowState::Verified);
    core.progress = None;
    core.focus = None;
    tracing::info!("Mobile number {} verified", core.mobile_number);
}

/// Drive the cooldown once per tick for as long as the flow stays in the
/// current CodeEntry epoch
fn spawn_cooldown(shared: &Arc<Shared>, core: &mut FlowCore) {
    if let Some(task) = core.cooldown_task.take() {
        task.abort();
    }
    if !core.cooldown.is_active() {
        return;
    }

    let target = Arc::downgrade(shared);
    let epoch = core.epoch;
    let period = shared.settings.cooldown_tick;

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let Some(shared) = target.upgrade() else {
                break;
            };
            let mut core = shared.lock();
            if core.epoch != epoch {
                break;
            }
            let remaining = core.cooldown.tick();
            core.events.publish(AuthEvent::CooldownTicked { remaining });
            shared.publish(&core);
            if !core.cooldown.is_active() {
                core.cooldown_task = None;
                tracing::debug!("Cooldown finished, resend allowed");
                break;
            }
        }
    });
    core.cooldown_task = Some(handle.abort_handle());
}
