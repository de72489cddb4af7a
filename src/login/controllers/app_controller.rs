//! # Application Controller
//!
//! Runs the terminal event loop. Key presses go through the
//! [`CommandRegistry`]; the resulting [`CommandEvent`]s are applied to the
//! shared [`AuthFlowController`]. Slow flow operations run on spawned tasks so
//! the loop keeps drawing progress and countdowns while they are in flight.
//! Every new snapshot or focus request triggers a redraw.

use crate::login::commands::{CommandContext, CommandEvent, CommandRegistry};
use crate::login::controllers::AuthFlowController;
use crate::login::error::AuthError;
use crate::login::events::AuthEvent;
use crate::login::io::{EventStream, RenderStream};
use crate::login::models::{AuthSnapshot, CODE_LENGTH};
use crate::login::views::TerminalRenderer;
use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct AppController<ES: EventStream, RS: RenderStream> {
    flow: Arc<AuthFlowController>,
    renderer: TerminalRenderer<RS>,
    command_registry: CommandRegistry,
    event_stream: ES,
    snapshots: watch::Receiver<AuthSnapshot>,
    focus_requests: mpsc::UnboundedReceiver<usize>,
    pending: Vec<JoinHandle<()>>,
    focused_slot: usize,
    needs_render: bool,
    should_quit: bool,
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    pub fn with_io_streams(
        flow: Arc<AuthFlowController>,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let renderer = TerminalRenderer::with_render_stream(render_stream)?;

        let (focus_tx, focus_requests) = mpsc::unbounded_channel();
        flow.subscribe_events(Box::new(move |event| {
            if let AuthEvent::FocusRequested { slot } = event {
                // Receiver only goes away with the app itself
                let _ = focus_tx.send(*slot);
            }
        }));
        let snapshots = flow.subscribe();

        Ok(Self {
            flow,
            renderer,
            command_registry: CommandRegistry::new(),
            event_stream,
            snapshots,
            focus_requests,
            pending: Vec::new(),
            focused_slot: 0,
            needs_render: true,
            should_quit: false,
        })
    }

    pub fn flow(&self) -> &Arc<AuthFlowController> {
        &self.flow
    }

    pub fn focused_slot(&self) -> usize {
        self.focused_slot
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run until the user quits, restoring the terminal afterwards
    pub async fn run(&mut self) -> Result<()> {
        self.renderer.initialize()?;
        let result = self.event_loop().await;

        self.flow.shutdown();
        for task in self.pending.drain(..) {
            task.abort();
        }
        self.renderer.cleanup()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.refresh()?;
        while !self.should_quit {
            if self.event_stream.poll(POLL_INTERVAL)? {
                let event = self.event_stream.read()?;
                self.handle_event(event)?;
            }
            self.refresh()?;
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Apply one terminal event
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                tracing::trace!("Key event: {:?}", key);
                self.drain_focus_requests();

                let context = CommandContext::new(self.flow.snapshot(), self.focused_slot);
                let events = self.command_registry.process_event(key, &context)?;
                for event in events {
                    self.apply_command_event(event);
                }
            }
            Event::Resize(width, height) => {
                self.renderer.update_size(width, height);
                self.needs_render = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_command_event(&mut self, event: CommandEvent) {
        let flow = self.flow.clone();
        match event {
            CommandEvent::NumberChanged { text } => {
                flow.set_mobile_number(&text);
            }
            CommandEvent::ChannelSelected { channel } => {
                flow.select_channel(channel);
            }
            CommandEvent::CodeRequested => {
                let snapshot = flow.snapshot();
                self.track(async move {
                    flow.request_code(&snapshot.mobile_number, snapshot.channel).await
                });
            }
            CommandEvent::DigitEntered { slot, digit } => {
                flow.set_digit(slot, &digit);
            }
            CommandEvent::DigitDeleted { slot } => {
                flow.handle_deletion(slot);
            }
            CommandEvent::FocusMoved { slot } => {
                self.focused_slot = slot.min(CODE_LENGTH - 1);
                self.needs_render = true;
            }
            CommandEvent::CodeSubmitted => {
                self.track(async move { flow.submit_entered_code().await });
            }
            CommandEvent::ResendRequested => {
                self.track(async move { flow.resend_code().await });
            }
            CommandEvent::ChangeNumberRequested => {
                if let Err(e) = flow.change_number() {
                    tracing::debug!("Change number ignored: {e}");
                }
            }
            CommandEvent::LogoutRequested => {
                if let Err(e) = flow.logout() {
                    tracing::debug!("Logout ignored: {e}");
                }
            }
            CommandEvent::QuitRequested => {
                tracing::info!("Quit requested");
                self.should_quit = true;
            }
        }
    }

    /// Run a flow operation in the background. Failures already reach the
    /// user through the snapshot's error field.
    fn track<F>(&mut self, operation: F)
    where
        F: Future<Output = Result<(), AuthError>> + Send + 'static,
    {
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(tokio::spawn(async move {
            if let Err(e) = operation.await {
                tracing::debug!("Flow operation ended without success: {e}");
            }
        }));
    }

    /// Wait for every background operation started so far
    pub async fn wait_for_pending(&mut self) {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Flow operation task failed: {e}");
            }
        }
    }

    fn drain_focus_requests(&mut self) {
        while let Ok(slot) = self.focus_requests.try_recv() {
            self.focused_slot = slot;
            self.needs_render = true;
        }
    }

    /// Pick up flow changes and redraw if anything changed
    pub fn refresh(&mut self) -> Result<()> {
        self.drain_focus_requests();
        if self.snapshots.has_changed().unwrap_or(false) {
            self.needs_render = true;
        }
        if self.needs_render {
            let snapshot = self.snapshots.borrow_and_update().clone();
            self.renderer.render(&snapshot, self.focused_slot)?;
            self.needs_render = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::events::{DeliveryChannel, FlowState};
    use crate::login::io::{MockEventStream, MockRenderStream, RenderCommand, RenderLog};
    use crate::login::services::{ProgressSimulator, ScriptedAuthService};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    type TestApp = AppController<MockEventStream, MockRenderStream>;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn typed(text: &str) -> Vec<Event> {
        text.chars().map(|ch| press(KeyCode::Char(ch))).collect()
    }

    fn test_app(events: Vec<Event>) -> (TestApp, RenderLog) {
        let flow = AuthFlowController::builder(Arc::new(ScriptedAuthService::accepting_code(
            "123456",
        )))
        .progress(ProgressSimulator::instant())
        .build();
        let render_stream = MockRenderStream::new();
        let log = render_stream.log();
        let app = AppController::with_io_streams(
            Arc::new(flow),
            MockEventStream::new(events),
            render_stream,
        )
        .unwrap();
        (app, log)
    }

    fn feed(app: &mut TestApp, events: Vec<Event>) {
        for event in events {
            app.handle_event(event).unwrap();
        }
    }

    #[tokio::test]
    async fn typing_should_edit_number_and_channel() {
        let (mut app, log) = test_app(vec![]);

        feed(&mut app, typed("98765"));
        feed(&mut app, vec![press(KeyCode::Backspace), press(KeyCode::Tab)]);
        app.refresh().unwrap();

        let snapshot = app.flow().snapshot();
        assert_eq!(snapshot.mobile_number, "9876");
        assert_eq!(snapshot.channel, DeliveryChannel::WhatsApp);
        assert!(log.screen_contains("Mobile number: 9876"));
        assert!(log.screen_contains("(*) WhatsApp"));
    }

    #[tokio::test]
    async fn empty_number_should_show_validation_message() {
        let (mut app, log) = test_app(vec![]);

        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        app.refresh().unwrap();

        assert_eq!(app.flow().snapshot().flow, FlowState::Idle);
        assert!(log.screen_contains("Please enter your mobile number"));
    }

    #[tokio::test]
    async fn full_login_should_reach_landing_and_back() {
        let (mut app, log) = test_app(vec![]);

        feed(&mut app, typed("9999999999"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        app.refresh().unwrap();

        assert_eq!(app.flow().snapshot().flow, FlowState::CodeEntry);
        assert_eq!(app.focused_slot(), 0);
        assert!(log.screen_contains("Verification code has been sent to 9999999999 via SMS"));

        feed(&mut app, typed("12345"));
        app.refresh().unwrap();
        assert_eq!(app.focused_slot(), 5);

        feed(&mut app, typed("6"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        app.refresh().unwrap();

        assert_eq!(app.flow().snapshot().flow, FlowState::Verified);
        assert!(log.screen_contains("Welcome to Your Dashboard"));

        feed(&mut app, typed("l"));
        app.refresh().unwrap();
        let snapshot = app.flow().snapshot();
        assert_eq!(snapshot.flow, FlowState::Idle);
        assert_eq!(snapshot.mobile_number, "9999999999");
        assert!(log.screen_contains("Mobile number: 9999999999"));
    }

    #[tokio::test]
    async fn wrong_code_should_stay_on_code_form_with_message() {
        let (mut app, log) = test_app(vec![]);

        feed(&mut app, typed("9999999999"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        feed(&mut app, typed("000000"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        app.refresh().unwrap();

        assert_eq!(app.flow().snapshot().flow, FlowState::CodeEntry);
        assert!(log.screen_contains("Invalid OTP. Please try again."));
        assert!(log.screen_contains("[0] [0] [0] [0] [0] [0]"));
    }

    #[tokio::test]
    async fn backspace_on_empty_slot_should_move_focus_back() {
        let (mut app, _log) = test_app(vec![]);

        feed(&mut app, typed("1"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        feed(&mut app, typed("7"));
        app.refresh().unwrap();
        assert_eq!(app.focused_slot(), 1);

        feed(&mut app, vec![press(KeyCode::Backspace)]);
        app.refresh().unwrap();
        assert_eq!(app.focused_slot(), 0);
        assert_eq!(app.flow().snapshot().code[0], Some('7'));
    }

    #[tokio::test]
    async fn escape_should_return_to_number_form() {
        let (mut app, log) = test_app(vec![]);

        feed(&mut app, typed("5551234"));
        feed(&mut app, vec![press(KeyCode::Enter)]);
        app.wait_for_pending().await;
        feed(&mut app, vec![press(KeyCode::Esc)]);
        app.refresh().unwrap();

        assert_eq!(app.flow().snapshot().flow, FlowState::Idle);
        assert!(log.screen_contains("Mobile number: 5551234"));
    }

    #[tokio::test]
    async fn key_release_should_be_ignored() {
        let (mut app, _log) = test_app(vec![]);
        let mut release = KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;

        app.handle_event(Event::Key(release)).unwrap();

        assert_eq!(app.flow().snapshot().mobile_number, "");
    }

    #[tokio::test]
    async fn run_should_restore_terminal_after_quit() {
        let mut events = typed("42");
        events.push(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        let (mut app, log) = test_app(events);

        app.run().await.unwrap();

        assert!(app.should_quit());
        assert!(log.screen_contains("Mobile number: 42"));
        let commands = log.commands();
        assert_eq!(commands.first(), Some(&RenderCommand::EnableRawMode));
        assert_eq!(commands.last(), Some(&RenderCommand::DisableRawMode));
    }

    #[tokio::test]
    async fn resize_should_trigger_redraw() {
        let (mut app, log) = test_app(vec![]);
        app.refresh().unwrap();
        let frames = log.frame_count();

        app.handle_event(Event::Resize(100, 40)).unwrap();
        app.refresh().unwrap();

        assert_eq!(log.frame_count(), frames + 1);
    }
}
