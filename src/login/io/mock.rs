//! # In-Memory I/O
//!
//! [`MockEventStream`] replays a fixed list of events. [`MockRenderStream`]
//! records every render call and keeps a row-by-row picture of the screen in
//! a [`RenderLog`] that stays readable after the stream is moved into the app.

use super::{EventStream, RenderStream, TerminalSize};
use crate::login::views::ansi::strip_ansi;
use anyhow::Result;
use crossterm::event::Event;
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Replays pre-programmed events
#[derive(Debug, Default)]
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventStream for MockEventStream {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No events available"))
    }
}

/// Recorded render call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    ClearScreen,
    MoveCursor(u16, u16),
    HideCursor,
    ShowCursor,
    EnterAlternateScreen,
    LeaveAlternateScreen,
    EnableRawMode,
    DisableRawMode,
    Write(String),
    Flush,
}

#[derive(Debug, Default)]
struct LogState {
    commands: Vec<RenderCommand>,
    rows: BTreeMap<u16, String>,
    row: u16,
}

/// Shared view of everything a [`MockRenderStream`] was asked to do
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    state: Arc<Mutex<LogState>>,
}

impl RenderLog {
    pub fn commands(&self) -> Vec<RenderCommand> {
        self.lock().commands.clone()
    }

    pub fn has_command(&self, command: &RenderCommand) -> bool {
        self.lock().commands.contains(command)
    }

    /// Text drawn since the last clear, one line per row, styling removed
    pub fn screen_text(&self) -> String {
        self.lock()
            .rows
            .values()
            .map(|row| strip_ansi(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True if any row drawn since the last clear contains `needle`
    pub fn screen_contains(&self, needle: &str) -> bool {
        self.screen_text().contains(needle)
    }

    /// Number of full clears, which the renderer issues once per frame
    pub fn frame_count(&self) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|command| **command == RenderCommand::ClearScreen)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render stream that records instead of drawing
#[derive(Debug)]
pub struct MockRenderStream {
    log: RenderLog,
    terminal_size: TerminalSize,
    cursor_visible: bool,
    raw_mode: bool,
    alternate_screen: bool,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size((80, 24))
    }

    pub fn with_size(size: TerminalSize) -> Self {
        Self {
            log: RenderLog::default(),
            terminal_size: size,
            cursor_visible: true,
            raw_mode: false,
            alternate_screen: false,
        }
    }

    /// Handle to the recorded output
    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    fn record(&self, command: RenderCommand) {
        self.log.lock().commands.push(command);
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MockRenderStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf).to_string();
        {
            let mut state = self.log.lock();
            let row = state.row;
            state.rows.entry(row).or_default().push_str(&text);
            state.commands.push(RenderCommand::Write(text));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.record(RenderCommand::Flush);
        Ok(())
    }
}

impl RenderStream for MockRenderStream {
    fn clear_screen(&mut self) -> Result<()> {
        let mut state = self.log.lock();
        state.commands.push(RenderCommand::ClearScreen);
        state.rows.clear();
        state.row = 0;
        Ok(())
    }

    fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        let mut state = self.log.lock();
        state.commands.push(RenderCommand::MoveCursor(x, y));
        state.row = y;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::HideCursor);
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::ShowCursor);
        self.cursor_visible = true;
        Ok(())
    }

    fn get_size(&self) -> Result<TerminalSize> {
        Ok(self.terminal_size)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::EnterAlternateScreen);
        self.alternate_screen = true;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.record(RenderCommand::LeaveAlternateScreen);
        self.alternate_screen = false;
        Ok(())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::EnableRawMode);
        self.raw_mode = true;
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        self.record(RenderCommand::DisableRawMode);
        self.raw_mode = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn mock_event_stream_should_replay_events_in_order() {
        let mut stream = MockEventStream::new(vec![
            Event::Key(KeyEvent::new(KeyCode::Char('9'), KeyModifiers::NONE)),
            Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
        ]);

        assert!(stream.poll(Duration::ZERO).unwrap());
        match stream.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Char('9')),
            other => panic!("Expected key event, got {other:?}"),
        }
        match stream.read().unwrap() {
            Event::Key(key) => assert_eq!(key.code, KeyCode::Enter),
            other => panic!("Expected key event, got {other:?}"),
        }

        assert!(!stream.poll(Duration::ZERO).unwrap());
        assert!(stream.read().is_err());
    }

    #[test]
    fn mock_render_stream_should_keep_rows_since_last_clear() {
        let mut stream = MockRenderStream::new();
        let log = stream.log();

        stream.move_cursor(0, 0).unwrap();
        stream.write_all(b"stale").unwrap();
        stream.clear_screen().unwrap();
        stream.move_cursor(2, 1).unwrap();
        stream.write_all(b"\x1b[1mSign in\x1b[0m").unwrap();
        stream.move_cursor(2, 3).unwrap();
        stream.write_all(b"Mobile number").unwrap();
        stream.flush().unwrap();

        assert_eq!(log.screen_text(), "Sign in\nMobile number");
        assert!(!log.screen_contains("stale"));
        assert_eq!(log.frame_count(), 1);
        assert!(log.has_command(&RenderCommand::MoveCursor(2, 3)));
    }

    #[test]
    fn mock_render_stream_should_track_terminal_modes() {
        let mut stream = MockRenderStream::with_size((120, 40));
        assert_eq!(stream.get_size().unwrap(), (120, 40));

        stream.enable_raw_mode().unwrap();
        stream.enter_alternate_screen().unwrap();
        stream.hide_cursor().unwrap();
        assert!(stream.is_raw_mode());
        assert!(stream.is_alternate_screen());
        assert!(!stream.is_cursor_visible());

        stream.disable_raw_mode().unwrap();
        stream.leave_alternate_screen().unwrap();
        stream.show_cursor().unwrap();
        assert!(!stream.is_raw_mode());
        assert!(!stream.is_alternate_screen());
        assert!(stream.is_cursor_visible());
    }
}
