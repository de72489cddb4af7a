//! # Terminal Renderer
//!
//! Owns the [`RenderStream`] and draws one full frame per snapshot. The login
//! screens are a handful of lines, so every frame is a clear and redraw.

use super::screens;
use crate::login::io::{RenderStream, TerminalSize};
use crate::login::models::AuthSnapshot;
use anyhow::Result;

/// Left margin and top margin of every frame
const MARGIN: (u16, u16) = (2, 1);

pub struct TerminalRenderer<RS: RenderStream> {
    render_stream: RS,
    terminal_size: TerminalSize,
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(render_stream: RS) -> Result<Self> {
        let terminal_size = render_stream.get_size()?;
        Ok(Self {
            render_stream,
            terminal_size,
        })
    }

    pub fn terminal_size(&self) -> TerminalSize {
        self.terminal_size
    }

    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    /// Raw mode, alternate screen, hidden cursor
    pub fn initialize(&mut self) -> Result<()> {
        self.render_stream.enable_raw_mode()?;
        self.render_stream.enter_alternate_screen()?;
        self.render_stream.hide_cursor()?;
        self.render_stream.clear_screen()?;
        Ok(())
    }

    /// Draw the frame for `snapshot`
    pub fn render(&mut self, snapshot: &AuthSnapshot, focused_slot: usize) -> Result<()> {
        let (x, y) = MARGIN;
        let (_, height) = self.terminal_size;
        let lines = screens::compose(snapshot, focused_slot);

        self.render_stream.clear_screen()?;
        for (offset, line) in lines.iter().enumerate() {
            let row = y.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
            if row >= height {
                tracing::debug!("Frame truncated at row {} of {}", row, height);
                break;
            }
            self.render_stream.move_cursor(x, row)?;
            self.render_stream.write_all(line.as_bytes())?;
        }
        self.render_stream.flush()?;
        Ok(())
    }

    /// Undo everything `initialize` did
    pub fn cleanup(&mut self) -> Result<()> {
        self.render_stream.show_cursor()?;
        self.render_stream.leave_alternate_screen()?;
        self.render_stream.disable_raw_mode()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::events::FlowState;
    use crate::login::io::{MockRenderStream, RenderCommand};

    #[test]
    fn renderer_should_take_size_from_stream() {
        let renderer =
            TerminalRenderer::with_render_stream(MockRenderStream::with_size((100, 30))).unwrap();
        assert_eq!(renderer.terminal_size(), (100, 30));
    }

    #[test]
    fn initialize_and_cleanup_should_toggle_terminal_modes() {
        let stream = MockRenderStream::new();
        let log = stream.log();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();

        renderer.initialize().unwrap();
        renderer.cleanup().unwrap();

        let commands = log.commands();
        assert_eq!(commands[0], RenderCommand::EnableRawMode);
        assert_eq!(commands[1], RenderCommand::EnterAlternateScreen);
        assert!(commands.ends_with(&[
            RenderCommand::ShowCursor,
            RenderCommand::LeaveAlternateScreen,
            RenderCommand::DisableRawMode,
        ]));
    }

    #[test]
    fn render_should_redraw_whole_frame() {
        let stream = MockRenderStream::new();
        let log = stream.log();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();

        let snapshot = AuthSnapshot {
            mobile_number: "42".to_string(),
            ..AuthSnapshot::default()
        };
        renderer.render(&snapshot, 0).unwrap();
        renderer
            .render(
                &AuthSnapshot {
                    flow: FlowState::Verified,
                    ..snapshot
                },
                0,
            )
            .unwrap();

        assert_eq!(log.frame_count(), 2);
        assert!(log.screen_contains("Welcome to Your Dashboard"));
        assert!(!log.screen_contains("Mobile number"));
        assert!(log.has_command(&RenderCommand::MoveCursor(2, 1)));
    }

    #[test]
    fn render_should_stop_at_bottom_of_small_terminal() {
        let stream = MockRenderStream::with_size((80, 4));
        let log = stream.log();
        let mut renderer = TerminalRenderer::with_render_stream(stream).unwrap();

        renderer
            .render(
                &AuthSnapshot {
                    flow: FlowState::Verified,
                    ..AuthSnapshot::default()
                },
                0,
            )
            .unwrap();

        let rows: Vec<u16> = log
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::MoveCursor(_, row) => Some(*row),
                _ => None,
            })
            .collect();
        assert_eq!(rows, vec![1, 2, 3]);
        assert!(log.screen_contains("Welcome to Your Dashboard"));
    }
}
