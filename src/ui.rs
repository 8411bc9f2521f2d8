//! Live terminal block.
//!
//! The now-playing lines are drawn with `ratatui` into an inline viewport
//! below the prompt, redrawn in place on every poller wake.

use std::io::{self, Stdout};

use ratatui::{
    Frame, Terminal, TerminalOptions, Viewport,
    backend::CrosstermBackend,
    layout::{Alignment, Position},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// Rows the block occupies: up to four text lines plus the border.
const VIEWPORT_HEIGHT: u16 = 6;

/// Output sink for the formatted display lines.
pub trait Console {
    /// Replace the previously shown block with `lines`.
    fn show(&mut self, lines: &[String]) -> io::Result<()>;

    /// Leave the last block on screen and park the cursor below it.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Render `lines` into `frame`; the first line is the header.
pub fn draw(frame: &mut Frame, lines: &[String]) {
    let text: Vec<Line> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if i == 0 {
                Line::styled(l.as_str(), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Line::from(l.as_str())
            }
        })
        .collect();

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" stream-player ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(paragraph, frame.area());
}

pub struct LiveConsole {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl LiveConsole {
    /// Reserve the inline viewport under the cursor. Expects raw mode.
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(VIEWPORT_HEIGHT),
            },
        )?;
        Ok(Self { terminal })
    }
}

impl Console for LiveConsole {
    fn show(&mut self, lines: &[String]) -> io::Result<()> {
        self.terminal.draw(|frame| draw(frame, lines))?;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let area = self.terminal.get_frame().area();
        self.terminal
            .set_cursor_position(Position::new(0, area.bottom().saturating_sub(1)))?;
        self.terminal.show_cursor()
    }
}
