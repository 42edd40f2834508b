use crossterm::{cursor, execute, terminal};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::display::{Frame, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Screen is used by the host to put frames somewhere a person can see them.
/// It should abstract the implementation details, so a variety of kinds of
/// screen would work.
pub trait Screen {
    /// show a frame
    fn draw(&mut self, frame: &Frame) -> Result<(), io::Error>;
}

// store useful metadata about the surface
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel in the frame that matches `lit`
    fn bitplane_from_frame<'a>(
        &self,
        frame: &'a Frame,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let (x, y) = (count % w, count / w);
                if frame[y][x] == lit {
                    return Some((
                        x as f64,        // x
                        -1.0 * y as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermScreen {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    title: String,
}

impl MonoTermScreen {
    pub fn new(title: &str) -> Result<MonoTermScreen, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermScreen {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
            title: title.to_string(),
        })
    }
}

impl Screen for MonoTermScreen {
    fn draw(&mut self, frame: &Frame) -> Result<(), io::Error> {
        let resolution = &self.resolution;
        let title = self.title.as_str();
        // for now this assumes a 1:1 ratio between terminal cells and pixels
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let lit = resolution.bitplane_from_frame(frame, true).collect::<Vec<_>>();
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    // only the lit bitplane needs drawing; the background is black
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

impl Drop for MonoTermScreen {
    fn drop(&mut self) {
        let res = execute!(
            self.terminal.backend_mut(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        if let Err(e) = res {
            log::error!("couldn't restore terminal: {}", e);
        }
    }
}

/// useful for running without a terminal; remembers the last frame
pub struct HeadlessScreen {
    pub frames: usize,
    pub last: Option<Frame>,
}

impl HeadlessScreen {
    pub fn new() -> HeadlessScreen {
        HeadlessScreen {
            frames: 0,
            last: None,
        }
    }
}

impl Default for HeadlessScreen {
    fn default() -> Self {
        HeadlessScreen::new()
    }
}

impl Screen for HeadlessScreen {
    fn draw(&mut self, frame: &Frame) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = Some(*frame);
        Ok(())
    }
}
