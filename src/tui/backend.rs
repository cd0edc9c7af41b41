use std::io::Stderr;
use std::sync::Once;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{self, cursor};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Modifier;

use crate::AsAny;
use crate::theme::{ColorId, ColorTheme};
use crate::tui::event::{InputEvent, MouseGesture, MouseInput};

/// Two clicks on the same cell closer than this make a double-click
pub const DOUBLE_CLICK_DURATION: Duration = Duration::from_millis(500);

static PANIC_HOOK_SET: Once = Once::new();

/// Output side of the terminal driver.
///
/// Drawing happens off-screen; nothing reaches the terminal until [`Screen::refresh`].
/// Rows and columns are 0-based from the top-left corner.
pub trait Screen: AsAny + Send {
    /// Takes over the terminal and sets the colors to draw with
    fn init(&mut self, theme: &ColorTheme, black: bool, mouse: bool) -> Result<()>;
    /// Number of rows on screen
    fn max_rows(&self) -> usize;
    /// Number of columns on screen
    fn max_cols(&self) -> usize;
    /// Moves the drawing cursor, optionally blanking the row from there to its end
    fn move_cursor(&mut self, row: usize, col: usize, clear_line: bool);
    /// Draws `text` at the drawing cursor and advances it
    fn print(&mut self, color: ColorId, bold: bool, text: &str);
    /// Blanks the whole screen, picking up any size change
    fn clear(&mut self) -> Result<()>;
    /// Hands the terminal back, e.g. to run a command in it
    fn leave_managed_mode(&mut self) -> Result<()>;
    /// Takes the terminal over again after [`Screen::leave_managed_mode`]
    fn enter_managed_mode(&mut self) -> Result<()>;
    /// Flushes what was drawn, leaving the visible cursor at the drawing cursor
    fn refresh(&mut self) -> Result<()>;
    /// Hands the terminal back for good
    fn close(&mut self) -> Result<()>;
}

/// Blocking input side of the terminal driver
pub trait EventSource: Send {
    /// Waits for the next key or mouse event
    fn next_event(&mut self) -> Result<InputEvent>;
}

/// Ratatui-backed [`Screen`]
pub struct Tui<B: Backend = CrosstermBackend<Stderr>> {
    terminal: Terminal<B>,
    canvas: Buffer,
    cursor: (u16, u16),
    theme: ColorTheme,
    mouse: bool,
    owns_tty: bool,
    managed: bool,
}

impl Tui<CrosstermBackend<Stderr>> {
    /// Draws on stderr, managing the controlling terminal (raw mode, alternate screen, mouse)
    pub fn stderr() -> Result<Self> {
        set_panic_hook();
        let mut tui = Tui::new(CrosstermBackend::new(std::io::stderr()))?;
        tui.owns_tty = true;
        Ok(tui)
    }
}

impl<B: Backend> Tui<B>
where
    B::Error: Send + Sync + 'static,
{
    /// Draws on `backend` without touching any tty state
    pub fn new(backend: B) -> Result<Self> {
        let terminal = Terminal::new(backend)?;
        let size = terminal.size()?;
        Ok(Self {
            terminal,
            canvas: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
            cursor: (0, 0),
            theme: ColorTheme::default(),
            mouse: false,
            owns_tty: false,
            managed: false,
        })
    }

    /// The backend, holding whatever was last flushed
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Mutable access to the backend, e.g. to resize a test backend
    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }

    /// What has been drawn so far, flushed or not
    pub fn canvas(&self) -> &Buffer {
        &self.canvas
    }

    /// Drawing cursor as `(row, col)`
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor.0 as usize, self.cursor.1 as usize)
    }

    fn fit_canvas(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if area != self.canvas.area {
            debug!("screen resized to {}x{}", size.width, size.height);
            self.canvas.resize(area);
        }
        Ok(())
    }

    fn take_tty(&mut self) -> Result<()> {
        if self.owns_tty {
            crossterm::terminal::enable_raw_mode()?;
            crossterm::execute!(std::io::stderr(), EnterAlternateScreen)?;
            if self.mouse {
                crossterm::execute!(std::io::stderr(), EnableMouseCapture)?;
            }
        }
        self.managed = true;
        Ok(())
    }

    fn release_tty(&mut self) -> Result<()> {
        if self.owns_tty && self.managed {
            if self.mouse {
                crossterm::execute!(std::io::stderr(), DisableMouseCapture)?;
            }
            crossterm::execute!(std::io::stderr(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        self.managed = false;
        Ok(())
    }
}

impl<B> Screen for Tui<B>
where
    B: Backend + Send + 'static,
    B::Error: Send + Sync + 'static,
{
    fn init(&mut self, theme: &ColorTheme, black: bool, mouse: bool) -> Result<()> {
        self.theme = if black { theme.with_black_background() } else { *theme };
        self.mouse = mouse;
        self.take_tty()?;
        self.clear()
    }

    fn max_rows(&self) -> usize {
        self.canvas.area.height as usize
    }

    fn max_cols(&self) -> usize {
        self.canvas.area.width as usize
    }

    fn move_cursor(&mut self, row: usize, col: usize, clear_line: bool) {
        let area = self.canvas.area;
        let row = (row as u16).min(area.height.saturating_sub(1));
        let col = (col as u16).min(area.width);
        self.cursor = (row, col);
        if clear_line {
            for x in col..area.width {
                if let Some(cell) = self.canvas.cell_mut((x, row)) {
                    cell.reset();
                    cell.set_style(self.theme.normal);
                }
            }
        }
    }

    fn print(&mut self, color: ColorId, bold: bool, text: &str) {
        let (row, col) = self.cursor;
        let width = self.canvas.area.width;
        if row >= self.canvas.area.height || col >= width {
            return;
        }
        let mut style = self.theme.style(color);
        if bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        let (x, _) = self.canvas.set_stringn(col, row, text, (width - col) as usize, style);
        self.cursor = (row, x);
    }

    fn clear(&mut self) -> Result<()> {
        self.fit_canvas()?;
        self.canvas.reset();
        let area = self.canvas.area;
        self.canvas.set_style(area, self.theme.normal);
        self.terminal.clear()?;
        Ok(())
    }

    fn leave_managed_mode(&mut self) -> Result<()> {
        self.release_tty()
    }

    fn enter_managed_mode(&mut self) -> Result<()> {
        self.take_tty()
    }

    fn refresh(&mut self) -> Result<()> {
        let canvas = &self.canvas;
        let (row, col) = self.cursor;
        self.terminal.draw(|frame| {
            let area = frame.area().intersection(canvas.area);
            let buf = frame.buffer_mut();
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(src), Some(dst)) = (canvas.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
            frame.set_cursor_position(Position::new(col, row));
        })?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.release_tty()
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        if self.owns_tty && self.managed {
            let _ = crossterm::execute!(std::io::stderr(), DisableMouseCapture, LeaveAlternateScreen, cursor::Show);
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            ratatui::restore(); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    });
}

/// [`EventSource`] reading the controlling terminal through crossterm
#[derive(Debug, Default)]
pub struct CrosstermEvents {
    last_click: Option<(Instant, u16, u16)>,
}

impl CrosstermEvents {
    /// Creates a reader with no pending click
    pub fn new() -> Self {
        Self::default()
    }

    fn translate_mouse(&mut self, mouse: MouseEvent) -> Option<MouseInput> {
        let modifier = mouse
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        let gesture = match mouse.kind {
            MouseEventKind::ScrollUp => MouseGesture::Wheel(1),
            MouseEventKind::ScrollDown => MouseGesture::Wheel(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                let now = Instant::now();
                match self.last_click.take() {
                    Some((at, row, col))
                        if now.duration_since(at) < DOUBLE_CLICK_DURATION
                            && row == mouse.row
                            && col == mouse.column =>
                    {
                        MouseGesture::DoubleClick
                    }
                    _ => {
                        self.last_click = Some((now, mouse.row, mouse.column));
                        MouseGesture::Click
                    }
                }
            }
            _ => return None,
        };
        Some(MouseInput {
            row: mouse.row as usize,
            col: mouse.column as usize,
            gesture,
            modifier,
        })
    }
}

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> Result<InputEvent> {
        loop {
            match crossterm::event::read()? {
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => return Ok(InputEvent::Key(key)),
                CrosstermEvent::Mouse(mouse) => {
                    if let Some(input) = self.translate_mouse(mouse) {
                        return Ok(InputEvent::Mouse(input));
                    }
                }
                // resizes come from SIGWINCH
                _ => {}
            }
        }
    }
}
