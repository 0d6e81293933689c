//! Terminal host (impure shell).
//!
//! Owns the terminal, the data source and one [`VirtualGrid`]. Each loop
//! iteration drains pending terminal events, polls the source, runs one grid
//! frame and redraws if anything changed.

mod status;
mod styles;
pub mod table;

pub use status::StatusLine;
pub use styles::{ColorConfig, TableStyles};
pub use table::GridView;

use crate::model::{AppError, JsonRow};
use crate::source::InputSource;
use crate::view_state::{StickyHeader, VirtualGrid};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Target frame interval (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Lines reserved below the grid for the status line.
const STATUS_HEIGHT: u16 = 1;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: i64 = 3;

/// Columns moved per horizontal scroll step.
const HORIZONTAL_STEP: i32 = 4;

/// Longest a live source's new rows wait before the grid sees them.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(250);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// Terminal read/write failed.
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// The data source failed.
    #[error("Input error: {0}")]
    Input(#[from] crate::model::InputError),

    /// Any other application error.
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    grid: VirtualGrid<JsonRow>,
    source: InputSource,
    /// Every row received so far; the grid sees a snapshot of this.
    rows: Vec<JsonRow>,
    /// Length of the last snapshot handed to the grid.
    published: usize,
    last_publish: Instant,
    styles: TableStyles,
    /// Set by events that change the picture without a grid recomputation.
    dirty: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Put the terminal in raw mode on the alternate screen and start the app.
    pub fn new(
        source: InputSource,
        grid: VirtualGrid<JsonRow>,
        styles: TableStyles,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, source, grid, styles)
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Start the app on an already prepared terminal.
    ///
    /// Sizes the grid to the terminal and takes whatever the source has ready.
    pub fn with_terminal(
        terminal: Terminal<B>,
        source: InputSource,
        mut grid: VirtualGrid<JsonRow>,
        styles: TableStyles,
    ) -> Result<Self, TuiError> {
        let size = terminal.size()?;
        grid.on_resize(body_height(size.height));

        let mut app = Self {
            terminal,
            grid,
            source,
            rows: Vec::new(),
            published: 0,
            last_publish: Instant::now(),
            styles,
            dirty: true,
        };
        app.poll_input();
        Ok(app)
    }

    /// Run until the user quits (q, Esc or Ctrl+C).
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.tick();
        self.draw()?;

        loop {
            if event::poll(FRAME_INTERVAL)? {
                // Drain everything queued so a burst costs one frame.
                loop {
                    if self.handle_event(event::read()?) {
                        return Ok(());
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.poll_input();
            if self.tick() {
                self.draw()?;
            }
        }
    }

    /// Apply one terminal event. Returns true if the app should quit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                self.grid.on_resize(body_height(height));
            }
            _ => return false,
        }
        self.dirty = true;
        false
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        let line = i64::from(self.grid.viewport().estimated_row_height.get());
        let page = i64::from(self.grid.container_height()).max(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.grid.scroll_by(line),
            KeyCode::Char('k') | KeyCode::Up => self.grid.scroll_by(-line),
            KeyCode::PageDown | KeyCode::Char(' ') => self.grid.scroll_by(page),
            KeyCode::PageUp => self.grid.scroll_by(-page),
            KeyCode::Char('g') | KeyCode::Home => self.grid.on_scroll(0),
            KeyCode::Char('G') | KeyCode::End => self.grid.on_scroll(u64::MAX),
            KeyCode::Char('h') | KeyCode::Left => self.grid.scroll_horizontal_by(-HORIZONTAL_STEP),
            KeyCode::Char('l') | KeyCode::Right => self.grid.scroll_horizontal_by(HORIZONTAL_STEP),
            _ => return false,
        }
        self.dirty = true;
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.grid.scroll_by(WHEEL_LINES),
            MouseEventKind::ScrollUp => self.grid.scroll_by(-WHEEL_LINES),
            MouseEventKind::ScrollRight => self.grid.scroll_horizontal_by(HORIZONTAL_STEP),
            MouseEventKind::ScrollLeft => self.grid.scroll_horizontal_by(-HORIZONTAL_STEP),
            _ => {}
        }
    }

    /// Take new rows from the source and hand the grid a fresh snapshot when
    /// one is due (see [`publish_due`]).
    ///
    /// A failing source is logged; rows received so far stay on screen.
    fn poll_input(&mut self) {
        match self.source.poll() {
            Ok(new_rows) => self.rows.extend(new_rows),
            Err(error) => {
                warn!(%error, rows = self.rows.len(), "Input source failed");
                self.dirty = true;
            }
        }

        let pending = self.rows.len() - self.published;
        if publish_due(
            self.published,
            pending,
            self.source.is_live(),
            self.last_publish.elapsed(),
        ) {
            self.grid.set_rows(Arc::from(self.rows.as_slice()));
            self.published = self.rows.len();
            self.last_publish = Instant::now();
            self.dirty = true;
        }
    }

    /// Run one grid frame. Returns true if a redraw is needed.
    fn tick(&mut self) -> bool {
        let recomputed = self.grid.on_frame();
        std::mem::take(&mut self.dirty) || recomputed
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let Self {
            terminal,
            grid,
            source,
            styles,
            ..
        } = self;

        let status = StatusLine {
            row_count: grid.row_count(),
            range: grid.visible_range(),
            skipped: source.skipped(),
            live: source.is_live(),
        };

        terminal.draw(|frame| {
            let area = frame.area();
            let table_height = area.height.saturating_sub(STATUS_HEIGHT);
            let table_area = Rect::new(area.x, area.y, area.width, table_height);
            let status_area = Rect::new(area.x, area.y + table_height, area.width, area.height - table_height);

            let grid_frame = grid.render();
            frame.render_widget(GridView::new(&grid_frame, styles), table_area);
            frame.render_widget(status.render(styles), status_area);
        })?;

        Ok(())
    }

    /// The grid being displayed.
    pub fn grid(&self) -> &VirtualGrid<JsonRow> {
        &self.grid
    }

    /// The terminal the app draws to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Tear down the grid, discarding any scheduled work.
    pub fn shutdown(self) {
        let discarded = self.grid.unmount();
        if !discarded.is_empty() {
            debug!(?discarded, "Discarded pending frame work on exit");
        }
    }
}

/// Whether `pending` unpublished rows should be handed to the grid now.
///
/// Every snapshot copies all rows, so while a source is live snapshots are
/// taken once the backlog reaches half of what is already published, or after
/// [`PUBLISH_INTERVAL`]. Total copying stays linear in the row count plus one
/// copy per interval. A finished source publishes immediately.
pub fn publish_due(published: usize, pending: usize, live: bool, since_last: Duration) -> bool {
    pending > 0
        && (!live || published == 0 || pending >= published / 2 || since_last >= PUBLISH_INTERVAL)
}

/// Body viewport height for a terminal of `height` lines.
fn body_height(height: u16) -> u32 {
    u32::from(height.saturating_sub(StickyHeader::HEIGHT + STATUS_HEIGHT))
}

/// Set up the terminal, run the app and restore the terminal.
///
/// Logging must be initialized by the caller.
pub fn run_with_source(
    source: InputSource,
    grid: VirtualGrid<JsonRow>,
    styles: TableStyles,
) -> Result<(), TuiError> {
    let mut app = TuiApp::new(source, grid, styles)?;
    let result = app.run();
    app.shutdown();

    restore_terminal()?;
    info!("Terminal restored");
    result
}

/// Disable raw mode and mouse capture, leave the alternate screen.
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
