//! Main application logic and TUI event loop.

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    widgets::TableState,
    Terminal,
};
use tracing::{debug, info};

use crate::data::{Place, SortMode};
use crate::presenter::{DisplaySurface, ListPresenter};
use crate::ui::{
    popup::{AlertPopup, DetailPopup, SortMenu},
    widgets::{Header, PlaceTable, StatusBar},
    HelpOverlay, Theme,
};

/// A pending one-shot message
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Display surface backed by the terminal: keeps what the presenter last
/// pushed so the immediate-mode renderer can draw it every frame.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    rows: Vec<Place>,
    loaded: bool,
    busy: bool,
    alerts: VecDeque<Alert>,
}

impl TerminalSurface {
    pub fn rows(&self) -> &[Place] {
        &self.rows
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn take_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }
}

impl DisplaySurface for TerminalSurface {
    fn render(&mut self, places: &[Place]) {
        self.rows = places.to_vec();
        self.loaded = true;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn show_alert(&mut self, title: &str, message: &str) {
        self.alerts.push_back(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

/// What is drawn on top of the place table
#[derive(Debug, Clone, PartialEq)]
enum Overlay {
    None,
    Help,
    SortMenu { highlighted: usize },
    Alert(Alert),
    Detail(Place),
}

/// Application state
pub struct App {
    presenter: ListPresenter<TerminalSurface>,
    theme: Theme,
    table_state: TableState,
    overlay: Overlay,
    selections: Receiver<Place>,
    tick: usize,
    should_quit: bool,
}

impl App {
    /// Create a new App and wire the selection hook
    pub fn new(mut presenter: ListPresenter<TerminalSurface>) -> Self {
        let (tx, rx) = mpsc::channel();
        presenter.set_selection_handler(move |place| {
            debug!(name = %place.name, "place selected");
            let _ = tx.send(place.clone());
        });

        App {
            presenter,
            theme: Theme::default(),
            table_state: TableState::default(),
            overlay: Overlay::None,
            selections: rx,
            tick: 0,
            should_quit: false,
        }
    }

    /// Show the local copy, then kick off a remote refresh
    pub fn start(&mut self) {
        self.presenter.initialize();
        self.presenter.begin_load();
        self.clamp_selection();
    }

    /// Periodic work: apply finished loads and surface pending alerts
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.presenter.poll_load() {
            self.clamp_selection();
        }
        if self.overlay == Overlay::None {
            if let Some(alert) = self.presenter.surface_mut().take_alert() {
                self.overlay = Overlay::Alert(alert);
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.presenter.surface().rows().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.presenter.surface().rows().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.table_state.select(Some(next));
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyCode) {
        match &self.overlay {
            Overlay::SortMenu { highlighted } => {
                let highlighted = *highlighted;
                self.handle_sort_menu(key, highlighted);
                return;
            }
            Overlay::Alert(_) | Overlay::Detail(_) => {
                if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::Help => {
                if matches!(
                    key,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1)
                ) {
                    self.overlay = Overlay::None;
                    return;
                }
            }
            Overlay::None => {}
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                self.overlay = Overlay::Help;
            }
            _ if self.overlay == Overlay::Help => {}
            KeyCode::Char('r') => {
                self.presenter.begin_load();
            }
            KeyCode::Char('s') => {
                // Sort action is disabled while a load is running
                if !self.presenter.is_busy() {
                    let highlighted = SortMode::ALL
                        .iter()
                        .position(|m| *m == self.presenter.sort_mode())
                        .unwrap_or(0);
                    self.overlay = Overlay::SortMenu { highlighted };
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.presenter.surface().rows().is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                let len = self.presenter.surface().rows().len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
            }
            KeyCode::Enter => {
                if let Some(idx) = self.table_state.selected() {
                    self.presenter.select(idx);
                }
                if let Ok(place) = self.selections.try_recv() {
                    self.overlay = Overlay::Detail(place);
                }
            }
            _ => {}
        }
    }

    fn handle_sort_menu(&mut self, key: KeyCode, highlighted: usize) {
        let choice = match key {
            KeyCode::Char('n') => Some(Some(SortMode::ByName)),
            KeyCode::Char('r') => Some(Some(SortMode::ByRating)),
            KeyCode::Enter => Some(SortMode::ALL.get(highlighted).copied()),
            KeyCode::Esc | KeyCode::Char('q') => Some(None),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Up | KeyCode::Char('k') => {
                self.overlay = Overlay::SortMenu {
                    highlighted: (highlighted + 1) % SortMode::ALL.len(),
                };
                None
            }
            _ => None,
        };

        if let Some(choice) = choice {
            self.overlay = Overlay::None;
            self.presenter.choose_sort(choice);
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Table
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        let surface = self.presenter.surface();

        Header::new(self.presenter.sort_mode(), surface.is_busy(), self.tick, &self.theme)
            .render(frame, chunks[0]);

        PlaceTable::new(surface.rows(), surface.loaded, &self.theme).render(
            frame,
            chunks[1],
            &mut self.table_state,
        );

        let count = self.presenter.places().map(<[Place]>::len);
        StatusBar::new(count, !surface.is_busy(), &self.theme).render(frame, chunks[2]);

        match &self.overlay {
            Overlay::None => {}
            Overlay::Help => HelpOverlay::new(&self.theme).render(frame, size),
            Overlay::SortMenu { highlighted } => {
                SortMenu::new(self.presenter.sort_mode(), *highlighted, &self.theme)
                    .render(frame, size)
            }
            Overlay::Alert(alert) => {
                AlertPopup::new(&alert.title, &alert.message, &self.theme).render(frame, size)
            }
            Overlay::Detail(place) => DetailPopup::new(place, &self.theme).render(frame, size),
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run the TUI application. Must be called inside a tokio runtime context.
pub fn run(presenter: ListPresenter<TerminalSurface>, tick_rate: Duration) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let mut app = App::new(presenter);
    app.start();
    info!("browser started");

    let result = run_main_loop(&mut terminal, &mut app, tick_rate);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| app.render(f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
