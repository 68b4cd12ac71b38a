//! Application state and TUI event loop for the crime dashboard.
//!
//! [`App`] owns the theme and the last navigation error; the period state
//! itself lives in the [`DashboardSession`] the loop drives.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use dashboard_core::models::ViewMode;
use dashboard_runtime::session::DashboardSession;

use crate::dashboard_view;
use crate::themes::Theme;

// ── Action ────────────────────────────────────────────────────────────────────

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchMode(ViewMode),
    /// Move this many periods; negative is backwards.
    Step(i32),
}

impl Action {
    /// Map a key event to an action, or `None` for unbound keys.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::SwitchMode(ViewMode::Daily)),
            KeyCode::Char('w') => Some(Action::SwitchMode(ViewMode::Weekly)),
            KeyCode::Char('m') => Some(Action::SwitchMode(ViewMode::Monthly)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Step(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Step(1)),
            _ => None,
        }
    }
}

/// Leave the alternate screen and raw mode.
///
/// Called when the loop ends and by callers that cancel [`App::run`].
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Message from the last rejected navigation, cleared on success.
    pub status: Option<String>,
}

impl App {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            should_quit: false,
            status: None,
        }
    }

    /// Run the dashboard until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout and yields to the
    /// runtime between polls so an enclosing `tokio::select!` can observe
    /// Ctrl+C. The loop exits on `q`, `Esc`, or `Ctrl+C`.
    pub async fn run(mut self, mut session: DashboardSession) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut report = session.report();
        let summary = session.summary();

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, &report, &summary)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = Action::from_key(key) {
                            if self.apply(action, &mut session) {
                                report = session.report();
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
            tokio::task::yield_now().await;
        };

        restore_terminal()?;
        terminal.show_cursor()?;

        result
    }

    /// Apply `action` to the session. Returns `true` when the selected
    /// period changed and the report must be recomputed.
    pub fn apply(&mut self, action: Action, session: &mut DashboardSession) -> bool {
        let outcome = match action {
            Action::Quit => {
                self.should_quit = true;
                return false;
            }
            Action::SwitchMode(mode) => session.switch_mode(mode).map(|f| f.label.clone()),
            Action::Step(delta) => session.step(delta).map(|f| f.label.clone()),
        };

        match outcome {
            Ok(label) => {
                tracing::debug!(period = %label, "navigated");
                self.status = None;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "navigation rejected");
                self.status = Some(e.to_string());
                false
            }
        }
    }

    fn render(
        &self,
        frame: &mut Frame,
        report: &dashboard_data::aggregator::PeriodReport,
        summary: &dashboard_data::analysis::DatasetSummary,
    ) {
        let area = frame.area();
        dashboard_view::render_dashboard(frame, area, report, summary, self.status.as_deref(), &self.theme);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
