use chuva_alerta_core::{DashboardState, Registry, SnapshotMap, ToggleOutcome};
use ratzilla::event::KeyCode;
use serde_json::Value;

use crate::animation::advance_clock;
use crate::fetch::FetchError;

/// Network work a key press asks the runtime to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    FetchHistory(&'static str),
}

#[derive(Debug)]
pub struct WebState {
    pub dashboard: DashboardState,
    pub selected: usize,
    pub trend_cursor: usize,
    pub popup_open: bool,
    pub show_help: bool,
    /// Pulse clock, in seconds.
    pub clock: f64,
    last_tick: Option<f64>,
    pub last_error: Option<String>,
}

impl WebState {
    pub fn new(registry: Registry) -> Self {
        Self {
            dashboard: DashboardState::new(registry),
            selected: 0,
            trend_cursor: 0,
            popup_open: false,
            show_help: false,
            clock: 0.0,
            last_tick: None,
            last_error: None,
        }
    }

    pub fn tick(&mut self, now_seconds: f64) {
        (self.clock, self.last_tick) = advance_clock(self.clock, self.last_tick, now_seconds);
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.dashboard
            .registry()
            .get(self.selected)
            .map(|entry| entry.name)
    }

    pub fn apply_snapshots(&mut self, result: Result<SnapshotMap, FetchError>) {
        self.last_error = result.as_ref().err().map(ToString::to_string);
        self.dashboard.apply_snapshots(result);
    }

    pub fn apply_history(&mut self, neighborhood: &str, result: Result<Vec<Value>, FetchError>) {
        if let Err(error) = &result {
            web_log(&format!("history for {neighborhood} failed: {error}"));
        }
        self.dashboard.apply_history(neighborhood, result);
        if self.dashboard.expanded() == Some(neighborhood) {
            self.trend_cursor = self.history_len(neighborhood).saturating_sub(1);
        }
    }

    fn history_len(&self, neighborhood: &str) -> usize {
        self.dashboard.history(neighborhood).map_or(0, <[_]>::len)
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<Command> {
        if matches!(key, KeyCode::Char('?')) {
            self.show_help = !self.show_help;
            return None;
        }
        if matches!(key, KeyCode::Esc) {
            self.show_help = false;
            self.popup_open = false;
            return None;
        }
        if self.show_help {
            return None;
        }

        let len = self.dashboard.registry().len();
        match key {
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                self.select(if self.selected == 0 { len - 1 } else { self.selected - 1 });
                None
            }
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                self.select((self.selected + 1) % len);
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.trend_cursor = self.trend_cursor.saturating_sub(1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let expanded_len = self
                    .dashboard
                    .expanded()
                    .map_or(0, |name| self.history_len(name));
                self.trend_cursor = (self.trend_cursor + 1).min(expanded_len.saturating_sub(1));
                None
            }
            KeyCode::Enter | KeyCode::Char('t') => self.toggle_selected(),
            KeyCode::Char('m' | ' ') => {
                self.popup_open = !self.popup_open;
                None
            }
            KeyCode::Char('r') => Some(Command::Refresh),
            _ => None,
        }
    }

    fn select(&mut self, index: usize) {
        if index != self.selected {
            self.selected = index;
            self.popup_open = false;
        }
    }

    fn toggle_selected(&mut self) -> Option<Command> {
        let name = self.selected_name()?;
        if !self.dashboard.has_reading(name) {
            return None;
        }
        match self.dashboard.toggle(name) {
            ToggleOutcome::Expanded { fetch_history } => {
                self.trend_cursor = self.history_len(name).saturating_sub(1);
                fetch_history.then_some(Command::FetchHistory(name))
            }
            ToggleOutcome::Collapsed => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn web_log(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn web_log(message: &str) {
    eprintln!("{message}");
}
