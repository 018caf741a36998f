use crate::event::AppEvent;
use chrono::{DateTime, Local};
use chuva_alerta_core::{CardView, DashboardState, Registry, ToggleOutcome, TrendPanel};
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub dashboard: DashboardState,
    pub selected_index: usize,
    /// Sample under the trend tooltip.
    pub trend_cursor: usize,
    pub show_help: bool,
    pub popup_open: bool,
    /// Seconds since start, drives the high-risk pulse.
    pub animation_clock: f64,
    pub last_frame: Instant,
    pub throbber: ThrobberState,
    pub status_message: String,
    pub last_refresh: Option<DateTime<Local>>,
    pub api_base_url: String,
}

impl App {
    pub fn new(registry: Registry, api_base_url: &str) -> Self {
        Self {
            running: true,
            dashboard: DashboardState::new(registry),
            selected_index: 0,
            trend_cursor: 0,
            show_help: false,
            popup_open: false,
            animation_clock: 0.0,
            last_frame: Instant::now(),
            throbber: ThrobberState::default(),
            status_message: String::new(),
            last_refresh: None,
            api_base_url: api_base_url.to_string(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.animation_clock += delta.as_secs_f64();
        if self.dashboard.is_loading() {
            self.throbber.calc_next();
        }
    }

    /// Folds a finished fetch into the dashboard.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Snapshots(result) => {
                let failed = result.is_err();
                if failed {
                    // Details are logged by the dashboard state
                    self.status_message = "Error: serviço indisponível".to_string();
                }
                if self.dashboard.apply_snapshots(result) {
                    tracing::info!("first snapshot received; dashboard ready");
                }
                if !failed {
                    self.status_message.clear();
                    self.last_refresh = Some(Local::now());
                }
            }
            AppEvent::History {
                neighborhood,
                result,
            } => {
                if result.is_err() {
                    self.status_message = format!("Error: histórico de {neighborhood} indisponível");
                }
                self.dashboard.apply_history(&neighborhood, result);
                if self.dashboard.expanded() == Some(neighborhood.as_str()) {
                    self.trend_cursor = self
                        .dashboard
                        .history(&neighborhood)
                        .map_or(0, |samples| samples.len().saturating_sub(1));
                }
            }
        }
    }

    pub fn selected_name(&self) -> Option<&'static str> {
        self.dashboard
            .registry()
            .get(self.selected_index)
            .map(|entry| entry.name)
    }

    pub fn select_next(&mut self) {
        let len = self.dashboard.registry().len();
        self.select(crate::app::input::cycle(self.selected_index, len, true));
    }

    pub fn select_previous(&mut self) {
        let len = self.dashboard.registry().len();
        self.select(crate::app::input::cycle(self.selected_index, len, false));
    }

    fn select(&mut self, index: usize) {
        if index != self.selected_index {
            self.selected_index = index;
            self.popup_open = false;
        }
    }

    /// Toggles the trend panel of the selected card. Returns the
    /// neighborhood whose history must be fetched, if any. Skeleton cards
    /// have no panel and are left alone.
    pub fn toggle_selected_trend(&mut self) -> Option<&'static str> {
        let name = self.selected_name()?;
        if !self.dashboard.has_reading(name) {
            return None;
        }
        match self.dashboard.toggle(name) {
            ToggleOutcome::Expanded { fetch_history } => {
                self.trend_cursor = self.dashboard.history(name).map_or(0, |samples| {
                    samples.len().saturating_sub(1)
                });
                fetch_history.then_some(name)
            }
            ToggleOutcome::Collapsed => None,
        }
    }

    pub fn move_trend_cursor(&mut self, forward: bool) {
        let Some(len) = self.expanded_series_len() else {
            return;
        };
        self.trend_cursor = if forward {
            (self.trend_cursor + 1).min(len - 1)
        } else {
            self.trend_cursor.saturating_sub(1).min(len - 1)
        };
    }

    fn expanded_series_len(&self) -> Option<usize> {
        let expanded = self.dashboard.expanded()?;
        self.dashboard.cards().into_iter().find_map(|card| match card {
            CardView::Metrics(card) if card.name == expanded => match card.trend {
                TrendPanel::Chart(series) => Some(series.len()),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn toggle_popup(&mut self) {
        self.popup_open = !self.popup_open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use serde_json::json;

    fn app() -> App {
        App::new(Registry::default(), "http://localhost")
    }

    fn app_with_readings() -> App {
        let mut app = app();
        app.apply_event(AppEvent::Snapshots(Ok(
            chuva_alerta_core::parse_snapshots(json!({"Acari": {"chuva_mm": 1.0}}))
                .unwrap()
                .snapshots,
        )));
        app
    }

    #[test]
    fn selection_wraps_and_closes_popup() {
        let mut app = app();
        app.toggle_popup();
        app.select_previous();
        assert_eq!(app.selected_name(), Some("Guadalupe"));
        assert!(!app.popup_open);
        app.select_next();
        assert_eq!(app.selected_name(), Some("Acari"));
    }

    #[test]
    fn first_expand_requests_history_once() {
        let mut app = app_with_readings();
        assert_eq!(app.toggle_selected_trend(), Some("Acari"));
        assert_eq!(app.toggle_selected_trend(), None);
        assert_eq!(app.dashboard.expanded(), None);
        assert_eq!(app.toggle_selected_trend(), None);
    }

    #[test]
    fn skeleton_cards_do_not_toggle() {
        let mut app = app();
        app.apply_event(AppEvent::Snapshots(Ok(chuva_alerta_core::SnapshotMap::new())));
        assert_eq!(app.toggle_selected_trend(), None);
        assert_eq!(app.dashboard.expanded(), None);

        let mut app = app_with_readings();
        assert_eq!(app.toggle_selected_trend(), Some("Acari"));
        app.select_next();
        assert_eq!(app.toggle_selected_trend(), None);
        assert_eq!(app.dashboard.expanded(), Some("Acari"));
    }

    #[test]
    fn trend_cursor_stays_inside_series() {
        let mut app = app_with_readings();
        app.toggle_selected_trend();
        app.apply_event(AppEvent::History {
            neighborhood: "Acari".to_string(),
            result: Ok(vec![
                json!({"horario": "10:00", "chuva": 1.0}),
                json!({"horario": "10:15", "chuva": 2.0}),
            ]),
        });

        app.move_trend_cursor(true);
        app.move_trend_cursor(true);
        assert_eq!(app.trend_cursor, 1);
        app.move_trend_cursor(false);
        app.move_trend_cursor(false);
        assert_eq!(app.trend_cursor, 0);
    }

    #[test]
    fn failed_snapshot_sets_status_and_ends_loading() {
        let mut app = app();
        let error = ApiError::Decode {
            url: "http://localhost/clima/atual".to_string(),
            source: chuva_alerta_core::PayloadError::NotAnObject("an array"),
        };
        app.apply_event(AppEvent::Snapshots(Err(error)));
        assert!(!app.dashboard.is_loading());
        assert!(app.status_message.starts_with("Error"));
        assert!(app.last_refresh.is_none());
    }
}
