use crate::app::{App, AppActions};
use crossterm::event::KeyCode;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode, actions: &AppActions) {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.move_trend_cursor(false),
        KeyCode::Right | KeyCode::Char('l') => app.move_trend_cursor(true),
        KeyCode::Enter | KeyCode::Char('t') => {
            if let Some(neighborhood) = app.toggle_selected_trend() {
                actions.fetch_history(neighborhood);
            }
        }
        KeyCode::Char('m' | ' ') => app.toggle_popup(),
        KeyCode::Char('r') => {
            app.status_message = "Atualizando...".to_string();
            actions.refresh_snapshots();
        }
        _ => {}
    }
}
