use crate::app::{App, AppActions};
use crossterm::event::KeyCode;

mod dashboard;
mod help;

pub fn dispatch_input(app: &mut App, key: KeyCode, actions: &AppActions) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.popup_open && matches!(key, KeyCode::Esc) {
        app.popup_open = false;
        return;
    }

    dashboard::handle_dashboard_input(app, key, actions);
}
