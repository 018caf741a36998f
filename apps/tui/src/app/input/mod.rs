mod helpers;
pub mod screens;

use crate::app::{App, AppActions};
use crossterm::event::KeyCode;

pub use helpers::cycle;

pub fn handle_input(app: &mut App, key: KeyCode, actions: &AppActions) {
    screens::dispatch_input(app, key, actions);
}
