// App module for chuva_alerta_tui
// Handles dashboard state and the fetches it triggers

pub mod actions;
pub mod input;
pub mod state;

pub use actions::AppActions;
pub use input::handle_input;
pub use state::App;
