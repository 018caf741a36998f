use chuva_alerta_core::Registry;
use chuva_alerta_tui::api::{HttpWeatherClient, WeatherSource};
use chuva_alerta_tui::app::{App, AppActions};
use chuva_alerta_tui::cli::CliArgs;
use chuva_alerta_tui::config::init_app_config;
use chuva_alerta_tui::logging::{init_tracing, LogSink};
use chuva_alerta_tui::{event, terminal};
use clap::Parser;
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    let headless = args.headless || args.json || !is_terminal();
    let sink = if headless {
        LogSink::Stderr
    } else {
        LogSink::File(&config.log_file)
    };
    let _log_guard = init_tracing(sink, args.debug);
    config.log_config();

    let client = HttpWeatherClient::new(&config.api_base_url, config.connect_timeout)?;
    let source: Arc<dyn WeatherSource> = Arc::new(client);

    // Initialize application state
    let mut app = App::new(Registry::default(), &config.api_base_url);

    if headless {
        return event::run_headless(&mut app, source.as_ref(), args.json).await;
    }

    let (sender, receiver) = mpsc::unbounded_channel();
    let actions = AppActions::new(source, sender);

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(
        &mut terminal,
        &mut app,
        &actions,
        receiver,
        config.poll_interval,
    )
    .await;

    // Restore terminal
    terminal::cleanup(true, true);

    if let Err(error) = &result {
        tracing::error!(%error, "dashboard exited with an error");
    }
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
