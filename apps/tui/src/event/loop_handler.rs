use chuva_alerta_core::{CardView, Metric, RiskTier};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{AppEvent, PollGuard};
use crate::api::WeatherSource;
use crate::app::{handle_input, App, AppActions};
use crate::terminal::DashboardTerminal;
use crate::ui;

/// Fetch once, print every neighborhood's card and exit.
pub async fn run_headless(app: &mut App, source: &dyn WeatherSource, json: bool) -> Result<()> {
    let result = source.current().await;
    if let Err(error) = &result {
        tracing::error!(%error, "could not load current conditions");
    }
    app.apply_event(AppEvent::Snapshots(result));

    let report = build_headless_report(app);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

fn render_headless_text(report: &HeadlessReport) {
    println!("\nChuvaAlertaRJ");
    println!("=============");
    println!("Source: {}", report.api);
    println!("Fetched at: {}", report.fetched_at);

    for card in &report.neighborhoods {
        println!();
        match &card.risk {
            None => println!("{} | Aguardando conexão...", card.name),
            Some(risk) => {
                let updated = card.updated_at.as_deref().unwrap_or("--:--");
                println!("{} | {} | atualizado às {updated}", card.name, risk.label);
                for metric in &card.metrics {
                    println!("  - {}: {} {}", metric.label, metric.value, metric.unit);
                }
            }
        }
    }
}

fn build_headless_report(app: &App) -> HeadlessReport {
    let neighborhoods = app
        .dashboard
        .cards()
        .into_iter()
        .map(|card| match card {
            CardView::Skeleton { name } => HeadlessCard {
                name,
                risk: None,
                updated_at: None,
                metrics: Vec::new(),
            },
            CardView::Metrics(card) => HeadlessCard {
                name: card.name,
                risk: Some(HeadlessRisk {
                    tier: card.risk.tier,
                    label: card.risk.label,
                    color: card.risk.color.hex,
                }),
                updated_at: card.updated_at,
                metrics: card.metrics.to_vec(),
            },
        })
        .collect();

    HeadlessReport {
        api: app.api_base_url.clone(),
        fetched_at: chrono::Local::now().to_rfc3339(),
        neighborhoods,
    }
}

#[derive(serde::Serialize)]
struct HeadlessReport {
    api: String,
    fetched_at: String,
    neighborhoods: Vec<HeadlessCard>,
}

#[derive(serde::Serialize)]
struct HeadlessCard {
    name: &'static str,
    /// `None` while the neighborhood has no usable reading.
    risk: Option<HeadlessRisk>,
    updated_at: Option<String>,
    metrics: Vec<Metric>,
}

#[derive(serde::Serialize)]
struct HeadlessRisk {
    tier: RiskTier,
    label: &'static str,
    color: &'static str,
}

/// Run the main dashboard event loop until the user quits.
pub async fn run(
    terminal: &mut DashboardTerminal,
    app: &mut App,
    actions: &AppActions,
    mut events: UnboundedReceiver<AppEvent>,
    poll_interval: Duration,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    // Stops polling when the loop exits, however it exits
    let _poll = PollGuard::spawn(actions.clone(), poll_interval);

    loop {
        while let Ok(event) = events.try_recv() {
            app.apply_event(event);
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code, actions);
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use chuva_alerta_core::{parse_snapshots, Registry};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn headless_report_lists_every_neighborhood() {
        let source = FakeSource::default();
        *source.snapshots.lock().unwrap() = parse_snapshots(json!({
            "Acari": {"nivel_risco": "medio", "chuva_mm": 7.0, "precipitacao": 7.0, "vento_velocidade": 10.0}
        }))
        .unwrap()
        .snapshots;

        let mut app = App::new(Registry::default(), "http://localhost:8000");
        run_headless(&mut app, &source, true).await.unwrap();

        let report = build_headless_report(&app);
        assert_eq!(report.neighborhoods.len(), 5);
        let acari = &report.neighborhoods[0];
        assert_eq!(acari.risk.as_ref().map(|risk| risk.label), Some("ATENÇÃO"));
        assert_eq!(acari.metrics[0].value, "7.0");
        assert!(report.neighborhoods[1..].iter().all(|card| card.risk.is_none()));
    }

    #[tokio::test]
    async fn headless_survives_an_unreachable_service() {
        let source = FakeSource::default();
        source.fail.store(true, Ordering::SeqCst);

        let mut app = App::new(Registry::default(), "http://localhost:8000");
        run_headless(&mut app, &source, false).await.unwrap();

        assert!(!app.dashboard.is_loading());
        assert!(build_headless_report(&app)
            .neighborhoods
            .iter()
            .all(|card| card.risk.is_none()));
    }
}
