// Rendering for the dashboard: a loading screen until the first snapshot
// arrives, then the map and card panels with optional overlays.

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    if app.dashboard.is_loading() {
        screens::loading::render_loading(app, f);
    } else {
        screens::dashboard::render_dashboard(app, f);
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::event::AppEvent;
    use chuva_alerta_core::{parse_snapshots, Registry, SnapshotMap};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use reqwest::StatusCode;
    use serde_json::json;

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ready_app(snapshots: SnapshotMap) -> App {
        let mut app = App::new(Registry::default(), "http://localhost:8000");
        app.apply_event(AppEvent::Snapshots(Ok(snapshots)));
        app
    }

    fn acari_high() -> SnapshotMap {
        parse_snapshots(json!({
            "Acari": {"nivel_risco": "alto", "chuva_mm": 18.44, "precipitacao": 18.4,
                      "vento_velocidade": 21.6, "horario_registro": "2024-02-10T15:40:00"}
        }))
        .unwrap()
        .snapshots
    }

    #[test]
    fn loading_screen_until_first_snapshot() {
        let app = App::new(Registry::default(), "http://localhost:8000");
        let screen = rendered(&app, 100, 30);
        assert!(screen.contains("Sincronizando dados meteorológicos..."));
        assert!(!screen.contains("ChuvaAlertaRJ"));
    }

    #[test]
    fn ready_dashboard_shows_header_and_every_neighborhood() {
        let app = ready_app(acari_high());
        let screen = rendered(&app, 140, 60);

        assert!(screen.contains("ChuvaAlertaRJ • Monitoramento em Tempo Real"));
        for name in ["Acari", "Campo Grande", "Bonsucesso", "Botafogo", "Guadalupe"] {
            assert!(screen.contains(name), "missing {name}");
        }
        assert!(screen.contains("RISCO ALTO"));
        assert!(screen.contains("SITUAÇÃO RISCO ALTO"));
        assert!(screen.contains("Chuva (1h): 18.4 mm"));
        assert!(screen.contains("Atualizado às 15:40"));
        assert!(screen.contains("Ver Tendência"));
        assert!(screen.contains("Aguardando conexão..."));
    }

    #[test]
    fn failed_first_fetch_renders_skeletons_only() {
        let mut app = App::new(Registry::default(), "http://localhost:8000");
        app.apply_event(AppEvent::Snapshots(Err(ApiError::Status {
            url: "http://localhost:8000/clima/atual".to_string(),
            status: StatusCode::BAD_GATEWAY,
        })));

        let screen = rendered(&app, 140, 60);
        assert!(screen.contains("ChuvaAlertaRJ"));
        assert!(!screen.contains("SITUAÇÃO"));
        assert_eq!(screen.matches("Aguardando conexão...").count(), 5);
    }

    #[test]
    fn expanded_card_shows_loading_placeholder_then_chart() {
        let mut app = ready_app(acari_high());
        assert_eq!(app.toggle_selected_trend(), Some("Acari"));

        let screen = rendered(&app, 140, 60);
        assert!(screen.contains("Ocultar Gráfico"));
        assert!(screen.contains("Carregando histórico..."));

        app.apply_event(AppEvent::History {
            neighborhood: "Acari".to_string(),
            result: Ok(vec![
                json!({"horario": "10:00", "chuva": 1.0}),
                json!({"horario": "11:00", "chuva": 4.5}),
            ]),
        });
        let screen = rendered(&app, 140, 60);
        assert!(!screen.contains("Carregando histórico..."));
        assert!(screen.contains("11:00 • 4.5 mm"));
    }

    #[test]
    fn empty_history_shows_waiting_placeholder() {
        let mut app = ready_app(acari_high());
        app.toggle_selected_trend();
        app.apply_event(AppEvent::History {
            neighborhood: "Acari".to_string(),
            result: Ok(Vec::new()),
        });

        let screen = rendered(&app, 140, 60);
        assert!(screen.contains("Aguardando dados..."));
    }

    #[test]
    fn popup_reports_no_signal_for_missing_snapshot() {
        let mut app = ready_app(acari_high());
        app.select_next();
        app.toggle_popup();

        let screen = rendered(&app, 140, 60);
        assert!(screen.contains("Sem sinal"));
    }

    #[test]
    fn popup_reports_rainfall_for_live_snapshot() {
        let mut app = ready_app(acari_high());
        app.toggle_popup();

        let screen = rendered(&app, 140, 60);
        assert!(screen.contains("Chuva: 18.4 mm"));
    }

    #[test]
    fn help_overlay_lists_shortcuts() {
        let mut app = ready_app(SnapshotMap::new());
        app.show_help = true;

        let screen = rendered(&app, 120, 40);
        assert!(screen.contains("Ajuda & Atalhos"));
        assert!(screen.contains("Selecionar bairro"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let app = ready_app(acari_high());
        rendered(&app, 10, 5);
        rendered(&app, 1, 1);
    }
}
