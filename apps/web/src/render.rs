use chuva_alerta_core::registry::TILE_ATTRIBUTION;
use chuva_alerta_core::risk::{pulse_phase, Rgb};
use chuva_alerta_core::{
    CardView, MetricsCard, Projection, TrendPanel, TrendSeries, Viewport, NO_SIGNAL,
};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle},
        Axis, Block, BorderType, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Wrap,
    },
    Frame,
};

use crate::state::WebState;

const TREND_HEIGHT: u16 = 8;
const BANDS: [Color; 3] = [
    Color::Rgb(30, 58, 138),
    Color::Rgb(37, 99, 235),
    Color::Rgb(96, 165, 250),
];

const fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

pub fn render(state: &WebState, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("ChuvaAlertaRJ • Monitoramento em Tempo Real")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    if state.dashboard.is_loading() {
        let middle = Rect {
            y: inner.y + inner.height / 2,
            height: 1.min(inner.height),
            ..inner
        };
        f.render_widget(
            Paragraph::new("Sincronizando dados meteorológicos...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan)),
            middle,
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(inner);
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[0]);

    render_map(state, f, content[0]);
    render_cards(state, f, content[1]);
    render_footer(state, f, layout[1]);

    if state.popup_open {
        render_popup(state, f, content[0]);
    }
    if state.show_help {
        render_help(f, area);
    }
}

fn render_map(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Mapa de Risco ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 8 || inner.height < 4 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let projection = Projection::new(Viewport::default(), chunks[0].width, chunks[0].height);
    let markers = state.dashboard.markers(state.selected_name());
    let pulse = pulse_phase(state.clock);

    f.render_widget(
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, projection.width()])
            .y_bounds([0.0, projection.height()])
            .paint(|ctx| {
                for marker in &markers {
                    let (x, y) = projection.point(marker.position);
                    let radius = projection.radius(marker.style.radius.scale());
                    let color = rgb(marker.style.color);
                    if marker.style.pulse && pulse > 0.0 {
                        ctx.draw(&Circle {
                            x,
                            y,
                            radius: radius * pulse.mul_add(1.5, 1.0),
                            color,
                        });
                    }
                    let mut ring = radius;
                    while ring > 0.0 {
                        ctx.draw(&Circle { x, y, radius: ring, color });
                        ring -= 0.4;
                    }
                    let label = if marker.selected {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ctx.print(x + radius + 1.0, y, Span::styled(marker.name, label));
                }
            }),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(TILE_ATTRIBUTION)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

fn render_cards(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let cards = state.dashboard.cards();
    let constraints = cards
        .iter()
        .map(|card| match card {
            CardView::Metrics(card) if card.expanded => Constraint::Length(7 + TREND_HEIGHT),
            CardView::Metrics(_) => Constraint::Length(7),
            CardView::Skeleton { .. } => Constraint::Length(4),
        })
        .chain(std::iter::once(Constraint::Min(0)))
        .collect::<Vec<_>>();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, (card, slot)) in cards.iter().zip(slots.iter()).enumerate() {
        let selected = index == state.selected;
        let border = match card {
            CardView::Metrics(card) => rgb(card.risk.color),
            CardView::Skeleton { .. } => Color::DarkGray,
        };
        let block = Block::default()
            .title(format!(" {} ", card.name()))
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Thick } else { BorderType::Plain })
            .border_style(Style::default().fg(border));
        let inner = block.inner(*slot);
        f.render_widget(block, *slot);

        match card {
            CardView::Skeleton { .. } => f.render_widget(
                Paragraph::new("Aguardando conexão...")
                    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
                inner,
            ),
            CardView::Metrics(card) => render_metrics(card, state.trend_cursor, f, inner),
        }
    }
}

fn render_metrics(card: &MetricsCard, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    let color = rgb(card.risk.color);
    let trend_rows = if card.expanded { TREND_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(trend_rows),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            Span::styled(
                format!("{} {}", card.risk.icon.glyph(), card.risk.label),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  Atualizado às {}", card.updated_at.as_deref().unwrap_or("--:--")),
                Style::default().fg(Color::Gray),
            ),
        ])),
        chunks[0],
    );

    let metrics = card
        .metrics
        .iter()
        .map(|metric| {
            if metric.value == "--" {
                format!("{}: --", metric.label)
            } else {
                format!("{}: {} {}", metric.label, metric.value, metric.unit)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    f.render_widget(
        Paragraph::new(metrics).wrap(Wrap { trim: true }),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(card.toggle_label()).style(Style::default().fg(Color::Cyan)),
        chunks[2],
    );

    if card.expanded {
        render_trend(&card.trend, cursor, f, chunks[3]);
    }

    f.render_widget(
        Paragraph::new(format!("SITUAÇÃO {}", card.risk.label))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        chunks[4],
    );
}

fn render_trend(panel: &TrendPanel, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    match panel {
        TrendPanel::Chart(series) if area.width >= 16 && area.height >= 5 => {
            render_chart(series, cursor, f, area);
        }
        TrendPanel::Hidden => {}
        _ => {
            let text = panel.placeholder().unwrap_or("Aguardando dados...");
            let middle = Rect {
                y: area.y + area.height / 2,
                height: 1.min(area.height),
                ..area
            };
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Gray)),
                middle,
            );
        }
    }
}

fn render_chart(series: &TrendSeries, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    let cursor = series.clamp_cursor(cursor);
    let bands = series.area_fill(usize::from(area.width) * 2, usize::from(area.height) * 4);
    let cursor_point = [series.points()[cursor]];

    let mut datasets = bands
        .iter()
        .zip(BANDS)
        .map(|(band, color)| {
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(band)
        })
        .collect::<Vec<_>>();
    datasets.push(
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Rgb(59, 130, 246)))
            .data(series.points()),
    );
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::White))
            .data(&cursor_point),
    );

    let [_, y_max] = series.y_bounds();
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(series.tooltip(cursor))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(series.x_bounds())
                .labels(
                    series
                        .axis_labels()
                        .into_iter()
                        .map(|label| Span::raw(label.to_string()))
                        .collect::<Vec<_>>(),
                ),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(series.y_bounds())
                .labels(vec![Span::raw("0"), Span::raw(format!("{y_max:.1}"))]),
        );
    f.render_widget(chart, area);
}

fn render_popup(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(name) = state.selected_name() else {
        return;
    };
    let popup = state.dashboard.popup(name);

    let width = 34.min(area.width);
    let height = 5.min(area.height);
    let popup_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let mut lines = vec![TextLine::from(Span::styled(
        popup.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    match (popup.risk, popup.rainfall) {
        (Some(risk), Some(rainfall)) => {
            lines.push(TextLine::from(Span::styled(
                risk.label,
                Style::default().fg(rgb(risk.color)),
            )));
            lines.push(TextLine::from(format!("Chuva: {rainfall}")));
        }
        _ => lines.push(TextLine::from(NO_SIGNAL)),
    }

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
        popup_area,
    );
}

fn render_help(f: &mut Frame<'_>, area: Rect) {
    let width = 52.min(area.width);
    let height = 11.min(area.height);
    let help_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines = [
        ("↑/↓ j/k", "Selecionar bairro"),
        ("Enter/t", "Ver ou ocultar tendência"),
        ("←/→ h/l", "Mover o cursor do gráfico"),
        ("m/Espaço", "Popup do mapa"),
        ("r", "Atualizar agora"),
        ("?", "Ajuda"),
        ("Esc", "Fechar"),
    ]
    .into_iter()
    .map(|(keys, action)| {
        TextLine::from(vec![
            Span::styled(
                format!("{keys:<10}"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(action),
        ])
    })
    .collect::<Vec<_>>();

    f.render_widget(Clear, help_area);
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title("Ajuda & Atalhos")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        help_area,
    );
}

fn render_footer(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let line = state.last_error.as_ref().map_or_else(
        || {
            TextLine::from(Span::styled(
                "↑↓ bairro  Enter tendência  ←→ cursor  m mapa  r atualizar  ? ajuda",
                Style::default().fg(Color::Gray),
            ))
        },
        |error| {
            TextLine::from(Span::styled(
                format!("Serviço indisponível: {error}"),
                Style::default().fg(Color::Red),
            ))
        },
    );
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chuva_alerta_core::{parse_snapshots, Registry};
    use ratzilla::event::KeyCode;
    use ratzilla::ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn rendered(state: &WebState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(state, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ready_state() -> WebState {
        let mut state = WebState::new(Registry::default());
        let snapshots = parse_snapshots(json!({
            "Acari": {"nivel_risco": "alto", "chuva_mm": 18.44, "precipitacao": 18.4,
                      "vento_velocidade": 21.6, "horario_registro": "2024-02-10T15:40:00"},
            "Botafogo": {"erro": "Sem dados climáticos"}
        }))
        .unwrap()
        .snapshots;
        state.apply_snapshots(Ok(snapshots));
        state
    }

    #[test]
    fn loading_message_until_first_snapshot() {
        let state = WebState::new(Registry::default());
        let screen = rendered(&state, 120, 40);
        assert!(screen.contains("Sincronizando dados meteorológicos..."));
        assert!(!screen.contains("Mapa de Risco"));
    }

    #[test]
    fn ready_page_lists_every_neighborhood() {
        let state = ready_state();
        let screen = rendered(&state, 140, 60);

        assert!(screen.contains("ChuvaAlertaRJ • Monitoramento em Tempo Real"));
        assert!(screen.contains("Mapa de Risco"));
        for name in ["Acari", "Campo Grande", "Bonsucesso", "Botafogo", "Guadalupe"] {
            assert!(screen.contains(name), "missing {name}");
        }
        assert!(screen.contains("SITUAÇÃO RISCO ALTO"));
        assert!(screen.contains("Atualizado às 15:40"));
        assert!(screen.contains("Ver Tendência"));
        assert_eq!(screen.matches("Aguardando conexão...").count(), 4);
    }

    #[test]
    fn expanded_card_draws_the_trend_tooltip() {
        let mut state = ready_state();
        state.handle_key(KeyCode::Enter);
        assert!(rendered(&state, 140, 60).contains("Carregando histórico..."));

        state.apply_history(
            "Acari",
            Ok(vec![
                json!({"horario": "10:00", "chuva": 1.0}),
                json!({"horario": "11:00", "chuva": 4.5}),
            ]),
        );
        let screen = rendered(&state, 140, 60);
        assert!(screen.contains("Ocultar Gráfico"));
        assert!(screen.contains("11:00 • 4.5 mm"));
    }

    #[test]
    fn popup_for_an_errored_neighborhood_has_no_signal() {
        let mut state = ready_state();
        for _ in 0..3 {
            state.handle_key(KeyCode::Down);
        }
        state.handle_key(KeyCode::Char('m'));
        assert_eq!(state.selected_name(), Some("Botafogo"));
        assert!(rendered(&state, 140, 60).contains(NO_SIGNAL));
    }
}
