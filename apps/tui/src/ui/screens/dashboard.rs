use crate::app::App;
use crate::ui::widgets::card::{card_height, first_visible, render_card};
use crate::ui::widgets::colors::ACCENT;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::render_marker_popup;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(8),    // Map and cards
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(app, f, layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);
    render_map(app, f, content[0]);
    render_cards(app, f, content[1]);

    render_status_section(app, f, layout[2]);
    render_shortcuts(f, layout[3]);

    if app.popup_open {
        if let Some(name) = app.selected_name() {
            render_marker_popup(&app.dashboard.popup(name), f, content[0]);
        }
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let refreshed = app.last_refresh.map_or_else(
        || "sem atualização".to_string(),
        |at| format!("atualizado {}", at.format("%H:%M:%S")),
    );

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "ChuvaAlertaRJ",
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " • Monitoramento em Tempo Real",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ({refreshed})"), Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );

    f.render_widget(title, area);
}

fn render_cards(app: &App, f: &mut Frame<'_>, area: Rect) {
    let cards = app.dashboard.cards();
    let heights = cards.iter().map(card_height).collect::<Vec<_>>();
    let start = first_visible(&heights, app.selected_index, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (index, card) in cards.iter().enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let height = heights[index].min(bottom - y);
        let card_area = Rect {
            y,
            height,
            ..area
        };
        render_card(card, index == app.selected_index, app.trend_cursor, f, card_area);
        y += height;
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status = if app.status_message.is_empty() {
        Span::styled(
            format!("Fonte: {}", app.api_base_url),
            Style::default().fg(Color::Gray),
        )
    } else {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Span::styled(app.status_message.clone(), style)
    };

    let status_paragraph = Paragraph::new(status)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::Gray);
    let shortcuts = TextLine::from(vec![
        Span::styled("↑↓", key),
        Span::styled(" bairro  ", text),
        Span::styled("Enter", key),
        Span::styled(" tendência  ", text),
        Span::styled("←→", key),
        Span::styled(" cursor  ", text),
        Span::styled("m", key),
        Span::styled(" mapa  ", text),
        Span::styled("r", key),
        Span::styled(" atualizar  ", text),
        Span::styled("?", key),
        Span::styled(" ajuda  ", text),
        Span::styled("q", key),
        Span::styled(" sair", text),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}
