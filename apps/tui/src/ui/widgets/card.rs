use crate::ui::widgets::colors::{rgb, MUTED};
use crate::ui::widgets::trend::{render_trend, TREND_HEIGHT};
use chuva_alerta_core::{CardView, Metric, MetricsCard};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

const SKELETON_HEIGHT: u16 = 5;
// Borders, updated-at, three metric rows, toggle and footer
const METRICS_HEIGHT: u16 = 8;

const WAITING: &str = "Aguardando conexão...";

pub fn card_height(card: &CardView) -> u16 {
    match card {
        CardView::Skeleton { .. } => SKELETON_HEIGHT,
        CardView::Metrics(card) if card.expanded => METRICS_HEIGHT + TREND_HEIGHT,
        CardView::Metrics(_) => METRICS_HEIGHT,
    }
}

/// Index of the first card to draw so that `selected` is fully visible.
pub fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    let selected = selected.min(heights.len().saturating_sub(1));
    let mut start = 0;
    while start < selected && heights[start..=selected].iter().sum::<u16>() > available {
        start += 1;
    }
    start
}

pub fn render_card(card: &CardView, selected: bool, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    match card {
        CardView::Skeleton { name } => render_skeleton(name, selected, f, area),
        CardView::Metrics(card) => render_metrics(card, selected, cursor, f, area),
    }
}

fn card_block(name: &str, border: Color, selected: bool) -> Block<'static> {
    let block = Block::default()
        .title(Span::styled(
            format!(" {name} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    if selected {
        block.border_type(BorderType::Thick)
    } else {
        block
    }
}

fn render_skeleton(name: &str, selected: bool, f: &mut Frame<'_>, area: Rect) {
    let block = card_block(name, if selected { Color::White } else { MUTED }, selected);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bar_width = usize::from(inner.width.saturating_sub(2)).min(24);
    let lines = vec![
        TextLine::from(Span::styled("░".repeat(bar_width), Style::default().fg(MUTED))),
        TextLine::from(Span::styled("░".repeat(bar_width / 2), Style::default().fg(MUTED))),
        TextLine::from(Span::styled(
            WAITING,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
    ];
    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_metrics(card: &MetricsCard, selected: bool, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    let color = rgb(card.risk.color);
    let badge = format!(" {} {} ", card.risk.icon.glyph(), card.risk.label);
    let block = card_block(card.name, color, selected).title(
        TextLine::from(Span::styled(
            badge,
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right),
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let trend_rows = if card.expanded { TREND_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // Updated at
            Constraint::Length(3),          // Metrics
            Constraint::Length(1),          // Toggle
            Constraint::Length(trend_rows), // Trend
            Constraint::Length(1),          // Footer
        ])
        .split(inner);

    let updated = card.updated_at.as_deref().unwrap_or("--:--");
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Atualizado às {updated}"),
            Style::default().fg(Color::Gray),
        )),
        chunks[0],
    );

    let metric_lines = card
        .metrics
        .chunks(2)
        .map(|pair| {
            TextLine::from(
                pair.iter()
                    .flat_map(metric_spans)
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<Vec<_>>();
    f.render_widget(Paragraph::new(Text::from(metric_lines)), chunks[1]);

    let toggle_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let marker = if card.expanded { "▾" } else { "▸" };
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("{marker} {}", card.toggle_label()),
            toggle_style,
        )),
        chunks[2],
    );

    if card.expanded {
        render_trend(&card.trend, cursor, f, chunks[3]);
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("SITUAÇÃO {}", card.risk.label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        chunks[4],
    );
}

fn metric_spans(metric: &Metric) -> [Span<'static>; 2] {
    let value = if metric.value == "--" {
        metric.value.clone()
    } else {
        format!("{} {}", metric.value, metric.unit)
    };
    [
        Span::styled(format!("{}: ", metric.label), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{value:<12}"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]
}
