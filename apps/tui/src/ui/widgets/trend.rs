use crate::ui::widgets::colors::{MUTED, TREND_BANDS, TREND_LINE};
use chuva_alerta_core::{TrendPanel, TrendSeries};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

/// Rows reserved for the trend panel inside an expanded card.
pub const TREND_HEIGHT: u16 = 8;

// Smaller than this and the axes leave no room for the plot
const MIN_CHART_WIDTH: u16 = 16;
const MIN_CHART_HEIGHT: u16 = 5;

const PLACEHOLDER_NO_DATA: &str = "Aguardando dados...";

pub fn render_trend(panel: &TrendPanel, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    match panel {
        TrendPanel::Hidden => {}
        TrendPanel::Chart(series)
            if area.width >= MIN_CHART_WIDTH && area.height >= MIN_CHART_HEIGHT =>
        {
            render_chart(series, cursor, f, area);
        }
        TrendPanel::Chart(_) => render_placeholder(PLACEHOLDER_NO_DATA, f, area),
        TrendPanel::Loading | TrendPanel::Empty => {
            render_placeholder(panel.placeholder().unwrap_or(PLACEHOLDER_NO_DATA), f, area);
        }
    }
}

fn render_placeholder(text: &str, f: &mut Frame<'_>, area: Rect) {
    if area.height == 0 {
        return;
    }
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    let paragraph = Paragraph::new(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(paragraph, middle);
}

fn render_chart(series: &TrendSeries, cursor: usize, f: &mut Frame<'_>, area: Rect) {
    let cursor = series.clamp_cursor(cursor);

    // Braille cells carry 2x4 dots
    let columns = usize::from(area.width) * 2;
    let rows = usize::from(area.height) * 4;
    let bands = series.area_fill(columns, rows);
    let cursor_point = [series.points()[cursor]];

    let mut datasets = bands
        .iter()
        .zip(TREND_BANDS)
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
            .style(Style::default().fg(TREND_LINE))
            .data(series.points()),
    );
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .data(&cursor_point),
    );

    let [_, y_max] = series.y_bounds();
    let x_labels = series
        .axis_labels()
        .into_iter()
        .map(|label| Span::raw(label.to_string()))
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.1}", y_max / 2.0)),
        Span::raw(format!("{y_max:.1}")),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    series.tooltip(cursor),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(MUTED)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(series.x_bounds())
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(series.y_bounds())
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}
