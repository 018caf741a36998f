use crate::ui::widgets::colors::{rgb, ACCENT};
use chuva_alerta_core::{PopupView, NO_SIGNAL};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

/// Marker popup: name, risk label and current rainfall, or "Sem sinal".
pub fn render_marker_popup(popup: &PopupView, f: &mut Frame<'_>, area: Rect) {
    let popup_area = fixed_centered(area, 34, 6);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = vec![TextLine::from(Span::styled(
        popup.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    match (&popup.risk, &popup.rainfall) {
        (Some(risk), Some(rainfall)) => {
            lines.push(TextLine::from(Span::styled(
                risk.label,
                Style::default()
                    .fg(rgb(risk.color))
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(TextLine::from(vec![
                Span::styled("Chuva: ", Style::default().fg(Color::Gray)),
                Span::raw(rainfall.clone()),
            ]));
        }
        _ => lines.push(TextLine::from(Span::styled(
            NO_SIGNAL,
            Style::default().fg(Color::Gray),
        ))),
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        );
    f.render_widget(paragraph, popup_area);
}

fn fixed_centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
