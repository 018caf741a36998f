use crate::app::App;
use crate::ui::widgets::colors::ACCENT;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn render_loading(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    if area.height == 0 {
        return;
    }

    let throbber = Throbber::default()
        .label("Sincronizando dados meteorológicos...")
        .style(Style::default().fg(ACCENT))
        .throbber_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .throbber_set(BRAILLE_SIX);

    let line_area = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    f.render_widget(
        Paragraph::new(throbber.to_line(&app.throbber)).alignment(Alignment::Center),
        line_area,
    );
}
