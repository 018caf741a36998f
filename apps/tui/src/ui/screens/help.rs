use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 8] = [
    ("↑/↓ ou k/j", "Selecionar bairro"),
    ("Enter ou t", "Ver ou ocultar a tendência de chuva"),
    ("←/→ ou h/l", "Mover o cursor do gráfico"),
    ("m ou Espaço", "Abrir o popup do mapa para o bairro"),
    ("r", "Atualizar as condições agora"),
    ("?", "Mostrar ou ocultar esta ajuda"),
    ("Esc", "Fechar popup, ou sair"),
    ("q", "Sair"),
];

pub fn render_help(f: &mut Frame<'_>) {
    let popup_area = centered_rect(70, 60, f.area());
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Ajuda & Atalhos ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });

    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Pressione ? ou Esc para fechar",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1.min(popup_area.height),
    };

    f.render_widget(hint, hint_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            "Risco de chuva por bairro, atualizado a cada minuto.",
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
    ];
    lines.extend(SHORTCUTS.iter().map(|(keys, action)| {
        TextLine::from(vec![
            Span::styled(
                format!("{keys:<12}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(*action),
        ])
    }));
    lines
}
