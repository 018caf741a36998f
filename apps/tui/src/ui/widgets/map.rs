use crate::app::App;
use crate::ui::widgets::colors::{rgb, ACCENT, MUTED};
use chuva_alerta_core::registry::TILE_ATTRIBUTION;
use chuva_alerta_core::risk::pulse_phase;
use chuva_alerta_core::{MarkerView, Projection, Viewport};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

// Degrees between graticule lines
const GRID_STEP: f64 = 0.1;

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Mapa de Risco ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
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
    let markers = app.dashboard.markers(app.selected_name());
    let pulse = pulse_phase(app.animation_clock);

    f.render_widget(
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, projection.width()])
            .y_bounds([0.0, projection.height()])
            .paint(|ctx| {
                draw_graticule(ctx, &projection);
                ctx.layer();
                for marker in &markers {
                    draw_marker(ctx, &projection, marker, pulse);
                }
                for marker in &markers {
                    let (x, y) = projection.point(marker.position);
                    let radius = projection.radius(marker.style.radius.scale());
                    let style = if marker.selected {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    ctx.print(x + radius + 1.0, y, Span::styled(marker.name, style));
                }
            }),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(Span::styled(TILE_ATTRIBUTION, Style::default().fg(MUTED)))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_graticule(ctx: &mut ratatui::widgets::canvas::Context<'_>, projection: &Projection) {
    let [south, north] = projection.viewport().lat;
    let [west, east] = projection.viewport().lon;

    let mut lat = (south / GRID_STEP).ceil() * GRID_STEP;
    while lat <= north {
        let y = projection.y(lat);
        ctx.draw(&CanvasLine {
            x1: 0.0,
            y1: y,
            x2: projection.width(),
            y2: y,
            color: MUTED,
        });
        lat += GRID_STEP;
    }

    let mut lon = (west / GRID_STEP).ceil() * GRID_STEP;
    while lon <= east {
        let x = projection.x(lon);
        ctx.draw(&CanvasLine {
            x1: x,
            y1: 0.0,
            x2: x,
            y2: projection.height(),
            color: MUTED,
        });
        lon += GRID_STEP;
    }
}

fn draw_marker(
    ctx: &mut ratatui::widgets::canvas::Context<'_>,
    projection: &Projection,
    marker: &MarkerView,
    pulse: f64,
) {
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

    // Concentric rings fill the dot
    let mut ring = radius;
    while ring > 0.0 {
        ctx.draw(&Circle {
            x,
            y,
            radius: ring,
            color,
        });
        ring -= 0.4;
    }

    if marker.selected {
        ctx.draw(&Circle {
            x,
            y,
            radius: radius + 1.0,
            color: Color::White,
        });
    }
}
