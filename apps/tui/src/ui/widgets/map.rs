use crate::app::App;
use overlay_core::map::Bounds;
use overlay_core::MapView;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

const OVERLAY_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::LightGreen,
    Color::LightRed,
    Color::LightBlue,
];

pub const fn overlay_color(index: usize) -> Color {
    OVERLAY_COLORS[index % OVERLAY_COLORS.len()]
}

pub fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect, focused: bool) {
    let center = app.map.center();
    let block = Block::default()
        .title(format!(
            " Map  {:.3}, {:.3}  z{} ",
            center.lat,
            center.lng,
            app.map.zoom()
        ))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    if app.is_loading() {
        render_loading(app, f, inner);
        return;
    }

    // Terminal cells are roughly twice as tall as they are wide.
    let aspect = f64::from(inner.width) / (f64::from(inner.height) * 2.0);
    let bounds = app.map.bounds(aspect);

    let markers = visible_markers(&app.map, &bounds);

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for (x, y, color) in &markers {
                ctx.print(*x, *y, Span::styled("●", Style::default().fg(*color)));
            }

            ctx.print(
                center.lng,
                center.lat,
                Span::styled(
                    "+",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        });

    f.render_widget(canvas, inner);
}

/// Canvas points `(x, y, color)` for the markers inside `bounds`, with
/// longitudes shifted into the canvas frame.
fn visible_markers(map: &MapView, bounds: &Bounds) -> Vec<(f64, f64, Color)> {
    map.markers()
        .iter()
        .filter(|marker| bounds.contains(marker.position))
        .map(|marker| {
            (
                bounds.wrap_lng(marker.position.lng),
                marker.position.lat,
                overlay_color(marker.overlay_index),
            )
        })
        .collect()
}

fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect) {
    let line_area = Rect {
        x: area.x + area.width.saturating_sub(24) / 2,
        y: area.y + area.height / 2,
        width: 24.min(area.width),
        height: 1,
    };

    let throbber = Throbber::default()
        .label("Loading overlays...")
        .style(Style::default().fg(Color::Cyan))
        .throbber_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, line_area, &mut state);

    if area.height > 2 {
        let hint = Paragraph::new(app.config.overlay_files.join(", "))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        let hint_area = Rect {
            y: line_area.y + 1,
            height: 1,
            ..area
        };
        f.render_widget(hint, hint_area);
    }
}
