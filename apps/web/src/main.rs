mod fetch;
mod state;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use overlay_core::sidebar::PoiEntry;
use overlay_core::{load_overlays, Atlas, MapView, Panel};
use ratzilla::event::KeyCode;
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line as TextLine, Span, Text},
    widgets::canvas::{Canvas, Map, MapResolution},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use crate::fetch::{fetch_config, FetchSource};
use crate::state::WebState;

const CONFIG_URL: &str = "config.json";
const OVERLAY_BASE: &str = "overlays";

const OVERLAY_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::LightGreen,
    Color::LightRed,
    Color::LightBlue,
];

fn main() -> io::Result<()> {
    let state = Rc::new(RefCell::new(WebState::new()));

    spawn_local(load(state.clone()));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        move |event| {
            let mut state = state.borrow_mut();
            if matches!(event.code, KeyCode::F(1) | KeyCode::Char('?')) {
                state.toggle_help();
                return;
            }
            if state.show_help {
                if matches!(event.code, KeyCode::Esc) {
                    state.show_help = false;
                }
                return;
            }
            match event.code {
                KeyCode::Left => state.pan(0.0, -1.0),
                KeyCode::Right => state.pan(0.0, 1.0),
                KeyCode::Char('+' | '=') => state.zoom(true),
                KeyCode::Char('-') => state.zoom(false),
                KeyCode::Tab => state.cycle_focus(),
                KeyCode::Up if state.focus == Some(Panel::Map) => state.pan(1.0, 0.0),
                KeyCode::Down if state.focus == Some(Panel::Map) => state.pan(-1.0, 0.0),
                KeyCode::Up => state.move_selection(false),
                KeyCode::Down => state.move_selection(true),
                KeyCode::Home => state.select_edge(false),
                KeyCode::End => state.select_edge(true),
                KeyCode::Char(' ') if state.focus == Some(Panel::Overlays) => {
                    state.toggle_selected_overlay();
                }
                KeyCode::Enter => state.activate(),
                KeyCode::Char('p') => state.show_popup = !state.show_popup,
                KeyCode::Esc => state.show_popup = false,
                _ => {}
            }
        }
    });

    terminal.draw_web(move |f| {
        let state = state.borrow();
        let area = f.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        render_map(&state, f, columns[0]);
        render_sidebar(&state, f, columns[1]);
        render_status(&state, f, rows[1]);

        if state.show_popup {
            if let Some(map) = state.map.as_ref() {
                render_popup(map, f, columns[0]);
            }
        }

        if state.show_help {
            render_help(f, area);
        }
    });

    Ok(())
}

async fn load(state: Rc<RefCell<WebState>>) {
    let config = match fetch_config(CONFIG_URL).await {
        Ok(config) => config,
        Err(e) => {
            state.borrow_mut().fail_config(&e.to_string());
            return;
        }
    };

    let files = config.overlay_files.clone();
    state.borrow_mut().set_config(config);

    let loaded = load_overlays(&FetchSource::new(OVERLAY_BASE), &files).await;
    state.borrow_mut().finish_loading(loaded);
}

const fn overlay_color(index: usize) -> Color {
    OVERLAY_COLORS[index % OVERLAY_COLORS.len()]
}

fn focus_style(state: &WebState, panel: Panel) -> Style {
    if state.focus == Some(panel) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_map(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let Some(map) = state.map.as_ref() else {
        let block = Block::default().title(" Map ").borders(Borders::ALL);
        let paragraph = Paragraph::new(state.status.clone())
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    };

    let center = map.center();
    let block = Block::default()
        .title(format!(
            " Map  {:.3}, {:.3}  z{} ",
            center.lat,
            center.lng,
            map.zoom()
        ))
        .borders(Borders::ALL)
        .border_style(focus_style(state, Panel::Map));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 2 || inner.height < 2 {
        return;
    }

    let aspect = f64::from(inner.width) / (f64::from(inner.height) * 2.0);
    let bounds = map.bounds(aspect);
    let markers = map
        .markers()
        .iter()
        .filter(|marker| bounds.contains(marker.position))
        .map(|marker| {
            (
                bounds.wrap_lng(marker.position.lng),
                marker.position.lat,
                overlay_color(marker.overlay_index),
            )
        })
        .collect::<Vec<_>>();

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

fn render_sidebar(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::try_from(state.sidebar.overlays.len().clamp(1, 8)).unwrap_or(8) + 2),
            Constraint::Min(5),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    let overlay_lines = state
        .sidebar
        .overlays
        .iter()
        .map(|entry| {
            let selected = state.focus == Some(Panel::Overlays)
                && entry.index == state.selected(Panel::Overlays);
            TextLine::from(vec![
                Span::styled(
                    if entry.checked { "[x] " } else { "[ ] " },
                    selected_style(selected),
                ),
                Span::styled("● ", Style::default().fg(overlay_color(entry.index))),
                Span::styled(entry.name.clone(), selected_style(selected)),
                Span::styled(
                    format!("  {} markers", entry.markers),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect::<Vec<_>>();
    f.render_widget(
        Paragraph::new(Text::from(overlay_lines)).block(panel_block(state, Panel::Overlays)),
        chunks[0],
    );

    render_poi_panel(state, Panel::Geo, &state.sidebar.geo, f, chunks[1]);
    render_poi_panel(state, Panel::Chrono, &state.sidebar.chrono, f, chunks[2]);
    render_poi_panel(state, Panel::Recent, state.sidebar.recent.as_slice(), f, chunks[3]);
}

fn panel_block(state: &WebState, panel: Panel) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", panel.title()))
        .borders(Borders::ALL)
        .border_style(focus_style(state, panel))
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(Color::Rgb(0, 0, 238))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_poi_panel(
    state: &WebState,
    panel: Panel,
    entries: &[PoiEntry],
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = panel_block(state, panel);
    if entries.is_empty() {
        let paragraph = Paragraph::new("Nothing nearby")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let visible = (area.height.saturating_sub(2) as usize / 3).max(1);
    let selected = state.selected(panel);
    let offset = selected.saturating_sub(visible - 1);

    let lines = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .flat_map(|(index, entry)| {
            let is_selected = state.focus == Some(panel) && index == selected;
            [
                TextLine::from(vec![
                    Span::styled(entry.caption.clone(), selected_style(is_selected)),
                    Span::styled(
                        format!("  {}", entry.overlay),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                TextLine::from(Span::styled(
                    format!("  {}", entry.description),
                    Style::default().fg(Color::Gray),
                )),
                TextLine::from(Span::styled(
                    format!("  {}", entry.detail),
                    Style::default().fg(Color::Cyan),
                )),
            ]
        })
        .collect::<Vec<_>>();

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_status(state: &WebState, f: &mut Frame<'_>, area: Rect) {
    let line = TextLine::from(vec![
        Span::styled(state.status.clone(), Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled(
            "Arrows pan  +/- zoom  Tab focus  Space toggle  Enter go  p popup  F1 help",
            Style::default().fg(Color::Gray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_popup(map: &MapView, f: &mut Frame<'_>, area: Rect) {
    let Some(popup) = Atlas::popup_at_center(map) else {
        return;
    };

    let width = area.width.saturating_sub(4).min(50);
    let height = area.height.saturating_sub(4).min(12);
    let popup_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines = popup
        .body_lines()
        .into_iter()
        .map(TextLine::from)
        .collect::<Vec<_>>();
    let block = Block::default()
        .title(format!(" {} ", popup.caption))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

const HELP_KEYS: [(&str, &str); 9] = [
    ("Left / Right", "Pan the map"),
    ("Up / Down", "Move the selection (pan when the map is focused)"),
    ("Home / End", "First / last row"),
    ("+ / -", "Zoom in / out"),
    ("Tab", "Cycle focus"),
    ("Space", "Toggle the selected overlay"),
    ("Enter", "Toggle overlay or center on the selected point"),
    ("p", "Popup for the marker nearest the center"),
    ("F1 / ? / Esc", "Show / hide this help"),
];

fn render_help(f: &mut Frame<'_>, area: Rect) {
    let width = area.width.saturating_sub(4).min(70);
    let height = area
        .height
        .saturating_sub(2)
        .min(u16::try_from(HELP_KEYS.len()).unwrap_or(u16::MAX) + 2);
    let help_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let lines = HELP_KEYS
        .iter()
        .map(|(key, action)| {
            TextLine::from(vec![
                Span::styled(
                    format!("{key:<14}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect::<Vec<_>>();
    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, help_area);
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), help_area);
}
