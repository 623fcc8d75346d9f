use crate::app::App;
use crate::ui::widgets::map::{focus_style, overlay_color};
use crate::ui::widgets::tables::scroll_offset;
use overlay_core::sidebar::PoiEntry;
use overlay_core::Panel;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Rows each POI summary takes: caption, description, detail.
const POI_ROWS: usize = 3;

pub fn render_sidebar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let overlay_rows = u16::try_from(app.sidebar.overlays.len().clamp(1, 8)).unwrap_or(8);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(overlay_rows + 2),
            Constraint::Min(5),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    render_overlay_list(app, f, chunks[0]);
    render_poi_panel(app, Panel::Geo, &app.sidebar.geo, f, chunks[1]);
    render_poi_panel(app, Panel::Chrono, &app.sidebar.chrono, f, chunks[2]);
    render_poi_panel(
        app,
        Panel::Recent,
        app.sidebar.recent.as_slice(),
        f,
        chunks[3],
    );
}

fn panel_block(app: &App, panel: Panel, count: Option<usize>) -> Block<'static> {
    let title = match count {
        Some(count) => format!(" {} ({count}) ", panel.title()),
        None => format!(" {} ", panel.title()),
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == panel))
}

fn selected_style(active: bool) -> Style {
    if active {
        Style::default()
            .bg(Color::Rgb(0, 0, 238))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_overlay_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = panel_block(app, Panel::Overlays, None);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.sidebar.overlays.is_empty() {
        let message = if app.is_loading() {
            "Loading..."
        } else {
            "No overlays loaded"
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let visible = inner.height as usize;
    let selected = app.selected(Panel::Overlays);
    let offset = scroll_offset(app.sidebar.overlays.len(), visible, selected);

    let lines = app
        .sidebar
        .overlays
        .iter()
        .skip(offset)
        .take(visible)
        .map(|entry| {
            let is_selected = app.focus == Panel::Overlays && entry.index == selected;
            let checkbox = if entry.checked { "[x]" } else { "[ ]" };
            TextLine::from(vec![
                Span::styled(format!("{checkbox} "), selected_style(is_selected)),
                Span::styled("● ", Style::default().fg(overlay_color(entry.index))),
                Span::styled(entry.name.clone(), selected_style(is_selected)),
                Span::styled(
                    format!("  {} markers", entry.markers),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect::<Vec<_>>();

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn render_poi_panel(
    app: &App,
    panel: Panel,
    entries: &[PoiEntry],
    f: &mut Frame<'_>,
    area: Rect,
) {
    let count = (panel != Panel::Recent).then_some(entries.len());
    let block = panel_block(app, panel, count);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if entries.is_empty() {
        let message = match panel {
            Panel::Recent if app.is_loading() => "Loading...",
            Panel::Recent => "No points loaded",
            _ => "Nothing nearby",
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let visible = (inner.height as usize / POI_ROWS).max(1);
    let selected = app.selected(panel);
    let offset = scroll_offset(entries.len(), visible, selected);

    let lines = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .flat_map(|(index, entry)| {
            let is_selected = app.focus == panel && index == selected;
            poi_lines(entry, is_selected)
        })
        .collect::<Vec<_>>();

    f.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn poi_lines(entry: &PoiEntry, is_selected: bool) -> [TextLine<'static>; POI_ROWS] {
    let caption_style = if is_selected {
        selected_style(true)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    [
        TextLine::from(vec![
            Span::styled(entry.caption.clone(), caption_style),
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
}
