use crate::app::App;
use crate::ui::screens::help::render_help_popup;
use crate::ui::screens::sidebar::render_sidebar;
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::render_marker_popup;
use overlay_core::{Atlas, Panel};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(10),   // Map and sidebar
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(app, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_layout[1]);

    render_map(app, f, content[0], app.focus == Panel::Map);
    render_sidebar(app, f, content[1]);

    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);

    if app.show_popup {
        if let Some(popup) = Atlas::popup_at_center(&app.map) {
            render_marker_popup(popup, f, content[0]);
        }
    }

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let active = app
        .atlas
        .as_ref()
        .map_or(0, |atlas| atlas.state().active_count());
    let total = app.config.overlay_files.len();

    let line = TextLine::from(vec![
        Span::styled(
            "Overlay ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Atlas",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{active} of {total} overlays visible  •  {} markers", app.map.markers().len()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph = Paragraph::new(Text::from(line))
        .block(block)
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let color = if app.status_message.starts_with("Error") || app.status_message.contains("failed") {
        Color::Red
    } else {
        Color::Green
    };

    let block = Block::default()
        .title(" Status ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(Span::styled(
        app.status_message.as_str(),
        Style::default().fg(color),
    ))
    .block(block)
    .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let help_text = vec![
        Span::styled("Tab", key_style),
        Span::raw(": Focus   "),
        Span::styled("↑/↓", key_style),
        Span::raw(": Select/Pan   "),
        Span::styled("Space", key_style),
        Span::raw(": Toggle   "),
        Span::styled("Enter", key_style),
        Span::raw(": Go to   "),
        Span::styled("+/-", key_style),
        Span::raw(": Zoom   "),
        Span::styled("p", key_style),
        Span::raw(": Popup   "),
        Span::styled("F1", key_style),
        Span::raw(": Help   "),
        Span::styled("q", key_style),
        Span::raw(": Quit"),
    ];

    let paragraph = Paragraph::new(TextLine::from(help_text)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
