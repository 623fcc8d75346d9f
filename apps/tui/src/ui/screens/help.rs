use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const KEYS: [(&str, &str); 11] = [
    ("Tab", "Cycle focus: overlays, geo, chrono, recent, map"),
    ("↑/↓", "Move selection (or pan when the map is focused)"),
    ("←/→", "Pan the map"),
    ("Home/End", "First/last entry"),
    ("Space", "Toggle the selected overlay"),
    ("Enter", "Fly to the selected POI"),
    ("+/-", "Zoom in/out"),
    ("p", "Show popup of the marker nearest the center"),
    ("Esc", "Close popup or help"),
    ("F1 or ?", "Toggle this help"),
    ("q", "Quit"),
];

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(ClearWidget, popup_area);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Markers are drawn for checked overlays only; every loaded POI counts as nearby.",
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
    ];
    lines.extend(KEYS.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("{key:<10}"), key_style),
            Span::raw(*action),
        ])
    }));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}
