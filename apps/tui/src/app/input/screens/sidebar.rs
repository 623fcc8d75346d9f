use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;
use overlay_core::Panel;

pub fn handle_sidebar_input(app: &mut App, panel: Panel, key: KeyCode) {
    let len = app.sidebar.len(panel);

    match key {
        KeyCode::Up => {
            app.set_selected(panel, wrap_decrement(app.selected(panel), len));
        }
        KeyCode::Down => {
            app.set_selected(panel, wrap_increment(app.selected(panel), len));
        }
        KeyCode::Home => app.set_selected(panel, 0),
        KeyCode::End => app.set_selected(panel, len.saturating_sub(1)),
        KeyCode::Char(' ') if panel == Panel::Overlays => app.toggle_selected_overlay(),
        KeyCode::Enter => {
            if panel == Panel::Overlays {
                app.toggle_selected_overlay();
            } else {
                app.navigate_selected();
            }
        }
        KeyCode::Left => app.pan(0.0, -1.0),
        KeyCode::Right => app.pan(0.0, 1.0),
        _ => {}
    }
}
