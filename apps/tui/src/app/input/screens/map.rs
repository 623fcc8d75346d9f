use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => app.pan(1.0, 0.0),
        KeyCode::Down => app.pan(-1.0, 0.0),
        KeyCode::Left => app.pan(0.0, -1.0),
        KeyCode::Right => app.pan(0.0, 1.0),
        _ => {}
    }
}
