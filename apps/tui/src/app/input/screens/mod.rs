use crate::app::state::App;
use crossterm::event::KeyCode;
use overlay_core::Panel;

mod help;
mod map;
mod sidebar;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return;
        }
        KeyCode::Char('+' | '=') => {
            app.zoom_in();
            return;
        }
        KeyCode::Char('-') => {
            app.zoom_out();
            return;
        }
        KeyCode::Char('p') => {
            app.show_popup = !app.show_popup;
            return;
        }
        KeyCode::Esc if app.show_popup => {
            app.show_popup = false;
            return;
        }
        _ => {}
    }

    if app.is_loading() {
        return;
    }

    match app.focus {
        Panel::Map => map::handle_map_input(app, key),
        panel => sidebar::handle_sidebar_input(app, panel, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::{AtlasConfig, LoadedOverlays, Overlay, OverlayFile};

    fn app() -> App {
        let mut app = App::new(AtlasConfig {
            overlay_files: vec!["a.json".into()],
            map_center: [10.0, 10.0],
            map_zoom: 5,
            overlay_active: vec![false],
        });
        let file = OverlayFile::from_json_str(
            r#"{"name":"A","points":[{"latitude":10.1,"longitude":10,"caption":"X","description":"d","images":[],"creationTime":"2024-01-01"}]}"#,
        )
        .unwrap();
        let overlay = Overlay::from_file(file, 0);
        app.finish_loading(LoadedOverlays {
            pois: overlay.points.clone(),
            overlays: vec![overlay],
            failures: Vec::new(),
        });
        app
    }

    #[test]
    fn tab_cycles_focus() {
        let mut app = app();
        assert_eq!(app.focus, Panel::Overlays);
        dispatch_input(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Panel::Geo);
    }

    #[test]
    fn space_on_overlay_list_toggles() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char(' '));
        assert!(app.sidebar.overlays[0].checked);
        assert_eq!(app.map.markers().len(), 1);
    }

    #[test]
    fn enter_on_geo_entry_flies_there() {
        let mut app = app();
        app.focus = Panel::Geo;
        dispatch_input(&mut app, KeyCode::Enter);
        assert!((app.map.center().lat - 10.1).abs() < 1e-9);
    }

    #[test]
    fn arrows_pan_when_map_focused() {
        let mut app = app();
        app.focus = Panel::Map;
        let before = app.map.center();
        dispatch_input(&mut app, KeyCode::Right);
        assert!(app.map.center().lng > before.lng);
        dispatch_input(&mut app, KeyCode::Up);
        assert!(app.map.center().lat > before.lat);
    }

    #[test]
    fn zoom_keys_work_from_any_panel() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('+'));
        assert_eq!(app.map.zoom(), 6);
        dispatch_input(&mut app, KeyCode::Char('-'));
        dispatch_input(&mut app, KeyCode::Char('-'));
        assert_eq!(app.map.zoom(), 4);
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
