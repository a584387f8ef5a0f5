use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    let page = app.chat_height.max(1);

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(page),
        KeyCode::PageDown => app.scroll_down(page),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL_LINES),
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::QueryClient;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn test_app() -> App {
        App::new(QueryClient::new("http://127.0.0.1:9/api/query"))
    }

    #[test]
    fn typing_edits_input() {
        let mut app = test_app();
        for c in "MH-1".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_event(&mut app, key(KeyCode::Home)).unwrap();
        handle_event(&mut app, key(KeyCode::Delete)).unwrap();

        assert_eq!(app.input, "H-");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).unwrap();

        assert!(app.log.is_empty());
        assert!(!app.busy);
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let mut app = test_app();
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert!(app.should_quit);
        assert!(app.input.is_empty());

        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn tick_only_animates_while_busy() {
        let mut app = test_app();
        handle_event(&mut app, AppEvent::Tick).unwrap();
        assert_eq!(app.animation_frame, 0);

        app.busy = true;
        handle_event(&mut app, AppEvent::Tick).unwrap();
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn page_keys_scroll_chat() {
        let mut app = test_app();
        app.chat_height = 10;
        handle_event(&mut app, key(KeyCode::PageDown)).unwrap();
        assert_eq!(app.chat_scroll, 10);
        handle_event(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.chat_scroll, 9);
        handle_event(&mut app, key(KeyCode::PageUp)).unwrap();
        assert_eq!(app.chat_scroll, 0);
    }
}
