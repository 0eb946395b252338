use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Loaded(result) => app.apply_load_result(result),
        AppEvent::Submitted { token, body, result } => app.apply_submit_result(token, body, result),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Quit
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,

        // Newline in the message body
        KeyCode::Enter if alt => app.insert_char('\n'),
        KeyCode::Char('j') if ctrl => app.insert_char('\n'),

        // Send
        KeyCode::Enter => app.submit(),

        // Focus
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),

        // Message list
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),

        // Editing
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !ctrl && !alt => app.insert_char(c),

        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let over_list = app
        .list_area
        .is_some_and(|area| contains(area, mouse.column, mouse.row));
    if !over_list {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown => app.scroll_down(MOUSE_SCROLL_LINES),
        _ => {}
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::app::Field;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use forum_core::{Config, Message};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_event(app, key(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn scroll(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _rx) = test_app(Config::default());
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let (mut app, _rx) = test_app(Config::default());
        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let (mut app, _rx) = test_app(Config::default());
        type_str(&mut app, "neo");
        handle_event(&mut app, key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.focus, Field::Content);
        type_str(&mut app, "follow");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::ALT));
        type_str(&mut app, "the rabbit");

        assert_eq!(app.state.form.username, "neo");
        assert_eq!(app.state.form.content, "follow\nthe rabbit");
    }

    #[test]
    fn test_ctrl_j_inserts_newline() {
        let (mut app, _rx) = test_app(Config::default());
        handle_event(&mut app, key(KeyCode::BackTab, KeyModifiers::SHIFT));
        type_str(&mut app, "a");
        handle_event(&mut app, key(KeyCode::Char('j'), KeyModifiers::CONTROL));
        assert_eq!(app.state.form.content, "a\n");
    }

    #[test]
    fn test_enter_with_blank_form_is_noop() {
        let (mut app, mut rx) = test_app(Config::default());
        type_str(&mut app, "   ");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.state.in_flight_count(), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(app.state.error(), None);
    }

    #[tokio::test]
    async fn test_enter_registers_submission() {
        let (mut app, _rx) = test_app(Config::default());
        type_str(&mut app, "bob");
        handle_event(&mut app, key(KeyCode::Tab, KeyModifiers::NONE));
        type_str(&mut app, "hi");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.state.in_flight_count(), 1);
        // Nothing is shown until the store answers
        assert!(app.state.messages().is_empty());
    }

    #[test]
    fn test_loaded_event_populates_board() {
        let (mut app, _rx) = test_app(Config::default());
        app.state.begin_load();
        let message = Message {
            id: "k1".to_string(),
            username: "a".to_string(),
            content: "hi".to_string(),
            timestamp: "T".to_string(),
        };
        handle_event(&mut app, AppEvent::Loaded(Ok(vec![message.clone()])));

        assert!(!app.state.is_loading());
        assert_eq!(app.state.messages(), &[message]);
    }

    #[test]
    fn test_submitted_event_prepends() {
        let (mut app, _rx) = test_app(Config::default());
        app.state.form.username = "bob".to_string();
        app.state.form.content = "hi".to_string();
        let pending = app.state.prepare_submit().unwrap();

        handle_event(
            &mut app,
            AppEvent::Submitted {
                token: pending.token,
                body: pending.body,
                result: Ok("k9".to_string()),
            },
        );

        assert_eq!(app.state.messages()[0].id, "k9");
        assert!(app.state.form.content.is_empty());
    }

    #[test]
    fn test_mouse_scroll_only_over_list() {
        let (mut app, _rx) = test_app(Config::default());
        app.list_area = Some(Rect::new(0, 3, 80, 10));
        app.list_height = 8;
        app.total_list_lines = 30;

        handle_event(&mut app, scroll(MouseEventKind::ScrollDown, 5, 20));
        assert_eq!(app.list_scroll, 0);

        handle_event(&mut app, scroll(MouseEventKind::ScrollDown, 5, 5));
        assert_eq!(app.list_scroll, MOUSE_SCROLL_LINES);

        handle_event(&mut app, scroll(MouseEventKind::ScrollUp, 5, 5));
        assert_eq!(app.list_scroll, 0);
    }
}
