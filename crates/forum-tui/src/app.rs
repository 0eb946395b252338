use std::path::PathBuf;

use forum_core::{Config, ForumError, ForumState, Message, MessageBody, StoreClient, SubmitToken};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Content,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Field,

    // Board state (messages, error slot, load phase, compose form)
    pub state: ForumState,

    // Cursor positions, in chars, for the two form inputs
    pub username_cursor: usize,
    pub content_cursor: usize,

    // Message list scrolling
    pub list_scroll: u16,
    pub list_height: u16,
    pub total_list_lines: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub scanline: u16,

    // Updated during render for mouse hit-testing
    pub list_area: Option<Rect>,

    config: Config,
    config_path: Option<PathBuf>,
    store: StoreClient,
    events: UnboundedSender<AppEvent>,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Row and column (both in chars) of a cursor inside multi-line text.
pub fn cursor_row_col(s: &str, char_idx: usize) -> (usize, usize) {
    let before = &s[..char_to_byte_index(s, char_idx)];
    let row = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .map(|line| line.chars().count())
        .unwrap_or(0);
    (row, col)
}

impl App {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        store: StoreClient,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let mut state = ForumState::new();
        if let Some(username) = &config.default_username {
            state.form.username = username.clone();
        }
        let username_cursor = state.form.username.chars().count();
        let focus = if state.form.username.is_empty() {
            Field::Username
        } else {
            Field::Content
        };

        Self {
            should_quit: false,
            focus,
            state,
            username_cursor,
            content_cursor: 0,
            list_scroll: 0,
            list_height: 0,
            total_list_lines: 0,
            animation_frame: 0,
            scanline: 0,
            list_area: None,
            config,
            config_path,
            store,
            events,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.store.endpoint()
    }

    /// Kick off the one-time fetch of the whole board.
    pub fn start_load(&mut self) {
        if !self.state.begin_load() {
            return;
        }

        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = store.fetch_all().await;
            // The loop may already be gone if the user quit mid-fetch
            let _ = events.send(AppEvent::Loaded(result));
        });
    }

    /// Send the compose form. Blank fields make this a no-op.
    pub fn submit(&mut self) {
        let Some(pending) = self.state.prepare_submit() else {
            return;
        };

        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = store.create(&pending.body).await;
            let _ = events.send(AppEvent::Submitted {
                token: pending.token,
                body: pending.body,
                result,
            });
        });
    }

    pub fn apply_load_result(&mut self, result: Result<Vec<Message>, ForumError>) {
        self.state.on_load_result(result);
        self.list_scroll = 0;
    }

    pub fn apply_submit_result(
        &mut self,
        token: SubmitToken,
        body: MessageBody,
        result: Result<String, ForumError>,
    ) {
        let username = body.username.clone();
        if !self.state.on_submit_result(token, body, result) {
            return;
        }

        self.content_cursor = 0;
        self.list_scroll = 0;
        self.remember_username(&username);
    }

    fn remember_username(&mut self, username: &str) {
        if !self.config.remember_username(username) {
            return;
        }
        let Some(path) = &self.config_path else {
            return;
        };
        match self.config.save_to(path) {
            Ok(()) => debug!(path = %path.display(), "saved username"),
            Err(e) => warn!(error = %e, "failed to save username"),
        }
    }

    // Form editing

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Content,
            Field::Content => Field::Username,
        };
    }

    fn focused_input(&mut self) -> (&mut String, &mut usize) {
        match self.focus {
            Field::Username => (&mut self.state.form.username, &mut self.username_cursor),
            Field::Content => (&mut self.state.form.content, &mut self.content_cursor),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        // The username is a single-line input
        if c == '\n' && self.focus == Field::Username {
            return;
        }
        let (text, cursor) = self.focused_input();
        let byte_pos = char_to_byte_index(text, *cursor);
        text.insert(byte_pos, c);
        *cursor += 1;
    }

    pub fn backspace(&mut self) {
        let (text, cursor) = self.focused_input();
        if *cursor > 0 {
            *cursor -= 1;
            let byte_pos = char_to_byte_index(text, *cursor);
            text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let (text, cursor) = self.focused_input();
        if *cursor < text.chars().count() {
            let byte_pos = char_to_byte_index(text, *cursor);
            text.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        let (_, cursor) = self.focused_input();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let (text, cursor) = self.focused_input();
        *cursor = (*cursor + 1).min(text.chars().count());
    }

    pub fn cursor_home(&mut self) {
        let (_, cursor) = self.focused_input();
        *cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        let (text, cursor) = self.focused_input();
        *cursor = text.chars().count();
    }

    // Message list scrolling

    fn max_scroll(&self) -> u16 {
        self.total_list_lines.saturating_sub(self.list_height)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.list_scroll = self.list_scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.list_scroll = self.list_scroll.saturating_sub(lines);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.list_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.list_height.max(1));
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
        self.scanline = if self.list_height == 0 {
            0
        } else {
            (self.scanline + 1) % self.list_height
        };
    }
}
