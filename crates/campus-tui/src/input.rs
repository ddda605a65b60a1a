//! Input state and key handling for the TUI.
//!
//! This module owns the composer (buffer, cursor) and maps keys onto App
//! operations. Enter submits, every edit notifies the channel that the user
//! is typing, and the arrow keys and Tab move between chats.

use campus_app::{App, AppAction};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key (next chat).
    Tab,
    /// Shift-Tab (previous chat).
    BackTab,
    /// Escape key (quit).
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow (previous chat).
    Up,
    /// Down arrow (next chat).
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// F5 (reconnect and reload chats).
    Refresh,
}

/// Composer state for the TUI.
///
/// The cursor is a character index, not a byte offset.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position within the buffer, in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process. Edits always re-render and may carry a
    /// typing notification.
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                Self::edited(app)
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return vec![];
                }
                self.cursor -= 1;
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                Self::edited(app)
            },
            KeyInput::Delete => {
                if self.cursor >= self.char_count() {
                    return vec![];
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                Self::edited(app)
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                vec![AppAction::Render]
            },
            KeyInput::Home => {
                self.cursor = 0;
                vec![AppAction::Render]
            },
            KeyInput::End => {
                self.cursor = self.char_count();
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.handle_enter(app),
            KeyInput::Tab | KeyInput::Down => app.select_next_room(),
            KeyInput::BackTab | KeyInput::Up => app.select_previous_room(),
            KeyInput::Refresh => {
                app.clear_status();
                let mut actions = app.reconnect();
                actions.extend(app.load_rooms());
                actions
            },
            KeyInput::Esc => app.quit(),
        }
    }

    /// Submit the composer.
    ///
    /// Blank input is left in place and nothing is sent.
    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        if self.buffer.trim().is_empty() {
            return vec![];
        }
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        app.send_message(&text)
    }

    fn edited(app: &mut App) -> Vec<AppAction> {
        let mut actions = app.notify_typing();
        actions.push(AppAction::Render);
        actions
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
