//! Line Buffer Module
//!
//! Single-line byte buffer with cursor management. Every operation clamps
//! the cursor back into `[0, len]` when it finishes.

use super::decoder::EditEvent;

/// Cursor movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDirection {
    Left,
    Right,
    Home,
    End,
}

/// The line being edited and the cursor offset into it
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: Vec<u8>,
    cursor: usize,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of the line
    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// The line as a string, replacing invalid UTF-8
    pub fn get_text(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert a byte at the cursor and step past it
    pub fn insert_byte(&mut self, byte: u8) {
        self.text.insert(self.cursor, byte);
        self.cursor += 1;
        self.clamp();
    }

    /// Delete the byte before the cursor (backspace)
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.text.remove(self.cursor - 1);
            self.cursor -= 1;
        }
        self.clamp();
    }

    /// Delete the byte under the cursor (delete key)
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
        self.clamp();
    }

    /// Move cursor in specified direction
    pub fn move_cursor(&mut self, direction: CursorDirection) {
        match direction {
            CursorDirection::Left => self.cursor = self.cursor.saturating_sub(1),
            CursorDirection::Right => self.cursor += 1,
            CursorDirection::Home => self.cursor = 0,
            CursorDirection::End => self.cursor = self.text.len(),
        }
        self.clamp();
    }

    /// Clear the whole line
    pub fn delete_line(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Swap in new contents (a recalled history entry), cursor at the end
    pub fn replace(&mut self, text: &[u8]) {
        self.text.clear();
        self.text.extend_from_slice(text);
        self.cursor = self.text.len();
    }

    /// Apply an edit event. Returns `false` for events the buffer does not
    /// own (history, enter, screen and signal events).
    pub fn apply(&mut self, event: EditEvent) -> bool {
        match event {
            EditEvent::InsertChar(byte) => self.insert_byte(byte),
            EditEvent::Backspace => self.delete_char(),
            EditEvent::DeleteForward => self.delete_char_forward(),
            EditEvent::MoveLeft => self.move_cursor(CursorDirection::Left),
            EditEvent::MoveRight => self.move_cursor(CursorDirection::Right),
            EditEvent::MoveHome => self.move_cursor(CursorDirection::Home),
            EditEvent::MoveEnd => self.move_cursor(CursorDirection::End),
            EditEvent::ClearLine => self.delete_line(),
            _ => return false,
        }
        true
    }

    fn clamp(&mut self) {
        self.cursor = self.cursor.min(self.text.len());
    }
}
