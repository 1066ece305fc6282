//! Line Renderer
//!
//! Repaints prompt + line from a saved anchor after every edit. A render
//! that is shorter than the previous one pads with blanks so no stale tail
//! is left behind, and the cursor is placed by counting wrapped rows from
//! the anchor when the column count is known.

use std::io;

use crossterm::{
    cursor::{MoveDown, MoveRight, MoveTo, MoveToColumn, MoveUp, RestorePosition, SavePosition},
    queue,
    terminal::{Clear, ClearType},
};
use tracing::trace;

use super::config::{EditorConfig, RenderMode};
use super::editor::LineBuffer;
use super::terminal::Terminal;

/// Where the cursor goes, relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorTarget {
    pub rows: usize,
    pub columns: usize,
}

/// Blanks needed to cover what a longer previous render left behind
pub fn blank_count(previous_width: usize, current_width: usize) -> usize {
    previous_width.saturating_sub(current_width)
}

/// Cell offset `offset` (prompt included) as rows down and columns right.
/// Without a column count everything stays on the anchor row.
pub fn cursor_target(offset: usize, columns: Option<u16>) -> CursorTarget {
    match columns {
        Some(columns) if columns > 0 => {
            let columns = usize::from(columns);
            CursorTarget {
                rows: offset / columns,
                columns: offset % columns,
            }
        }
        _ => CursorTarget {
            rows: 0,
            columns: offset,
        },
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Per-session render state
#[derive(Debug, Clone)]
pub struct Renderer {
    prompt: Vec<u8>,
    previous_width: usize,
    mode: RenderMode,
    fallback_width: Option<u16>,
    /// Column count for this session; `None` until first queried
    columns: Option<Option<u16>>,
    /// Last pass left the cursor at column 0 of a row it opened itself
    on_fresh_row: bool,
}

impl Renderer {
    pub fn new(prompt: &str, config: &EditorConfig) -> Self {
        Self {
            prompt: prompt.as_bytes().to_vec(),
            previous_width: 0,
            mode: config.render_mode,
            fallback_width: config.fallback_width,
            columns: None,
            on_fresh_row: false,
        }
    }

    /// Printable width of the last render pass
    pub fn previous_width(&self) -> usize {
        self.previous_width
    }

    /// Anchor the render region at column 0 of the current row and forget
    /// any earlier render. Called at session start and after a resume.
    pub fn begin<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> io::Result<()> {
        let mut out = Vec::new();
        queue!(out, MoveToColumn(0), SavePosition)?;
        self.reset();
        terminal.write(&out)
    }

    /// Clear the whole screen and move the anchor to its top-left corner
    pub fn clear_screen<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> io::Result<()> {
        let mut out = Vec::new();
        queue!(out, Clear(ClearType::All), MoveTo(0, 0), SavePosition)?;
        self.reset();
        terminal.write(&out)
    }

    /// Repaint the line and place the cursor. Returns the number of blanks
    /// written to erase the tail of the previous render.
    pub fn render<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        line: &LineBuffer,
    ) -> io::Result<usize> {
        let blanks = self.repaint(terminal, line, line.cursor())?;
        terminal.flush()?;
        Ok(blanks)
    }

    /// Final clean redraw for a line that is done: cursor at the end, then
    /// a newline so the terminal continues below the line.
    pub fn finish<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        line: &LineBuffer,
    ) -> io::Result<()> {
        self.repaint(terminal, line, line.len())?;
        // A line that exactly fills its last row already moved down
        if !self.on_fresh_row {
            terminal.write(b"\r\n")?;
        }
        terminal.flush()
    }

    fn reset(&mut self) {
        self.previous_width = 0;
        self.columns = None;
        self.on_fresh_row = false;
    }

    fn columns<T: Terminal + ?Sized>(&mut self, terminal: &T) -> Option<u16> {
        if self.mode == RenderMode::SingleRow {
            return None;
        }
        let fallback = self.fallback_width;
        *self.columns.get_or_insert_with(|| {
            terminal
                .width()
                .or_else(|| {
                    trace!(fallback = ?fallback, "no terminal width");
                    fallback
                })
                .filter(|&columns| columns > 0)
        })
    }

    fn repaint<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        line: &LineBuffer,
        cursor: usize,
    ) -> io::Result<usize> {
        let width = self.prompt.len() + line.len();
        let blanks = blank_count(self.previous_width, width);
        let written = width + blanks;

        let mut out = Vec::with_capacity(written + 32);
        queue!(out, RestorePosition, Clear(ClearType::CurrentLine))?;
        out.extend_from_slice(&self.prompt);
        out.extend_from_slice(line.as_bytes());
        out.resize(out.len() + blanks, b' ');

        let offset = self.prompt.len() + cursor;
        self.on_fresh_row = false;
        match self.columns(terminal) {
            Some(row_width) => {
                let columns = usize::from(row_width);
                // After filling a row exactly the terminal holds a pending
                // wrap; the cursor is still on that row.
                let mut end_row = written.saturating_sub(1) / columns;
                if offset == written && written > 0 && written % columns == 0 {
                    out.extend_from_slice(b"\r\n");
                    end_row = written / columns;
                    self.on_fresh_row = true;
                }

                // Re-anchor with relative moves so a render that scrolled
                // the screen does not leave the saved position stale
                out.push(b'\r');
                if end_row > 0 {
                    queue!(out, MoveUp(clamp_u16(end_row)))?;
                }
                queue!(out, SavePosition)?;

                let target = cursor_target(offset, Some(row_width));
                if target.rows > 0 {
                    queue!(out, MoveDown(clamp_u16(target.rows)))?;
                }
                if target.columns > 0 {
                    queue!(out, MoveRight(clamp_u16(target.columns)))?;
                }
            }
            None => {
                out.push(b'\r');
                if offset > 0 {
                    queue!(out, MoveRight(clamp_u16(offset)))?;
                }
            }
        }

        terminal.write(&out)?;
        trace!(width, blanks, cursor, "rendered");
        self.previous_width = width;
        Ok(blanks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::terminal::testing::ScriptedTerminal;

    fn buffer(text: &str) -> LineBuffer {
        let mut line = LineBuffer::new();
        line.replace(text.as_bytes());
        line
    }

    #[test]
    fn test_blank_count() {
        assert_eq!(blank_count(10, 7), 3);
        assert_eq!(blank_count(7, 7), 0);
        assert_eq!(blank_count(3, 9), 0);
    }

    #[test]
    fn test_cursor_target_wraps_rows() {
        assert_eq!(cursor_target(5, Some(80)), CursorTarget { rows: 0, columns: 5 });
        assert_eq!(cursor_target(10, Some(10)), CursorTarget { rows: 1, columns: 0 });
        assert_eq!(cursor_target(23, Some(10)), CursorTarget { rows: 2, columns: 3 });
    }

    #[test]
    fn test_cursor_target_without_width_is_single_row() {
        assert_eq!(cursor_target(123, None), CursorTarget { rows: 0, columns: 123 });
        assert_eq!(cursor_target(7, Some(0)), CursorTarget { rows: 0, columns: 7 });
    }

    #[test]
    fn test_shorter_render_blanks_excess_tail() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("> ", &EditorConfig::default());

        assert_eq!(renderer.render(&mut term, &buffer("hello")).unwrap(), 0);
        assert_eq!(renderer.previous_width(), 7);

        term.output.clear();
        assert_eq!(renderer.render(&mut term, &buffer("he")).unwrap(), 3);
        assert_eq!(renderer.previous_width(), 4);
        assert!(term.output_str().contains("> he   "));

        assert_eq!(renderer.render(&mut term, &buffer("hey")).unwrap(), 0);
    }

    #[test]
    fn test_render_repaints_from_anchor() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("$ ", &EditorConfig::default());
        renderer.begin(&mut term).unwrap();
        renderer.render(&mut term, &buffer("ls")).unwrap();

        let out = term.output_str();
        assert!(out.starts_with("\x1b[1G\x1b7\x1b8\x1b[2K$ ls"));
        assert!(out.ends_with("\r\x1b7\x1b[4C"));
    }

    #[test]
    fn test_render_places_cursor_on_wrapped_row() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(Some(10));
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        let mut line = buffer("abcdefghijklmn");
        line.apply(crate::cli::EditEvent::MoveLeft);

        renderer.render(&mut term, &line).unwrap();
        // prompt 2 + cursor 13 = 15 cells: one row down, five right
        assert!(term.output_str().ends_with("\r\x1b[1A\x1b7\x1b[1B\x1b[5C"));
    }

    #[test]
    fn test_render_without_width_uses_single_row() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(None);
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        renderer.render(&mut term, &buffer("abc")).unwrap();
        assert!(term.output_str().ends_with("abc\r\x1b[5C"));
    }

    #[test]
    fn test_single_row_mode_ignores_width() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(Some(4));
        let config = EditorConfig {
            render_mode: RenderMode::SingleRow,
            ..EditorConfig::default()
        };
        let mut renderer = Renderer::new("> ", &config);
        renderer.render(&mut term, &buffer("abcdef")).unwrap();
        assert!(term.output_str().ends_with("\r\x1b[8C"));
    }

    #[test]
    fn test_fallback_width_used_when_query_fails() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(None);
        let config = EditorConfig {
            fallback_width: Some(4),
            ..EditorConfig::default()
        };
        let mut renderer = Renderer::new("> ", &config);
        renderer.render(&mut term, &buffer("abc")).unwrap();
        assert!(term.output_str().ends_with("\r\x1b[1A\x1b7\x1b[1B\x1b[1C"));
    }

    #[test]
    fn test_finish_puts_cursor_at_end_and_newline() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        let mut line = buffer("abc");
        line.apply(crate::cli::EditEvent::MoveHome);
        renderer.finish(&mut term, &line).unwrap();
        assert!(term.output_str().ends_with("\r\x1b7\x1b[5C\r\n"));
    }

    #[test]
    fn test_clear_screen_resets_width() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        renderer.render(&mut term, &buffer("long line")).unwrap();
        renderer.clear_screen(&mut term).unwrap();
        assert_eq!(renderer.previous_width(), 0);
        assert!(term.output_str().contains("\x1b[2J"));
        assert_eq!(renderer.render(&mut term, &buffer("x")).unwrap(), 0);
    }

    /// Cursor-only model of a terminal screen: tracks where the cursor is,
    /// the pending-wrap flag and how often the screen scrolled.
    struct Screen {
        columns: usize,
        rows: usize,
        row: usize,
        col: usize,
        pending_wrap: bool,
        saved: (usize, usize),
        scrolled: usize,
    }

    impl Screen {
        fn new(columns: usize, rows: usize, row: usize, col: usize) -> Self {
            Self {
                columns,
                rows,
                row,
                col,
                pending_wrap: false,
                saved: (0, 0),
                scrolled: 0,
            }
        }

        fn line_feed(&mut self) {
            if self.row + 1 == self.rows {
                self.scrolled += 1;
            } else {
                self.row += 1;
            }
        }

        fn feed(&mut self, bytes: &[u8]) {
            let mut i = 0;
            while i < bytes.len() {
                match bytes[i] {
                    0x1b if bytes.get(i + 1) == Some(&b'7') => {
                        self.saved = (self.row, self.col);
                        self.pending_wrap = false;
                        i += 1;
                    }
                    0x1b if bytes.get(i + 1) == Some(&b'8') => {
                        (self.row, self.col) = self.saved;
                        self.pending_wrap = false;
                        i += 1;
                    }
                    0x1b if bytes.get(i + 1) == Some(&b'[') => {
                        i += 2;
                        let mut n = 0usize;
                        let mut seen_digit = false;
                        while bytes[i].is_ascii_digit() || bytes[i] == b';' {
                            if bytes[i].is_ascii_digit() {
                                n = n * 10 + usize::from(bytes[i] - b'0');
                                seen_digit = true;
                            }
                            i += 1;
                        }
                        let n = if seen_digit { n } else { 1 };
                        match bytes[i] {
                            b'A' => self.row = self.row.saturating_sub(n),
                            b'B' => self.row = (self.row + n).min(self.rows - 1),
                            b'C' => self.col = (self.col + n).min(self.columns - 1),
                            b'G' => self.col = n.saturating_sub(1),
                            b'H' => (self.row, self.col) = (0, 0),
                            _ => {}
                        }
                        self.pending_wrap = false;
                    }
                    b'\r' => {
                        self.col = 0;
                        self.pending_wrap = false;
                    }
                    b'\n' => {
                        self.line_feed();
                        self.pending_wrap = false;
                    }
                    _ => {
                        if self.pending_wrap {
                            self.col = 0;
                            self.line_feed();
                            self.pending_wrap = false;
                        }
                        if self.col + 1 == self.columns {
                            self.pending_wrap = true;
                        } else {
                            self.col += 1;
                        }
                    }
                }
                i += 1;
            }
        }
    }

    #[test]
    fn test_anchor_starts_at_column_zero_after_partial_output() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        // Caller left "abc" on the row without a newline
        let mut screen = Screen::new(80, 24, 5, 3);

        renderer.begin(&mut term).unwrap();
        renderer.render(&mut term, &buffer("xyz")).unwrap();
        screen.feed(&term.output);

        assert_eq!((screen.row, screen.col), (5, 5));
    }

    #[test]
    fn test_wrapped_render_on_bottom_row_survives_scroll() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(Some(10));
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        let mut screen = Screen::new(10, 3, 2, 0);

        renderer.begin(&mut term).unwrap();
        renderer.render(&mut term, &buffer("abcdefghijkl")).unwrap();
        screen.feed(&term.output);
        assert_eq!(screen.scrolled, 1);
        // Region now starts one row up; 14 cells puts the cursor on its second row
        assert_eq!((screen.row, screen.col), (2, 4));

        term.output.clear();
        let mut line = buffer("abcdefghijklm");
        line.apply(crate::cli::EditEvent::MoveHome);
        renderer.render(&mut term, &line).unwrap();
        screen.feed(&term.output);
        assert_eq!(screen.scrolled, 1);
        assert_eq!((screen.row, screen.col), (1, 2));
    }

    #[test]
    fn test_line_filling_last_row_moves_to_fresh_row_once() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(Some(10));
        let mut renderer = Renderer::new("> ", &EditorConfig::default());
        let mut screen = Screen::new(10, 24, 4, 0);

        renderer.begin(&mut term).unwrap();
        renderer.render(&mut term, &buffer("abcdefgh")).unwrap();
        screen.feed(&term.output);
        assert_eq!((screen.row, screen.col), (5, 0));

        term.output.clear();
        renderer.finish(&mut term, &buffer("abcdefgh")).unwrap();
        screen.feed(&term.output);
        // No blank line left between the input and what follows
        assert_eq!((screen.row, screen.col), (5, 0));
        assert!(!term.output_str().ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_width_queried_once_per_session() {
        let mut term = ScriptedTerminal::interactive(b"");
        let mut renderer = Renderer::new("> ", &EditorConfig::default());

        renderer.begin(&mut term).unwrap();
        for text in ["a", "ab", "abc"] {
            renderer.render(&mut term, &buffer(text)).unwrap();
        }
        assert_eq!(term.width_queries.get(), 1);

        renderer.clear_screen(&mut term).unwrap();
        renderer.render(&mut term, &buffer("abc")).unwrap();
        renderer.begin(&mut term).unwrap();
        renderer.render(&mut term, &buffer("abc")).unwrap();
        assert_eq!(term.width_queries.get(), 3);
    }

    #[test]
    fn test_zero_fallback_width_uses_single_row() {
        let mut term = ScriptedTerminal::interactive(b"").with_columns(None);
        let config = EditorConfig {
            fallback_width: Some(0),
            ..EditorConfig::default()
        };
        let mut renderer = Renderer::new("> ", &config);
        renderer.render(&mut term, &buffer("abc")).unwrap();
        assert!(term.output_str().ends_with("abc\r\x1b[5C"));
    }
}
