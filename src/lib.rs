//! rawline - raw-mode line input for terminal programs
//!
//! This library reads one line of text from the keyboard with in-place
//! editing, wrap-aware redraw and recall of previously entered lines. It
//! talks to the terminal directly over a raw byte stream instead of
//! depending on an external line-editing library.
//!
//! # Features
//!
//! - **Editing**: insert, backspace, delete, home/end, left/right
//! - **History**: up/down recall with wrap-around, no consecutive duplicates
//! - **Rendering**: repaint from a saved anchor, cursor placement across
//!   wrapped rows
//! - **Piped input**: non-terminal input falls back to plain line reading
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rawline::{read_line, History};
//!
//! let mut history = History::default();
//! while let Ok(line) = read_line("> ", &mut history) {
//!     println!("you typed: {}", line);
//! }
//! ```
//!
//! # Key Bindings
//!
//! 1. **Ctrl-A / Home** - move to line start
//! 2. **Ctrl-E / End** - move to line end
//! 3. **Left / Right** - move one byte
//! 4. **Up / Down** - previous / next history entry
//! 5. **Backspace / Delete** - remove before / under the cursor
//! 6. **Esc Esc** - clear the line
//! 7. **Ctrl-L** - clear the screen
//! 8. **Ctrl-C** - interrupt, **Ctrl-Z** - suspend

pub mod cli;
pub mod error;

// Re-export commonly used types for convenience
pub use cli::{
    read_line, Decoder, EditEvent, EditorConfig, History, LineBuffer, Prompter, RenderMode,
    Renderer, StdTerminal, Terminal,
};
pub use error::{ReadLineError, Result};
