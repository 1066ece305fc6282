//! Line Input Module
//!
//! This module reads a single edited line from a terminal in raw mode,
//! with history recall and wrap-aware redraw.
//!
//! ## Module Structure
//!
//! - `config` - Editor settings
//! - `terminal` - Terminal capabilities and raw-mode session guard
//! - `decoder` - Byte-to-event escape sequence state machine
//! - `editor` - Line buffer with cursor management
//! - `history` - Line history with wrap-around navigation
//! - `render` - Incremental line repaint
//! - `prompter` - Read session orchestration

pub mod config;
pub mod decoder;
pub mod editor;
pub mod history;
pub mod prompter;
pub mod render;
pub mod terminal;

// Re-export main types for convenience
pub use config::{EditorConfig, RenderMode};
pub use decoder::{Decoder, DecoderState, EditEvent};
pub use editor::{CursorDirection, LineBuffer};
pub use history::History;
pub use prompter::{read_line, Prompter};
pub use render::Renderer;
pub use terminal::{begin_session, RawModeGuard, Session, StdTerminal, Terminal};
