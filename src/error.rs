//! Error types returned by a read session.

use std::io;

/// Ways a `read_line` call can end without producing a line.
#[derive(Debug, thiserror::Error)]
pub enum ReadLineError {
    /// Ctrl-C was pressed. The terminal mode has already been restored.
    #[error("input interrupted")]
    Interrupted,

    /// The input stream closed before any byte of the line was read.
    #[error("end of input")]
    Eof,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReadLineError>;
