//! Line Prompter
//!
//! Runs one read session: decode an event, apply it to the line or the
//! history, repaint, block for the next byte. Piped input skips all of
//! that and is read up to the next newline.

use tracing::{debug, info};

use super::{
    config::EditorConfig,
    decoder::{Decoder, EditEvent},
    editor::LineBuffer,
    history::History,
    render::Renderer,
    terminal::{begin_session, RawModeGuard, Session, StdTerminal, Terminal},
};
use crate::error::{ReadLineError, Result};

/// Read one line from stdin, showing `prompt` and recalling from `history`
pub fn read_line(prompt: &str, history: &mut History) -> Result<String> {
    Prompter::new(StdTerminal::new()).read_line(prompt, history)
}

/// Line reader bound to one terminal
#[derive(Debug)]
pub struct Prompter<T: Terminal> {
    terminal: T,
    config: EditorConfig,
}

impl<T: Terminal> Prompter<T> {
    pub fn new(terminal: T) -> Self {
        Self::with_config(terminal, EditorConfig::default())
    }

    pub fn with_config(terminal: T, config: EditorConfig) -> Self {
        Self { terminal, config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Read a line using the configured prompt
    pub fn read_line_default(&mut self, history: &mut History) -> Result<String> {
        let prompt = self.config.prompt.clone();
        self.read_line(&prompt, history)
    }

    /// Show `prompt` and read one line.
    ///
    /// On an interactive terminal the line is edited in raw mode and, when
    /// non-empty and different from the last entry, added to `history`.
    ///
    /// # Errors
    ///
    /// [`ReadLineError::Interrupted`] on Ctrl-C, [`ReadLineError::Eof`] when
    /// input ends before any of the line was entered, and
    /// [`ReadLineError::Io`] when the terminal fails.
    pub fn read_line(&mut self, prompt: &str, history: &mut History) -> Result<String> {
        match begin_session(&mut self.terminal)? {
            Session::Bypass(terminal) => read_piped(terminal, prompt),
            Session::Raw(guard) => edit_line(guard, prompt, history, &self.config),
        }
    }
}

/// Fallback for non-terminal input: prompt once, read to newline
fn read_piped<T: Terminal + ?Sized>(terminal: &mut T, prompt: &str) -> Result<String> {
    terminal.write(prompt.as_bytes())?;
    terminal.flush()?;

    let mut bytes = Vec::new();
    let mut consumed = false;
    while let Some(byte) = terminal.read_byte()? {
        consumed = true;
        match byte {
            b'\n' => break,
            b'\r' => continue,
            other => bytes.push(other),
        }
    }

    if !consumed {
        return Err(ReadLineError::Eof);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn edit_line<T: Terminal + ?Sized>(
    mut guard: RawModeGuard<'_, T>,
    prompt: &str,
    history: &mut History,
    config: &EditorConfig,
) -> Result<String> {
    let mut line = LineBuffer::new();
    let mut decoder = Decoder::new();
    let mut renderer = Renderer::new(prompt, config);
    history.reset_navigation();

    renderer.begin(&mut *guard)?;
    renderer.render(&mut *guard, &line)?;

    loop {
        let Some(event) = decoder.next_event(|| guard.read_byte())? else {
            renderer.finish(&mut *guard, &line)?;
            guard.restore()?;
            if line.is_empty() {
                debug!("input closed on an empty line");
                return Err(ReadLineError::Eof);
            }
            break;
        };

        match event {
            EditEvent::Enter => {
                renderer.finish(&mut *guard, &line)?;
                guard.restore()?;
                break;
            }
            EditEvent::Interrupt => {
                renderer.finish(&mut *guard, &line)?;
                guard.restore()?;
                info!("read interrupted");
                return Err(ReadLineError::Interrupted);
            }
            EditEvent::Suspend => {
                renderer.finish(&mut *guard, &line)?;
                guard.restore()?;
                info!("suspending");
                guard.suspend()?;
                guard.resume()?;
                renderer.begin(&mut *guard)?;
            }
            EditEvent::HistoryPrev => line.replace(history.previous().as_bytes()),
            EditEvent::HistoryNext => line.replace(history.next().as_bytes()),
            EditEvent::ClearScreen => renderer.clear_screen(&mut *guard)?,
            other => {
                line.apply(other);
            }
        }

        renderer.render(&mut *guard, &line)?;
    }

    let text = line.get_text();
    history.add_line(&text);
    Ok(text)
}
