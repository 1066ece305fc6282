//! Terminal Mode Controller
//!
//! The [`Terminal`] trait is everything the line editor needs from a
//! terminal: one byte in, bytes out, the column count and raw-mode
//! switching. [`StdTerminal`] implements it over stdin/stdout with
//! crossterm; tests drive the editor through a scripted implementation.
//!
//! A read session is bracketed by [`begin_session`]. For an interactive
//! terminal it returns a [`RawModeGuard`] that restores the original mode
//! exactly once, on whichever path the session ends.

use std::io::{self, IsTerminal, Read, Write};
use std::ops::{Deref, DerefMut};

use crossterm::terminal;
use tracing::{debug, warn};

/// Terminal capabilities used by the line editor
pub trait Terminal {
    /// Whether input comes from an interactive terminal rather than a pipe
    fn is_interactive(&self) -> bool;

    /// Block until one byte arrives. `Ok(None)` means end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Column count, or `None` when the size query fails
    fn width(&self) -> Option<u16>;

    /// Capture the current mode and switch to raw mode
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Put back the mode captured by [`Terminal::enable_raw_mode`]
    fn disable_raw_mode(&mut self) -> io::Result<()>;

    /// Pause the process (Ctrl-Z). Returns once the process is resumed.
    fn suspend(&mut self) -> io::Result<()>;
}

/// Terminal over the process's stdin and stdout
#[derive(Debug)]
pub struct StdTerminal {
    stdout: io::Stdout,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for StdTerminal {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdout.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn width(&self) -> Option<u16> {
        match terminal::size() {
            Ok((columns, _)) if columns > 0 => Some(columns),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "terminal size query failed");
                None
            }
        }
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }

    #[cfg(unix)]
    fn suspend(&mut self) -> io::Result<()> {
        use nix::sys::signal::{raise, Signal};

        self.flush()?;
        raise(Signal::SIGTSTP).map_err(io::Error::from)
    }

    #[cfg(not(unix))]
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// How a read session talks to the terminal
#[derive(Debug)]
pub enum Session<'a, T: Terminal + ?Sized> {
    /// Input is not a terminal: plain line reading, no raw mode
    Bypass(&'a mut T),
    /// Raw mode is active until the guard is restored or dropped
    Raw(RawModeGuard<'a, T>),
}

/// Start a read session on `terminal`
pub fn begin_session<T: Terminal + ?Sized>(terminal: &mut T) -> io::Result<Session<'_, T>> {
    if !terminal.is_interactive() {
        debug!("input is not a terminal, using line fallback");
        return Ok(Session::Bypass(terminal));
    }
    RawModeGuard::enter(terminal).map(Session::Raw)
}

/// Owns raw mode for the length of one session.
///
/// Dereferences to the wrapped terminal so the session can keep using it.
#[derive(Debug)]
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    active: bool,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    pub fn enter(terminal: &'a mut T) -> io::Result<Self> {
        terminal.enable_raw_mode()?;
        debug!("raw mode enabled");
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Restore the original mode. Does nothing if already restored.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        // Mode goes back even when the pending output cannot be flushed
        let flushed = self.terminal.flush();
        self.terminal.disable_raw_mode()?;
        debug!("raw mode disabled");
        flushed
    }

    /// Reassert raw mode after the session was paused
    pub fn resume(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        self.terminal.enable_raw_mode()?;
        self.active = true;
        debug!("raw mode reasserted");
        Ok(())
    }
}

impl<T: Terminal + ?Sized> Deref for RawModeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> DerefMut for RawModeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}
