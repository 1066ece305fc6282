//! Input Decoder Module
//!
//! Turns the raw byte stream coming from a terminal in raw mode into
//! logical edit events. Escape sequences are resolved by a small state
//! machine that consumes exactly one byte per transition, so it can be
//! driven from a scripted byte slice as easily as from a live terminal.

use std::io;

use tracing::trace;

const CTRL_A: u8 = 1;
const CTRL_C: u8 = 3;
const CTRL_E: u8 = 5;
const LINE_FEED: u8 = 10;
const CTRL_L: u8 = 12;
const CARRIAGE_RETURN: u8 = 13;
const CTRL_Z: u8 = 26;
const ESC: u8 = 27;
const DEL: u8 = 127;

/// Logical edit events produced by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    MoveHome,
    MoveEnd,
    MoveLeft,
    MoveRight,
    HistoryPrev,
    HistoryNext,
    DeleteForward,
    Backspace,
    Enter,
    ClearScreen,
    ClearLine,
    Suspend,
    Interrupt,
    InsertChar(u8),
    /// An escape sequence that is not understood. Carries no effect.
    Unknown,
}

/// Position inside an escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    #[default]
    Idle,
    /// Saw ESC
    SawEsc,
    /// Saw ESC [
    SawBracket,
    /// Saw ESC [ 3
    SawDigit3,
}

/// Byte-at-a-time escape sequence decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    state: DecoderState,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Feed one byte. Returns `None` while a sequence is still open.
    ///
    /// Any byte that does not continue a known sequence aborts it: the
    /// decoder goes back to [`DecoderState::Idle`] and reports
    /// [`EditEvent::Unknown`].
    pub fn feed(&mut self, byte: u8) -> Option<EditEvent> {
        let (next, event) = match (self.state, byte) {
            (DecoderState::Idle, ESC) => (DecoderState::SawEsc, None),
            (DecoderState::Idle, byte) => (DecoderState::Idle, Some(classify(byte))),

            (DecoderState::SawEsc, ESC) => (DecoderState::Idle, Some(EditEvent::ClearLine)),
            (DecoderState::SawEsc, b'[') => (DecoderState::SawBracket, None),

            (DecoderState::SawBracket, b'A') => (DecoderState::Idle, Some(EditEvent::HistoryPrev)),
            (DecoderState::SawBracket, b'B') => (DecoderState::Idle, Some(EditEvent::HistoryNext)),
            (DecoderState::SawBracket, b'C') => (DecoderState::Idle, Some(EditEvent::MoveRight)),
            (DecoderState::SawBracket, b'D') => (DecoderState::Idle, Some(EditEvent::MoveLeft)),
            (DecoderState::SawBracket, b'H') => (DecoderState::Idle, Some(EditEvent::MoveHome)),
            (DecoderState::SawBracket, b'F') => (DecoderState::Idle, Some(EditEvent::MoveEnd)),
            (DecoderState::SawBracket, b'3') => (DecoderState::SawDigit3, None),

            (DecoderState::SawDigit3, b'~') => {
                (DecoderState::Idle, Some(EditEvent::DeleteForward))
            }

            (state, byte) => {
                trace!(?state, byte, "discarding unrecognized escape sequence");
                (DecoderState::Idle, Some(EditEvent::Unknown))
            }
        };
        self.state = next;
        event
    }

    /// Pull bytes from `read_byte` until one full event has been decoded.
    ///
    /// `read_byte` yields `Ok(None)` at end of stream, in which case this
    /// returns `Ok(None)` too and any sequence left open is dropped.
    pub fn next_event<F>(&mut self, mut read_byte: F) -> io::Result<Option<EditEvent>>
    where
        F: FnMut() -> io::Result<Option<u8>>,
    {
        loop {
            let Some(byte) = read_byte()? else {
                self.state = DecoderState::Idle;
                return Ok(None);
            };
            if let Some(event) = self.feed(byte) {
                trace!(?event, "decoded");
                return Ok(Some(event));
            }
        }
    }
}

/// Map a byte outside any escape sequence to its event
fn classify(byte: u8) -> EditEvent {
    match byte {
        CTRL_A => EditEvent::MoveHome,
        CTRL_C => EditEvent::Interrupt,
        CTRL_E => EditEvent::MoveEnd,
        LINE_FEED | CARRIAGE_RETURN => EditEvent::Enter,
        CTRL_L => EditEvent::ClearScreen,
        CTRL_Z => EditEvent::Suspend,
        DEL => EditEvent::Backspace,
        other => EditEvent::InsertChar(other),
    }
}
