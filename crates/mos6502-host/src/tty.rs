//! Memory-mapped console I/O for interactive programs (EhBASIC and
//! similar): a status/data port for keyboard input, and a single output
//! port that prints whatever byte is written to it.
//!
//! Gated behind the `tty` feature; raw terminal mode is the only part of
//! this that's platform-specific, and `crossterm` covers it uniformly.

use std::io::Write;

use crate::{TTY_INPUT_ADDR, TTY_OUTPUT_ADDR};
use emu_core::{Bus, SimpleBus};
use mos6502::Pins;

/// Polls the keyboard for [`TTY_INPUT_ADDR`] reads and prints characters
/// written to [`TTY_OUTPUT_ADDR`].
pub struct TtyIo {
    raw_mode: bool,
}

impl TtyIo {
    pub fn new() -> Self {
        let raw_mode = crossterm::terminal::enable_raw_mode().is_ok();
        TtyIo { raw_mode }
    }

    /// Called after every [`mos6502::Cpu::tick`], mirroring the way the
    /// core's bus would intercept an access to a peripheral's address
    /// range before it reaches RAM.
    pub fn service(&mut self, pins: &mut Pins, bus: &mut SimpleBus) {
        if pins.rw && pins.addr == TTY_INPUT_ADDR {
            let byte = poll_key().unwrap_or(0);
            pins.data = byte;
            bus.write(TTY_INPUT_ADDR, byte);
        } else if !pins.rw && pins.addr == TTY_OUTPUT_ADDR {
            print!("{}", pins.data as char);
            let _ = std::io::stdout().flush();
        }
    }
}

impl Default for TtyIo {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TtyIo {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

/// Returns a pending keystroke without blocking, or `None` if the
/// keyboard is idle this tick.
fn poll_key() -> Option<u8> {
    use crossterm::event::{self, Event, KeyCode};

    if !event::poll(std::time::Duration::from_millis(0)).unwrap_or(false) {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key) => match key.code {
            KeyCode::Char(c) => Some(c as u8),
            KeyCode::Enter => Some(b'\r'),
            KeyCode::Backspace => Some(0x08),
            _ => None,
        },
        _ => None,
    }
}
