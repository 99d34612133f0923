//! Keystroke input handling using crossterm
//!
//! Features:
//! - Non-blocking keystroke capture
//! - `s` starts a session, `h` returns home
//! - Esc / q / Ctrl+C graceful exit

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result as IoResult;
use std::time::Duration;

/// Keyboard equivalents of the on-screen buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Home,
    Quit,
}

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for poll operations
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler that never blocks the frame loop
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::ZERO,
        }
    }

    /// Enable raw mode for terminal input
    pub fn enable_raw_mode() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()
    }

    /// Disable raw mode and restore terminal
    pub fn disable_raw_mode() -> IoResult<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// Drain pending key events; returns the first command found
    pub fn read_command(&self) -> IoResult<Option<Command>> {
        while event::poll(self.poll_timeout)? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let Some(command) = Self::to_command(&key) {
                    return Ok(Some(command));
                }
            }
        }
        Ok(None)
    }

    /// Map a key event to a command
    pub fn to_command(key: &KeyEvent) -> Option<Command> {
        if Self::is_exit(key) {
            return Some(Command::Quit);
        }
        match key.code {
            KeyCode::Char('s') | KeyCode::Enter => Some(Command::Start),
            KeyCode::Char('h') => Some(Command::Home),
            _ => None,
        }
    }

    /// Check if key event is an exit signal (Ctrl+C, Escape or q)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Esc | KeyCode::Char('q') => true,
            _ => false,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
