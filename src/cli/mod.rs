//! CLI Interface: keyboard commands and rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Terminal rendering of the current view
//! - `headless.rs`: Log-only rendering for unattended runs

pub mod display;
pub mod headless;
pub mod input;

use crate::app::View;
use std::io;

pub use display::TerminalDisplay;
pub use headless::HeadlessRenderer;
pub use input::{Command, InputHandler};

/// Draws one view per frame
pub trait Renderer {
    fn render(&mut self, view: &View) -> io::Result<()>;

    /// Restore whatever the renderer changed on startup
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}
