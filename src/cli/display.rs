//! Terminal display of the current view
//!
//! Features:
//! - Phase header with exercise progress (e.g. "Exercise 2/6")
//! - Prompt / success messages color coded by phase
//! - Big countdown and a hold progress bar
//! - Redraws only when the view changes

use super::Renderer;
use crate::app::View;
use crate::session::{AlignmentStatus, SessionStatus, StepStatus};
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{stdout, Result as IoResult, Write};

const BAR_WIDTH: usize = 40;

/// Terminal display manager
pub struct TerminalDisplay {
    /// Whether we're using alternate screen
    use_alternate_screen: bool,
    /// Last view drawn, to skip identical frames
    last: Option<View>,
}

impl TerminalDisplay {
    /// Create display without alternate screen (simpler mode)
    pub fn simple() -> Self {
        TerminalDisplay {
            use_alternate_screen: false,
            last: None,
        }
    }

    /// Create display on the alternate screen, restored on shutdown
    pub fn fullscreen() -> IoResult<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(TerminalDisplay {
            use_alternate_screen: true,
            last: None,
        })
    }

    /// Clear screen
    pub fn clear(&self) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    fn show_title(&self) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Cyan),
            Print("StretchFlow\n"),
            ResetColor
        )
    }

    fn show_header(&self, label: &str, color: Color) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 3),
            SetForegroundColor(color),
            Print(label),
            ResetColor,
            Print("\n")
        )
    }

    fn show_message(&self, message: &str, color: Color) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 5),
            SetForegroundColor(color),
            Print(message),
            ResetColor,
            Print("\n")
        )
    }

    fn show_countdown(&self, remaining: u64) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 7),
            SetForegroundColor(Color::White),
            Print(format!(">>> {} <<<\n", remaining)),
            ResetColor
        )
    }

    /// Hold progress as a bar, green once nearly there
    fn show_progress(&self, progress: f32) -> IoResult<()> {
        let filled = ((progress.clamp(0.0, 1.0)) * BAR_WIDTH as f32).round() as usize;
        let color = if progress > 0.8 {
            Color::Green
        } else if progress > 0.0 {
            Color::Yellow
        } else {
            Color::DarkGrey
        };
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 9),
            Print("Hold: ["),
            SetForegroundColor(color),
            Print("#".repeat(filled)),
            Print("-".repeat(BAR_WIDTH - filled)),
            ResetColor,
            Print(format!("] {:.0}%\n", progress * 100.0))
        )
    }

    /// Show help text
    fn show_help(&self) -> IoResult<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 12),
            SetForegroundColor(Color::DarkGrey),
            Print("s: start  |  h: home  |  Esc / q: quit\n"),
            ResetColor
        )
    }

    fn show_session(&self, status: &SessionStatus) -> IoResult<()> {
        match status {
            SessionStatus::Aligning(alignment) => {
                self.show_header("Get in position", Color::Magenta)?;
                match alignment {
                    AlignmentStatus::Searching { message } => {
                        self.show_message(message, Color::Blue)?
                    }
                    AlignmentStatus::Greeting { message } => {
                        self.show_message(message, Color::Green)?
                    }
                    AlignmentStatus::Countdown { remaining } => self.show_countdown(*remaining)?,
                }
            }
            SessionStatus::Running {
                index,
                count,
                exercise,
                status,
            } => {
                self.show_header(
                    &format!("Exercise {}/{}: {}", index + 1, count, exercise),
                    Color::Magenta,
                )?;
                match status {
                    StepStatus::InProgress {
                        message,
                        countdown,
                        progress,
                        ..
                    } => {
                        let color = if *progress > 0.0 {
                            Color::Yellow
                        } else {
                            Color::Blue
                        };
                        self.show_message(message, color)?;
                        if let Some(remaining) = countdown {
                            self.show_countdown(*remaining)?;
                        }
                        self.show_progress(*progress)?;
                    }
                    StepStatus::Complete { message } => {
                        self.show_message(message, Color::Green)?;
                        self.show_progress(1.0)?;
                    }
                    StepStatus::Done => {}
                }
            }
            SessionStatus::Complete { count } => {
                self.show_header(&format!("{} exercises done", count), Color::Green)?;
            }
        }
        Ok(())
    }
}

impl Renderer for TerminalDisplay {
    fn render(&mut self, view: &View) -> IoResult<()> {
        if self.last.as_ref() == Some(view) {
            return Ok(());
        }

        self.clear()?;
        self.show_title()?;
        match view {
            View::Home { hint } => {
                self.show_header("[ START ]", Color::White)?;
                if let Some(hint) = hint {
                    self.show_message(hint, Color::Blue)?;
                }
            }
            View::Session(status) => self.show_session(status)?,
            View::Finished { message } => {
                self.show_header("[ HOME ]", Color::Blue)?;
                self.show_message(message, Color::Green)?;
            }
        }
        self.show_help()?;
        stdout().flush()?;

        self.last = Some(view.clone());
        Ok(())
    }

    /// Reset terminal state and cleanup
    fn shutdown(&mut self) -> IoResult<()> {
        if self.use_alternate_screen {
            let mut stdout = stdout();
            execute!(stdout, LeaveAlternateScreen, cursor::Show)?;
            self.use_alternate_screen = false;
        }
        terminal::disable_raw_mode()
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::simple()
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
