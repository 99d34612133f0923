//! Headless rendering: log view changes through tracing

use super::Renderer;
use crate::app::View;
use crate::session::SessionPhase;
use std::io;
use tracing::info;

/// The parts of a view a reader would notice changing
#[derive(Clone, Debug, PartialEq, Eq)]
struct Shown {
    screen: &'static str,
    text: String,
    countdown: Option<u64>,
}

impl Shown {
    fn of(view: &View) -> Self {
        match view {
            View::Home { hint } => Shown {
                screen: "home",
                text: hint.unwrap_or("").to_string(),
                countdown: None,
            },
            View::Session(status) => Shown {
                screen: match status.phase() {
                    SessionPhase::Aligning => "aligning",
                    SessionPhase::Running => "running",
                    SessionPhase::Complete => "complete",
                },
                text: status.message().unwrap_or("").to_string(),
                countdown: status.countdown(),
            },
            View::Finished { message } => Shown {
                screen: "finished",
                text: message.to_string(),
                countdown: None,
            },
        }
    }
}

/// Logs each visible change of view instead of drawing it
#[derive(Default)]
pub struct HeadlessRenderer {
    last: Option<Shown>,
    rendered: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct views logged so far
    pub fn rendered(&self) -> usize {
        self.rendered
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, view: &View) -> io::Result<()> {
        let shown = Shown::of(view);
        if self.last.as_ref() == Some(&shown) {
            return Ok(());
        }
        match shown.countdown {
            Some(countdown) => info!(screen = shown.screen, countdown, "{}", shown.text),
            None => info!(screen = shown.screen, "{}", shown.text),
        }
        self.rendered += 1;
        self.last = Some(shown);
        Ok(())
    }
}
