//! Screen flow around the session controller
//!
//! Home (touch START) → Session (alignment + exercises) → Finished (banner,
//! then touch HOME) → Home. Buttons are pressed by pointing an index finger
//! at them, or from the keyboard.

use crate::pose::{Point, PoseSnapshot, SignalKind};
use crate::session::{HoldStatus, HoldTimer, SessionController, SessionPhase, SessionStatus};
use crate::source::{Cue, Frame};
use std::time::Duration;
use tracing::info;

pub const HOME_HINT: &str = "Use your index finger to touch the button!";
pub const SESSION_COMPLETE: &str = "Session Complete!";
pub const GO_HOME_HINT: &str = "Use your index finger to go home!";

/// How long "Session Complete!" stays up before the go-home hint
const BANNER: Duration = Duration::from_secs(2);

/// Axis-aligned button in normalized frame coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Button {
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    fn pressed_by(&self, pose: Option<&PoseSnapshot>) -> bool {
        pose.is_some_and(|pose| pose.hands().iter().any(|h| self.contains(&h.index_tip)))
    }
}

/// Centered START button, halfway down the frame
pub const START_BUTTON: Button = Button {
    left: 0.422,
    top: 0.5,
    width: 0.156,
    height: 0.07,
};

/// Centered HOME button, below where START sits
pub const HOME_BUTTON: Button = Button {
    left: 0.422,
    top: 0.708,
    width: 0.156,
    height: 0.07,
};

/// What the renderer should draw for one frame
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    /// Title screen; hint shown while no hand is visible
    Home { hint: Option<&'static str> },
    Session(SessionStatus),
    /// All exercises done; banner, then the go-home hint
    Finished { message: &'static str },
}

#[derive(Clone, Debug)]
enum Screen {
    Home,
    Session,
    Finished { banner: HoldTimer, shown: bool },
}

/// The application state machine driven once per frame
pub struct App {
    controller: SessionController,
    screen: Screen,
    completed: usize,
}

impl App {
    pub fn new(controller: SessionController) -> Self {
        App {
            controller,
            screen: Screen::Home,
            completed: 0,
        }
    }

    /// Leave the home screen and begin aligning
    pub fn start(&mut self) {
        if matches!(self.screen, Screen::Home) {
            self.controller.reset();
            self.screen = Screen::Session;
            info!("session requested");
        }
    }

    /// Abandon or leave the session and return to the home screen
    pub fn go_home(&mut self) {
        self.controller.reset();
        self.screen = Screen::Home;
    }

    /// Process one frame
    pub fn frame(&mut self, frame: &Frame) -> View {
        let pose = frame.pose.as_ref();

        if matches!(self.screen, Screen::Home) {
            if !START_BUTTON.pressed_by(pose) {
                let hand_seen = pose.is_some_and(|p| !p.hands().is_empty());
                return View::Home {
                    hint: (!hand_seen).then_some(HOME_HINT),
                };
            }
            self.start();
        }

        if matches!(self.screen, Screen::Finished { .. }) && HOME_BUTTON.pressed_by(pose) {
            self.go_home();
            return View::Home { hint: None };
        }

        if let Screen::Finished { banner, shown } = &mut self.screen {
            if banner.observe(true, frame.at) == HoldStatus::Satisfied {
                *shown = true;
            }
            let message = if *shown { GO_HOME_HINT } else { SESSION_COMPLETE };
            return View::Finished { message };
        }

        let status = self.controller.tick(pose, frame.at);
        if status.phase() == SessionPhase::Complete {
            self.completed += 1;
            let mut banner = HoldTimer::new(BANNER);
            banner.observe(true, frame.at);
            self.screen = Screen::Finished {
                banner,
                shown: false,
            };
            return View::Finished {
                message: SESSION_COMPLETE,
            };
        }
        View::Session(status)
    }

    /// What a cooperative user would be doing given the current screen
    pub fn cue(&self) -> Cue {
        match &self.screen {
            Screen::Home => Cue::Touch(START_BUTTON.center()),
            Screen::Session => match self.controller.expected_signal() {
                Some(SignalKind::UpperBodyVisible) | None => Cue::Rest,
                Some(kind) => Cue::Perform(kind),
            },
            Screen::Finished { shown: true, .. } => Cue::Touch(HOME_BUTTON.center()),
            Screen::Finished { shown: false, .. } => Cue::Rest,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self.screen, Screen::Home)
    }

    /// Sessions finished since launch
    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }
}
