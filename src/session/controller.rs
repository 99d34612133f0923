//! Session controller: alignment gate, then each exercise in order
//!
//! Phases:
//! - Aligning: wait until the upper body is framed long enough
//! - Running: drive the current step, move on when it reports `Done`
//! - Complete: terminal until `reset`

use super::config::{ConfigError, SessionConfig};
use super::step::{ExerciseStep, StepStatus};
use super::timer::{HoldStatus, HoldTimer, Timestamp};
use crate::pose::{PoseSnapshot, SignalKind, SignalTable};
use std::time::Duration;
use tracing::{debug, info};

pub const ALIGN_PROMPT: &str = "Align your upper body like the image!";
pub const ALIGN_SUCCESS: &str = "Good Job! Let's start your stretch session!";

/// Coarse session phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Aligning,
    Running,
    Complete,
}

/// What the alignment gate is showing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlignmentStatus {
    /// Upper body not framed
    Searching { message: &'static str },
    /// Framed; greeting window running
    Greeting { message: &'static str },
    /// Framed; whole seconds until the first exercise
    Countdown { remaining: u64 },
}

/// Per-tick status handed to the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    Aligning(AlignmentStatus),
    Running {
        index: usize,
        count: usize,
        exercise: String,
        status: StepStatus,
    },
    Complete {
        count: usize,
    },
}

impl SessionStatus {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionStatus::Aligning(_) => SessionPhase::Aligning,
            SessionStatus::Running { .. } => SessionPhase::Running,
            SessionStatus::Complete { .. } => SessionPhase::Complete,
        }
    }

    /// Text to display, if this status carries any
    pub fn message(&self) -> Option<&str> {
        match self {
            SessionStatus::Aligning(AlignmentStatus::Searching { message })
            | SessionStatus::Aligning(AlignmentStatus::Greeting { message }) => Some(*message),
            SessionStatus::Aligning(AlignmentStatus::Countdown { .. }) => None,
            SessionStatus::Running { status, .. } => match status {
                StepStatus::InProgress { message, .. } | StepStatus::Complete { message } => {
                    Some(message.as_str())
                }
                StepStatus::Done => None,
            },
            SessionStatus::Complete { .. } => None,
        }
    }

    /// Whole seconds left on whichever countdown is showing
    pub fn countdown(&self) -> Option<u64> {
        match self {
            SessionStatus::Aligning(AlignmentStatus::Countdown { remaining }) => Some(*remaining),
            SessionStatus::Running {
                status: StepStatus::InProgress { countdown, .. },
                ..
            } => *countdown,
            _ => None,
        }
    }

    /// Share of the current hold requirement reached
    pub fn progress(&self) -> Option<f32> {
        match self {
            SessionStatus::Running {
                status: StepStatus::InProgress { progress, .. },
                ..
            } => Some(*progress),
            _ => None,
        }
    }
}

/// Drives one session from alignment through every exercise
#[derive(Clone, Debug)]
pub struct SessionController {
    config: SessionConfig,
    signals: SignalTable,
    steps: Vec<ExerciseStep>,
    /// Current step; equals `steps.len()` once complete
    index: usize,
    phase: SessionPhase,
    alignment: HoldTimer,
}

impl SessionController {
    /// Controller using the built-in signal predicates
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_signals(config, SignalTable::standard())
    }

    /// Controller using a custom signal table
    pub fn with_signals(config: SessionConfig, signals: SignalTable) -> Result<Self, ConfigError> {
        config.validate()?;
        let alignment = HoldTimer::with_grace(
            config.alignment_greeting() + config.alignment_hold(),
            config.grace_frames,
        );
        let steps = build_steps(&config, &signals);
        Ok(SessionController {
            config,
            signals,
            steps,
            index: 0,
            phase: SessionPhase::Aligning,
            alignment,
        })
    }

    /// Process one frame. `pose` is `None` when nothing was detected.
    pub fn tick(&mut self, pose: Option<&PoseSnapshot>, now: Timestamp) -> SessionStatus {
        match self.phase {
            SessionPhase::Aligning => self.tick_aligning(pose, now),
            SessionPhase::Running => self.tick_running(pose, now),
            SessionPhase::Complete => SessionStatus::Complete {
                count: self.steps.len(),
            },
        }
    }

    fn tick_aligning(&mut self, pose: Option<&PoseSnapshot>, now: Timestamp) -> SessionStatus {
        let framed = self.signals.evaluate(SignalKind::UpperBodyVisible, pose);
        let greeting = self.config.alignment_greeting();

        let status = match self.alignment.observe(framed, now) {
            HoldStatus::NotHolding => AlignmentStatus::Searching {
                message: ALIGN_PROMPT,
            },
            HoldStatus::Holding(held) if held < greeting => AlignmentStatus::Greeting {
                message: ALIGN_SUCCESS,
            },
            HoldStatus::Holding(held) => AlignmentStatus::Countdown {
                remaining: whole_seconds_left(self.config.alignment_hold(), held - greeting),
            },
            HoldStatus::Satisfied => {
                self.alignment.reset();
                self.phase = SessionPhase::Running;
                self.index = 0;
                info!(exercises = self.steps.len(), at = %now, "session started");
                return self.running_status(self.steps[0].idle_status());
            }
        };
        SessionStatus::Aligning(status)
    }

    fn tick_running(&mut self, pose: Option<&PoseSnapshot>, now: Timestamp) -> SessionStatus {
        let status = self.steps[self.index].advance(pose, now);
        if status != StepStatus::Done {
            return self.running_status(status);
        }

        debug!(
            exercise = %self.steps[self.index].definition().name,
            index = self.index,
            "exercise done"
        );
        self.index += 1;
        if self.index == self.steps.len() {
            self.phase = SessionPhase::Complete;
            info!(exercises = self.steps.len(), at = %now, "session complete");
            return SessionStatus::Complete {
                count: self.steps.len(),
            };
        }
        self.running_status(self.steps[self.index].idle_status())
    }

    fn running_status(&self, status: StepStatus) -> SessionStatus {
        SessionStatus::Running {
            index: self.index,
            count: self.steps.len(),
            exercise: self.steps[self.index].definition().name.clone(),
            status,
        }
    }

    /// Start over: fresh steps, back to alignment
    pub fn reset(&mut self) {
        self.steps = build_steps(&self.config, &self.signals);
        self.index = 0;
        self.phase = SessionPhase::Aligning;
        self.alignment.reset();
        info!("session reset");
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ExerciseStep] {
        &self.steps
    }

    /// The signal the user is currently expected to produce
    pub fn expected_signal(&self) -> Option<SignalKind> {
        match self.phase {
            SessionPhase::Aligning => Some(SignalKind::UpperBodyVisible),
            SessionPhase::Running => Some(self.steps[self.index].definition().signal),
            SessionPhase::Complete => None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

fn build_steps(config: &SessionConfig, signals: &SignalTable) -> Vec<ExerciseStep> {
    let timing = config.step_timing();
    config
        .exercises
        .iter()
        .cloned()
        .map(|definition| ExerciseStep::new(definition, signals, timing))
        .collect()
}

fn whole_seconds_left(total: Duration, counted: Duration) -> u64 {
    (total.saturating_sub(counted).as_millis() as u64).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::step::ExerciseDefinition;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    fn always(_: &PoseSnapshot) -> bool {
        true
    }

    fn quick_config() -> SessionConfig {
        SessionConfig {
            hold_ms: 1000,
            confirmation_ms: 200,
            success_display_ms: 300,
            alignment_greeting_ms: 200,
            alignment_hold_ms: 300,
            grace_frames: 0,
            exercises: vec![ExerciseDefinition::new(
                "Bend",
                SignalKind::BendLeft,
                "Lean left",
                "Nice!",
            )],
        }
    }

    fn permissive() -> SignalTable {
        let mut signals = SignalTable::standard();
        signals.register(SignalKind::UpperBodyVisible, always);
        signals.register(SignalKind::BendLeft, always);
        signals
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SessionConfig {
            exercises: vec![],
            ..quick_config()
        };
        assert!(SessionController::new(config).is_err());
    }

    #[test]
    fn test_alignment_sequence() {
        let mut session = SessionController::with_signals(quick_config(), permissive()).unwrap();
        let pose = PoseSnapshot::new();

        assert_eq!(
            session.tick(None, ms(0)),
            SessionStatus::Aligning(AlignmentStatus::Searching {
                message: ALIGN_PROMPT
            })
        );
        assert_eq!(
            session.tick(Some(&pose), ms(100)),
            SessionStatus::Aligning(AlignmentStatus::Greeting {
                message: ALIGN_SUCCESS
            })
        );
        assert_eq!(session.tick(Some(&pose), ms(300)).countdown(), Some(1));
        assert_eq!(session.phase(), SessionPhase::Aligning);

        let status = session.tick(Some(&pose), ms(600));
        assert_eq!(status.phase(), SessionPhase::Running);
        assert_eq!(status.message(), Some("Lean left"));
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_alignment_restarts_when_user_leaves_frame() {
        let mut session = SessionController::with_signals(quick_config(), permissive()).unwrap();
        let pose = PoseSnapshot::new();

        session.tick(Some(&pose), ms(0));
        session.tick(Some(&pose), ms(400));
        session.tick(None, ms(450));
        assert_eq!(session.tick(Some(&pose), ms(500)).phase(), SessionPhase::Aligning);
        assert_eq!(session.tick(Some(&pose), ms(999)).phase(), SessionPhase::Aligning);
        assert_eq!(session.tick(Some(&pose), ms(1000)).phase(), SessionPhase::Running);
    }

    #[test]
    fn test_complete_is_stable_and_resettable() {
        let mut session = SessionController::with_signals(quick_config(), permissive()).unwrap();
        let pose = PoseSnapshot::new();

        let mut t = 0;
        while session.phase() != SessionPhase::Complete {
            session.tick(Some(&pose), ms(t));
            t += 100;
            assert!(t < 10_000, "session never completed");
        }
        assert_eq!(session.index(), 1);
        assert_eq!(session.expected_signal(), None);

        let first = session.tick(Some(&pose), ms(t));
        let second = session.tick(Some(&pose), ms(t));
        assert_eq!(first, SessionStatus::Complete { count: 1 });
        assert_eq!(first, second);
        assert_eq!(session.index(), 1);

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Aligning);
        assert_eq!(session.index(), 0);
        assert!(session.steps().iter().all(|s| !s.is_completed()));
        assert_eq!(session.expected_signal(), Some(SignalKind::UpperBodyVisible));
    }

    #[test]
    fn test_whole_seconds_left() {
        assert_eq!(whole_seconds_left(Duration::from_secs(3), Duration::ZERO), 3);
        assert_eq!(whole_seconds_left(Duration::from_secs(3), Duration::from_millis(999)), 3);
        assert_eq!(whole_seconds_left(Duration::from_secs(3), Duration::from_millis(1000)), 2);
        assert_eq!(whole_seconds_left(Duration::from_secs(3), Duration::from_secs(5)), 0);
    }
}
