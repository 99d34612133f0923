//! Exercise steps: one stretch, its hold requirement and completion latch
//!
//! A step moves through three phases:
//! - holding: the signal is fed into the hold timer every frame
//! - celebrating: the success message is shown for a fixed window
//! - finished: the controller may move on (reported once as `Done`)

use super::timer::{HoldStatus, HoldTimer, Timestamp};
use crate::pose::signals::{SignalFn, SignalKind, SignalTable};
use crate::pose::PoseSnapshot;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Shown while a detected stretch is inside the confirmation window
pub const HOLD_DETECTED_MESSAGE: &str = "Stretch Detected! Hold this position...";

/// What the user should do and what they hear when it's done
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub name: String,
    pub signal: SignalKind,
    pub prompt: String,
    pub success: String,
}

impl ExerciseDefinition {
    pub fn new(
        name: impl Into<String>,
        signal: SignalKind,
        prompt: impl Into<String>,
        success: impl Into<String>,
    ) -> Self {
        ExerciseDefinition {
            name: name.into(),
            signal,
            prompt: prompt.into(),
            success: success.into(),
        }
    }
}

/// Durations shared by every step of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTiming {
    /// Brief window after detection before the countdown appears
    pub confirmation: Duration,
    /// Hold time counted down after the confirmation window
    pub hold: Duration,
    /// How long the success message stays up
    pub success_display: Duration,
    /// Dropped frames tolerated during a hold
    pub grace_frames: u32,
}

impl Default for StepTiming {
    fn default() -> Self {
        StepTiming {
            confirmation: Duration::from_secs(1),
            hold: Duration::from_secs(9),
            success_display: Duration::from_secs(2),
            grace_frames: 0,
        }
    }
}

/// Per-frame result of advancing a step
#[derive(Clone, Debug, PartialEq)]
pub enum StepStatus {
    /// Not yet satisfied
    InProgress {
        message: String,
        /// Continuous hold time so far
        held: Duration,
        /// Whole seconds left, once past the confirmation window
        countdown: Option<u64>,
        /// Share of the total hold requirement reached (0.0-1.0)
        progress: f32,
    },
    /// Satisfied; success message still on screen
    Complete { message: String },
    /// Success window elapsed; the controller should move on
    Done,
}

#[derive(Clone, Debug)]
enum Phase {
    Holding,
    Celebrating(HoldTimer),
    Finished,
}

/// One exercise being performed within a session
#[derive(Clone, Debug)]
pub struct ExerciseStep {
    definition: ExerciseDefinition,
    signal: SignalFn,
    timing: StepTiming,
    hold_timer: HoldTimer,
    phase: Phase,
}

impl ExerciseStep {
    /// Create a fresh, uncompleted step
    pub fn new(definition: ExerciseDefinition, signals: &SignalTable, timing: StepTiming) -> Self {
        let required = timing.confirmation + timing.hold;
        ExerciseStep {
            signal: signals.resolve(definition.signal),
            definition,
            timing,
            hold_timer: HoldTimer::with_grace(required, timing.grace_frames),
            phase: Phase::Holding,
        }
    }

    /// Advance with this frame's pose (`None` when no pose was detected)
    pub fn advance(&mut self, pose: Option<&PoseSnapshot>, now: Timestamp) -> StepStatus {
        match &mut self.phase {
            Phase::Finished => StepStatus::Done,
            Phase::Celebrating(display) => match display.observe(true, now) {
                HoldStatus::Satisfied => {
                    self.phase = Phase::Finished;
                    StepStatus::Done
                }
                _ => self.complete_status(),
            },
            Phase::Holding => {
                let detected = pose.is_some_and(|pose| (self.signal)(pose));
                self.observe_hold(detected, now)
            }
        }
    }

    fn observe_hold(&mut self, detected: bool, now: Timestamp) -> StepStatus {
        match self.hold_timer.observe(detected, now) {
            HoldStatus::NotHolding => self.idle_status(),
            HoldStatus::Holding(held) if held < self.timing.confirmation => {
                StepStatus::InProgress {
                    message: HOLD_DETECTED_MESSAGE.to_string(),
                    held,
                    countdown: None,
                    progress: self.progress(held),
                }
            }
            HoldStatus::Holding(held) => {
                let counted = held - self.timing.confirmation;
                let remaining = self.timing.hold.saturating_sub(counted).as_millis() as u64;
                StepStatus::InProgress {
                    message: HOLD_DETECTED_MESSAGE.to_string(),
                    held,
                    countdown: Some(remaining.div_ceil(1000)),
                    progress: self.progress(held),
                }
            }
            HoldStatus::Satisfied => {
                debug!(exercise = %self.definition.name, at = %now, "hold satisfied");
                self.hold_timer.reset();
                let mut display = HoldTimer::new(self.timing.success_display);
                display.observe(true, now);
                self.phase = Phase::Celebrating(display);
                self.complete_status()
            }
        }
    }

    /// Status shown before the user has started holding the stretch
    pub fn idle_status(&self) -> StepStatus {
        StepStatus::InProgress {
            message: self.definition.prompt.clone(),
            held: Duration::ZERO,
            countdown: None,
            progress: 0.0,
        }
    }

    fn complete_status(&self) -> StepStatus {
        StepStatus::Complete {
            message: self.definition.success.clone(),
        }
    }

    fn progress(&self, held: Duration) -> f32 {
        let required = self.hold_timer.required().as_secs_f32();
        if required <= 0.0 {
            return 1.0;
        }
        (held.as_secs_f32() / required).clamp(0.0, 1.0)
    }

    /// Whether the hold requirement has been met (never reverts)
    pub fn is_completed(&self) -> bool {
        !matches!(self.phase, Phase::Holding)
    }

    /// Whether `Done` has been reported
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    pub fn definition(&self) -> &ExerciseDefinition {
        &self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    fn always(_: &PoseSnapshot) -> bool {
        true
    }

    fn never(_: &PoseSnapshot) -> bool {
        false
    }

    fn step_with(predicate: SignalFn) -> ExerciseStep {
        let mut signals = SignalTable::standard();
        signals.register(SignalKind::BendLeft, predicate);
        let definition = ExerciseDefinition::new(
            "Left Bend Stretch",
            SignalKind::BendLeft,
            "Lean left",
            "Nice stretch to the left!",
        );
        let timing = StepTiming {
            confirmation: Duration::from_millis(200),
            hold: Duration::from_millis(1000),
            success_display: Duration::from_millis(500),
            grace_frames: 0,
        };
        ExerciseStep::new(definition, &signals, timing)
    }

    #[test]
    fn test_prompt_without_signal() {
        let mut step = step_with(never);
        let pose = PoseSnapshot::new();
        match step.advance(Some(&pose), ms(0)) {
            StepStatus::InProgress {
                message, countdown, ..
            } => {
                assert_eq!(message, "Lean left");
                assert_eq!(countdown, None);
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_missing_pose_shows_prompt() {
        let mut step = step_with(always);
        assert_eq!(step.advance(None, ms(0)), step.idle_status());
    }

    #[test]
    fn test_confirmation_then_countdown() {
        let mut step = step_with(always);
        let pose = PoseSnapshot::new();

        match step.advance(Some(&pose), ms(0)) {
            StepStatus::InProgress {
                message, countdown, ..
            } => {
                assert_eq!(message, HOLD_DETECTED_MESSAGE);
                assert_eq!(countdown, None);
            }
            other => panic!("unexpected status {:?}", other),
        }

        // 300ms held: 100ms past confirmation, 900ms left -> 1s
        match step.advance(Some(&pose), ms(300)) {
            StepStatus::InProgress {
                countdown, held, ..
            } => {
                assert_eq!(countdown, Some(1));
                assert_eq!(held, Duration::from_millis(300));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_complete_then_done_once() {
        let mut step = step_with(always);
        let pose = PoseSnapshot::new();
        let mut seen_complete = false;
        let mut done_at = None;

        for t in (0..=3000).step_by(100) {
            match step.advance(Some(&pose), ms(t)) {
                StepStatus::Complete { message } => {
                    assert!(done_at.is_none(), "complete after done");
                    assert_eq!(message, "Nice stretch to the left!");
                    seen_complete = true;
                }
                StepStatus::Done => {
                    assert!(seen_complete, "done before complete");
                    done_at.get_or_insert(t);
                }
                StepStatus::InProgress { .. } => assert!(!seen_complete),
            }
        }

        // satisfied at 1200ms, success window of 500ms
        assert_eq!(done_at, Some(1700));
        assert!(step.is_completed());
        assert!(step.is_finished());
    }

    #[test]
    fn test_completed_ignores_lost_signal() {
        let mut step = step_with(always);
        let pose = PoseSnapshot::new();
        step.advance(Some(&pose), ms(0));
        assert!(matches!(
            step.advance(Some(&pose), ms(1200)),
            StepStatus::Complete { .. }
        ));
        assert!(matches!(step.advance(None, ms(1300)), StepStatus::Complete { .. }));
        assert_eq!(step.advance(None, ms(1700)), StepStatus::Done);
    }

    #[test]
    fn test_dropout_restarts_hold() {
        let mut step = step_with(always);
        let pose = PoseSnapshot::new();
        step.advance(Some(&pose), ms(0));
        step.advance(Some(&pose), ms(1100));
        assert_eq!(step.advance(None, ms(1150)), step.idle_status());
        match step.advance(Some(&pose), ms(1200)) {
            StepStatus::InProgress { held, .. } => assert_eq!(held, Duration::ZERO),
            other => panic!("unexpected status {:?}", other),
        }
        assert!(!step.is_completed());
    }
}
