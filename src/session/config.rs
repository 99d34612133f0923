//! Session configuration: timings and the ordered exercise list
//!
//! Loaded from JSON; every field is optional and falls back to the values the
//! stock stretch routine uses.

use super::step::{ExerciseDefinition, StepTiming};
use crate::pose::SignalKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Reasons a session cannot be configured
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("session has no exercises")]
    NoExercises,

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("exercise #{index} has an empty name")]
    UnnamedExercise { index: usize },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything needed to build a `SessionController`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Countdown hold per exercise, after confirmation
    pub hold_ms: u64,
    /// Delay after detection before the countdown appears
    pub confirmation_ms: u64,
    /// How long each success message stays up
    pub success_display_ms: u64,
    /// "Good job" window once the user is framed
    pub alignment_greeting_ms: u64,
    /// Countdown before the first exercise, after the greeting
    pub alignment_hold_ms: u64,
    /// Dropped frames tolerated during a hold (0 = strict)
    pub grace_frames: u32,
    pub exercises: Vec<ExerciseDefinition>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            hold_ms: 9_000,
            confirmation_ms: 1_000,
            success_display_ms: 2_000,
            alignment_greeting_ms: 2_000,
            alignment_hold_ms: 3_000,
            grace_frames: 0,
            exercises: stock_exercises(),
        }
    }
}

impl SessionConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: SessionConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject degenerate sessions up front
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exercises.is_empty() {
            return Err(ConfigError::NoExercises);
        }
        if self.hold_ms == 0 {
            return Err(ConfigError::ZeroDuration { field: "hold_ms" });
        }
        if self.alignment_hold_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "alignment_hold_ms",
            });
        }
        if let Some(index) = self
            .exercises
            .iter()
            .position(|e| e.name.trim().is_empty())
        {
            return Err(ConfigError::UnnamedExercise { index });
        }
        Ok(())
    }

    pub fn step_timing(&self) -> StepTiming {
        StepTiming {
            confirmation: Duration::from_millis(self.confirmation_ms),
            hold: Duration::from_millis(self.hold_ms),
            success_display: Duration::from_millis(self.success_display_ms),
            grace_frames: self.grace_frames,
        }
    }

    pub fn alignment_greeting(&self) -> Duration {
        Duration::from_millis(self.alignment_greeting_ms)
    }

    pub fn alignment_hold(&self) -> Duration {
        Duration::from_millis(self.alignment_hold_ms)
    }
}

/// The six-stretch upper-body routine
pub fn stock_exercises() -> Vec<ExerciseDefinition> {
    vec![
        ExerciseDefinition::new(
            "Left Bend Stretch",
            SignalKind::BendLeft,
            "Put your left arm over your head and lean your body to the left side.",
            "Nice stretch to the left!",
        ),
        ExerciseDefinition::new(
            "Right Bend Stretch",
            SignalKind::BendRight,
            "Put your right arm over your head and lean your body to the right side.",
            "Well done on that right bend!",
        ),
        ExerciseDefinition::new(
            "Left Cross-Body Arm Stretch",
            SignalKind::ShoulderExtensionLeft,
            "Bring your left arm across your chest and hold it with your right hand.",
            "Great stretch!",
        ),
        ExerciseDefinition::new(
            "Right Cross-Body Arm Stretch",
            SignalKind::ShoulderExtensionRight,
            "Bring your right arm across your chest and hold it with your left hand.",
            "Awesome work!",
        ),
        ExerciseDefinition::new(
            "Left Neck Tilt Stretch",
            SignalKind::NeckTiltLeft,
            "Gently tilt your head toward your left shoulder and hold it with your left hand.",
            "Good job relaxing that neck!",
        ),
        ExerciseDefinition::new(
            "Right Neck Tilt Stretch",
            SignalKind::NeckTiltRight,
            "Gently tilt your head toward your right shoulder and hold it with your right hand.",
            "Neck stretch complete!",
        ),
    ]
}
