//! Session Management: hold timing, exercise steps and the session controller
//!
//! # Components
//! - `timer.rs`: HoldTimer for continuous-true signal tracking
//! - `step.rs`: ExerciseStep with its completion latch and success window
//! - `controller.rs`: SessionController (alignment → exercises → complete)
//! - `config.rs`: SessionConfig, validation and the stock routine

pub mod config;
pub mod controller;
pub mod step;
pub mod timer;

pub use config::{stock_exercises, ConfigError, SessionConfig};
pub use controller::{AlignmentStatus, SessionController, SessionPhase, SessionStatus};
pub use step::{ExerciseDefinition, ExerciseStep, StepStatus, StepTiming};
pub use timer::{HoldStatus, HoldTimer, Timestamp};
