//! StretchFlow - guided stretching sessions driven by body-pose signals
//!
//! A session aligns the user in front of the camera, then walks through an
//! ordered list of stretches. Each stretch is confirmed by holding its pose
//! continuously for a set time, after which the session advances on its own.
//!
//! # Modules
//! - `pose`: landmark snapshots and per-exercise signal predicates
//! - `session`: hold timers, exercise steps and the session controller
//! - `source`: recorded and simulated frame sources
//! - `app`: home / session / finished screen flow
//! - `cli`: keyboard input and terminal rendering

pub mod app;
pub mod cli;
pub mod pose;
pub mod session;
pub mod source;
