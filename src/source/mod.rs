//! Pose sources: where frames come from
//!
//! # Components
//! - `replay.rs`: JSON-lines replay of recorded frames, and the recorder
//! - `simulated.rs`: Seeded performer that follows the on-screen cue

pub mod replay;
pub mod simulated;

use crate::pose::{Point, PoseSnapshot, SignalKind};
use crate::session::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use replay::{FrameRecorder, ReplaySource};
pub use simulated::SimulatedPerformer;

/// One captured frame after pose estimation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Capture time on the source's monotonic clock
    #[serde(rename = "t_ms")]
    pub at: Timestamp,
    /// `None` when no body was detected
    #[serde(default)]
    pub pose: Option<PoseSnapshot>,
}

impl Frame {
    pub fn new(at: Timestamp, pose: Option<PoseSnapshot>) -> Self {
        Frame { at, pose }
    }
}

/// What a cooperative user would be doing right now
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// Stand framed in a neutral pose
    Rest,
    /// Perform the stretch measured by this signal
    Perform(SignalKind),
    /// Point the index finger at this normalized position
    Touch(Point),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("frame source I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Produces frames in capture order
pub trait PoseSource {
    /// Next frame, or `None` once the stream has ended
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Tell the source what the user is being asked to do.
    /// Live and recorded sources ignore it.
    fn cue(&mut self, _cue: Cue) {}
}
