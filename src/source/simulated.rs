//! Simulated performer: a seeded stand-in for camera plus pose estimator
//!
//! Features:
//! - Synthesizes a framed upper body, or the stretch matching the current cue
//! - Per-landmark jitter and whole-frame dropouts (no pose detected)
//! - Virtual timestamps at a fixed frame rate

use super::{Cue, Frame, PoseSource, SourceError};
use crate::pose::{Hand, Landmark, Point, PoseSnapshot, SignalKind};
use crate::session::Timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Neutral standing pose facing the camera
const NEUTRAL: [(Landmark, f32, f32); 11] = [
    (Landmark::Nose, 0.50, 0.30),
    (Landmark::LeftEar, 0.54, 0.31),
    (Landmark::RightEar, 0.46, 0.31),
    (Landmark::LeftShoulder, 0.60, 0.45),
    (Landmark::RightShoulder, 0.40, 0.45),
    (Landmark::LeftElbow, 0.63, 0.60),
    (Landmark::RightElbow, 0.37, 0.60),
    (Landmark::LeftWrist, 0.64, 0.74),
    (Landmark::RightWrist, 0.36, 0.74),
    (Landmark::LeftHip, 0.57, 0.80),
    (Landmark::RightHip, 0.43, 0.80),
];

/// Landmarks that lean with the torso during a side bend
const TORSO_UPPER: [Landmark; 7] = [
    Landmark::Nose,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
];

const BEND_SHIFT: f32 = 0.06;

/// Noise-free pose for a cue. `Rest` and `UpperBodyVisible` give the neutral pose.
pub fn reference_pose(cue: Cue) -> PoseSnapshot {
    let mut pose = PoseSnapshot::new();
    for &(lm, x, y) in NEUTRAL.iter() {
        place(&mut pose, lm, x, y);
    }

    match cue {
        Cue::Rest | Cue::Perform(SignalKind::UpperBodyVisible) => {}
        Cue::Perform(SignalKind::BendLeft) => {
            lean(&mut pose, BEND_SHIFT);
            place(&mut pose, Landmark::RightElbow, 0.55, 0.28);
            place(&mut pose, Landmark::RightWrist, 0.72, 0.18);
        }
        Cue::Perform(SignalKind::BendRight) => {
            lean(&mut pose, -BEND_SHIFT);
            place(&mut pose, Landmark::LeftElbow, 0.45, 0.28);
            place(&mut pose, Landmark::LeftWrist, 0.28, 0.18);
        }
        Cue::Perform(SignalKind::ShoulderExtensionLeft) => {
            place(&mut pose, Landmark::LeftElbow, 0.45, 0.50);
            place(&mut pose, Landmark::RightWrist, 0.43, 0.52);
            place(&mut pose, Landmark::LeftWrist, 0.34, 0.46);
        }
        Cue::Perform(SignalKind::ShoulderExtensionRight) => {
            place(&mut pose, Landmark::RightElbow, 0.55, 0.50);
            place(&mut pose, Landmark::LeftWrist, 0.57, 0.52);
            place(&mut pose, Landmark::RightWrist, 0.66, 0.46);
        }
        Cue::Perform(SignalKind::NeckTiltLeft) => {
            place(&mut pose, Landmark::LeftEar, 0.55, 0.36);
            place(&mut pose, Landmark::RightEar, 0.47, 0.28);
            place(&mut pose, Landmark::LeftWrist, 0.48, 0.22);
        }
        Cue::Perform(SignalKind::NeckTiltRight) => {
            place(&mut pose, Landmark::RightEar, 0.45, 0.36);
            place(&mut pose, Landmark::LeftEar, 0.53, 0.28);
            place(&mut pose, Landmark::RightWrist, 0.52, 0.22);
        }
        Cue::Touch(target) => pose.push_hand(Hand {
            wrist: Point::new(target.x, (target.y + 0.12).min(1.0)),
            index_tip: target,
        }),
    }
    pose
}

fn place(pose: &mut PoseSnapshot, lm: Landmark, x: f32, y: f32) {
    pose.insert(lm, Point::with_visibility(x, y, 0.95));
}

/// Shift head, shoulders and elbows sideways, hips stay put
fn lean(pose: &mut PoseSnapshot, dx: f32) {
    for &(lm, x, y) in NEUTRAL.iter().filter(|(lm, _, _)| TORSO_UPPER.contains(lm)) {
        place(pose, lm, x + dx, y);
    }
}

/// Endless frame source that acts out whatever it is cued to do
pub struct SimulatedPerformer {
    rng: StdRng,
    cue: Cue,
    frame_interval: Duration,
    next_at: Timestamp,
    /// Probability (0.0-1.0) that a frame has no detected pose
    dropout: f64,
    /// Maximum landmark displacement per axis
    jitter: f32,
}

impl SimulatedPerformer {
    pub fn new(seed: u64, fps: u32) -> Self {
        let fps = fps.max(1);
        SimulatedPerformer {
            rng: StdRng::seed_from_u64(seed),
            cue: Cue::Rest,
            frame_interval: Duration::from_millis(1000 / u64::from(fps)),
            next_at: Timestamp::ZERO,
            dropout: 0.0,
            jitter: 0.004,
        }
    }

    /// Builder: probability that a frame loses the pose entirely
    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout.clamp(0.0, 1.0);
        self
    }

    /// Builder: landmark noise amplitude
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    fn noisy(&mut self, pose: PoseSnapshot) -> PoseSnapshot {
        if self.jitter == 0.0 {
            return pose;
        }
        let mut noisy = PoseSnapshot::new();
        for lm in Landmark::ALL {
            if let Some(p) = pose.landmark(lm) {
                let dx = self.rng.gen_range(-self.jitter..=self.jitter);
                let dy = self.rng.gen_range(-self.jitter..=self.jitter);
                noisy.insert(lm, Point::with_visibility(p.x + dx, p.y + dy, p.visibility));
            }
        }
        for &hand in pose.hands() {
            noisy.push_hand(hand);
        }
        noisy
    }
}

impl PoseSource for SimulatedPerformer {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let at = self.next_at;
        self.next_at = at + self.frame_interval;

        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            return Ok(Some(Frame::new(at, None)));
        }
        let pose = self.noisy(reference_pose(self.cue));
        Ok(Some(Frame::new(at, Some(pose))))
    }

    fn cue(&mut self, cue: Cue) {
        self.cue = cue;
    }
}
