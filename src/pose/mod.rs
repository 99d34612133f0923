//! Pose snapshots: one frame of detected body and hand landmarks
//!
//! # Components
//! - `mod.rs`: Landmark names, normalized points and the per-frame snapshot
//! - `signals.rs`: Per-exercise boolean predicates and their dispatch table
//!
//! Coordinates are normalized to the frame: x grows to the right, y grows
//! downward, both in [0, 1]. Left/right name the subject's own side.

pub mod signals;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub use signals::{SignalKind, SignalTable};

/// Minimum visibility for a landmark to count as detected
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Body landmarks reported by the pose estimator (33-point body model)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl Landmark {
    /// All landmarks in estimator index order
    pub const ALL: [Landmark; 33] = [
        Landmark::Nose,
        Landmark::LeftEyeInner,
        Landmark::LeftEye,
        Landmark::LeftEyeOuter,
        Landmark::RightEyeInner,
        Landmark::RightEye,
        Landmark::RightEyeOuter,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::MouthLeft,
        Landmark::MouthRight,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftPinky,
        Landmark::RightPinky,
        Landmark::LeftIndex,
        Landmark::RightIndex,
        Landmark::LeftThumb,
        Landmark::RightThumb,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
        Landmark::LeftHeel,
        Landmark::RightHeel,
        Landmark::LeftFootIndex,
        Landmark::RightFootIndex,
    ];

    /// Map an estimator index (0-32) to its landmark
    pub fn from_index(index: usize) -> Option<Landmark> {
        Self::ALL.get(index).copied()
    }
}

/// A normalized 2-D landmark position with detection confidence
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Confidence that the landmark is visible (0.0-1.0)
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

fn full_visibility() -> f32 {
    1.0
}

impl Point {
    /// Create a fully visible point
    pub fn new(x: f32, y: f32) -> Self {
        Point {
            x,
            y,
            visibility: 1.0,
        }
    }

    /// Create a point with an explicit visibility
    pub fn with_visibility(x: f32, y: f32, visibility: f32) -> Self {
        Point { x, y, visibility }
    }

    /// Euclidean distance in normalized frame units
    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Whether the landmark is confidently detected
    pub fn is_visible(&self) -> bool {
        self.visibility > VISIBILITY_THRESHOLD
    }
}

/// A detected hand, reduced to the points the pointer UI needs
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub wrist: Point,
    pub index_tip: Point,
}

/// Immutable set of landmarks detected in one frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSnapshot {
    #[serde(default)]
    landmarks: FxHashMap<Landmark, Point>,
    #[serde(default)]
    hands: Vec<Hand>,
}

impl PoseSnapshot {
    /// Create an empty snapshot (no landmarks detected)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace a body landmark
    pub fn with(mut self, landmark: Landmark, point: Point) -> Self {
        self.landmarks.insert(landmark, point);
        self
    }

    /// Builder: add a detected hand
    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hands.push(hand);
        self
    }

    /// Add or replace a body landmark in place
    pub fn insert(&mut self, landmark: Landmark, point: Point) {
        self.landmarks.insert(landmark, point);
    }

    /// Add a detected hand in place
    pub fn push_hand(&mut self, hand: Hand) {
        self.hands.push(hand);
    }

    /// Raw landmark lookup, regardless of visibility
    pub fn landmark(&self, landmark: Landmark) -> Option<Point> {
        self.landmarks.get(&landmark).copied()
    }

    /// Landmark lookup that treats low-visibility points as missing
    pub fn visible(&self, landmark: Landmark) -> Option<Point> {
        self.landmark(landmark).filter(Point::is_visible)
    }

    /// Detected hands in this frame
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Number of body landmarks present
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}
