//! Pose signals: per-exercise boolean predicates over a snapshot
//!
//! Features:
//! - One pure predicate per `SignalKind`
//! - `SignalTable` dispatch so new exercises never touch controller logic
//! - Missing or low-visibility landmarks always read as "signal false"

use super::{Landmark, PoseSnapshot};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum elbow/wrist to shoulder distance for a cross-body arm stretch
const CROSS_BODY_REACH: f32 = 0.15;

/// Minimum vertical ear offset for a neck tilt
const NECK_TILT_MIN: f32 = 0.04;

/// Landmarks that must all be visible for the user to count as framed
pub const UPPER_BODY: [Landmark; 6] = [
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftHip,
    Landmark::RightHip,
];

/// Which geometric test to apply to a pose
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BendLeft,
    BendRight,
    ShoulderExtensionLeft,
    ShoulderExtensionRight,
    NeckTiltLeft,
    NeckTiltRight,
    UpperBodyVisible,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::BendLeft,
        SignalKind::BendRight,
        SignalKind::ShoulderExtensionLeft,
        SignalKind::ShoulderExtensionRight,
        SignalKind::NeckTiltLeft,
        SignalKind::NeckTiltRight,
        SignalKind::UpperBodyVisible,
    ];

    /// The predicate implementing this signal
    pub fn predicate(self) -> SignalFn {
        match self {
            SignalKind::BendLeft => bend_left,
            SignalKind::BendRight => bend_right,
            SignalKind::ShoulderExtensionLeft => shoulder_extension_left,
            SignalKind::ShoulderExtensionRight => shoulder_extension_right,
            SignalKind::NeckTiltLeft => neck_tilt_left,
            SignalKind::NeckTiltRight => neck_tilt_right,
            SignalKind::UpperBodyVisible => upper_body_visible,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::BendLeft => "bend_left",
            SignalKind::BendRight => "bend_right",
            SignalKind::ShoulderExtensionLeft => "shoulder_extension_left",
            SignalKind::ShoulderExtensionRight => "shoulder_extension_right",
            SignalKind::NeckTiltLeft => "neck_tilt_left",
            SignalKind::NeckTiltRight => "neck_tilt_right",
            SignalKind::UpperBodyVisible => "upper_body_visible",
        };
        f.write_str(name)
    }
}

/// A pure per-frame pose predicate
pub type SignalFn = fn(&PoseSnapshot) -> bool;

/// Lookup table from signal kind to predicate
#[derive(Clone, Debug)]
pub struct SignalTable {
    predicates: FxHashMap<SignalKind, SignalFn>,
}

impl SignalTable {
    /// Table with every built-in predicate registered
    pub fn standard() -> Self {
        let mut predicates = FxHashMap::default();
        for kind in SignalKind::ALL {
            predicates.insert(kind, kind.predicate());
        }
        SignalTable { predicates }
    }

    /// Replace the predicate for a kind
    pub fn register(&mut self, kind: SignalKind, predicate: SignalFn) {
        self.predicates.insert(kind, predicate);
    }

    /// Predicate registered for a kind, falling back to the built-in one
    pub fn resolve(&self, kind: SignalKind) -> SignalFn {
        self.predicates
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.predicate())
    }

    /// Evaluate a signal; no pose reads as false
    pub fn evaluate(&self, kind: SignalKind, pose: Option<&PoseSnapshot>) -> bool {
        pose.is_some_and(|pose| self.resolve(kind)(pose))
    }
}

impl Default for SignalTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// All of shoulders, elbows and hips confidently detected
pub fn upper_body_visible(pose: &PoseSnapshot) -> bool {
    UPPER_BODY.iter().all(|&lm| pose.visible(lm).is_some())
}

/// Right arm over the head, torso leaning to the subject's left
pub fn bend_left(pose: &PoseSnapshot) -> bool {
    let (
        Some(left_shoulder),
        Some(right_shoulder),
        Some(right_hip),
        Some(right_wrist),
        Some(nose),
    ) = (
        pose.visible(Landmark::LeftShoulder),
        pose.visible(Landmark::RightShoulder),
        pose.visible(Landmark::RightHip),
        pose.visible(Landmark::RightWrist),
        pose.visible(Landmark::Nose),
    ) else {
        return false;
    };

    right_shoulder.x > right_hip.x && right_wrist.x > left_shoulder.x && right_wrist.y < nose.y
}

/// Left arm over the head, torso leaning to the subject's right
pub fn bend_right(pose: &PoseSnapshot) -> bool {
    let (
        Some(left_shoulder),
        Some(right_shoulder),
        Some(left_hip),
        Some(left_wrist),
        Some(nose),
    ) = (
        pose.visible(Landmark::LeftShoulder),
        pose.visible(Landmark::RightShoulder),
        pose.visible(Landmark::LeftHip),
        pose.visible(Landmark::LeftWrist),
        pose.visible(Landmark::Nose),
    ) else {
        return false;
    };

    left_shoulder.x < left_hip.x && left_wrist.x < right_shoulder.x && left_wrist.y < nose.y
}

/// Left elbow pulled to the right shoulder, held there by the right hand
pub fn shoulder_extension_left(pose: &PoseSnapshot) -> bool {
    cross_body(pose, Landmark::LeftElbow, Landmark::RightShoulder, Landmark::RightWrist)
}

/// Right elbow pulled to the left shoulder, held there by the left hand
pub fn shoulder_extension_right(pose: &PoseSnapshot) -> bool {
    cross_body(pose, Landmark::RightElbow, Landmark::LeftShoulder, Landmark::LeftWrist)
}

fn cross_body(pose: &PoseSnapshot, elbow: Landmark, shoulder: Landmark, wrist: Landmark) -> bool {
    let (Some(elbow), Some(shoulder), Some(wrist)) =
        (pose.visible(elbow), pose.visible(shoulder), pose.visible(wrist))
    else {
        return false;
    };

    elbow.distance(&shoulder) < CROSS_BODY_REACH && wrist.distance(&shoulder) < CROSS_BODY_REACH
}

/// Head tilted toward the left shoulder with the left hand raised to it
pub fn neck_tilt_left(pose: &PoseSnapshot) -> bool {
    neck_tilt(
        pose,
        (Landmark::LeftEar, Landmark::RightEar),
        Landmark::LeftWrist,
        Landmark::LeftShoulder,
    )
}

/// Head tilted toward the right shoulder with the right hand raised to it
pub fn neck_tilt_right(pose: &PoseSnapshot) -> bool {
    neck_tilt(
        pose,
        (Landmark::RightEar, Landmark::LeftEar),
        Landmark::RightWrist,
        Landmark::RightShoulder,
    )
}

fn neck_tilt(
    pose: &PoseSnapshot,
    (low_ear, high_ear): (Landmark, Landmark),
    wrist: Landmark,
    shoulder: Landmark,
) -> bool {
    let (Some(low_ear), Some(high_ear), Some(wrist), Some(shoulder)) = (
        pose.visible(low_ear),
        pose.visible(high_ear),
        pose.visible(wrist),
        pose.visible(shoulder),
    ) else {
        return false;
    };

    low_ear.y - high_ear.y > NECK_TILT_MIN && wrist.y < shoulder.y
}
