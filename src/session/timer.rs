//! Hold timing: how long a boolean signal has stayed continuously true
//!
//! Time is always passed in by the caller as a `Timestamp` from a monotonic
//! clock, so timers never read the system clock themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::time::Duration;

/// Milliseconds on a caller-chosen monotonic clock
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time since `earlier`, clamped to zero if the clock went backwards
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let millis = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Result of feeding one reading into a `HoldTimer`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldStatus {
    /// Signal is false; no hold in progress
    NotHolding,
    /// Signal held for the given time, short of the requirement
    Holding(Duration),
    /// Signal held for at least the required duration
    Satisfied,
}

/// Tracks the continuous-true duration of a signal across frames
#[derive(Clone, Debug)]
pub struct HoldTimer {
    /// Time the signal must stay true
    required: Duration,
    /// When the current hold began; `None` while not holding
    started: Option<Timestamp>,
    /// False readings tolerated during a hold before it is dropped
    grace_frames: u32,
    /// Consecutive false readings absorbed by the grace window
    misses: u32,
}

impl HoldTimer {
    /// Timer that drops a hold on the first false reading
    pub fn new(required: Duration) -> Self {
        Self::with_grace(required, 0)
    }

    /// Timer that tolerates up to `grace_frames` consecutive false readings
    pub fn with_grace(required: Duration, grace_frames: u32) -> Self {
        HoldTimer {
            required,
            started: None,
            grace_frames,
            misses: 0,
        }
    }

    /// Feed one reading taken at `now`
    pub fn observe(&mut self, signal: bool, now: Timestamp) -> HoldStatus {
        if !signal {
            return match self.started {
                Some(start) if self.misses < self.grace_frames => {
                    self.misses += 1;
                    HoldStatus::Holding(now.saturating_since(start))
                }
                _ => {
                    self.reset();
                    HoldStatus::NotHolding
                }
            };
        }

        self.misses = 0;
        match self.started {
            None => {
                self.started = Some(now);
                HoldStatus::Holding(Duration::ZERO)
            }
            Some(start) => {
                let elapsed = now.saturating_since(start);
                if elapsed >= self.required {
                    HoldStatus::Satisfied
                } else {
                    HoldStatus::Holding(elapsed)
                }
            }
        }
    }

    /// Drop any hold in progress
    pub fn reset(&mut self) {
        self.started = None;
        self.misses = 0;
    }

    pub fn is_holding(&self) -> bool {
        self.started.is_some()
    }

    pub fn required(&self) -> Duration {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_false_never_satisfies() {
        let mut timer = HoldTimer::new(Duration::from_millis(100));
        for t in (0..5_000).step_by(50) {
            assert_eq!(timer.observe(false, ms(t)), HoldStatus::NotHolding);
        }
        assert!(!timer.is_holding());
    }

    #[test]
    fn test_satisfied_at_required_duration() {
        let mut timer = HoldTimer::new(Duration::from_millis(1000));
        assert_eq!(timer.observe(true, ms(500)), HoldStatus::Holding(Duration::ZERO));
        assert_eq!(timer.observe(true, ms(1500)), HoldStatus::Satisfied);
        // not auto-reset
        assert_eq!(timer.observe(true, ms(1600)), HoldStatus::Satisfied);
    }

    #[test]
    fn test_holding_below_required_duration() {
        let mut timer = HoldTimer::new(Duration::from_millis(1000));
        timer.observe(true, ms(0));
        assert_eq!(
            timer.observe(true, ms(999)),
            HoldStatus::Holding(Duration::from_millis(999))
        );
    }

    #[test]
    fn test_single_false_drops_all_credit() {
        let mut timer = HoldTimer::new(Duration::from_millis(1000));
        timer.observe(true, ms(0));
        timer.observe(true, ms(900));
        assert_eq!(timer.observe(false, ms(950)), HoldStatus::NotHolding);
        assert_eq!(timer.observe(true, ms(960)), HoldStatus::Holding(Duration::ZERO));
        assert_eq!(
            timer.observe(true, ms(1900)),
            HoldStatus::Holding(Duration::from_millis(940))
        );
    }

    #[test]
    fn test_reset_clears_hold() {
        let mut timer = HoldTimer::new(Duration::from_millis(100));
        timer.observe(true, ms(0));
        assert!(timer.is_holding());
        timer.reset();
        assert!(!timer.is_holding());
        assert_eq!(timer.observe(true, ms(500)), HoldStatus::Holding(Duration::ZERO));
    }

    #[test]
    fn test_backwards_clock_clamps_to_zero() {
        let mut timer = HoldTimer::new(Duration::from_millis(100));
        timer.observe(true, ms(1000));
        assert_eq!(timer.observe(true, ms(400)), HoldStatus::Holding(Duration::ZERO));
    }

    #[test]
    fn test_grace_frames_absorb_dropouts() {
        let mut timer = HoldTimer::with_grace(Duration::from_millis(1000), 2);
        timer.observe(true, ms(0));
        assert_eq!(
            timer.observe(false, ms(100)),
            HoldStatus::Holding(Duration::from_millis(100))
        );
        assert_eq!(
            timer.observe(false, ms(200)),
            HoldStatus::Holding(Duration::from_millis(200))
        );
        assert_eq!(
            timer.observe(true, ms(300)),
            HoldStatus::Holding(Duration::from_millis(300))
        );

        // third consecutive miss drops the hold
        timer.observe(false, ms(400));
        timer.observe(false, ms(500));
        assert_eq!(timer.observe(false, ms(600)), HoldStatus::NotHolding);
    }

    #[test]
    fn test_grace_never_satisfies_on_false() {
        let mut timer = HoldTimer::with_grace(Duration::from_millis(100), 3);
        timer.observe(true, ms(0));
        assert_eq!(
            timer.observe(false, ms(500)),
            HoldStatus::Holding(Duration::from_millis(500))
        );
        assert_eq!(timer.observe(true, ms(600)), HoldStatus::Satisfied);
    }

    #[test]
    fn test_timestamp_add() {
        assert_eq!(ms(100) + Duration::from_millis(50), ms(150));
        assert_eq!(ms(100).saturating_since(ms(40)), Duration::from_millis(60));
    }
}
