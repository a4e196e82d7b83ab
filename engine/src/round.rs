//! Round lifecycle state machine.
//!
//! At most one round is active system-wide. A round's multiplier grows
//! linearly with elapsed time; the round crashes on the first tick where the
//! multiplier reaches the crash point. The recorded final multiplier is the
//! exact crash point, not the tick-sampled value, so payout math and the
//! displayed crash value always agree.

use aviator_types::game::{self, CompletedRound, Phase};
use std::time::{Duration, Instant};

/// The single active round.
#[derive(Clone, Debug)]
pub struct Round {
    /// Monotonically increasing, never reused.
    pub id: u64,
    /// Multiplier at which this round ends, in basis points.
    pub crash_bps: u64,
    pub growth_bps_per_second: u64,
    pub started_at: Instant,
    /// Wall-clock start, for history timestamps and client display.
    pub started_millis: u64,
}

impl Round {
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Current multiplier, unclamped.
    pub fn multiplier_bps(&self, now: Instant) -> u64 {
        game::multiplier_bps(self.elapsed(now), self.growth_bps_per_second)
    }

    /// Whether the crash threshold has been reached (`>=` tie-break).
    pub fn has_crashed(&self, now: Instant) -> bool {
        self.multiplier_bps(now) >= self.crash_bps
    }

    /// Freeze this round into its history record.
    pub fn complete(&self, now: Instant, timestamp_millis: u64) -> CompletedRound {
        CompletedRound {
            round_id: self.id,
            crash_bps: self.crash_bps,
            duration_millis: self.elapsed(now).as_millis() as u64,
            timestamp_millis,
        }
    }
}

/// Where the state machine currently is.
#[derive(Clone, Debug)]
pub(crate) enum RoundState {
    /// Before the first round.
    Idle,
    Running(Round),
    /// Transient until the scheduler starts the next round.
    Crashed(CompletedRound),
}

impl RoundState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Running(_) => Phase::Running,
            Self::Crashed(_) => Phase::Crashed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(crash_bps: u64, started_at: Instant) -> Round {
        Round {
            id: 1,
            crash_bps,
            growth_bps_per_second: 5_000,
            started_at,
            started_millis: 0,
        }
    }

    #[test]
    fn test_multiplier_from_elapsed() {
        let t0 = Instant::now();
        let r = round(20_000, t0);
        assert_eq!(r.multiplier_bps(t0), 10_000);
        assert_eq!(r.multiplier_bps(t0 + Duration::from_secs(1)), 15_000);
        // A clock that appears to run backwards reads as zero elapsed.
        assert_eq!(r.multiplier_bps(t0 - Duration::from_secs(5)), 10_000);
    }

    #[test]
    fn test_crash_threshold_inclusive() {
        let t0 = Instant::now();
        let r = round(20_000, t0);
        assert!(!r.has_crashed(t0 + Duration::from_millis(1_999)));
        // Exactly at the crash point: `>=` fires.
        assert!(r.has_crashed(t0 + Duration::from_secs(2)));
        assert!(r.has_crashed(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_complete_records_exact_crash_point() {
        let t0 = Instant::now();
        let r = round(20_000, t0);
        // Tick sampled late, past the crash point.
        let completed = r.complete(t0 + Duration::from_millis(2_100), 42);
        assert_eq!(completed.crash_bps, 20_000);
        assert_eq!(completed.duration_millis, 2_100);
        assert_eq!(completed.timestamp_millis, 42);
        assert_eq!(completed.round_id, 1);
    }
}
