//! Crash-point selection policy.
//!
//! The statistical fairness of the distribution is out of scope: production
//! runs a fixed value that the operator can override. The trait keeps the
//! sampling strategy pluggable without touching the engine.

/// Supplies the crash point for each round about to start.
pub trait CrashPolicy: Send {
    /// Crash point for round `round_id`, in basis points.
    ///
    /// Implementations may assume the engine has already applied any
    /// operator override; this is only consulted when none is set.
    fn next_crash_bps(&mut self, round_id: u64) -> u64;
}

/// The shipped policy: every round crashes at the same configured point.
pub struct FixedCrashPolicy {
    crash_bps: u64,
}

impl FixedCrashPolicy {
    pub fn new(crash_bps: u64) -> Self {
        Self { crash_bps }
    }
}

impl CrashPolicy for FixedCrashPolicy {
    fn next_crash_bps(&mut self, _round_id: u64) -> u64 {
        self.crash_bps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_policy_is_constant() {
        let mut policy = FixedCrashPolicy::new(25_000);
        assert_eq!(policy.next_crash_bps(1), 25_000);
        assert_eq!(policy.next_crash_bps(2), 25_000);
    }
}
