//! Core data model and fixed-point multiplier math.
//!
//! All currency amounts are `u64` minor units. Multipliers and crash points
//! are `u64` basis points (10_000 = 1.00x) so payout math stays in integer
//! arithmetic and the paid multiplier always agrees with the displayed one.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One multiplier unit (1.00x) in basis points.
pub const MULTIPLIER_ONE_BPS: u64 = 10_000;

/// Multiplier growth per second of round time (0.5x/s).
pub const GROWTH_BPS_PER_SECOND: u64 = 5_000;

/// Minimum accepted crash point (1.01x).
pub const MIN_CRASH_BPS: u64 = 10_100;

/// Default crash point when the operator has not set one (2.50x).
pub const DEFAULT_CRASH_BPS: u64 = 25_000;

/// Balance granted to a newly registered player.
pub const STARTING_BALANCE: u64 = 10_000;

/// Completed rounds retained in history.
pub const HISTORY_CAPACITY: usize = 50;

/// Round clock tick granularity.
pub const TICK_INTERVAL_MS: u64 = 100;

/// Delay between a crash and the next round start.
pub const COOLDOWN_MS: u64 = 3_000;

/// Delay before the first round after process start.
pub const INITIAL_DELAY_MS: u64 = 5_000;

/// Compute the multiplier for a given elapsed round time.
///
/// Linear growth: `1 + elapsed * rate`. Saturates rather than wrapping so a
/// stalled round clock can never produce a bogus small multiplier.
pub fn multiplier_bps(elapsed: Duration, growth_bps_per_second: u64) -> u64 {
    let grown = (elapsed.as_millis() as u128 * growth_bps_per_second as u128) / 1_000;
    MULTIPLIER_ONE_BPS.saturating_add(u64::try_from(grown).unwrap_or(u64::MAX))
}

/// Compute a payout: `wager * multiplier`, floored.
pub fn payout(wager: u64, multiplier_bps: u64) -> u64 {
    let raw = wager as u128 * multiplier_bps as u128 / MULTIPLIER_ONE_BPS as u128;
    u64::try_from(raw).unwrap_or(u64::MAX)
}

/// Convert basis points to the `f64` multiplier carried in JSON responses.
pub fn bps_to_multiplier(bps: u64) -> f64 {
    bps as f64 / MULTIPLIER_ONE_BPS as f64
}

/// Convert an operator-supplied `f64` multiplier to basis points.
///
/// Returns `None` for non-finite or negative input; range validation against
/// [`MIN_CRASH_BPS`] is the engine's job.
pub fn multiplier_to_bps(multiplier: f64) -> Option<u64> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return None;
    }
    let bps = (multiplier * MULTIPLIER_ONE_BPS as f64).round();
    if bps > u64::MAX as f64 {
        return None;
    }
    Some(bps as u64)
}

/// Round lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No round has run yet.
    Idle,
    /// A round is in flight and accepting bets/cashouts.
    Running,
    /// The last round crashed; the next one has not started.
    Crashed,
}

/// Why a balance changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceReason {
    /// Starting balance on registration.
    InitialDeposit,
    /// Wager debited at bet placement.
    Bet,
    /// Winnings credited at cashout.
    Cashout,
}

impl BalanceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialDeposit => "initial_deposit",
            Self::Bet => "bet",
            Self::Cashout => "cashout",
        }
    }
}

/// One append-only ledger entry. Every balance mutation writes exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub previous_balance: u64,
    /// Signed delta applied to the balance.
    pub change: i64,
    pub new_balance: u64,
    pub reason: BalanceReason,
    pub timestamp_millis: u64,
}

/// Settlement state of a bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetState {
    Pending,
    CashedOut,
    Forfeited,
}

/// A wager on one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub player: String,
    pub round_id: u64,
    pub amount: u64,
    pub state: BetState,
    pub placed_at_millis: u64,
}

/// Immutable record of a finished round, as kept in round history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRound {
    pub round_id: u64,
    /// Final multiplier, equal to the crash point by construction.
    pub crash_bps: u64,
    /// Elapsed round time when the crash was detected.
    pub duration_millis: u64,
    pub timestamp_millis: u64,
}

impl CompletedRound {
    /// Crash point as the `f64` shown to players.
    pub fn crash_point(&self) -> f64 {
        bps_to_multiplier(self.crash_bps)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_millis as f64 / 1_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_growth() {
        // 1.00x at start, 1.50x after one second, 2.00x after two.
        let rate = GROWTH_BPS_PER_SECOND;
        assert_eq!(multiplier_bps(Duration::ZERO, rate), 10_000);
        assert_eq!(multiplier_bps(Duration::from_millis(100), rate), 10_500);
        assert_eq!(multiplier_bps(Duration::from_secs(1), rate), 15_000);
        assert_eq!(multiplier_bps(Duration::from_secs(2), rate), 20_000);
    }

    #[test]
    fn test_multiplier_saturates() {
        let bps = multiplier_bps(Duration::from_secs(u64::MAX / 1_000_000), u64::MAX);
        assert_eq!(bps, u64::MAX);
    }

    #[test]
    fn test_payout_math() {
        // 500 at 1.50x pays 750.
        assert_eq!(payout(500, 15_000), 750);
        // Floors fractional units.
        assert_eq!(payout(1, 10_100), 1);
        assert_eq!(payout(0, 25_000), 0);
        // Large wagers do not overflow.
        assert_eq!(payout(u64::MAX, MULTIPLIER_ONE_BPS), u64::MAX);
    }

    #[test]
    fn test_multiplier_conversions() {
        assert_eq!(multiplier_to_bps(2.50), Some(25_000));
        assert_eq!(multiplier_to_bps(1.01), Some(10_100));
        assert_eq!(multiplier_to_bps(f64::NAN), None);
        assert_eq!(multiplier_to_bps(f64::INFINITY), None);
        assert_eq!(multiplier_to_bps(-1.0), None);
        assert!((bps_to_multiplier(15_000) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_balance_entry_json_shape() {
        let entry = BalanceEntry {
            previous_balance: 10_000,
            change: -500,
            new_balance: 9_500,
            reason: BalanceReason::Bet,
            timestamp_millis: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["previousBalance"], 10_000);
        assert_eq!(json["change"], -500);
        assert_eq!(json["reason"], "bet");
    }
}
