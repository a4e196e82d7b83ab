//! Engine configuration.

use aviator_types::game::{
    COOLDOWN_MS, DEFAULT_CRASH_BPS, GROWTH_BPS_PER_SECOND, HISTORY_CAPACITY, INITIAL_DELAY_MS,
    STARTING_BALANCE, TICK_INTERVAL_MS,
};
use std::time::Duration;

/// Tunables for the engine and its scheduler.
///
/// Defaults mirror the production constants: 100ms ticks, 0.5x/s growth,
/// 2.50x default crash point, 3s cooldown, 5s initial delay, 50 rounds of
/// history, 10_000 starting balance.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Balance seeded into a newly registered account.
    pub starting_balance: u64,
    /// Crash point used when the operator has not set one.
    pub default_crash_bps: u64,
    /// Linear multiplier growth rate.
    pub growth_bps_per_second: u64,
    /// Round clock granularity.
    pub tick_interval: Duration,
    /// Delay between a crash and the next round start.
    pub cooldown: Duration,
    /// Delay before the first round after process start.
    pub initial_delay: Duration,
    /// Completed rounds retained in history.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            default_crash_bps: DEFAULT_CRASH_BPS,
            growth_bps_per_second: GROWTH_BPS_PER_SECOND,
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            cooldown: Duration::from_millis(COOLDOWN_MS),
            initial_delay: Duration::from_millis(INITIAL_DELAY_MS),
            history_capacity: HISTORY_CAPACITY,
        }
    }
}
