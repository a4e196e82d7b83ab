//! The engine aggregate: one instance per process owns all game state.
//!
//! Lock order is always table (round + bet registry) before ledger account,
//! and no lock is held across an await point. Request-level failures are
//! returned to the caller and never disturb the round clock.

use crate::{
    config::EngineConfig,
    history::RoundHistory,
    ledger::Ledger,
    policy::{CrashPolicy, FixedCrashPolicy},
    round::{Round, RoundState},
    table::Table,
    unix_millis,
};
use aviator_types::{
    api::RoundStatus,
    game::{self, BalanceEntry, BalanceReason, Bet, BetState, CompletedRound, Phase, MIN_CRASH_BPS},
    Error, Result,
};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a tick observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No round in flight.
    Idle,
    /// Round still running.
    Running { round_id: u64, multiplier_bps: u64 },
    /// This tick detected the crash and settled the round.
    Crashed {
        round_id: u64,
        crash_bps: u64,
        forfeited: usize,
    },
}

/// Result of a successful cashout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashOutReceipt {
    pub multiplier_bps: u64,
    pub payout: u64,
    pub new_balance: u64,
}

/// The round scheduler and settlement engine's shared state.
pub struct Engine {
    config: EngineConfig,
    ledger: Ledger,
    table: Mutex<Table>,
    history: RwLock<RoundHistory>,
    policy: Mutex<Box<dyn CrashPolicy>>,
    /// Operator override; applies to every subsequent round until changed.
    crash_override: Mutex<Option<u64>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let policy = FixedCrashPolicy::new(config.default_crash_bps);
        Self::with_policy(config, Box::new(policy))
    }

    pub fn with_policy(config: EngineConfig, policy: Box<dyn CrashPolicy>) -> Self {
        let first_start = unix_millis().saturating_add(config.initial_delay.as_millis() as u64);
        Self {
            ledger: Ledger::new(config.starting_balance),
            table: Mutex::new(Table::new(first_start)),
            history: RwLock::new(RoundHistory::new(config.history_capacity)),
            policy: Mutex::new(policy),
            crash_override: Mutex::new(None),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Round transitions (scheduler-driven) ===

    /// Start the next round. Panics if one is already running: the scheduler
    /// is the only caller and overlapping rounds are a programming error.
    pub fn start_round(&self, now: Instant) -> u64 {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(
            !matches!(table.state, RoundState::Running(_)),
            "round already running"
        );
        debug_assert!(table.bets.is_empty(), "stale bets at round start");

        let id = table.allocate_round_id();
        let crash_bps = self.next_crash_bps(id);
        let round = Round {
            id,
            crash_bps,
            growth_bps_per_second: self.config.growth_bps_per_second,
            started_at: now,
            started_millis: unix_millis(),
        };
        info!(
            round = id,
            crash_point = game::bps_to_multiplier(crash_bps),
            "round started"
        );
        table.state = RoundState::Running(round);
        table.next_start_millis = None;
        id
    }

    fn next_crash_bps(&self, round_id: u64) -> u64 {
        let over = self
            .crash_override
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(bps) = *over {
            return bps;
        }
        drop(over);
        let mut policy = self.policy.lock().unwrap_or_else(PoisonError::into_inner);
        policy.next_crash_bps(round_id)
    }

    /// Re-evaluate the running round. Fires the crash transition exactly once
    /// when the multiplier reaches the crash point: every pending bet is
    /// forfeited, the round is recorded into history, and the next start is
    /// scheduled after the cooldown.
    pub fn tick(&self, now: Instant) -> TickOutcome {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let round = match &table.state {
            RoundState::Running(round) => round.clone(),
            RoundState::Idle => return TickOutcome::Idle,
            RoundState::Crashed(_) => return TickOutcome::Idle,
        };
        if !round.has_crashed(now) {
            return TickOutcome::Running {
                round_id: round.id,
                multiplier_bps: round.multiplier_bps(now),
            };
        }

        // Crash transition: flips the authoritative flag under the table
        // lock, so every later cashout for this round observes it.
        let forfeited = table.drain_pending();
        for bet in &forfeited {
            debug!(player = %bet.player, amount = bet.amount, "bet forfeited");
        }
        let completed = round.complete(now, unix_millis());
        table.state = RoundState::Crashed(completed.clone());
        table.next_start_millis =
            Some(unix_millis().saturating_add(self.config.cooldown.as_millis() as u64));
        drop(table);

        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        history.record(completed.clone());
        drop(history);

        info!(
            round = completed.round_id,
            crash_point = completed.crash_point(),
            duration_seconds = completed.duration_seconds(),
            forfeited = forfeited.len(),
            "round crashed"
        );
        TickOutcome::Crashed {
            round_id: completed.round_id,
            crash_bps: completed.crash_bps,
            forfeited: forfeited.len(),
        }
    }

    // === Player commands ===

    /// Register a new player seeded with the starting balance.
    pub fn register_player(&self, player: &str) -> Result<u64> {
        let balance = self.ledger.register(player)?;
        info!(player, balance, "player registered");
        Ok(balance)
    }

    /// Place a bet on the running round. Debits the wager immediately; the
    /// bet is returned to the player only through a cashout.
    pub fn place_bet(&self, player: &str, amount: u64) -> Result<u64> {
        if amount == 0 {
            return Err(Error::InvalidBet);
        }
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let round_id = match &table.state {
            RoundState::Running(round) => round.id,
            _ => return Err(Error::RoundNotRunning),
        };
        if table.bets.contains_key(player) {
            return Err(Error::DuplicateBet);
        }
        let new_balance = self.ledger.debit(player, amount, BalanceReason::Bet)?;
        table.bets.insert(
            player.to_string(),
            Bet {
                player: player.to_string(),
                round_id,
                amount,
                state: BetState::Pending,
                placed_at_millis: unix_millis(),
            },
        );
        debug!(player, amount, round = round_id, "bet placed");
        Ok(new_balance)
    }

    /// Cash out a pending bet at the current multiplier.
    ///
    /// The crash wins any race: once `tick` has flipped the state, every
    /// in-flight cashout for that round fails with `TooLate`. The paid
    /// multiplier is clamped to the crash point so a cashout landing between
    /// the crossing instant and the detecting tick cannot overpay.
    pub fn cash_out(&self, player: &str, now: Instant) -> Result<CashOutReceipt> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let round = match &table.state {
            RoundState::Running(round) => round.clone(),
            _ => return Err(Error::TooLate),
        };
        let mut bet = table.bets.remove(player).ok_or(Error::NoPendingBet)?;
        debug_assert_eq!(bet.round_id, round.id);

        let multiplier_bps = round.multiplier_bps(now).min(round.crash_bps);
        let payout = game::payout(bet.amount, multiplier_bps);
        bet.state = BetState::CashedOut;
        let new_balance = self
            .ledger
            .credit(player, payout, BalanceReason::Cashout)?;
        debug!(
            player,
            round = round.id,
            multiplier = game::bps_to_multiplier(multiplier_bps),
            payout,
            "bet cashed out"
        );
        Ok(CashOutReceipt {
            multiplier_bps,
            payout,
            new_balance,
        })
    }

    // === Operator commands ===

    /// Override the crash point for all subsequent rounds.
    pub fn set_crash_point(&self, crash_bps: u64, reason: Option<&str>) -> Result<()> {
        if crash_bps < MIN_CRASH_BPS {
            warn!(crash_bps, "rejected crash point below 1.01x");
            return Err(Error::InvalidCrashPoint);
        }
        let mut over = self
            .crash_override
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *over = Some(crash_bps);
        info!(
            crash_point = game::bps_to_multiplier(crash_bps),
            reason = reason.unwrap_or("operator set"),
            "crash point override applied"
        );
        Ok(())
    }

    // === Queries ===

    /// Snapshot of the current round for clients. Never exposes the crash
    /// point of a running round.
    pub fn snapshot(&self, now: Instant) -> RoundStatus {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let server_time_millis = unix_millis();
        let eta = table
            .next_start_millis
            .map(|t| t.saturating_sub(server_time_millis));
        match &table.state {
            RoundState::Idle => RoundStatus {
                round_id: 0,
                active: false,
                elapsed_seconds: 0.0,
                multiplier: 1.0,
                next_round_eta_millis: eta,
                server_time_millis,
            },
            RoundState::Running(round) => {
                let multiplier_bps = round.multiplier_bps(now).min(round.crash_bps);
                RoundStatus {
                    round_id: round.id,
                    active: true,
                    elapsed_seconds: round.elapsed(now).as_secs_f64(),
                    multiplier: game::bps_to_multiplier(multiplier_bps),
                    next_round_eta_millis: None,
                    server_time_millis,
                }
            }
            RoundState::Crashed(completed) => RoundStatus {
                round_id: completed.round_id,
                active: false,
                elapsed_seconds: completed.duration_seconds(),
                multiplier: completed.crash_point(),
                next_round_eta_millis: eta,
                server_time_millis,
            },
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.state.phase()
    }

    pub fn round_active(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Completed rounds, oldest first.
    pub fn round_history(&self) -> Vec<CompletedRound> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .list()
    }

    /// The `n` most recent completed rounds.
    pub fn latest_rounds(&self, n: usize) -> Vec<CompletedRound> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest(n)
    }

    pub fn balance(&self, player: &str) -> Result<u64> {
        self.ledger.balance(player)
    }

    /// Balance-change entries, most recent first.
    pub fn balance_history(&self, player: &str, limit: usize) -> Result<Vec<BalanceEntry>> {
        self.ledger.history(player, limit)
    }

    pub fn player_count(&self) -> usize {
        self.ledger.player_count()
    }
}
