//! The table: active round state plus the per-round bet registry.
//!
//! Both live behind one lock (owned by the engine) because crash-time
//! forfeiture must observe a bet registry consistent with the crash flag:
//! once the state flips to `Crashed`, no in-flight cashout can read the
//! round as running.

use crate::round::RoundState;
use aviator_types::game::{Bet, BetState};
use std::collections::HashMap;

pub(crate) struct Table {
    pub state: RoundState,
    /// Pending bets for the current round, keyed by player.
    pub bets: HashMap<String, Bet>,
    /// Next round identifier; strictly increasing, never reused.
    pub next_round_id: u64,
    /// Wall-clock time the next round starts, when known.
    pub next_start_millis: Option<u64>,
}

impl Table {
    pub fn new(first_start_millis: u64) -> Self {
        Self {
            state: RoundState::Idle,
            bets: HashMap::new(),
            next_round_id: 1,
            next_start_millis: Some(first_start_millis),
        }
    }

    /// Allocate the next round identifier.
    pub fn allocate_round_id(&mut self) -> u64 {
        let id = self.next_round_id;
        self.next_round_id += 1;
        id
    }

    /// Remove every pending bet, marking each forfeited (crash-time
    /// settlement).
    pub fn drain_pending(&mut self) -> Vec<Bet> {
        self.bets
            .drain()
            .map(|(_, mut bet)| {
                bet.state = BetState::Forfeited;
                bet
            })
            .collect()
    }
}
