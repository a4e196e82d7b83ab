//! The perpetual round-advancement loop.
//!
//! One authoritative task drives all round transitions: initial delay, then
//! start, tick at fixed cadence until the crash fires, cooldown, repeat.
//! Start and cooldown delays are events consumed by this same loop rather
//! than detached timers, so restarts can never overlap.

use crate::engine::{Engine, TickOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::info;

pub struct Scheduler {
    engine: Arc<Engine>,
}

impl Scheduler {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Run rounds forever. Request-level failures elsewhere never reach this
    /// loop; it only observes tick outcomes.
    pub async fn run(self) {
        let config = self.engine.config().clone();
        info!(
            tick_ms = config.tick_interval.as_millis() as u64,
            cooldown_ms = config.cooldown.as_millis() as u64,
            "scheduler starting"
        );
        sleep(config.initial_delay).await;
        loop {
            self.engine.start_round(Instant::now());

            let mut ticker = interval(config.tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.engine.tick(Instant::now()) {
                    TickOutcome::Running { .. } => {}
                    TickOutcome::Crashed { .. } => break,
                    // Unreachable while this loop owns all transitions.
                    TickOutcome::Idle => break,
                }
            }

            sleep(config.cooldown).await;
        }
    }
}
