//! Round scheduler and settlement engine.
//!
//! The [`Engine`] is the single per-process aggregate owning all mutable game
//! state: the player ledger, the active round and its bet registry, and the
//! bounded round history. The [`Scheduler`] drives it on a fixed cadence:
//! initial delay, round start, 100ms ticks until the crash point is reached,
//! cooldown, repeat.
//!
//! Time is always passed in as an [`std::time::Instant`] so every transition
//! is deterministic under test.

pub mod config;
pub mod engine;
pub mod history;
pub mod ledger;
pub mod policy;
pub mod round;
pub mod scheduler;
mod table;


pub use config::EngineConfig;
pub use engine::{CashOutReceipt, Engine, TickOutcome};
pub use history::RoundHistory;
pub use ledger::Ledger;
pub use policy::{CrashPolicy, FixedCrashPolicy};
pub use scheduler::Scheduler;

/// Current wall-clock time as unix milliseconds.
pub(crate) fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
