//! Shared types for the aviator crash game.
//!
//! The crate is split into:
//! - [`game`]: the core data model (rounds, bets, ledger entries) and the
//!   fixed-point multiplier math shared by the engine and its clients.
//! - [`api`]: request/response records for the HTTP surface.
//! - [`error`]: the rejection taxonomy returned to callers.

pub mod api;
pub mod error;
pub mod game;

pub use error::Error;
pub use game::{BalanceEntry, BalanceReason, Bet, BetState, CompletedRound, Phase};

/// Result type for game operations.
pub type Result<T> = std::result::Result<T, Error>;
