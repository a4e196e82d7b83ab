//! Rejection taxonomy for game operations.
//!
//! Every variant is a local, recoverable, user-visible rejection; none is
//! fatal to the process. Invariant violations (negative balances, reused
//! round ids) are programming errors and assert instead of surfacing here.

use thiserror::Error;

/// Error type for game operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("insufficient funds: have {balance}, need {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("round is not running")]
    RoundNotRunning,
    #[error("player already has a pending bet this round")]
    DuplicateBet,
    #[error("no pending bet to cash out")]
    NoPendingBet,
    #[error("too late: the round already crashed")]
    TooLate,
    #[error("invalid crash point: must be at least 1.01x")]
    InvalidCrashPoint,
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("player already registered: {0}")]
    PlayerAlreadyRegistered(String),
    #[error("bet amount must be greater than zero")]
    InvalidBet,
}

impl Error {
    /// Stable machine-readable code carried in the JSON `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::RoundNotRunning => "RoundNotRunning",
            Self::DuplicateBet => "DuplicateBet",
            Self::NoPendingBet => "NoPendingBet",
            Self::TooLate => "TooLate",
            Self::InvalidCrashPoint => "InvalidCrashPoint",
            Self::PlayerNotFound(_) => "PlayerNotFound",
            Self::PlayerAlreadyRegistered(_) => "PlayerAlreadyRegistered",
            Self::InvalidBet => "InvalidBet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            Error::InsufficientFunds {
                balance: 0,
                required: 1,
            },
            Error::RoundNotRunning,
            Error::DuplicateBet,
            Error::NoPendingBet,
            Error::TooLate,
            Error::InvalidCrashPoint,
            Error::PlayerNotFound("a".into()),
            Error::PlayerAlreadyRegistered("a".into()),
            Error::InvalidBet,
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
