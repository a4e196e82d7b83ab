//! Request/response records for the HTTP+JSON surface.
//!
//! Field names are camelCase on the wire. Multipliers travel as `f64` for
//! display; amounts stay `u64` minor units.

use crate::game::BalanceEntry;
use serde::{Deserialize, Serialize};

/// Snapshot of the current (or most recent) round.
///
/// The crash point is deliberately absent while a round is running: revealing
/// it early would let players cash out at the last possible instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStatus {
    pub round_id: u64,
    pub active: bool,
    pub elapsed_seconds: f64,
    pub multiplier: f64,
    /// Milliseconds until the next round starts; absent while running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_round_eta_millis: Option<u64>,
    pub server_time_millis: u64,
}

/// One entry in the round history response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round_id: u64,
    pub crash_point: f64,
    pub duration_seconds: f64,
    pub timestamp_millis: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundHistoryResponse {
    /// Oldest first.
    pub rounds: Vec<RoundRecord>,
    pub total: usize,
}

/// Operator override for the crash point of upcoming rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCrashPointRequest {
    pub crash_point: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCrashPointResponse {
    pub success: bool,
    pub crash_point: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub player: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    pub player: String,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetResponse {
    pub success: bool,
    pub new_balance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOutRequest {
    pub player: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashOutResponse {
    pub success: bool,
    pub multiplier: f64,
    pub payout: u64,
    pub new_balance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub player: String,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceHistoryResponse {
    pub player: String,
    /// Most recent first.
    pub entries: Vec<BalanceEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub round_active: bool,
    pub players: usize,
    pub server_time_millis: u64,
}

/// Error payload returned with a non-2xx status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Stable code from [`crate::Error::code`].
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_status_hides_eta_while_running() {
        let status = RoundStatus {
            round_id: 7,
            active: true,
            elapsed_seconds: 1.5,
            multiplier: 1.75,
            next_round_eta_millis: None,
            server_time_millis: 0,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("nextRoundEtaMillis"));
        assert!(json.contains("\"roundId\":7"));
    }

    #[test]
    fn test_set_crash_point_request_optional_reason() {
        let req: SetCrashPointRequest = serde_json::from_str("{\"crashPoint\":3.5}").unwrap();
        assert_eq!(req.crash_point, 3.5);
        assert_eq!(req.reason, None);
    }
}
