//! HTTP+JSON surface over the engine.
//!
//! Authentication is an external collaborator: handlers trust the player
//! identity carried in each request, and the operator endpoint is expected
//! to be gated upstream.

use aviator_engine::Engine;
use aviator_types::{
    api::{
        BalanceHistoryResponse, BalanceResponse, CashOutRequest, CashOutResponse, ErrorResponse,
        HealthResponse, PlaceBetRequest, PlaceBetResponse, RegisterRequest, RegisterResponse,
        RoundHistoryResponse, RoundRecord, SetCrashPointRequest, SetCrashPointResponse,
    },
    game::{self, CompletedRound},
    Error,
};
use axum::{
    extract::{Path, Query, State as AxumState},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};

/// Default number of balance-history entries returned.
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A game rejection carried to the HTTP layer.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            Error::PlayerAlreadyRegistered(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse {
            error: self.0.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub struct Api {
    engine: Arc<Engine>,
}

impl Api {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        // Configure rate limiting: generous enough for a polling game client.
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_millisecond(2)
                .burst_size(200)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .expect("valid governor config"),
        );

        Router::new()
            .route("/api/round", get(get_round))
            .route("/api/round/history", get(get_round_history))
            .route("/api/round/crash-point", post(set_crash_point))
            .route("/api/players", post(register_player))
            .route("/api/bet", post(place_bet))
            .route("/api/cashout", post(cash_out))
            .route("/api/balance/:player", get(get_balance))
            .route("/api/balance/:player/history", get(get_balance_history))
            .route("/api/health", get(get_health))
            .layer(cors)
            .layer(GovernorLayer {
                config: governor_conf,
            })
            .with_state(self.engine.clone())
    }
}

async fn get_round(AxumState(engine): AxumState<Arc<Engine>>) -> impl IntoResponse {
    Json(engine.snapshot(Instant::now()))
}

fn to_record(round: &CompletedRound) -> RoundRecord {
    RoundRecord {
        round_id: round.round_id,
        crash_point: round.crash_point(),
        duration_seconds: round.duration_seconds(),
        timestamp_millis: round.timestamp_millis,
    }
}

async fn get_round_history(AxumState(engine): AxumState<Arc<Engine>>) -> impl IntoResponse {
    let rounds: Vec<RoundRecord> = engine.round_history().iter().map(to_record).collect();
    let total = rounds.len();
    Json(RoundHistoryResponse { rounds, total })
}

async fn set_crash_point(
    AxumState(engine): AxumState<Arc<Engine>>,
    Json(request): Json<SetCrashPointRequest>,
) -> Result<Json<SetCrashPointResponse>, ApiError> {
    let bps = game::multiplier_to_bps(request.crash_point).ok_or(Error::InvalidCrashPoint)?;
    engine.set_crash_point(bps, request.reason.as_deref())?;
    Ok(Json(SetCrashPointResponse {
        success: true,
        crash_point: game::bps_to_multiplier(bps),
    }))
}

async fn register_player(
    AxumState(engine): AxumState<Arc<Engine>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let balance = engine.register_player(&request.player)?;
    Ok(Json(RegisterResponse {
        success: true,
        balance,
    }))
}

async fn place_bet(
    AxumState(engine): AxumState<Arc<Engine>>,
    Json(request): Json<PlaceBetRequest>,
) -> Result<Json<PlaceBetResponse>, ApiError> {
    let new_balance = engine.place_bet(&request.player, request.amount)?;
    Ok(Json(PlaceBetResponse {
        success: true,
        new_balance,
    }))
}

async fn cash_out(
    AxumState(engine): AxumState<Arc<Engine>>,
    Json(request): Json<CashOutRequest>,
) -> Result<Json<CashOutResponse>, ApiError> {
    let receipt = engine.cash_out(&request.player, Instant::now())?;
    Ok(Json(CashOutResponse {
        success: true,
        multiplier: game::bps_to_multiplier(receipt.multiplier_bps),
        payout: receipt.payout,
        new_balance: receipt.new_balance,
    }))
}

async fn get_balance(
    AxumState(engine): AxumState<Arc<Engine>>,
    Path(player): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = engine.balance(&player)?;
    Ok(Json(BalanceResponse { player, balance }))
}

#[derive(Deserialize)]
struct HistoryParams {
    limit: Option<usize>,
}

async fn get_balance_history(
    AxumState(engine): AxumState<Arc<Engine>>,
    Path(player): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<BalanceHistoryResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let entries = engine.balance_history(&player, limit)?;
    Ok(Json(BalanceHistoryResponse { player, entries }))
}

async fn get_health(AxumState(engine): AxumState<Arc<Engine>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        round_active: engine.round_active(),
        players: engine.player_count(),
        server_time_millis: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    })
}
