//! Typed client for the aviator HTTP API.

use crate::{Error, Result};
use aviator_types::api::{
    BalanceHistoryResponse, BalanceResponse, CashOutRequest, CashOutResponse, ErrorResponse,
    HealthResponse, PlaceBetRequest, PlaceBetResponse, RegisterRequest, RegisterResponse,
    RoundHistoryResponse, RoundStatus, SetCrashPointRequest, SetCrashPointResponse,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Timeout for connections and requests
const TIMEOUT: Duration = Duration::from_secs(30);

/// Aviator API client
#[derive(Clone)]
pub struct Client {
    pub base_url: Url,
    pub http_client: HttpClient,
}

impl Client {
    /// Create a new client
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }

        let http_client = HttpClient::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Decode a success body, or surface the server's typed rejection.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        match response.json::<ErrorResponse>().await {
            Ok(body) => Err(Error::Rejected {
                code: body.error,
                message: body.message,
            }),
            Err(_) => Err(Error::Failed(status)),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http_client.get(self.url(path)?).send().await?;
        Self::decode(response).await
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(self.url(path)?)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Snapshot of the current round.
    pub async fn round(&self) -> Result<RoundStatus> {
        self.get("/api/round").await
    }

    /// Completed rounds, oldest first.
    pub async fn round_history(&self) -> Result<RoundHistoryResponse> {
        self.get("/api/round/history").await
    }

    /// Operator override for upcoming rounds' crash point.
    pub async fn set_crash_point(
        &self,
        crash_point: f64,
        reason: Option<String>,
    ) -> Result<SetCrashPointResponse> {
        self.post(
            "/api/round/crash-point",
            &SetCrashPointRequest {
                crash_point,
                reason,
            },
        )
        .await
    }

    /// Create an account seeded with the starting balance.
    pub async fn register(&self, player: &str) -> Result<RegisterResponse> {
        self.post(
            "/api/players",
            &RegisterRequest {
                player: player.to_string(),
            },
        )
        .await
    }

    /// Wager on the running round.
    pub async fn place_bet(&self, player: &str, amount: u64) -> Result<PlaceBetResponse> {
        self.post(
            "/api/bet",
            &PlaceBetRequest {
                player: player.to_string(),
                amount,
            },
        )
        .await
    }

    /// Settle a pending bet at the current multiplier.
    pub async fn cash_out(&self, player: &str) -> Result<CashOutResponse> {
        self.post(
            "/api/cashout",
            &CashOutRequest {
                player: player.to_string(),
            },
        )
        .await
    }

    pub async fn balance(&self, player: &str) -> Result<BalanceResponse> {
        self.get(&format!("/api/balance/{player}")).await
    }

    /// Balance-change entries, most recent first.
    pub async fn balance_history(
        &self,
        player: &str,
        limit: Option<usize>,
    ) -> Result<BalanceHistoryResponse> {
        let path = match limit {
            Some(limit) => format!("/api/balance/{player}/history?limit={limit}"),
            None => format!("/api/balance/{player}/history"),
        };
        self.get(&path).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/api/health").await
    }
}
