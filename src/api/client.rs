//! Async HTTP client for the game service
//!
//! Thin JSON-over-HTTP wrapper: one method per endpoint, no retries. Every
//! request carries the API key in the `x-api-key` header.

use crate::actions::Action;
use crate::api::wire::{
    ActionRequest, GameInfo, GameRequest, GameStateDto, NewGameRequest, NewGameResponse,
    ScoreReport,
};
use crate::core::error::{AgentError, Result};
use crate::core::types::GameId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://game.considition.com/api/game/";

/// Upper bound for any single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the session-ending call, which also runs during teardown
pub const END_GAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Async client for the game service endpoints
pub struct GameApiClient {
    client: Client,
    api_key: String,
    api_url: String,
    end_timeout: Duration,
}

impl GameApiClient {
    /// Create a new client with explicit configuration
    pub fn new(api_key: String, api_url: String) -> Result<Self> {
        Self::with_timeout(api_key, api_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(api_key: String, api_url: String, timeout: Duration) -> Result<Self> {
        let api_url = if api_url.ends_with('/') {
            api_url
        } else {
            format!("{}/", api_url)
        };
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_url,
            end_timeout: timeout.min(END_GAME_TIMEOUT),
        })
    }

    /// Create a client from environment variables
    ///
    /// Required: API_KEY
    /// Optional: API_URL (defaults to the public game service)
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("API_KEY").map_err(|_| AgentError::Config("API_KEY not set".into()))?;
        let api_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(api_key, api_url)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub async fn new_game(&self, map_name: &str) -> Result<GameId> {
        let response: NewGameResponse = self.post("new", &NewGameRequest { map_name }).await?;
        Ok(GameId(response.game_id))
    }

    pub async fn start_game(&self, game_id: &GameId) -> Result<GameInfo> {
        self.post("start", &GameRequest { game_id: &game_id.0 }).await
    }

    pub async fn game_state(&self, game_id: &GameId) -> Result<GameStateDto> {
        self.get("state", game_id).await
    }

    /// Submit an action; the service answers with the following turn's state
    pub async fn take_action(&self, game_id: &GameId, action: &Action) -> Result<GameStateDto> {
        let request = ActionRequest::new(game_id, action);
        self.post(&ActionRequest::path(action), &request).await
    }

    pub async fn end_game(&self, game_id: &GameId) -> Result<()> {
        let response = self
            .client
            .post(self.url("end"))
            .timeout(self.end_timeout)
            .header("x-api-key", &self.api_key)
            .json(&GameRequest { game_id: &game_id.0 })
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    pub async fn score(&self, game_id: &GameId) -> Result<ScoreReport> {
        self.get("score", game_id).await
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let response = self
            .client
            .post(self.url(path))
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, game_id: &GameId) -> Result<R> {
        let response = self
            .client
            .get(self.url(path))
            .header("x-api-key", &self.api_key)
            .query(&[("gameId", game_id.0.as_str())])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        Err(AgentError::Service(format!("{}: {}", status, error_text)))
    }
}
