//! Blocking game session over the async HTTP client
//!
//! Each call blocks the driver's thread on the tokio runtime until the round
//! trip completes, the request times out, or the interrupt is raised. Must not
//! be called from inside the runtime itself.

use std::future::Future;

use tokio::runtime::Handle;

use crate::actions::Action;
use crate::api::client::GameApiClient;
use crate::api::wire::{GameInfo, GameStateDto, ScoreReport};
use crate::api::{GameService, TurnReport};
use crate::blueprints::{BlueprintLookup, BlueprintRegistry};
use crate::core::error::{AgentError, Result};
use crate::core::interrupt::Interrupt;
use crate::core::types::GameId;
use crate::world::WorldState;

struct Session {
    game_id: GameId,
    info: GameInfo,
    /// Last state the service sent, reused until the next action
    latest: Option<GameStateDto>,
}

pub struct HttpGameService {
    client: GameApiClient,
    runtime: Handle,
    registry: BlueprintRegistry,
    session: Option<Session>,
    interrupt: Interrupt,
}

impl HttpGameService {
    pub fn new(client: GameApiClient, runtime: Handle) -> Self {
        Self {
            client,
            runtime,
            registry: BlueprintRegistry::new(),
            session: None,
            interrupt: Interrupt::new(),
        }
    }

    /// Abandon in-flight calls with `AgentError::Interrupted` once this is raised
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    fn call<T>(&self, request: impl Future<Output = Result<T>>) -> Result<T> {
        let interrupt = &self.interrupt;
        self.runtime.block_on(async move {
            tokio::select! {
                result = request => result,
                _ = interrupt.raised() => Err(AgentError::Interrupted),
            }
        })
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.session.as_ref().map(|s| &s.game_id)
    }

    fn session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| AgentError::Service("no game in progress".into()))
    }
}

impl GameService for HttpGameService {
    fn start_game(&mut self, map_name: &str) -> Result<GameId> {
        let game_id = self.call(self.client.new_game(map_name))?;
        let info = self.call(self.client.start_game(&game_id))?;
        tracing::debug!(
            map = %info.map_name,
            residences = info.available_residence_buildings.len(),
            utilities = info.available_utility_buildings.len(),
            "game info received"
        );

        self.registry = info.registry();
        self.session = Some(Session {
            game_id: game_id.clone(),
            info,
            latest: None,
        });
        Ok(game_id)
    }

    fn fetch_state(&mut self) -> Result<WorldState> {
        let session = self.session()?;
        let dto = match &session.latest {
            Some(dto) => dto.clone(),
            None => self.call(self.client.game_state(&session.game_id))?,
        };
        let state = session.info.world_state(&dto);
        if let Some(session) = self.session.as_mut() {
            session.latest = Some(dto);
        }
        Ok(state)
    }

    fn submit_action(&mut self, action: &Action) -> Result<TurnReport> {
        let game_id = self.session()?.game_id.clone();
        let dto = self.call(self.client.take_action(&game_id, action))?;
        let report = TurnReport {
            messages: dto.messages.clone(),
            errors: dto.errors.clone(),
        };
        if let Some(session) = self.session.as_mut() {
            session.latest = Some(dto);
        }
        Ok(report)
    }

    fn catalog(&self) -> &dyn BlueprintLookup {
        &self.registry
    }

    /// Not raced against the interrupt: it is the call that ends an
    /// interrupted session. Bounded by the client's end-game timeout.
    fn end_game(&mut self) -> Result<()> {
        match &self.session {
            Some(session) => self.runtime.block_on(self.client.end_game(&session.game_id)),
            None => Ok(()),
        }
    }

    fn score(&mut self) -> Result<ScoreReport> {
        let session = self.session()?;
        self.call(self.client.score(&session.game_id))
    }
}
