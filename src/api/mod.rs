//! Boundary to the external game service
//!
//! The turn driver only talks to a [`GameService`]. [`HttpGameService`] is the
//! production implementation; tests script their own.

pub mod client;
pub mod http;
pub mod wire;

use crate::actions::Action;
use crate::blueprints::BlueprintLookup;
use crate::core::error::Result;
use crate::core::types::GameId;
use crate::world::WorldState;

pub use client::GameApiClient;
pub use http::HttpGameService;
pub use wire::ScoreReport;

/// Advisory text the service attached to a submitted action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
}

/// Synchronous game session as seen by the turn driver
pub trait GameService {
    /// Create and start a game on the named map
    fn start_game(&mut self, map_name: &str) -> Result<GameId>;

    /// Current state with the map's raw occupancy codes. Repeated calls
    /// without an action in between return the same state.
    fn fetch_state(&mut self) -> Result<WorldState>;

    fn submit_action(&mut self, action: &Action) -> Result<TurnReport>;

    /// Building templates for the running game
    fn catalog(&self) -> &dyn BlueprintLookup;

    fn end_game(&mut self) -> Result<()>;

    fn score(&mut self) -> Result<ScoreReport>;
}
