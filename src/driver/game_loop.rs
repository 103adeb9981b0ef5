//! Turn loop: fetch state, decide, submit, repeat until the game runs out of turns
//!
//! The driver owns the world state for the whole session. Any service or
//! lookup failure tears the session down with `end_game` and is returned to
//! the caller; an interrupt tears it down the same way but ends quietly. The
//! interrupt is seen between turns, or as `AgentError::Interrupted` from a
//! service call it cut short.

use crate::api::{GameService, ScoreReport, TurnReport};
use crate::core::config::AgentConfig;
use crate::core::error::{AgentError, Result};
use crate::core::interrupt::Interrupt;
use crate::core::types::{GameId, Turn};
use crate::decision::decide;
use crate::world::WorldState;

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum GameOutcome {
    Completed {
        game_id: GameId,
        turns_played: u32,
        score: ScoreReport,
    },
    Interrupted {
        game_id: GameId,
        turns_played: u32,
    },
}

enum Played {
    Finished(u32),
    Interrupted(u32),
}

pub struct TurnDriver<S: GameService> {
    service: S,
    config: AgentConfig,
    interrupt: Interrupt,
}

impl<S: GameService> TurnDriver<S> {
    pub fn new(service: S, config: AgentConfig) -> Self {
        Self {
            service,
            config,
            interrupt: Interrupt::new(),
        }
    }

    /// Share an externally owned interrupt (e.g. raised from a Ctrl-C handler)
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn interrupt_handle(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Play one full game on the named map
    pub fn run(&mut self, map_name: &str) -> Result<GameOutcome> {
        let game_id = match self.service.start_game(map_name) {
            Ok(game_id) => game_id,
            Err(e) => {
                self.teardown();
                return Err(e);
            }
        };
        tracing::info!(game_id = %game_id, map = map_name, "Starting game");

        let played = self.play().and_then(|played| match played {
            Played::Finished(turns) => match self.service.score() {
                Ok(score) => Ok((turns, Some(score))),
                Err(AgentError::Interrupted) => Ok((turns, None)),
                Err(e) => Err(e),
            },
            Played::Interrupted(turns) => Ok((turns, None)),
        });

        match played {
            Ok((turns_played, Some(score))) => {
                tracing::info!(game_id = %game_id, final_score = score.final_score, "Done with game");
                Ok(GameOutcome::Completed {
                    game_id,
                    turns_played,
                    score,
                })
            }
            Ok((turns_played, None)) => {
                tracing::warn!(game_id = %game_id, "Force quit game");
                self.teardown();
                Ok(GameOutcome::Interrupted {
                    game_id,
                    turns_played,
                })
            }
            Err(e) => {
                tracing::error!(game_id = %game_id, error = %e, "Game aborted");
                self.teardown();
                Err(e)
            }
        }
    }

    fn play(&mut self) -> Result<Played> {
        let mut state = match self.service.fetch_state() {
            Err(AgentError::Interrupted) => return Ok(Played::Interrupted(0)),
            fetched => fetched?,
        };
        tracing::debug!(
            residences = state.residences.len(),
            utilities = state.utilities.len(),
            "Preprocessing map"
        );
        state.mark_existing_structures();

        let mut turns_played = 0;
        while state.turn < state.max_turns {
            if self.interrupt.is_raised() {
                return Ok(Played::Interrupted(turns_played));
            }
            match self.take_turn(&mut state) {
                Err(AgentError::Interrupted) => return Ok(Played::Interrupted(turns_played)),
                taken => taken?,
            };
            turns_played += 1;
        }
        Ok(Played::Finished(turns_played))
    }

    /// Decide, submit, and refresh the state for the next turn
    pub fn take_turn(&mut self, state: &mut WorldState) -> Result<TurnReport> {
        let turn = state.turn;
        let action = decide(state, self.service.catalog(), &self.config)?;
        tracing::info!(turn, funds = state.funds, action = %action, "turn");

        let report = self.service.submit_action(&action)?;
        for message in &report.messages {
            tracing::info!("{}", message);
        }
        for error in &report.errors {
            tracing::warn!("Error: {}", error);
        }

        let fresh = self.service.fetch_state()?;
        check_advanced(turn, fresh.turn)?;
        state.refresh_from(fresh);
        Ok(report)
    }

    /// Best-effort session end; a failure here must not mask the original outcome
    fn teardown(&mut self) {
        if let Err(e) = self.service.end_game() {
            tracing::warn!(error = %e, "end_game failed during teardown");
        }
    }
}

fn check_advanced(before: Turn, after: Turn) -> Result<()> {
    if after > before {
        Ok(())
    } else {
        Err(AgentError::Service(format!(
            "turn did not advance after action (was {}, now {})",
            before, after
        )))
    }
}
