//! Session driver
//!
//! Runs the fetch/decide/submit loop against any [`GameService`](crate::api::GameService).

pub mod game_loop;

pub use game_loop::{GameOutcome, TurnDriver};
