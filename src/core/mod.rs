pub mod config;
pub mod error;
pub mod interrupt;
pub mod types;

pub use config::AgentConfig;
pub use interrupt::Interrupt;
pub use types::{GameId, Position, Turn};
