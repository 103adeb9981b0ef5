//! World state tracked across turns

pub mod state;

pub use state::{Residence, Utility, WorldState};
