//! City Agent - rule-based player for a turn-based city-building game

pub mod actions;
pub mod api;
pub mod blueprints;
pub mod core;
pub mod decision;
pub mod driver;
pub mod spatial;
pub mod world;
