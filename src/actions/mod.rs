pub mod catalog;

pub use catalog::{Action, ActionKind};
