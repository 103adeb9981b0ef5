//! Building blueprints and the read-only catalog over them.

pub mod registry;
pub mod schema;

pub use registry::{BlueprintLookup, BlueprintRegistry};
pub use schema::*;
