//! Decision engine: picks exactly one action per turn

pub mod choose;
pub mod rules;

pub use rules::{decide, evaluate, Decision, RuleKind, RULE_CHAIN};
