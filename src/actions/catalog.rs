//! Action definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::Position;

/// The single side-effecting output of a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Wait,
    Maintain {
        position: Position,
    },
    AdjustEnergy {
        position: Position,
        level: f64,
    },
    Build {
        position: Position,
    },
    PlaceFoundation {
        position: Position,
        building_name: String,
    },
    BuyUpgrade {
        position: Position,
        upgrade_name: String,
    },
}

/// Action discriminant without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Wait,
    Maintain,
    AdjustEnergy,
    Build,
    PlaceFoundation,
    BuyUpgrade,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Wait => ActionKind::Wait,
            Action::Maintain { .. } => ActionKind::Maintain,
            Action::AdjustEnergy { .. } => ActionKind::AdjustEnergy,
            Action::Build { .. } => ActionKind::Build,
            Action::PlaceFoundation { .. } => ActionKind::PlaceFoundation,
            Action::BuyUpgrade { .. } => ActionKind::BuyUpgrade,
        }
    }

    /// Target cell, if the action has one
    pub fn position(&self) -> Option<Position> {
        match self {
            Action::Wait => None,
            Action::Maintain { position }
            | Action::AdjustEnergy { position, .. }
            | Action::Build { position }
            | Action::PlaceFoundation { position, .. }
            | Action::BuyUpgrade { position, .. } => Some(*position),
        }
    }
}

impl ActionKind {
    /// Endpoint verb the game service uses for this action
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Wait => "wait",
            ActionKind::Maintain => "maintenance",
            ActionKind::AdjustEnergy => "adjustEnergy",
            ActionKind::Build => "build",
            ActionKind::PlaceFoundation => "startBuild",
            ActionKind::BuyUpgrade => "buyUpgrade",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Wait => write!(f, "wait"),
            Action::Maintain { position } => write!(f, "maintain {}", position),
            Action::AdjustEnergy { position, level } => {
                write!(f, "adjust energy at {} to {:.2}", position, level)
            }
            Action::Build { position } => write!(f, "build {}", position),
            Action::PlaceFoundation {
                position,
                building_name,
            } => write!(f, "place {} at {}", building_name, position),
            Action::BuyUpgrade {
                position,
                upgrade_name,
            } => write!(f, "buy {} for {}", upgrade_name, position),
        }
    }
}
