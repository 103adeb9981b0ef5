//! Priority rule chain - one action per turn
//!
//! Rules are tried in a fixed order and the first one that fires decides the
//! turn. A rule that does not apply, or applies but finds nothing worth doing,
//! returns `None` and the chain moves on. Lookup failures abort the turn.

use crate::actions::Action;
use crate::blueprints::BlueprintLookup;
use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::Position;
use crate::decision::choose::{
    choose_residence, choose_upgrade, choose_utility, energy_level, first_max_by, first_min_by,
};
use crate::spatial::grid::Occupancy;
use crate::spatial::placement::{best_location, PlacementIntent};
use crate::world::WorldState;

/// Everything a rule may read
pub struct RuleContext<'a> {
    pub state: &'a WorldState,
    pub catalog: &'a dyn BlueprintLookup,
    pub config: &'a AgentConfig,
}

/// Rules in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Maintenance,
    Upgrade,
    Temperature,
    Construction,
    PlaceResidence,
    PlaceUtility,
}

/// A fired rule's output: the action plus the grid cell it claims, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub reservation: Option<(Position, Occupancy)>,
    /// `None` when no rule fired and the turn is waited out
    pub rule: Option<RuleKind>,
}

impl Decision {
    fn fired(rule: RuleKind, action: Action) -> Self {
        Self {
            action,
            reservation: None,
            rule: Some(rule),
        }
    }

    fn wait() -> Self {
        Self {
            action: Action::Wait,
            reservation: None,
            rule: None,
        }
    }

    fn with_reservation(mut self, position: Position, kind: Occupancy) -> Self {
        self.reservation = Some((position, kind));
        self
    }
}

type RuleFn = fn(&RuleContext<'_>) -> Result<Option<Decision>>;

/// The chain, highest priority first
pub const RULE_CHAIN: [(RuleKind, RuleFn); 6] = [
    (RuleKind::Maintenance, residence_maintenance),
    (RuleKind::Upgrade, residence_upgrade),
    (RuleKind::Temperature, regulate_temperature),
    (RuleKind::Construction, continue_construction),
    (RuleKind::PlaceResidence, place_residence),
    (RuleKind::PlaceUtility, place_utility),
];

/// Run the chain without touching the state
pub fn evaluate(
    state: &WorldState,
    catalog: &dyn BlueprintLookup,
    config: &AgentConfig,
) -> Result<Decision> {
    let ctx = RuleContext {
        state,
        catalog,
        config,
    };

    for (kind, rule) in RULE_CHAIN {
        if let Some(decision) = rule(&ctx)? {
            tracing::debug!(rule = ?kind, action = %decision.action, "rule fired");
            return Ok(decision);
        }
    }

    tracing::debug!(turn = state.turn, "no rule fired, waiting");
    Ok(Decision::wait())
}

/// Choose this turn's action. A placement's cell is reserved on the grid
/// before returning so later decisions never pick it again.
pub fn decide(
    state: &mut WorldState,
    catalog: &dyn BlueprintLookup,
    config: &AgentConfig,
) -> Result<Action> {
    let decision = evaluate(state, catalog, config)?;
    if let Some((position, kind)) = decision.reservation {
        state.reserve(position, kind);
    }
    Ok(decision.action)
}

/// Maintain the least healthy residence once it drops below the threshold
fn residence_maintenance(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    let state = ctx.state;
    let Some(residence) = first_min_by(&state.residences, |r| r.health) else {
        return Ok(None);
    };

    let blueprint = ctx.catalog.residence_blueprint(&residence.building_name)?;
    if residence.health < ctx.config.maintenance_health_threshold
        && state.funds > blueprint.maintenance_cost
    {
        return Ok(Some(Decision::fired(
            RuleKind::Maintenance,
            Action::Maintain {
                position: residence.position,
            },
        )));
    }
    Ok(None)
}

/// Buy an upgrade for the first finished residence that has one worth buying
fn residence_upgrade(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    let state = ctx.state;
    for residence in state.residences.iter().filter(|r| r.is_built()) {
        if let Some(upgrade) = choose_upgrade(state, residence, ctx.config) {
            return Ok(Some(Decision::fired(
                RuleKind::Upgrade,
                Action::BuyUpgrade {
                    position: residence.position,
                    upgrade_name: upgrade.name.clone(),
                },
            )));
        }
    }
    Ok(None)
}

/// Re-target the energy of the finished residence furthest from the optimal temperature
fn regulate_temperature(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    let (state, config) = (ctx.state, ctx.config);
    if state.residences.is_empty()
        || state.turn < config.regulation_start_turn
        || state.funds < config.regulation_min_funds
    {
        return Ok(None);
    }

    let deviation = |temperature: f64| (temperature - config.optimal_temperature).abs();
    let built = state.residences.iter().filter(|r| r.is_built());
    let Some(residence) = first_max_by(built, |r| deviation(r.temperature)) else {
        return Ok(None);
    };
    if deviation(residence.temperature) < config.temperature_tolerance {
        return Ok(None);
    }

    let blueprint = ctx.catalog.residence_blueprint(&residence.building_name)?;
    let level = energy_level(residence, blueprint, state.current_temp, config);
    Ok(Some(Decision::fired(
        RuleKind::Temperature,
        Action::AdjustEnergy {
            position: residence.position,
            level,
        },
    )))
}

/// Keep building the first unfinished residence
fn continue_construction(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    Ok(ctx
        .state
        .residences
        .iter()
        .find(|r| !r.is_built())
        .map(|r| {
            Decision::fired(
                RuleKind::Construction,
                Action::Build {
                    position: r.position,
                },
            )
        }))
}

/// Found a new residence when enough people are queueing for housing
fn place_residence(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    let state = ctx.state;
    if state.housing_queue < ctx.config.min_housing_queue {
        return Ok(None);
    }

    let Some(blueprint) = choose_residence(state, ctx.catalog, ctx.config)? else {
        return Ok(None);
    };
    let Some(position) = best_location(state, PlacementIntent::Residence) else {
        return Ok(None);
    };

    Ok(Some(
        Decision::fired(
            RuleKind::PlaceResidence,
            Action::PlaceFoundation {
                position,
                building_name: blueprint.name.clone(),
            },
        )
        .with_reservation(position, Occupancy::Residence),
    ))
}

/// Found a utility every `utility_cadence` structures
fn place_utility(ctx: &RuleContext<'_>) -> Result<Option<Decision>> {
    let state = ctx.state;
    if state.structure_count() % ctx.config.utility_cadence != 0 {
        return Ok(None);
    }

    let Some(blueprint) = choose_utility(state, ctx.catalog, ctx.config)? else {
        return Ok(None);
    };
    let Some(position) = best_location(state, PlacementIntent::Utility) else {
        return Ok(None);
    };

    Ok(Some(
        Decision::fired(
            RuleKind::PlaceUtility,
            Action::PlaceFoundation {
                position,
                building_name: blueprint.name.clone(),
            },
        )
        .with_reservation(position, Occupancy::Utility),
    ))
}
