//! Selection policies: which building, which upgrade, how much energy

use ordered_float::OrderedFloat;

use crate::blueprints::{BlueprintLookup, BuildingBlueprint, UpgradeOption};
use crate::core::config::{AgentConfig, UpgradeStrategy};
use crate::core::error::Result;
use crate::world::{Residence, WorldState};

pub const MALL: &str = "Mall";
pub const PARK: &str = "Park";

/// First item with the largest key
pub(crate) fn first_max_by<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    items
        .into_iter()
        .fold(None, |best: Option<(&'a T, OrderedFloat<f64>)>, item| {
            let k = OrderedFloat(key(item));
            match best {
                Some((_, best_k)) if k <= best_k => best,
                _ => Some((item, k)),
            }
        })
        .map(|(item, _)| item)
}

/// First item with the smallest key
pub(crate) fn first_min_by<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    items.into_iter().min_by_key(|item| OrderedFloat(key(*item)))
}

/// Pick the residence type to found next, if any.
///
/// With emissions on track the choice depends on the funds bracket; once
/// emissions run ahead of budget the cleanest type wins regardless of funds.
/// Funds at or above `funds_high` with emissions on track select nothing.
pub fn choose_residence<'c>(
    state: &WorldState,
    catalog: &'c dyn BlueprintLookup,
    config: &AgentConfig,
) -> Result<Option<&'c BuildingBlueprint>> {
    let mut feasible = Vec::new();
    for name in &state.available_residences {
        let blueprint = catalog.residence_blueprint(name)?;
        if blueprint.is_released(state.turn) && state.funds > blueprint.cost {
            feasible.push(blueprint);
        }
    }
    if feasible.is_empty() {
        return Ok(None);
    }

    let mut upkeep = 0.0;
    for residence in &state.residences {
        upkeep += catalog.blueprint_for(&residence.building_name)?.maintenance_cost;
    }
    if upkeep >= state.funds * config.maintenance_funds_ratio {
        return Ok(None);
    }

    let funds = state.funds;
    let choice = if state.co2_on_track(config.co2_max) {
        if funds < config.funds_low {
            None
        } else if funds < config.funds_med {
            first_max_by(feasible.iter().copied(), |bp| bp.income_capacity())
        } else if funds < config.funds_high {
            first_max_by(feasible.iter().copied(), |bp| bp.max_happiness)
        } else {
            None
        }
    } else {
        first_min_by(feasible.iter().copied(), |bp| {
            bp.co2_cost + bp.max_pop * config.co2_per_pop_weight
        })
    };

    Ok(choice)
}

/// Pick the utility type to found next: a Park once a Mall stands, a Mall
/// before that. Only offered types that the funds cover with margin qualify.
pub fn choose_utility<'c>(
    state: &WorldState,
    catalog: &'c dyn BlueprintLookup,
    config: &AgentConfig,
) -> Result<Option<&'c BuildingBlueprint>> {
    let preferred = if state.has_utility(MALL) { PARK } else { MALL };

    if !state.available_utilities.iter().any(|name| name == preferred) {
        return Ok(None);
    }

    let blueprint = catalog.utility_blueprint(preferred)?;
    if state.funds > blueprint.cost * config.utility_funds_factor {
        Ok(Some(blueprint))
    } else {
        Ok(None)
    }
}

/// Pick an upgrade for a finished residence according to the configured strategy
pub fn choose_upgrade<'s>(
    state: &'s WorldState,
    residence: &Residence,
    config: &AgentConfig,
) -> Option<&'s UpgradeOption> {
    match config.upgrade_strategy {
        UpgradeStrategy::Classed => {
            let regulators = config.regulator_upgrades.as_slice();
            let chargers = config.charger_upgrades.as_slice();
            cheapest_eligible(state, residence, Some(regulators)).or_else(|| {
                if state.total_co2 >= config.co2_limit || state.funds > config.funds_high {
                    cheapest_eligible(state, residence, Some(chargers))
                } else {
                    None
                }
            })
        }
        UpgradeStrategy::CheapestOverall => {
            first_min_by(&state.available_upgrades, |u| u.cost)
                .filter(|u| is_eligible(state, residence, u))
        }
        UpgradeStrategy::AnyAffordable => cheapest_eligible(state, residence, None),
    }
}

fn is_eligible(state: &WorldState, residence: &Residence, upgrade: &UpgradeOption) -> bool {
    state.funds > upgrade.cost && !residence.has_effect(&upgrade.name)
}

/// Cheapest affordable upgrade not yet installed, optionally limited to a class
fn cheapest_eligible<'s>(
    state: &'s WorldState,
    residence: &Residence,
    class: Option<&[String]>,
) -> Option<&'s UpgradeOption> {
    let candidates = state
        .available_upgrades
        .iter()
        .filter(|u| class.map_or(true, |names| names.contains(&u.name)))
        .filter(|u| is_eligible(state, residence, u));
    first_min_by(candidates, |u| u.cost)
}

/// Energy level that steers a residence towards the optimal temperature.
///
/// wanted = (optimal - temp - degrees_per_pop * pop
///           + (temp - outdoor) * emissivity) / degrees_per_excess_mwh + base_need
///
/// `base_need` includes the Charger surcharge when one is installed. The
/// result never drops below `base_need + energy_margin`.
pub fn energy_level(
    residence: &Residence,
    blueprint: &BuildingBlueprint,
    outdoor_temp: f64,
    config: &AgentConfig,
) -> f64 {
    let charger = config
        .charger_upgrades
        .iter()
        .any(|name| residence.has_effect(name));
    let base_need = if charger {
        blueprint.base_energy_need + config.charger_energy_need
    } else {
        blueprint.base_energy_need
    };

    let wanted = (config.optimal_temperature
        - residence.temperature
        - config.degrees_per_pop * residence.current_pop
        + (residence.temperature - outdoor_temp) * blueprint.emissivity)
        / config.degrees_per_excess_mwh
        + base_need;

    wanted.max(base_need + config.energy_margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprints::{BlueprintCategory, BlueprintRegistry};
    use crate::core::types::Position;
    use crate::spatial::grid::OccupancyGrid;
    use crate::world::Utility;

    fn residence_bp(name: &str, cost: f64) -> BuildingBlueprint {
        BuildingBlueprint {
            name: name.into(),
            category: BlueprintCategory::Residence,
            cost,
            maintenance_cost: 10.0,
            base_energy_need: 5.0,
            emissivity: 0.1,
            max_pop: 50.0,
            max_happiness: 0.5,
            income_per_pop: 2.0,
            co2_cost: 300.0,
            release_tick: 0,
        }
    }

    fn utility_bp(name: &str, cost: f64) -> BuildingBlueprint {
        BuildingBlueprint {
            name: name.into(),
            category: BlueprintCategory::Utility,
            cost,
            maintenance_cost: 0.0,
            base_energy_need: 0.0,
            emissivity: 0.0,
            max_pop: 0.0,
            max_happiness: 0.0,
            income_per_pop: 0.0,
            co2_cost: 0.0,
            release_tick: 0,
        }
    }

    fn catalog() -> BlueprintRegistry {
        let mut rich = residence_bp("Apartments", 1000.0);
        rich.income_per_pop = 3.0;
        rich.max_pop = 100.0;
        rich.max_happiness = 0.2;
        rich.co2_cost = 900.0;

        let mut happy = residence_bp("Cabin", 500.0);
        happy.income_per_pop = 1.0;
        happy.max_pop = 20.0;
        happy.max_happiness = 0.9;
        happy.co2_cost = 100.0;

        let mut late = residence_bp("HighRise", 800.0);
        late.release_tick = 50;

        BlueprintRegistry::from_blueprints([
            rich,
            happy,
            late,
            utility_bp(MALL, 2000.0),
            utility_bp(PARK, 1000.0),
        ])
    }

    fn state(funds: f64) -> WorldState {
        let mut state = WorldState::new(OccupancyGrid::new(3, 3), 100);
        state.turn = 10;
        state.funds = funds;
        state.available_residences =
            vec!["Apartments".into(), "Cabin".into(), "HighRise".into()];
        state.available_utilities = vec![MALL.into(), PARK.into()];
        state
    }

    fn config() -> AgentConfig {
        AgentConfig {
            co2_max: 1000.0,
            funds_low: 2000.0,
            funds_med: 5000.0,
            funds_high: 10000.0,
            co2_limit: 500.0,
            ..AgentConfig::default()
        }
    }

    #[test]
    fn test_low_funds_select_nothing() {
        let catalog = catalog();
        assert!(choose_residence(&state(1500.0), &catalog, &config())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_medium_funds_maximize_income() {
        let catalog = catalog();
        let choice = choose_residence(&state(3000.0), &catalog, &config()).unwrap();
        assert_eq!(choice.map(|bp| bp.name.as_str()), Some("Apartments"));
    }

    #[test]
    fn test_high_funds_maximize_happiness() {
        let catalog = catalog();
        let choice = choose_residence(&state(7000.0), &catalog, &config()).unwrap();
        assert_eq!(choice.map(|bp| bp.name.as_str()), Some("Cabin"));
    }

    #[test]
    fn test_funds_above_high_select_nothing_while_on_track() {
        let catalog = catalog();
        assert!(choose_residence(&state(20000.0), &catalog, &config())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_over_budget_minimizes_emissions() {
        let catalog = catalog();
        let mut state = state(20000.0);
        // budget share at turn 10 = 10 * 1000 / 100 = 100
        state.total_co2 = 100.0;
        let choice = choose_residence(&state, &catalog, &config()).unwrap();
        assert_eq!(choice.map(|bp| bp.name.as_str()), Some("Cabin"));
    }

    #[test]
    fn test_unreleased_types_never_chosen() {
        let catalog = catalog();
        let mut state = state(3000.0);
        state.available_residences = vec!["HighRise".into()];
        assert!(choose_residence(&state, &catalog, &config())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_heavy_upkeep_blocks_new_residences() {
        let catalog = catalog();
        let mut state = state(3000.0);
        for y in 0..3 {
            let mut r = Residence::new(Position::new(0, y), "Apartments");
            r.build_progress = 100.0;
            state.residences.push(r);
        }
        // upkeep 30 vs half of funds 1500
        assert!(choose_residence(&state, &catalog, &config())
            .unwrap()
            .is_some());
        state.funds = 2050.0;
        let mut cfg = config();
        cfg.maintenance_funds_ratio = 0.01;
        assert!(choose_residence(&state, &catalog, &cfg).unwrap().is_none());
    }

    #[test]
    fn test_unknown_residence_type_propagates() {
        let catalog = catalog();
        let mut state = state(3000.0);
        state.available_residences.push("Igloo".into());
        assert!(choose_residence(&state, &catalog, &config()).is_err());
    }

    #[test]
    fn test_utility_alternates_mall_then_park() {
        let catalog = catalog();
        let mut state = state(5000.0);
        let first = choose_utility(&state, &catalog, &config()).unwrap();
        assert_eq!(first.map(|bp| bp.name.as_str()), Some(MALL));

        state.utilities.push(Utility::new(Position::new(2, 2), MALL));
        let second = choose_utility(&state, &catalog, &config()).unwrap();
        assert_eq!(second.map(|bp| bp.name.as_str()), Some(PARK));
    }

    #[test]
    fn test_utility_needs_funds_margin() {
        let catalog = catalog();
        // Mall costs 2000, margin requires more than 3000
        assert!(choose_utility(&state(3000.0), &catalog, &config())
            .unwrap()
            .is_none());
        assert!(choose_utility(&state(3001.0), &catalog, &config())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_missing_preferred_utility_selects_nothing() {
        let catalog = catalog();
        let mut state = state(50000.0);
        state.available_utilities = vec![PARK.into()];
        assert!(choose_utility(&state, &catalog, &config())
            .unwrap()
            .is_none());
    }

    fn upgrade_state(funds: f64) -> WorldState {
        let mut state = state(funds);
        state.available_upgrades = vec![
            UpgradeOption::new("Charger", 600.0),
            UpgradeOption::new("Regulator", 1200.0),
            UpgradeOption::new("Insulation", 300.0),
        ];
        state
    }

    #[test]
    fn test_regulator_preferred() {
        let state = upgrade_state(5000.0);
        let residence = Residence::new(Position::new(0, 0), "Cabin");
        let upgrade = choose_upgrade(&state, &residence, &config());
        assert_eq!(upgrade.map(|u| u.name.as_str()), Some("Regulator"));
    }

    #[test]
    fn test_charger_needs_co2_or_funds_trigger() {
        let mut state = upgrade_state(1000.0);
        let residence = Residence::new(Position::new(0, 0), "Cabin");
        assert!(choose_upgrade(&state, &residence, &config()).is_none());

        state.total_co2 = 500.0;
        let upgrade = choose_upgrade(&state, &residence, &config());
        assert_eq!(upgrade.map(|u| u.name.as_str()), Some("Charger"));
    }

    #[test]
    fn test_installed_upgrades_skipped() {
        let state = upgrade_state(20000.0);
        let mut residence = Residence::new(Position::new(0, 0), "Cabin");
        residence.effects = vec!["Regulator".into()];
        let upgrade = choose_upgrade(&state, &residence, &config());
        assert_eq!(upgrade.map(|u| u.name.as_str()), Some("Charger"));

        residence.effects.push("Charger".into());
        assert!(choose_upgrade(&state, &residence, &config()).is_none());
    }

    #[test]
    fn test_alternate_upgrade_strategies() {
        let state = upgrade_state(5000.0);
        let mut residence = Residence::new(Position::new(0, 0), "Cabin");

        let cheapest = AgentConfig {
            upgrade_strategy: UpgradeStrategy::CheapestOverall,
            ..config()
        };
        let any = AgentConfig {
            upgrade_strategy: UpgradeStrategy::AnyAffordable,
            ..config()
        };
        assert_eq!(
            choose_upgrade(&state, &residence, &cheapest).map(|u| u.name.as_str()),
            Some("Insulation")
        );

        residence.effects = vec!["Insulation".into()];
        assert!(choose_upgrade(&state, &residence, &cheapest).is_none());
        assert_eq!(
            choose_upgrade(&state, &residence, &any).map(|u| u.name.as_str()),
            Some("Charger")
        );
    }

    #[test]
    fn test_energy_level_formula() {
        let mut residence = Residence::new(Position::new(0, 0), "Cabin");
        residence.temperature = 19.0;
        residence.current_pop = 50.0;
        let blueprint = residence_bp("Cabin", 500.0);

        let level = energy_level(&residence, &blueprint, 10.0, &AgentConfig::default());
        assert!((level - 6.2).abs() < 1e-9, "level was {}", level);
    }

    #[test]
    fn test_energy_level_floor_and_charger() {
        let mut residence = Residence::new(Position::new(0, 0), "Cabin");
        residence.temperature = 30.0;
        residence.current_pop = 50.0;
        let blueprint = residence_bp("Cabin", 500.0);
        let config = AgentConfig::default();

        let level = energy_level(&residence, &blueprint, 30.0, &config);
        assert!((level - 5.01).abs() < 1e-9);

        residence.effects.push("Charger".into());
        let level = energy_level(&residence, &blueprint, 30.0, &config);
        assert!((level - 6.81).abs() < 1e-9);
    }

    #[test]
    fn test_first_extremes_on_ties() {
        let items = [(1, 2.0), (2, 5.0), (3, 5.0), (4, 2.0)];
        assert_eq!(first_max_by(&items, |i| i.1).map(|i| i.0), Some(2));
        assert_eq!(first_min_by(&items, |i| i.1).map(|i| i.0), Some(1));
        let empty: [(i32, f64); 0] = [];
        assert!(first_max_by(&empty, |i| i.1).is_none());
    }
}
