//! Blueprint registry for looking up building templates by name.
//!
//! The registry is filled once from the session's game info and is never
//! mutated afterwards. Lookups are plain map reads; a name the service never
//! published is an error, never a guessed default.

use ahash::AHashMap;

use super::schema::{BlueprintCategory, BuildingBlueprint};
use crate::core::error::{AgentError, Result};

/// Read-only access to building templates
pub trait BlueprintLookup {
    /// Any blueprint by name
    fn blueprint_for(&self, name: &str) -> Result<&BuildingBlueprint>;

    /// A residence blueprint; utility names are reported as not found
    fn residence_blueprint(&self, name: &str) -> Result<&BuildingBlueprint> {
        self.blueprint_for(name)
            .ok()
            .filter(|bp| bp.category == BlueprintCategory::Residence)
            .ok_or_else(|| AgentError::BlueprintNotFound(format!("residence {}", name)))
    }

    /// A utility blueprint; residence names are reported as not found
    fn utility_blueprint(&self, name: &str) -> Result<&BuildingBlueprint> {
        self.blueprint_for(name)
            .ok()
            .filter(|bp| bp.category == BlueprintCategory::Utility)
            .ok_or_else(|| AgentError::BlueprintNotFound(format!("utility {}", name)))
    }
}

/// Registry of every building template published for the current map
#[derive(Debug, Clone, Default)]
pub struct BlueprintRegistry {
    blueprints: Vec<BuildingBlueprint>,
    /// Map from name to index for fast lookup
    by_name: AHashMap<String, usize>,
}

impl BlueprintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blueprints(blueprints: impl IntoIterator<Item = BuildingBlueprint>) -> Self {
        let mut registry = Self::new();
        for blueprint in blueprints {
            registry.register(blueprint);
        }
        registry
    }

    /// Register a blueprint. A later blueprint with the same name replaces the
    /// earlier one.
    pub fn register(&mut self, blueprint: BuildingBlueprint) {
        match self.by_name.get(&blueprint.name) {
            Some(&index) => self.blueprints[index] = blueprint,
            None => {
                self.by_name
                    .insert(blueprint.name.clone(), self.blueprints.len());
                self.blueprints.push(blueprint);
            }
        }
    }

    /// All blueprints of a category, in registration order
    pub fn by_category(&self, category: BlueprintCategory) -> impl Iterator<Item = &BuildingBlueprint> + '_ {
        self.blueprints
            .iter()
            .filter(move |bp| bp.category == category)
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }
}

impl BlueprintLookup for BlueprintRegistry {
    fn blueprint_for(&self, name: &str) -> Result<&BuildingBlueprint> {
        self.by_name
            .get(name)
            .map(|&index| &self.blueprints[index])
            .ok_or_else(|| AgentError::BlueprintNotFound(name.to_string()))
    }
}
