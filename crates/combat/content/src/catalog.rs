//! Named unit blueprints and template instantiation.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{BaseStats, Point, UnitBehavior, UnitId, UnitInfo, UnitTemplate};

use crate::abilities::{AbilitySpec, behavior_for};

/// Catalog entry describing one kind of unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub image: String,
    #[cfg_attr(feature = "serde", serde(default = "UnitSpec::default_weight"))]
    pub weight: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: BaseStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability: Option<AbilitySpec>,
}

impl UnitSpec {
    fn default_weight() -> i32 {
        1
    }

    pub fn new(name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            image: String::new(),
            weight: Self::default_weight(),
            stats,
            ability: None,
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilitySpec) -> Self {
        self.ability = Some(ability);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }
}

#[derive(Debug)]
struct Entry {
    spec: UnitSpec,
    behavior: Arc<dyn UnitBehavior>,
}

/// Unit blueprints keyed by name. Behaviours are built once per entry and
/// shared by every template instantiated from it.
#[derive(Debug, Default)]
pub struct UnitCatalog {
    entries: HashMap<String, Entry>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `spec`. Returns `false` and keeps the existing entry when the name
    /// is already taken.
    pub fn insert(&mut self, spec: UnitSpec) -> bool {
        if self.entries.contains_key(&spec.name) {
            return false;
        }
        let behavior = behavior_for(spec.ability);
        tracing::debug!(name = %spec.name, ability = ?spec.ability, "catalog entry added");
        self.entries
            .insert(spec.name.clone(), Entry { spec, behavior });
        true
    }

    pub fn get(&self, name: &str) -> Option<&UnitSpec> {
        self.entries.get(name).map(|entry| &entry.spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a template for `name` with a caller-assigned id, placed at
    /// `position` or left inactive.
    pub fn instantiate(
        &self,
        name: &str,
        id: UnitId,
        position: Option<Point>,
    ) -> Option<UnitTemplate> {
        let entry = self.entries.get(name)?;
        let spec = &entry.spec;

        let mut template = UnitTemplate::new(id, spec.name.clone(), spec.stats)
            .with_info(UnitInfo {
                name: spec.name.clone(),
                description: spec.description.clone(),
                image: spec.image.clone(),
            })
            .with_weight(spec.weight)
            .with_behavior(Arc::clone(&entry.behavior));
        template.position = position;

        Some(template)
    }

    /// Builds a squad, numbering units from `first_id` in order. Fails on
    /// the first unknown name.
    pub fn squad(
        &self,
        members: &[(&str, Option<Point>)],
        first_id: u32,
    ) -> Option<Vec<UnitTemplate>> {
        members
            .iter()
            .zip(first_id..)
            .map(|(&(name, position), id)| self.instantiate(name, UnitId(id), position))
            .collect()
    }
}

impl FromIterator<UnitSpec> for UnitCatalog {
    fn from_iter<I: IntoIterator<Item = UnitSpec>>(specs: I) -> Self {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.insert(spec);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use combat_core::UnitEvent;

    use super::*;

    fn catalog() -> UnitCatalog {
        [
            UnitSpec::new("footman", BaseStats::new(1000, 150, 1.0, 3)),
            UnitSpec::new("veteran", BaseStats::new(900, 120, 1.0, 3)).with_ability(
                AbilitySpec::Veteran {
                    per_defeat: 40,
                    max_stacks: 3,
                },
            ),
            UnitSpec::new("wall", BaseStats::new(3000, 0, 0.0, 0)).with_weight(0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn instantiate_copies_spec_and_shares_behavior() {
        let catalog = catalog();
        let first = catalog
            .instantiate("veteran", UnitId(1), Some(Point::new(2, 2)))
            .unwrap();
        let second = catalog.instantiate("veteran", UnitId(2), None).unwrap();

        assert_eq!(first.id, UnitId(1));
        assert_eq!(first.position, Some(Point::new(2, 2)));
        assert_eq!(second.position, None);
        assert!(Arc::ptr_eq(&first.behavior, &second.behavior));

        let mut unit = combat_core::Unit::from_template(first, 0);
        unit.update(UnitEvent::DefeatedOpponent);
        assert_eq!(unit.damage(), 160);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = catalog();
        assert!(!catalog.insert(UnitSpec::new("wall", BaseStats::default())));
        assert_eq!(catalog.get("wall").map(|spec| spec.weight), Some(0));
        assert_eq!(catalog.names(), vec!["footman", "veteran", "wall"]);
    }

    #[test]
    fn squads_number_units_in_order() {
        let catalog = catalog();
        let squad = catalog
            .squad(&[("footman", Some(Point::new(0, 0))), ("wall", None)], 10)
            .unwrap();
        let ids: Vec<UnitId> = squad.iter().map(|template| template.id).collect();
        assert_eq!(ids, vec![UnitId(10), UnitId(11)]);

        assert!(catalog.squad(&[("dragon", None)], 0).is_none());
    }
}
