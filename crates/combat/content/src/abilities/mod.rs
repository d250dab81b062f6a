//! Named unit abilities and the data form they are loaded from.
//!
//! Each ability is a [`UnitBehavior`] built once when content is loaded and
//! shared by every unit instantiated from the same catalog entry.

mod defensive;
mod offensive;

use std::sync::Arc;

use combat_core::{DefaultBehavior, UnitBehavior};

pub use defensive::{Berserker, Bulwark};
pub use offensive::{Executioner, Marksman, Skirmisher, Veteran};

/// Data description of an ability, as written in unit catalogs.
#[derive(Clone, Copy, Debug, PartialEq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilitySpec {
    Bulwark {
        shield: i32,
        every: u32,
    },
    Berserker {
        threshold: i32,
        damage_bonus: i32,
        health_cap: i32,
    },
    Marksman {
        bonus_per_cell: i32,
    },
    Executioner {
        bonus: i32,
    },
    Veteran {
        per_defeat: i32,
        max_stacks: i32,
    },
    Skirmisher {
        range_bonus: f64,
    },
}

impl AbilitySpec {
    pub fn into_behavior(self) -> Arc<dyn UnitBehavior> {
        match self {
            Self::Bulwark { shield, every } => Arc::new(Bulwark { shield, every }),
            Self::Berserker {
                threshold,
                damage_bonus,
                health_cap,
            } => Arc::new(Berserker {
                threshold,
                damage_bonus,
                health_cap,
            }),
            Self::Marksman { bonus_per_cell } => Arc::new(Marksman { bonus_per_cell }),
            Self::Executioner { bonus } => Arc::new(Executioner { bonus }),
            Self::Veteran {
                per_defeat,
                max_stacks,
            } => Arc::new(Veteran {
                per_defeat,
                max_stacks,
            }),
            Self::Skirmisher { range_bonus } => Arc::new(Skirmisher { range_bonus }),
        }
    }
}

/// Behaviour for an optional ability; units without one use the defaults.
pub fn behavior_for(ability: Option<AbilitySpec>) -> Arc<dyn UnitBehavior> {
    match ability {
        Some(spec) => spec.into_behavior(),
        None => Arc::new(DefaultBehavior),
    }
}
