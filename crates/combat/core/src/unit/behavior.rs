//! Per-unit ability hooks.
//!
//! A behaviour is constructed once, when templates are loaded, and shared by
//! reference between every unit that uses it. Each hook receives the owning
//! unit and returns a derived value; the defaults return the stored value
//! unchanged, so a unit without abilities behaves exactly like its stats.
//!
//! Hooks must be pure functions of the unit they are given. Anything a
//! behaviour needs to remember goes into the unit's integer `state`, which
//! only [`UnitBehavior::on_event`] may change.

use std::fmt;

use super::Unit;

/// Lifecycle events fed to [`UnitBehavior::on_event`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum UnitEvent {
    /// A new round starts for this unit.
    RoundStart = 0,
    /// This unit moved.
    Moved = 1,
    /// This unit declared a target. Fires once per target.
    Targeted = 2,
    /// This unit defeated an opponent. Fires once per opponent.
    DefeatedOpponent = 3,
}

/// Stat-modifying ability table attached to a unit.
pub trait UnitBehavior: Send + Sync + fmt::Debug {
    /// Computes the unit's next `state` after `event`.
    fn on_event(&self, unit: &Unit, event: UnitEvent) -> i32 {
        let _ = event;
        unit.state()
    }

    fn health(&self, unit: &Unit) -> i32 {
        unit.base().health
    }

    fn shield(&self, unit: &Unit) -> i32 {
        unit.base().shield
    }

    fn max_health(&self, unit: &Unit) -> i32 {
        unit.base().max_health
    }

    fn damage(&self, unit: &Unit) -> i32 {
        unit.base().damage
    }

    fn range(&self, unit: &Unit) -> f64 {
        unit.base().range
    }

    fn targets(&self, unit: &Unit) -> u32 {
        unit.base().targets
    }

    fn speed(&self, unit: &Unit) -> i32 {
        unit.base().speed
    }

    fn special_moves(&self, unit: &Unit) -> bool {
        unit.base().special_moves
    }

    fn special_attacks(&self, unit: &Unit) -> bool {
        unit.base().special_attacks
    }

    /// Damage dealt by `unit` to `opponent`, allowing conditional bonuses.
    fn damage_to_unit(&self, unit: &Unit, opponent: &Unit) -> i32 {
        let _ = opponent;
        self.damage(unit)
    }

    /// Ability text appended to the unit's base description.
    fn description(&self, unit: &Unit) -> String {
        let _ = unit;
        String::new()
    }
}

/// Behaviour of a unit with no abilities.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBehavior;

impl UnitBehavior for DefaultBehavior {}
