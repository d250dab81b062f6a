//! Abilities that keep a unit standing.

use combat_core::{Unit, UnitBehavior, UnitEvent};

/// Raises the shield to `shield` at the start of every `every`-th round.
///
/// State packs the round counter with a "fresh" bit set only on the round
/// start that grants the shield, so later events in the same round do not
/// top it up again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bulwark {
    pub shield: i32,
    pub every: u32,
}

impl Bulwark {
    fn rounds(state: i32) -> i32 {
        state >> 1
    }

    fn is_fresh(state: i32) -> bool {
        state & 1 == 1
    }
}

impl UnitBehavior for Bulwark {
    fn on_event(&self, unit: &Unit, event: UnitEvent) -> i32 {
        let rounds = Self::rounds(unit.state());
        match event {
            UnitEvent::RoundStart => {
                let rounds = rounds + 1;
                let every = self.every.max(1) as i32;
                let fresh = i32::from(rounds % every == 0);
                (rounds << 1) | fresh
            }
            _ => rounds << 1,
        }
    }

    fn shield(&self, unit: &Unit) -> i32 {
        let stored = unit.base().shield;
        if Self::is_fresh(unit.state()) {
            stored.max(self.shield)
        } else {
            stored
        }
    }

    fn description(&self, _unit: &Unit) -> String {
        match self.every {
            0 | 1 => format!("Raises a {} shield every round.", self.shield),
            every => format!("Raises a {} shield every {every} rounds.", self.shield),
        }
    }
}

/// Enrages once health falls to `threshold` percent of maximum at a round
/// start: damage rises by `damage_bonus` for good, while maximum health is
/// capped at `health_cap` percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Berserker {
    pub threshold: i32,
    pub damage_bonus: i32,
    pub health_cap: i32,
}

impl Berserker {
    fn is_enraged(unit: &Unit) -> bool {
        unit.state() != 0
    }
}

impl UnitBehavior for Berserker {
    fn on_event(&self, unit: &Unit, event: UnitEvent) -> i32 {
        if Self::is_enraged(unit) {
            return unit.state();
        }
        let base = unit.base();
        let wounded =
            i64::from(base.health) * 100 <= i64::from(base.max_health) * i64::from(self.threshold);
        i32::from(event == UnitEvent::RoundStart && wounded)
    }

    fn max_health(&self, unit: &Unit) -> i32 {
        let max = unit.base().max_health;
        if Self::is_enraged(unit) {
            (i64::from(max) * i64::from(self.health_cap) / 100) as i32
        } else {
            max
        }
    }

    fn health(&self, unit: &Unit) -> i32 {
        unit.base().health.min(self.max_health(unit))
    }

    fn damage(&self, unit: &Unit) -> i32 {
        let damage = unit.base().damage;
        if Self::is_enraged(unit) {
            damage.saturating_add(self.damage_bonus)
        } else {
            damage
        }
    }

    fn description(&self, unit: &Unit) -> String {
        if Self::is_enraged(unit) {
            format!("Enraged: +{} damage.", self.damage_bonus)
        } else {
            format!(
                "Enrages below {}% health for +{} damage.",
                self.threshold, self.damage_bonus
            )
        }
    }
}
