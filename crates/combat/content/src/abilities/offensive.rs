//! Abilities that shape how a unit deals damage.

use combat_core::{Unit, UnitBehavior, UnitEvent};

/// Whole cells between two units, measured centre to centre.
fn cells_between(unit: &Unit, opponent: &Unit) -> i32 {
    match (unit.position(), opponent.position()) {
        (Some(a), Some(b)) => {
            let dx = f64::from(a.x - b.x);
            let dy = f64::from(a.y - b.y);
            dx.hypot(dy) as i32
        }
        _ => 0,
    }
}

/// Deals `bonus_per_cell` extra damage for every cell to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marksman {
    pub bonus_per_cell: i32,
}

impl UnitBehavior for Marksman {
    fn damage_to_unit(&self, unit: &Unit, opponent: &Unit) -> i32 {
        let bonus = self.bonus_per_cell.saturating_mul(cells_between(unit, opponent));
        self.damage(unit).saturating_add(bonus)
    }

    fn description(&self, _unit: &Unit) -> String {
        format!("+{} damage per cell to the target.", self.bonus_per_cell)
    }
}

/// Deals `bonus` percent more damage to targets with more health than itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Executioner {
    pub bonus: i32,
}

impl UnitBehavior for Executioner {
    fn damage_to_unit(&self, unit: &Unit, opponent: &Unit) -> i32 {
        let damage = self.damage(unit);
        if opponent.health() > unit.health() {
            let boosted = i64::from(damage) * (100 + i64::from(self.bonus)) / 100;
            boosted.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        } else {
            damage
        }
    }

    fn description(&self, _unit: &Unit) -> String {
        format!("+{}% damage against healthier targets.", self.bonus)
    }
}

/// Gains `per_defeat` damage for every opponent defeated, up to `max_stacks`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Veteran {
    pub per_defeat: i32,
    pub max_stacks: i32,
}

impl UnitBehavior for Veteran {
    fn on_event(&self, unit: &Unit, event: UnitEvent) -> i32 {
        match event {
            UnitEvent::DefeatedOpponent => (unit.state() + 1).min(self.max_stacks),
            _ => unit.state(),
        }
    }

    fn damage(&self, unit: &Unit) -> i32 {
        unit.base()
            .damage
            .saturating_add(self.per_defeat.saturating_mul(unit.state()))
    }

    fn description(&self, unit: &Unit) -> String {
        format!(
            "+{} damage per defeat ({}/{}).",
            self.per_defeat,
            unit.state(),
            self.max_stacks
        )
    }
}

/// Extends its range by `range_bonus` for the rest of a round in which it
/// moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Skirmisher {
    pub range_bonus: f64,
}

impl UnitBehavior for Skirmisher {
    fn on_event(&self, unit: &Unit, event: UnitEvent) -> i32 {
        match event {
            UnitEvent::RoundStart => 0,
            UnitEvent::Moved => 1,
            _ => unit.state(),
        }
    }

    fn range(&self, unit: &Unit) -> f64 {
        if unit.state() == 1 {
            unit.base().range + self.range_bonus
        } else {
            unit.base().range
        }
    }

    fn description(&self, _unit: &Unit) -> String {
        format!("+{} range after moving.", self.range_bonus)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use combat_core::{BaseStats, Point, UnitId, UnitTemplate};

    use super::*;

    fn unit(id: u32, stats: BaseStats, behavior: impl UnitBehavior + 'static) -> Unit {
        let template = UnitTemplate::new(UnitId(id), "test", stats)
            .with_behavior(Arc::new(behavior))
            .at(Point::new(0, 0));
        Unit::from_template(template, 0)
    }

    fn target(health: i32, position: Point) -> Unit {
        let template =
            UnitTemplate::new(UnitId(99), "target", BaseStats::new(health, 0, 1.0, 1)).at(position);
        Unit::from_template(template, 1)
    }

    #[test]
    fn marksman_scales_with_distance() {
        let archer = unit(1, BaseStats::new(500, 100, 6.0, 2), Marksman { bonus_per_cell: 20 });
        assert_eq!(archer.damage_to_unit(&target(100, Point::new(1, 0))), 120);
        assert_eq!(archer.damage_to_unit(&target(100, Point::new(3, 4))), 200);
        assert_eq!(archer.damage(), 100);
    }

    #[test]
    fn executioner_punishes_healthier_targets() {
        let headsman = unit(1, BaseStats::new(500, 200, 1.0, 3), Executioner { bonus: 50 });
        assert_eq!(headsman.damage_to_unit(&target(800, Point::new(1, 0))), 300);
        assert_eq!(headsman.damage_to_unit(&target(400, Point::new(1, 0))), 200);
    }

    #[test]
    fn executioner_bonus_saturates() {
        let headsman = unit(1, BaseStats::new(1, i32::MAX, 1.0, 3), Executioner { bonus: 50 });
        assert_eq!(headsman.damage_to_unit(&target(800, Point::new(1, 0))), i32::MAX);
    }

    #[test]
    fn veteran_stacks_damage_up_to_cap() {
        let mut old_hand = unit(
            1,
            BaseStats::new(500, 100, 1.0, 3),
            Veteran {
                per_defeat: 50,
                max_stacks: 2,
            },
        );
        for _ in 0..3 {
            old_hand.update(UnitEvent::DefeatedOpponent);
        }
        old_hand.update(UnitEvent::RoundStart);
        assert_eq!(old_hand.state(), 2);
        assert_eq!(old_hand.damage(), 200);
    }

    #[test]
    fn skirmisher_gains_range_until_next_round() {
        let mut scout = unit(1, BaseStats::new(500, 100, 2.0, 4), Skirmisher { range_bonus: 1.5 });
        scout.update(UnitEvent::Moved);
        assert_eq!(scout.range(), 3.5);
        scout.update(UnitEvent::Targeted);
        assert_eq!(scout.range(), 3.5);
        scout.update(UnitEvent::RoundStart);
        assert_eq!(scout.range(), 2.0);
    }
}
