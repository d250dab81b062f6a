//! End-of-round damage resolution.
//!
//! Both damage passes are planned from the current state before anything is
//! applied, and defeat notifications are delivered only once every defeat of
//! the round is known. The outcome therefore does not depend on the order in
//! which attacks were declared or stored.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Challenge, LogAction};
use crate::unit::{Unit, UnitEvent, UnitId};

/// Simultaneous hits planned against one defender.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Hit {
    defender: UnitId,
    attackers: Vec<UnitId>,
    /// Damage of one exchange: the sum over all live attackers.
    damage: i32,
    hits: u32,
}

impl Challenge {
    /// Resolves the round: penalty hits, the regular exchange, defeat
    /// notifications, then round start, elimination and outcome.
    pub(crate) fn finish_round(&mut self) {
        let attack_map = std::mem::take(&mut self.attack_map);
        let penalties = std::mem::take(&mut self.penalty_map);
        let mut notifications = Vec::new();

        let penalty_hits = self.plan_penalty_hits(&attack_map, &penalties);
        notifications.extend(self.apply_hits(&penalty_hits));

        let exchange_hits = self.plan_exchange_hits(&attack_map);
        notifications.extend(self.apply_hits(&exchange_hits));

        for id in notifications {
            if let Some(unit) = self.unit_mut(id) {
                unit.update(UnitEvent::DefeatedOpponent);
            }
        }

        self.close_round();
    }

    /// Live attackers of `defender` and the damage of one combined exchange.
    fn engagement(&self, defender: &Unit, attackers: &[UnitId]) -> (Vec<UnitId>, i32) {
        let live: Vec<&Unit> = attackers
            .iter()
            .filter_map(|&id| self.unit(id))
            .filter(|attacker| !attacker.is_defeated())
            .collect();

        let damage: i64 = live
            .iter()
            .map(|attacker| i64::from(attacker.damage_to_unit(defender)))
            .sum();
        let damage = damage.clamp(0, i64::from(i32::MAX)) as i32;

        let mut ids: Vec<UnitId> = live.iter().map(|attacker| attacker.id()).collect();
        ids.sort_unstable();
        (ids, damage)
    }

    fn plan_penalty_hits(
        &self,
        attack_map: &BTreeMap<UnitId, Vec<UnitId>>,
        penalties: &BTreeMap<UnitId, u32>,
    ) -> Vec<Hit> {
        penalties
            .iter()
            .filter(|&(_, &hits)| hits > 0)
            .filter_map(|(&id, &hits)| {
                let defender = self.unit(id)?;
                let (attackers, damage) = self.engagement(defender, attack_map.get(&id)?);
                (damage > 0).then_some(Hit {
                    defender: id,
                    attackers,
                    damage,
                    hits,
                })
            })
            .collect()
    }

    /// Every engaged defender takes the same number of hits: the fewest that
    /// would defeat any one of them, capped by the exchanges allowed per
    /// round.
    fn plan_exchange_hits(&self, attack_map: &BTreeMap<UnitId, Vec<UnitId>>) -> Vec<Hit> {
        let mut planned: Vec<(Hit, u32)> = attack_map
            .iter()
            .filter_map(|(&id, attackers)| {
                let defender = self.unit(id)?;
                let (attackers, damage) = self.engagement(defender, attackers);
                if attackers.is_empty() || damage <= 0 {
                    return None;
                }
                let to_defeat = defender.hits_to_defeat(damage);
                Some((
                    Hit {
                        defender: id,
                        attackers,
                        damage,
                        hits: 0,
                    },
                    to_defeat,
                ))
            })
            .collect();

        let Some(min_hits) = planned.iter().map(|&(_, to_defeat)| to_defeat).min() else {
            return Vec::new();
        };
        let hits = min_hits.min(self.config.exchanges_per_round.max(1));
        debug!(min_hits, hits, defenders = planned.len(), "exchange planned");
        if hits == 0 {
            return Vec::new();
        }

        for (hit, _) in &mut planned {
            hit.hits = hits;
        }
        planned.into_iter().map(|(hit, _)| hit).collect()
    }

    /// Applies planned hits and removes the defeated. Returns the attackers
    /// owed a defeat notification, once per opponent they helped defeat.
    fn apply_hits(&mut self, hits: &[Hit]) -> Vec<UnitId> {
        let mut defeated = Vec::new();
        for hit in hits {
            let Some(unit) = self.unit_mut(hit.defender) else {
                continue;
            };
            unit.take_damage(hit.damage, hit.hits);
            if unit.is_defeated() {
                defeated.push(hit);
            }
        }

        let mut notifications = Vec::new();
        for hit in &defeated {
            let Some(unit) = self.unit(hit.defender) else {
                continue;
            };
            let (player, weight) = (unit.player(), unit.weight());
            self.scores[player].defeated_weight += weight;
            self.log.push(
                self.rounds_left,
                LogAction::Defeat {
                    unit: hit.defender,
                    player,
                    by: hit.attackers.clone(),
                },
            );
            debug!(unit = %hit.defender, player, by = ?hit.attackers, "unit defeated");
            notifications.extend(hit.attackers.iter().copied());
        }

        let ids: Vec<UnitId> = defeated.iter().map(|hit| hit.defender).collect();
        self.remove_units(&ids);
        notifications
    }

    /// Starts the next round, eliminates players without fielded weight and
    /// decides whether the challenge is over.
    fn close_round(&mut self) {
        for unit in self.units.iter_mut().flatten() {
            unit.update(UnitEvent::RoundStart);
        }

        let eliminated: Vec<usize> = (0..self.scores.len())
            .filter(|&player| !self.scores[player].eliminated)
            .filter(|&player| {
                let units = &self.units[player];
                units.is_empty() || units.iter().map(Unit::weight).sum::<i32>() <= 0
            })
            .collect();

        for &player in &eliminated {
            let ids: Vec<UnitId> = self.units[player].iter().map(Unit::id).collect();
            let removed = self.remove_units(&ids);
            let forfeited = std::mem::take(&mut self.inactive[player]);
            let weight: i32 = removed
                .iter()
                .chain(forfeited.iter())
                .map(Unit::weight)
                .sum();

            let score = &mut self.scores[player];
            score.defeated_weight += weight;
            score.eliminated = true;
            debug!(player, "player eliminated");
        }
        for &player in &eliminated {
            self.record_score(player);
        }

        let remaining = self.remaining_players();
        match remaining.as_slice() {
            [winner] => self.finish(Some(*winner)),
            [] => self.finish(None),
            _ => {
                self.rounds_left = self.rounds_left.saturating_sub(1);
                if self.rounds_left == 0 {
                    self.finish(None);
                } else {
                    self.log.prune(self.rounds_left);
                }
            }
        }
    }
}
