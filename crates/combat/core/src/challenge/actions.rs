//! Player actions: ready, activate, move, target, pass, leave.
//!
//! Every action validates the whole batch before touching any state.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{Challenge, LogAction, Phase};
use crate::config::ChallengeConfig;
use crate::error::ActionError;
use crate::grid::Point;
use crate::unit::{Unit, UnitEvent, UnitId};

/// A validated move waiting to be committed.
struct PlannedMove {
    unit: UnitId,
    start: usize,
    dest: usize,
    from: Point,
    to: Point,
    distance: u32,
    speed: i32,
}

impl Challenge {
    /// Marks `player` ready. The challenge starts once every player is.
    pub fn set_ready(&mut self, player: usize) -> Result<(), ActionError> {
        self.check_player(player)?;
        if self.is_finished() {
            return Err(ActionError::Finished);
        }
        if self.started {
            return Err(ActionError::AlreadyStarted);
        }

        self.scores[player].ready = true;
        debug!(player, "player ready");

        if self.scores.iter().all(|score| score.ready) {
            self.start();
        }
        Ok(())
    }

    /// Places inactive units on the grid.
    ///
    /// Before the start this is allowed until the player is ready; afterwards
    /// only in the move phase of the player's own turn. Activating does not
    /// end the phase.
    pub fn activate(
        &mut self,
        player: usize,
        placements: &[(UnitId, Point)],
    ) -> Result<(), ActionError> {
        self.check_player(player)?;
        if self.is_finished() {
            return Err(ActionError::Finished);
        }
        if self.started {
            self.ensure_turn(player, Phase::Move, "activate")?;
        } else if self.scores[player].ready {
            return Err(ActionError::AlreadyReady);
        }

        let mut seen = HashSet::with_capacity(placements.len());
        let mut claimed = HashSet::with_capacity(placements.len());
        let mut plan = Vec::with_capacity(placements.len());

        for &(id, position) in placements {
            if !seen.insert(id) {
                return Err(ActionError::DuplicateUnit(id));
            }
            if !self.inactive[player].iter().any(|unit| unit.id() == id) {
                return Err(match self.owner_of(id) {
                    Some(owner) if owner != player => ActionError::NotYourUnit(id),
                    Some(_) => ActionError::NotInactive(id),
                    None => ActionError::UnitNotFound(id),
                });
            }

            let index = self
                .grid
                .point_to_index(position)
                .ok_or(ActionError::OutOfBounds(position))?;
            if self
                .config
                .restrictions_for(player)
                .iter()
                .any(|area| area.contains(position))
            {
                return Err(ActionError::RestrictedArea(position));
            }
            if self.grid.is_occupied(index) {
                return Err(ActionError::Occupied(position));
            }
            if !claimed.insert(index) {
                return Err(ActionError::ActivationCollision(position));
            }

            plan.push((id, index, position));
        }

        for (id, index, position) in plan {
            let Some(slot) = self.inactive[player].iter().position(|unit| unit.id() == id) else {
                continue;
            };
            if !self.grid.place(index, player) {
                warn!(unit = %id, %position, "activation cell taken after validation");
                continue;
            }

            let mut unit = self.inactive[player].remove(slot);
            unit.set_position(Some(position));
            self.units[player].push(unit);
            self.log.push(
                self.rounds_left,
                LogAction::Activate { unit: id, position },
            );
            debug!(player, unit = %id, %position, "unit activated");
        }
        self.rebuild_id_map();

        Ok(())
    }

    /// Moves units of `player` and ends the move phase.
    ///
    /// Each unit may walk up to `speed * MOVE_ALLOWANCE_FACTOR` cells, while
    /// all moves together share the per-turn move limit. Moves are validated
    /// in order against a temporary overlay, so a unit may step into a cell
    /// vacated earlier in the same batch. Walking farther than the unit's
    /// speed costs extra hits at round resolution.
    pub fn move_units(
        &mut self,
        player: usize,
        moves: &[(UnitId, Point)],
    ) -> Result<(), ActionError> {
        self.ensure_turn(player, Phase::Move, "move")?;
        let plan = self.plan_moves(player, moves)?;

        for step in plan {
            if !self.grid.relocate(step.start, step.dest) {
                warn!(unit = %step.unit, "move target taken after validation");
                continue;
            }
            let Some(unit) = self.unit_mut(step.unit) else {
                warn!(unit = %step.unit, "moved unit missing from id map");
                continue;
            };
            unit.set_position(Some(step.to));
            if step.distance == 0 {
                continue;
            }
            unit.update(UnitEvent::Moved);

            let penalty = step.distance.div_ceil(step.speed.max(1) as u32) - 1;
            if penalty > 0 {
                *self.penalty_map.entry(step.unit).or_default() += penalty;
            }
            self.log.push(
                self.rounds_left,
                LogAction::Move {
                    unit: step.unit,
                    from: step.from,
                    to: step.to,
                    distance: step.distance,
                },
            );
            debug!(unit = %step.unit, from = %step.from, to = %step.to, distance = step.distance, penalty, "unit moved");
        }

        self.end_phase();
        Ok(())
    }

    fn plan_moves(
        &mut self,
        player: usize,
        moves: &[(UnitId, Point)],
    ) -> Result<Vec<PlannedMove>, ActionError> {
        let limit = self.config.move_limit;
        let units = &self.units;
        let id_map = &self.id_map;
        let mut grid = self.grid.scoped();

        let mut seen = HashSet::with_capacity(moves.len());
        let mut used = 0u32;
        let mut plan = Vec::with_capacity(moves.len());

        for &(id, to) in moves {
            if !seen.insert(id) {
                return Err(ActionError::DuplicateUnit(id));
            }
            let unit = owned_unit(units, id_map, player, id)?;
            let from = unit.position().ok_or(ActionError::OccupancyDesync(id))?;
            let start = grid
                .point_to_index(from)
                .ok_or(ActionError::OccupancyDesync(id))?;
            let dest = grid.point_to_index(to).ok_or(ActionError::OutOfBounds(to))?;

            let speed = unit.speed();
            if speed <= 0 && start != dest {
                return Err(ActionError::Immobile(id));
            }
            let allowance =
                (speed.max(0) as u32).saturating_mul(ChallengeConfig::MOVE_ALLOWANCE_FACTOR);

            let distance = grid
                .is_valid_move(start, dest, allowance, unit.special_moves())
                .ok_or(ActionError::InvalidMove {
                    unit: id,
                    destination: to,
                })?;
            used = used.saturating_add(distance);
            if used > limit {
                return Err(ActionError::MoveLimitExceeded { used, limit });
            }

            grid.temp_move(start, dest);
            plan.push(PlannedMove {
                unit: id,
                start,
                dest,
                from,
                to,
                distance,
                speed,
            });
        }

        Ok(plan)
    }

    /// Declares attack targets for units of `player` and ends the turn.
    ///
    /// No damage is dealt here; declarations are resolved together when the
    /// round ends.
    pub fn set_target(
        &mut self,
        player: usize,
        declarations: &[(UnitId, Vec<UnitId>)],
    ) -> Result<(), ActionError> {
        self.ensure_turn(player, Phase::Attack, "attack")?;

        let mut seen = HashSet::with_capacity(declarations.len());
        for (id, targets) in declarations {
            let id = *id;
            if !seen.insert(id) {
                return Err(ActionError::DuplicateUnit(id));
            }
            let attacker = owned_unit(&self.units, &self.id_map, player, id)?;

            let max = attacker.targets();
            if targets.len() > max as usize {
                return Err(ActionError::TooManyTargets {
                    unit: id,
                    count: targets.len(),
                    max,
                });
            }
            if targets.is_empty() {
                continue;
            }

            let mut distinct = HashSet::with_capacity(targets.len());
            let mut cells = Vec::with_capacity(targets.len());
            for &target in targets {
                if !distinct.insert(target) {
                    return Err(ActionError::DuplicateTarget { unit: id, target });
                }
                let defender = self.unit(target).ok_or(ActionError::UnitNotFound(target))?;
                if defender.player() == player {
                    return Err(ActionError::SelfTarget(id));
                }
                cells.push(self.cell_of(defender)?);
            }

            let start = self.cell_of(attacker)?;
            if !self.grid.is_valid_attack(
                start,
                &cells,
                attacker.range(),
                attacker.special_attacks(),
            ) {
                return Err(ActionError::InvalidAttack(id));
            }
        }

        for (id, targets) in declarations {
            if targets.is_empty() {
                continue;
            }
            for &target in targets {
                self.attack_map.entry(target).or_default().push(*id);
            }
            if let Some(attacker) = self.unit_mut(*id) {
                for _ in targets {
                    attacker.update(UnitEvent::Targeted);
                }
            }
            self.log.push(
                self.rounds_left,
                LogAction::Attack {
                    unit: *id,
                    targets: targets.clone(),
                },
            );
            debug!(unit = %id, ?targets, "targets declared");
        }

        self.end_phase();
        Ok(())
    }

    /// Ends the current phase without acting.
    pub fn pass(&mut self, player: usize) -> Result<(), ActionError> {
        let phase = self.phase;
        self.ensure_turn(player, phase, "pass")?;
        debug!(player, %phase, "phase passed");
        self.end_phase();
        Ok(())
    }

    /// Forfeits: every unit of `player` is removed and counted as defeated,
    /// the player is marked ready so nobody waits on them, and their turn
    /// ends if it was theirs. Leaving a finished challenge is a no-op.
    pub fn leave(&mut self, player: usize) -> Result<(), ActionError> {
        self.check_player(player)?;
        if self.is_finished() {
            return Ok(());
        }

        let ids: Vec<UnitId> = self.units[player].iter().map(Unit::id).collect();
        let removed = self.remove_units(&ids);
        let forfeited = std::mem::take(&mut self.inactive[player]);
        for id in &ids {
            self.penalty_map.remove(id);
        }

        let weight: i32 = removed
            .iter()
            .chain(forfeited.iter())
            .map(Unit::weight)
            .sum();
        let score = &mut self.scores[player];
        score.ready = true;
        score.defeated_weight += weight;

        debug!(player, units = removed.len() + forfeited.len(), "player left");

        if !self.started {
            if self.scores.iter().all(|score| score.ready) {
                self.start();
            }
        } else if self.turn == Some(player) {
            self.advance_turn();
        }
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Player holding `id`, active or inactive.
    fn owner_of(&self, id: UnitId) -> Option<usize> {
        if let Some(&(player, _)) = self.id_map.get(&id) {
            return Some(player);
        }
        self.inactive
            .iter()
            .position(|units| units.iter().any(|unit| unit.id() == id))
    }

    fn cell_of(&self, unit: &Unit) -> Result<usize, ActionError> {
        unit.position()
            .and_then(|position| self.grid.point_to_index(position))
            .ok_or(ActionError::OccupancyDesync(unit.id()))
    }
}

/// Active unit `id` if it belongs to `player`.
fn owned_unit<'a>(
    units: &'a [Vec<Unit>],
    id_map: &HashMap<UnitId, (usize, usize)>,
    player: usize,
    id: UnitId,
) -> Result<&'a Unit, ActionError> {
    let &(owner, index) = id_map.get(&id).ok_or(ActionError::UnitNotFound(id))?;
    if owner != player {
        return Err(ActionError::NotYourUnit(id));
    }
    units
        .get(owner)
        .and_then(|units| units.get(index))
        .ok_or(ActionError::OccupancyDesync(id))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{soldier, started};
    use super::*;
    use crate::grid::Area;
    use crate::unit::{BaseStats, UnitTemplate};

    fn duel() -> Challenge {
        started(
            vec![vec![soldier(1, 0, 0)], vec![soldier(2, 9, 9)]],
            ChallengeConfig::default(),
        )
    }

    #[test]
    fn ready_is_rejected_after_start() {
        let mut challenge = duel();
        assert_eq!(challenge.set_ready(0), Err(ActionError::AlreadyStarted));
    }

    #[test]
    fn activation_before_start_requires_not_ready() {
        let mut challenge = Challenge::new(
            vec![
                vec![UnitTemplate::new(UnitId(1), "reserve", BaseStats::default())],
                vec![soldier(2, 9, 9)],
            ],
            ChallengeConfig::default(),
        )
        .unwrap();

        challenge.activate(0, &[(UnitId(1), Point::new(1, 1))]).unwrap();
        assert_eq!(challenge.unit(UnitId(1)).unwrap().position(), Some(Point::new(1, 1)));
        assert_eq!(challenge.log().entries()[0].action.kind(), "activate");

        challenge.set_ready(1).unwrap();
        assert_eq!(
            challenge.activate(1, &[(UnitId(2), Point::new(0, 0))]),
            Err(ActionError::AlreadyReady)
        );
    }

    #[test]
    fn activation_checks_ownership_and_restrictions() {
        let config = ChallengeConfig::default()
            .with_restricted_areas(vec![vec![Area::new(5, 0, 5, 10)]]);
        let mut challenge = Challenge::new(
            vec![
                vec![UnitTemplate::new(UnitId(1), "reserve", BaseStats::default())],
                vec![
                    soldier(2, 9, 9),
                    UnitTemplate::new(UnitId(3), "reserve", BaseStats::default()),
                ],
            ],
            config,
        )
        .unwrap();

        assert_eq!(
            challenge.activate(0, &[(UnitId(1), Point::new(6, 0))]),
            Err(ActionError::RestrictedArea(Point::new(6, 0)))
        );
        assert_eq!(
            challenge.activate(0, &[(UnitId(3), Point::new(0, 0))]),
            Err(ActionError::NotYourUnit(UnitId(3)))
        );
        assert_eq!(
            challenge.activate(1, &[(UnitId(2), Point::new(0, 0))]),
            Err(ActionError::NotInactive(UnitId(2)))
        );
        assert_eq!(
            challenge.activate(0, &[(UnitId(1), Point::new(9, 9))]),
            Err(ActionError::Occupied(Point::new(9, 9)))
        );
        assert_eq!(
            challenge.activate(0, &[(UnitId(9), Point::new(0, 0))]),
            Err(ActionError::UnitNotFound(UnitId(9)))
        );
        // Restrictions only bind their own player.
        challenge.activate(1, &[(UnitId(3), Point::new(6, 0))]).unwrap();
    }

    #[test]
    fn move_ends_phase_and_logs() {
        let mut challenge = duel();
        challenge.move_units(0, &[(UnitId(1), Point::new(2, 1))]).unwrap();

        assert_eq!(challenge.phase(), Phase::Attack);
        assert_eq!(challenge.unit(UnitId(1)).unwrap().position(), Some(Point::new(2, 1)));
        assert_eq!(challenge.grid().committed_player_at(0), None);
        assert_eq!(challenge.grid().committed_player_at(12), Some(0));
        assert!(challenge.penalty_map.is_empty());
        let LogAction::Move { distance, .. } = &challenge.log().entries()[0].action else {
            panic!("expected a move entry");
        };
        assert_eq!(*distance, 3);
    }

    #[test]
    fn overspeed_moves_accrue_penalties() {
        let mut challenge = duel();
        challenge.move_units(0, &[(UnitId(1), Point::new(7, 0))]).unwrap();
        // ceil(7 / 3) - 1
        assert_eq!(challenge.penalty_map.get(&UnitId(1)), Some(&2));
    }

    #[test]
    fn chained_moves_use_vacated_cells() {
        let mut challenge = started(
            vec![
                vec![soldier(1, 0, 0), soldier(2, 1, 0)],
                vec![soldier(3, 9, 9)],
            ],
            ChallengeConfig::default(),
        );
        challenge
            .move_units(
                0,
                &[(UnitId(2), Point::new(2, 0)), (UnitId(1), Point::new(1, 0))],
            )
            .unwrap();
        assert_eq!(challenge.unit(UnitId(1)).unwrap().position(), Some(Point::new(1, 0)));
        assert_eq!(challenge.unit(UnitId(2)).unwrap().position(), Some(Point::new(2, 0)));
        assert!(!challenge.grid().has_temp_moves());
    }

    #[test]
    fn invalid_move_leaves_state_untouched() {
        let mut challenge = duel();
        let before = challenge.state();
        assert_eq!(
            challenge.move_units(0, &[(UnitId(2), Point::new(8, 8))]),
            Err(ActionError::NotYourUnit(UnitId(2)))
        );
        assert_eq!(
            challenge.move_units(0, &[(UnitId(1), Point::new(9, 9))]),
            Err(ActionError::InvalidMove {
                unit: UnitId(1),
                destination: Point::new(9, 9)
            })
        );
        assert_eq!(challenge.state(), before);
        assert!(!challenge.grid().has_temp_moves());
    }

    #[test]
    fn targeting_validates_declarations() {
        let mut challenge = started(
            vec![
                vec![soldier(1, 0, 0), soldier(2, 0, 1)],
                vec![soldier(3, 3, 0), soldier(4, 9, 9)],
            ],
            ChallengeConfig::default(),
        );
        challenge.pass(0).unwrap();

        assert_eq!(
            challenge.set_target(0, &[(UnitId(1), vec![UnitId(2)])]),
            Err(ActionError::SelfTarget(UnitId(1)))
        );
        assert_eq!(
            challenge.set_target(0, &[(UnitId(1), vec![UnitId(3), UnitId(4)])]),
            Err(ActionError::TooManyTargets {
                unit: UnitId(1),
                count: 2,
                max: 1
            })
        );
        assert_eq!(
            challenge.set_target(0, &[(UnitId(1), vec![UnitId(4)])]),
            Err(ActionError::InvalidAttack(UnitId(1)))
        );
        assert_eq!(challenge.phase(), Phase::Attack);

        challenge
            .set_target(0, &[(UnitId(1), vec![UnitId(3)]), (UnitId(2), vec![UnitId(3)])])
            .unwrap();
        assert_eq!(challenge.attack_map.get(&UnitId(3)), Some(&vec![UnitId(1), UnitId(2)]));
        assert_eq!(challenge.turn(), Some(1));
    }

    #[test]
    fn leaving_forfeits_units_and_turn() {
        let mut challenge = started(
            vec![
                vec![soldier(1, 0, 0)],
                vec![soldier(2, 9, 9)],
                vec![soldier(3, 5, 5)],
            ],
            ChallengeConfig::default(),
        );
        challenge.leave(0).unwrap();

        assert_eq!(challenge.turn(), Some(1));
        assert!(challenge.units(0).is_empty());
        assert!(challenge.unit(UnitId(1)).is_none());
        assert_eq!(challenge.grid().committed_player_at(0), None);
        assert_eq!(challenge.scores()[0].defeated_weight, 1);
        assert!(challenge.log().is_empty());
    }

    #[test]
    fn leaving_before_start_can_start_the_challenge() {
        let mut challenge = Challenge::new(
            vec![vec![soldier(1, 0, 0)], vec![soldier(2, 9, 9)]],
            ChallengeConfig::default(),
        )
        .unwrap();
        challenge.set_ready(1).unwrap();
        challenge.leave(0).unwrap();

        assert!(challenge.is_started());
        assert_eq!(challenge.turn(), Some(1));
    }
}
