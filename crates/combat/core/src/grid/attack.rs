//! Attack legality: range and "tanking".
//!
//! Tanking is an angular approximation, not exact line of sight. An enemy
//! unit that is at least [`TANK_MARGIN`] closer to the attacker than a target
//! blocks that target whenever the target's bearing falls strictly inside the
//! angular span of the blocker's four tile corners.

use std::f64::consts::{PI, TAU};

use super::Grid;

/// How much closer than a target a unit must stand to tank for it.
pub const TANK_MARGIN: f64 = 0.5;

impl Grid {
    /// Validates a batch of targets for the unit at `start`.
    ///
    /// Targets held by the attacker's own player or outside the grid are
    /// discarded. Any remaining target beyond `range` rejects the whole batch.
    /// With `special` attacks tanking is ignored; otherwise a single tanked
    /// target also rejects the batch.
    pub fn is_valid_attack(&self, start: usize, targets: &[usize], range: f64, special: bool) -> bool {
        let attacker = self.player_at(start);

        let candidates: Vec<usize> = targets
            .iter()
            .copied()
            .filter(|&target| self.is_valid_index(target))
            .filter(|&target| attacker.is_none() || self.player_at(target) != attacker)
            .collect();

        if candidates
            .iter()
            .any(|&target| self.attack_distance(start, target) > range)
        {
            return false;
        }

        if special {
            return true;
        }

        !candidates
            .iter()
            .any(|&target| self.is_tanked(start, target, targets, attacker))
    }

    /// Whether some enemy unit between `start` and `target` blocks the attack.
    fn is_tanked(
        &self,
        start: usize,
        target: usize,
        targets: &[usize],
        attacker: Option<usize>,
    ) -> bool {
        let target_distance = self.attack_distance(start, target);
        let bearing = self.angle(start, self.index_to_point(target).center());

        (0..self.len())
            .filter(|&cell| cell != start && cell != target && !targets.contains(&cell))
            .filter(|&cell| match self.player_at(cell) {
                Some(owner) => Some(owner) != attacker,
                None => false,
            })
            .filter(|&cell| {
                close_enough_to_tank(self.attack_distance(start, cell), target_distance)
            })
            .any(|cell| {
                let corners = self
                    .index_to_point(cell)
                    .corners()
                    .map(|corner| self.angle(start, corner));
                spans(corners, bearing)
            })
    }
}

/// A unit at `blocker` distance can only tank for a target at least
/// [`TANK_MARGIN`] farther away.
fn close_enough_to_tank(blocker: f64, target: f64) -> bool {
    blocker + TANK_MARGIN <= target
}

/// Whether `bearing` lies strictly inside the angular span of `angles`,
/// unwrapping spans that straddle the 0/2π seam.
fn spans(mut angles: [f64; 4], mut bearing: f64) -> bool {
    let (min, max) = bounds(&angles);
    if max - min > PI {
        for angle in &mut angles {
            if *angle < PI {
                *angle += TAU;
            }
        }
        if bearing < PI {
            bearing += TAU;
        }
    }

    let (min, max) = bounds(&angles);
    min < bearing && bearing < max
}

fn bounds(angles: &[f64; 4]) -> (f64, f64) {
    angles
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &angle| {
            (min.min(angle), max.max(angle))
        })
}
