//! Unit state and the ability-driven stat model.
//!
//! - [`Unit`]: identity, ownership, stored stats and ability state
//! - [`UnitBehavior`]: ability table deriving every visible stat
//! - [`UnitTemplate`]: caller-supplied blueprint a unit is built from

mod behavior;
mod stats;

use std::fmt;
use std::sync::Arc;

pub use behavior::{DefaultBehavior, UnitBehavior, UnitEvent};
pub use stats::{BaseStats, StatBlock};

use crate::grid::Point;

/// Caller-assigned unit identifier, opaque to the engine beyond identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display-only information carried through to snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitInfo {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl UnitInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Blueprint for one unit of a player's squad.
#[derive(Clone, Debug)]
pub struct UnitTemplate {
    pub id: UnitId,
    pub info: UnitInfo,
    /// Contribution to the owner's "alive" status and to opponents' score.
    /// Zero for obstacles.
    pub weight: i32,
    pub stats: BaseStats,
    pub behavior: Arc<dyn UnitBehavior>,
    /// Units with a starting position are placed at construction; the rest
    /// wait in the inactive pool until activated.
    pub position: Option<Point>,
}

impl UnitTemplate {
    pub fn new(id: UnitId, name: impl Into<String>, stats: BaseStats) -> Self {
        Self {
            id,
            info: UnitInfo::named(name),
            weight: 1,
            stats,
            behavior: Arc::new(DefaultBehavior),
            position: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: Arc<dyn UnitBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_info(mut self, info: UnitInfo) -> Self {
        self.info = info;
        self
    }

    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

/// A unit owned by a challenge.
///
/// Derived stats are never read from fields directly: every getter routes
/// through the attached [`UnitBehavior`].
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    player: usize,
    weight: i32,
    position: Option<Point>,
    info: UnitInfo,
    stats: BaseStats,
    state: i32,
    behavior: Arc<dyn UnitBehavior>,
}

impl Unit {
    pub fn from_template(template: UnitTemplate, player: usize) -> Self {
        Self {
            id: template.id,
            player,
            weight: template.weight,
            position: template.position,
            info: template.info,
            stats: template.stats,
            state: 0,
            behavior: template.behavior,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Current cell, `None` while the unit is inactive.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<Point>) {
        self.position = position;
    }

    pub fn info(&self) -> &UnitInfo {
        &self.info
    }

    /// Stored stats, for use by behaviours.
    pub fn base(&self) -> &BaseStats {
        &self.stats
    }

    /// Mutable stored stats, for callers adjusting a unit outside combat.
    pub fn base_mut(&mut self) -> &mut BaseStats {
        &mut self.stats
    }

    /// Ability state counter.
    pub fn state(&self) -> i32 {
        self.state
    }

    // ========================================================================
    // Derived stats
    // ========================================================================

    pub fn health(&self) -> i32 {
        self.stats.health
    }

    pub fn shield(&self) -> i32 {
        self.stats.shield
    }

    pub fn max_health(&self) -> i32 {
        self.behavior.max_health(self)
    }

    pub fn damage(&self) -> i32 {
        self.behavior.damage(self)
    }

    pub fn range(&self) -> f64 {
        self.behavior.range(self)
    }

    pub fn targets(&self) -> u32 {
        self.behavior.targets(self)
    }

    pub fn speed(&self) -> i32 {
        self.behavior.speed(self)
    }

    pub fn special_moves(&self) -> bool {
        self.behavior.special_moves(self)
    }

    pub fn special_attacks(&self) -> bool {
        self.behavior.special_attacks(self)
    }

    pub fn damage_to_unit(&self, opponent: &Unit) -> i32 {
        self.behavior.damage_to_unit(self, opponent)
    }

    /// Base description followed by the ability text, if any.
    pub fn description(&self) -> String {
        let ability = self.behavior.description(self);
        match (self.info.description.is_empty(), ability.is_empty()) {
            (_, true) => self.info.description.clone(),
            (true, false) => ability,
            (false, false) => format!("{} {}", self.info.description, ability),
        }
    }

    /// Recomputes every derived stat against the current state.
    pub fn stats(&self) -> StatBlock {
        StatBlock {
            health: self.health(),
            max_health: self.max_health(),
            shield: self.shield(),
            damage: self.damage(),
            range: self.range(),
            targets: self.targets(),
            speed: self.speed(),
            special_moves: self.special_moves(),
            special_attacks: self.special_attacks(),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Feeds `event` to the behaviour, then recomputes health and shield.
    /// Defeated units ignore events.
    pub fn update(&mut self, event: UnitEvent) {
        if self.is_defeated() {
            return;
        }

        let behavior = Arc::clone(&self.behavior);
        self.state = behavior.on_event(self, event);
        self.stats.health = behavior.health(self);
        self.stats.shield = behavior.shield(self);
    }

    /// Applies `attacks` simultaneous hits of `damage` each.
    ///
    /// The shield soaks whole hits first; a hit that breaks the shield does
    /// not spill into health. Remaining hits reduce health.
    pub fn take_damage(&mut self, damage: i32, attacks: u32) {
        if damage <= 0 || attacks == 0 {
            return;
        }

        let damage = i64::from(damage);
        let mut attacks = i64::from(attacks);
        let mut shield = i64::from(self.stats.shield.max(0));

        if shield > 0 {
            let total = damage * attacks;
            if total <= shield {
                shield -= total;
                attacks = 0;
            } else {
                attacks -= ceil_div(shield, damage);
                shield = 0;
            }
        }

        let health = i64::from(self.stats.health) - damage * attacks.max(0);
        self.stats.shield = clamp_i32(shield);
        self.stats.health = clamp_i32(health);
    }

    /// Hits of `damage` needed to defeat this unit: shield hits plus health
    /// hits. Used only to order resolution.
    pub fn hits_to_defeat(&self, damage: i32) -> u32 {
        if damage <= 0 {
            return u32::MAX;
        }

        let damage = i64::from(damage);
        let hits = ceil_div(i64::from(self.stats.health.max(0)), damage)
            + ceil_div(i64::from(self.stats.shield.max(0)), damage);
        u32::try_from(hits).unwrap_or(u32::MAX)
    }

    pub fn is_defeated(&self) -> bool {
        self.stats.health <= 0
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
