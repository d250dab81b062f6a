/// Stored stats of a unit.
///
/// `health` and `shield` are authoritative: other units' attacks mutate them
/// directly. Every other field is an input to the unit's behaviour, which
/// derives the externally visible value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub damage: i32,
    /// Attack range in cells, measured centre to centre.
    pub range: f64,
    /// Maximum number of targets declared per attack.
    pub targets: u32,
    /// Nominal cells per turn.
    pub speed: i32,
    /// Movement ignores blockers and costs the Manhattan distance.
    pub special_moves: bool,
    /// Attacks ignore tanking.
    pub special_attacks: bool,
}

impl BaseStats {
    pub const DEFAULT_HEALTH: i32 = 1000;
    pub const DEFAULT_DAMAGE: i32 = 100;
    pub const DEFAULT_SPEED: i32 = 3;

    /// Stats with full health and the given offensive profile.
    pub fn new(health: i32, damage: i32, range: f64, speed: i32) -> Self {
        Self {
            health,
            max_health: health,
            damage,
            range,
            speed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shield(mut self, shield: i32) -> Self {
        self.shield = shield;
        self
    }

    #[must_use]
    pub fn with_targets(mut self, targets: u32) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_special_moves(mut self) -> Self {
        self.special_moves = true;
        self
    }

    #[must_use]
    pub fn with_special_attacks(mut self) -> Self {
        self.special_attacks = true;
        self
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            health: Self::DEFAULT_HEALTH,
            max_health: Self::DEFAULT_HEALTH,
            shield: 0,
            damage: Self::DEFAULT_DAMAGE,
            range: 1.0,
            targets: 1,
            speed: Self::DEFAULT_SPEED,
            special_moves: false,
            special_attacks: false,
        }
    }
}

/// Fully derived stat block, as seen by players.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub health: i32,
    pub max_health: i32,
    pub shield: i32,
    pub damage: i32,
    pub range: f64,
    pub targets: u32,
    pub speed: i32,
    pub special_moves: bool,
    pub special_attacks: bool,
}
