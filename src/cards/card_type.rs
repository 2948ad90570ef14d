//! Card templates - static per-type data.
//!
//! `CardType` holds the immutable properties of a kind of unit: its health,
//! charge economy, build time, lifespan, ability cost, and combat flags.
//! Every `Card` instance shares its template through an `Arc`; the state
//! machine reads from it and never writes to it.
//!
//! Instance-specific data (damage, chill, charges left) lives in `Card`.

use serde::{Deserialize, Serialize};

use crate::core::{ChargeType, HealthType, TurnType};

/// Identifier of a card template within a registry.
///
/// Assigned by `CardTypeRegistry` in registration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardTypeId(pub u32);

impl CardTypeId {
    /// Create a new card type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardType({})", self.0)
    }
}

/// What a unit pays to use its ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityCost {
    /// Charges spent per use.
    pub charges: ChargeType,
    /// Health permanently given up per use.
    pub health: HealthType,
    /// The unit sacrifices itself.
    pub sac_self: bool,
}

impl AbilityCost {
    /// An ability with no cost beyond the once-per-turn use.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            charges: 0,
            health: 0,
            sac_self: false,
        }
    }

    /// Spend charges per use.
    #[must_use]
    pub const fn with_charges(mut self, charges: ChargeType) -> Self {
        self.charges = charges;
        self
    }

    /// Pay health per use.
    #[must_use]
    pub const fn with_health(mut self, health: HealthType) -> Self {
        self.health = health;
        self
    }

    /// Sacrifice the unit on use.
    #[must_use]
    pub const fn sacrificing(mut self) -> Self {
        self.sac_self = true;
        self
    }
}

/// Static card template.
///
/// ## Example
///
/// ```
/// use rust_ccg_units::cards::{AbilityCost, CardType};
///
/// let drone = CardType::new("Drone")
///     .with_health(1)
///     .with_build_time(1)
///     .with_ability(AbilityCost::free())
///     .blocker();
///
/// assert!(drone.can_block);
/// assert!(drone.has_ability());
/// ```
///
/// Templates order and compare field by field, registry id first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CardType {
    /// Registry identity; catalogs omit it and the registry assigns it.
    #[serde(skip)]
    pub id: CardTypeId,

    /// Unique template name, used to encode cards as JSON.
    pub name: String,

    /// Starting (and maximum) health.
    pub health: HealthType,

    /// Charges on entering play.
    pub starting_charges: ChargeType,

    /// Charge cap.
    pub max_charges: ChargeType,

    /// Charges regained at the start of each owner turn once built.
    pub charges_per_turn: ChargeType,

    /// Turns spent under construction after purchase.
    pub build_time: TurnType,

    /// Turns before the unit expires on its own (0 = never).
    pub lifespan: TurnType,

    /// Ability cost, if the unit has an ability.
    pub ability: Option<AbilityCost>,

    /// Can absorb damage for its side.
    pub can_block: bool,

    /// Can be destroyed by breach damage.
    pub breachable: bool,

    /// Damage is permanent instead of healing at end of turn.
    pub fragile: bool,

    /// Runs a script when its owner's turn begins.
    pub begin_turn_script: bool,

    /// Runs a script when purchased.
    pub buy_script: bool,
}

impl Default for CardType {
    fn default() -> Self {
        Self {
            id: CardTypeId::default(),
            name: String::new(),
            health: 1,
            starting_charges: 0,
            max_charges: 0,
            charges_per_turn: 0,
            build_time: 0,
            lifespan: 0,
            ability: None,
            can_block: false,
            breachable: true,
            fragile: false,
            begin_turn_script: false,
            buy_script: false,
        }
    }
}

impl CardType {
    /// Create a template with default stats.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set health.
    #[must_use]
    pub fn with_health(mut self, health: HealthType) -> Self {
        self.health = health;
        self
    }

    /// Set starting charges, cap, and per-turn regeneration.
    #[must_use]
    pub fn with_charges(mut self, starting: ChargeType, max: ChargeType, per_turn: ChargeType) -> Self {
        self.starting_charges = starting.min(max);
        self.max_charges = max;
        self.charges_per_turn = per_turn;
        self
    }

    /// Set build time.
    #[must_use]
    pub fn with_build_time(mut self, turns: TurnType) -> Self {
        self.build_time = turns;
        self
    }

    /// Set lifespan.
    #[must_use]
    pub fn with_lifespan(mut self, turns: TurnType) -> Self {
        self.lifespan = turns;
        self
    }

    /// Give the template an ability.
    #[must_use]
    pub fn with_ability(mut self, cost: AbilityCost) -> Self {
        self.ability = Some(cost);
        self
    }

    /// Mark as a blocker.
    #[must_use]
    pub fn blocker(mut self) -> Self {
        self.can_block = true;
        self
    }

    /// Mark as fragile.
    #[must_use]
    pub fn fragile(mut self) -> Self {
        self.fragile = true;
        self
    }

    /// Mark as immune to breach damage.
    #[must_use]
    pub fn unbreachable(mut self) -> Self {
        self.breachable = false;
        self
    }

    /// Run a script at the start of each owner turn.
    #[must_use]
    pub fn with_begin_turn_script(mut self) -> Self {
        self.begin_turn_script = true;
        self
    }

    /// Run a script on purchase.
    #[must_use]
    pub fn with_buy_script(mut self) -> Self {
        self.buy_script = true;
        self
    }

    /// Check whether the template has an ability.
    #[must_use]
    pub fn has_ability(&self) -> bool {
        self.ability.is_some()
    }

    /// Ability cost, or a free cost for templates without an ability.
    #[must_use]
    pub fn ability_cost(&self) -> AbilityCost {
        self.ability.unwrap_or_default()
    }
}
