//! Lifecycle and combat enums for card instances.
//!
//! These are closed sum types: a card's life state, why it died, where a hit
//! came from, and how the card entered the game. `CardStatus` is the one
//! bitmask, for situational flags that combine freely.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Primary lifecycle state.
///
/// `Alive -> KilledThisTurn -> Dead`. `KilledThisTurn` is still visible to
/// same-turn effects and undoable; a turn boundary settles it to `Dead`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AliveStatus {
    #[default]
    Alive,
    Dead,
    KilledThisTurn,
}

/// Why a card died. `None` exactly when the card is alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CauseOfDeath {
    #[default]
    None,
    /// Sacrificed itself as part of its own ability.
    SelfSac,
    /// Paid its own ability's health cost down to nothing.
    SelfAbilityHealthCost,
    /// Destroyed by an enemy ability.
    Sniped,
    /// Sacrificed to pay for a purchase.
    BuySacCost,
    /// Sacrificed to pay for another card's ability.
    AbilitySacCost,
    /// Died absorbing damage.
    Blocker,
    /// Destroyed by breach damage.
    Breached,
    /// Ran out of lifespan.
    Lifespan,
    /// Its creation was taken back.
    UndoCreate,
    Unknown,
    /// Removed by the orchestrator.
    Deleted,
}

impl CauseOfDeath {
    /// Causes the card brings upon itself through its own ability.
    #[must_use]
    pub const fn is_self_inflicted(self) -> bool {
        matches!(self, CauseOfDeath::SelfSac | CauseOfDeath::SelfAbilityHealthCost)
    }
}

/// Where incoming damage comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Absorbed while blocking.
    Block,
    /// Dealt directly, past the blockers.
    Breach,
}

impl DamageSource {
    /// The cause recorded when damage from this source is lethal.
    #[must_use]
    pub const fn lethal_cause(self) -> CauseOfDeath {
        match self {
            DamageSource::Block => CauseOfDeath::Blocker,
            DamageSource::Breach => CauseOfDeath::Breached,
        }
    }
}

/// How a card instance entered the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCreationMethod {
    /// Purchased by its owner; build time and lifespan come from the template.
    Bought,
    /// Created by another card's purchase script.
    BuyScript,
    /// Created by an ability or begin-turn script.
    AbilityScript,
    /// Placed directly by the orchestrator (setup, puzzles, tests).
    Manual,
}

bitflags! {
    /// Situational flags, independent of life state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CardStatus: u8 {
        /// Committed this turn: assigned to block, or committed during buy
        /// resolution. Cleared when the owner's turn begins.
        const ASSIGNED = 0b0000_0001;
        /// Suppressed by an external effect: cannot block or use abilities.
        const INERT = 0b0000_0010;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(AliveStatus::default(), AliveStatus::Alive);
        assert_eq!(CauseOfDeath::default(), CauseOfDeath::None);
        assert!(CardStatus::default().is_empty());
    }

    #[test]
    fn test_lethal_cause() {
        assert_eq!(DamageSource::Block.lethal_cause(), CauseOfDeath::Blocker);
        assert_eq!(DamageSource::Breach.lethal_cause(), CauseOfDeath::Breached);
    }

    #[test]
    fn test_self_inflicted() {
        assert!(CauseOfDeath::SelfSac.is_self_inflicted());
        assert!(CauseOfDeath::SelfAbilityHealthCost.is_self_inflicted());
        assert!(!CauseOfDeath::Sniped.is_self_inflicted());
        assert!(!CauseOfDeath::None.is_self_inflicted());
    }

    #[test]
    fn test_status_bits() {
        let both = CardStatus::ASSIGNED | CardStatus::INERT;
        assert_eq!(both.bits(), 0b11);
        assert_eq!(CardStatus::from_bits(0b10), Some(CardStatus::INERT));
        assert_eq!(CardStatus::from_bits(0b100), None);
    }

    #[test]
    fn test_symbolic_serialization() {
        let json = serde_json::to_string(&CauseOfDeath::Breached).unwrap();
        assert_eq!(json, "\"Breached\"");
        let status: AliveStatus = serde_json::from_str("\"KilledThisTurn\"").unwrap();
        assert_eq!(status, AliveStatus::KilledThisTurn);
    }
}
