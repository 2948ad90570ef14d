//! Card identifiers and the small value domains used by every card field.
//!
//! ## ID Layout
//!
//! A `CardId` is the index of a card in the board's arena. Cards are never
//! removed while referenced, so an id stays valid for the whole game; a dead
//! card keeps its slot.
//!
//! A freshly constructed card carries `CardId::UNSET` until the orchestrator
//! assigns it a slot.
//!
//! ```
//! use rust_ccg_units::core::CardId;
//!
//! let id = CardId::new(3);
//! assert!(id.is_set());
//! assert_eq!(id.index(), 3);
//!
//! assert!(!CardId::UNSET.is_set());
//! ```

use serde::{Deserialize, Serialize};

/// Health points, chill, and damage counters.
pub type HealthType = u16;

/// Turn counters: construction delay and lifespan.
pub type TurnType = u16;

/// Ability charges.
pub type ChargeType = u8;

/// Identity of a card instance within one game.
///
/// Cards reference each other (targets, kills, creations) only through
/// `CardId`, never through owning pointers, so copying a board copies plain
/// integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Sentinel for a card that has not been placed in an arena yet.
    pub const UNSET: CardId = CardId(u32::MAX);

    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena index for this ID.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Build an ID from an arena index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Check whether the orchestrator has assigned this ID.
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::UNSET
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_set() {
            write!(f, "Card#{}", self.0)
        } else {
            write!(f, "Card#unset")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        assert_eq!(CardId::default(), CardId::UNSET);
        assert!(!CardId::default().is_set());
    }

    #[test]
    fn test_index_round_trip() {
        let id = CardId::from_index(17);
        assert_eq!(id.index(), 17);
        assert_eq!(id.raw(), 17);
        assert!(id.is_set());
    }

    #[test]
    fn test_ordering() {
        assert!(CardId::new(1) < CardId::new(2));
        assert!(CardId::new(2) < CardId::UNSET);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CardId(42)), "Card#42");
        assert_eq!(format!("{}", CardId::UNSET), "Card#unset");
    }

    #[test]
    fn test_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123");
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
