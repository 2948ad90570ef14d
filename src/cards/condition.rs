//! Card conditions.
//!
//! A condition is a boolean test over a card's current public state, used by
//! `Card::meets_condition`. Games with their own rules engine implement
//! `Condition` directly (any `Fn(&Card) -> bool` already does); the
//! `CardCondition` enum covers the common tests and can be loaded from JSON.

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::card_type::CardTypeId;
use super::status::CardStatus;
use crate::core::{ChargeType, HealthType, PlayerId};

/// A predicate over a card's state.
pub trait Condition {
    fn evaluate(&self, card: &Card) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&Card) -> bool,
{
    fn evaluate(&self, card: &Card) -> bool {
        self(card)
    }
}

/// Declarative card condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardCondition {
    // === Identity ===

    /// Card is of the given template.
    IsType(CardTypeId),

    /// Card belongs to the given player.
    OwnedBy(PlayerId),

    /// Card has no owner yet.
    Unowned,

    // === State ===

    /// Card is alive.
    Alive,

    /// Card is still being built.
    UnderConstruction,

    /// Card could block right now.
    CanBlock,

    /// Card is frozen by chill.
    Frozen,

    /// Card has all the given status bits (raw `CardStatus` bits).
    HasStatus(u8),

    // === Value Filters ===

    /// Remaining health is at least N.
    HealthAtLeast(HealthType),

    /// Remaining health is at most N.
    HealthAtMost(HealthType),

    /// Charges are at least N.
    ChargesAtLeast(ChargeType),

    // === Combinators ===

    /// All conditions must be true.
    All(Vec<CardCondition>),

    /// At least one condition must be true.
    Any(Vec<CardCondition>),

    /// Condition must be false.
    Not(Box<CardCondition>),

    /// Always matches.
    Always,

    /// Never matches.
    Never,
}

impl CardCondition {
    /// Create a status condition.
    pub fn has_status(status: CardStatus) -> Self {
        Self::HasStatus(status.bits())
    }

    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = CardCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = CardCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    pub fn and(self, other: CardCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Add another condition with OR.
    pub fn or(self, other: CardCondition) -> Self {
        match self {
            Self::Any(mut conditions) => {
                conditions.push(other);
                Self::Any(conditions)
            }
            _ => Self::Any(vec![self, other]),
        }
    }
}

impl Condition for CardCondition {
    fn evaluate(&self, card: &Card) -> bool {
        match self {
            Self::IsType(id) => card.type_id() == *id,
            Self::OwnedBy(player) => card.player() == Some(*player),
            Self::Unowned => card.player().is_none(),

            Self::Alive => card.is_alive(),
            Self::UnderConstruction => card.is_under_construction(),
            Self::CanBlock => card.can_block(),
            Self::Frozen => card.is_frozen(),
            Self::HasStatus(bits) => {
                let wanted = CardStatus::from_bits_truncate(*bits);
                card.status().contains(wanted)
            }

            Self::HealthAtLeast(min) => card.remaining_health() >= *min,
            Self::HealthAtMost(max) => card.remaining_health() <= *max,
            Self::ChargesAtLeast(min) => card.current_charges() >= *min,

            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(card)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(card)),
            Self::Not(condition) => !condition.evaluate(card),

            Self::Always => true,
            Self::Never => false,
        }
    }
}
