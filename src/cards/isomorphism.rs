//! Isomorphism predicate for duplicate pruning.

use super::card::Card;
use super::condition::Condition;

/// Matches cards isomorphic to a fixed reference card.
///
/// Search uses it to skip moves by a card when an interchangeable card has
/// already been tried.
#[derive(Clone, Copy, Debug)]
pub struct IsomorphicCardComparator<'a> {
    card: &'a Card,
}

impl<'a> IsomorphicCardComparator<'a> {
    #[must_use]
    pub fn new(card: &'a Card) -> Self {
        Self { card }
    }

    /// True if `other` differs from the reference card at most in its id.
    #[must_use]
    pub fn matches(&self, other: &Card) -> bool {
        self.card.is_isomorphic(other)
    }

    /// The comparator as a plain closure, for iterator adapters.
    pub fn as_predicate(self) -> impl Fn(&Card) -> bool + 'a {
        move |other| self.matches(other)
    }
}

impl Condition for IsomorphicCardComparator<'_> {
    fn evaluate(&self, card: &Card) -> bool {
        self.matches(card)
    }
}
