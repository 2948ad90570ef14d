//! Board: the arena of cards and the undo log that drives them.
//!
//! The card state machine only changes one card at a time. `Board` owns
//! every card of a game (a card's id is its index) and runs the actions that
//! touch several cards at once: an ability or purchase whose script kills or
//! creates other cards. Each action is pushed on a LIFO history and can be
//! undone exactly, which is how search explores the game:
//!
//! ```text
//! mutate ─► evaluate ─► undo_to(mark) ─► next branch
//! ```
//!
//! Turn boundaries are not undoable; they clear the history. Branch across
//! them by cloning the board (the history is an `im::Vector`, so the clone
//! copies the card arena and shares the log).
//!
//! ## Undo ordering
//!
//! Script-created cards are appended to the arena and removed from its tail
//! on undo. LIFO history guarantees that the tail belongs to the action
//! being undone.

pub mod script;

use std::sync::Arc;

use im::Vector;

use crate::cards::{Card, CardCreationMethod, CardType, DamageSource, IsomorphicCardComparator};
use crate::core::{BoardConfig, CardId, GameRng, HealthType, PlayerId};

pub use script::{AbilityScriptRuntime, NoScripts, ScriptContext, ScriptTable};

/// An undoable board action.
///
/// Script actions record how long the source card's causal lists were
/// before the script ran; undo rewinds them back to that length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardAction {
    UseAbility {
        card: CardId,
        killed_before: usize,
        created_before: usize,
    },
    Buy {
        card: CardId,
    },
    Breach {
        target: CardId,
        damage: HealthType,
        /// Breach state of the target before this breach.
        was_breached: bool,
        breach_damage: HealthType,
    },
    Chill {
        target: CardId,
        applied: HealthType,
    },
    ToggleAssigned {
        card: CardId,
    },
}

/// Card arena with an undo history.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    cards: Vec<Card>,
    history: Vector<BoardAction>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    #[must_use]
    pub fn new(config: BoardConfig) -> Self {
        Self {
            cards: Vec::with_capacity(config.initial_capacity),
            config,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    // === Arena ===

    /// Place a card, assigning its id. Not recorded in the history.
    pub fn add_card(&mut self, mut card: Card) -> CardId {
        let id = CardId::from_index(self.cards.len());
        card.set_id(id);
        card.set_in_play(true);
        self.cards.push(card);
        id
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards owned by `player`, dead ones included.
    pub fn cards_of(&self, player: PlayerId) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.player() == Some(player))
    }

    fn owned_indices(&self, player: PlayerId) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.player() == Some(player))
            .map(|(i, _)| i)
            .collect()
    }

    // === Actions ===

    /// Buy a card for `player` and run its buy script.
    pub fn buy<R>(&mut self, card_type: Arc<CardType>, player: PlayerId, runtime: &mut R) -> CardId
    where
        R: AbilityScriptRuntime + ?Sized,
    {
        debug_assert!(self.config.has_player(player), "{} not on this board", player);

        let has_script = card_type.buy_script;
        let id = self.add_card(Card::new(card_type, player, CardCreationMethod::Bought, 0, 0));
        if has_script {
            let mut ctx = ScriptContext::new(id, &mut self.cards, CardCreationMethod::BuyScript);
            runtime.run_buy_script(&mut ctx);
        }

        log::debug!("{} bought {}", player, id);
        self.history.push_back(BoardAction::Buy { card: id });
        id
    }

    /// Use a card's ability and run its script.
    pub fn use_ability<R>(&mut self, id: CardId, runtime: &mut R)
    where
        R: AbilityScriptRuntime + ?Sized,
    {
        let card = &mut self.cards[id.index()];
        let action = BoardAction::UseAbility {
            card: id,
            killed_before: card.killed_card_ids().len(),
            created_before: card.created_card_ids().len(),
        };

        card.use_ability();
        let mut ctx = ScriptContext::new(id, &mut self.cards, CardCreationMethod::AbilityScript);
        runtime.run_ability_script(&mut ctx);

        log::debug!("{} used its ability", id);
        self.history.push_back(action);
    }

    /// The most recent action is `id` using its ability, and the card agrees
    /// the use can be refunded.
    #[must_use]
    pub fn can_undo_use_ability(&self, id: CardId) -> bool {
        matches!(self.history.back(), Some(BoardAction::UseAbility { card, .. }) if *card == id)
            && self.cards[id.index()].can_undo_use_ability()
    }

    /// Undo the most recent action, which must be `id` using its ability.
    pub fn undo_use_ability(&mut self, id: CardId) {
        debug_assert!(self.can_undo_use_ability(id), "{} cannot undo its ability", id);
        self.undo_last();
    }

    /// Deal breach damage to a card.
    pub fn breach(&mut self, target: CardId, damage: HealthType) {
        let card = &mut self.cards[target.index()];
        debug_assert!(
            card.is_breachable() || card.is_overkillable(),
            "{} cannot be breached",
            target
        );

        let action = BoardAction::Breach {
            target,
            damage,
            was_breached: card.was_breached(),
            breach_damage: card.breach_damage,
        };
        card.take_damage(damage, DamageSource::Breach);

        log::debug!("{} breached for {}", target, damage);
        self.history.push_back(action);
    }

    /// Chill a card. Returns the chill actually applied.
    pub fn chill(&mut self, target: CardId, amount: HealthType) -> HealthType {
        let applied = self.cards[target.index()].apply_chill(amount);
        log::debug!("{} chilled for {}", target, applied);
        self.history.push_back(BoardAction::Chill { target, applied });
        applied
    }

    pub fn toggle_assigned(&mut self, id: CardId) {
        self.cards[id.index()].toggle_assigned();
        self.history.push_back(BoardAction::ToggleAssigned { card: id });
    }

    // === Undo ===

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &Vector<BoardAction> {
        &self.history
    }

    /// Undo the most recent action. Returns it, or `None` if the history is
    /// empty.
    pub fn undo_last(&mut self) -> Option<BoardAction> {
        let action = self.history.pop_back()?;
        log::debug!("undo {:?}", action);

        match &action {
            BoardAction::UseAbility {
                card,
                killed_before,
                created_before,
            } => {
                self.rewind_script(*card, *killed_before, *created_before);
                self.cards[card.index()].undo_use_ability();
            }
            BoardAction::Buy { card } => {
                self.rewind_script(*card, 0, 0);
                debug_assert_eq!(self.cards.len(), card.index() + 1, "bought card is not the arena tail");
                self.cards.pop();
            }
            BoardAction::Breach {
                target,
                was_breached,
                breach_damage,
                ..
            } => {
                let card = &mut self.cards[target.index()];
                card.undo_breach();
                if *was_breached {
                    card.take_damage(*breach_damage, DamageSource::Breach);
                }
            }
            BoardAction::Chill { target, applied } => {
                self.cards[target.index()].remove_chill(*applied);
            }
            BoardAction::ToggleAssigned { card } => {
                self.cards[card.index()].toggle_assigned();
            }
        }

        Some(action)
    }

    /// Undo until the history is `len` long.
    pub fn undo_to(&mut self, len: usize) {
        while self.history.len() > len {
            self.undo_last();
        }
    }

    /// Revive the source's victims and drop the cards it created, newest
    /// first, until its causal lists are back to the given lengths.
    fn rewind_script(&mut self, source: CardId, killed_before: usize, created_before: usize) {
        while self.cards[source.index()].killed_card_ids().len() > killed_before {
            let Some(victim) = self.cards[source.index()].pop_killed_card_id() else {
                break;
            };
            self.cards[victim.index()].undo_kill();
        }

        while self.cards[source.index()].created_card_ids().len() > created_before {
            let Some(created) = self.cards[source.index()].pop_created_card_id() else {
                break;
            };
            debug_assert_eq!(self.cards.len(), created.index() + 1, "{} is not the arena tail", created);
            self.cards.pop();
        }
    }

    // === Turn boundaries ===

    /// Start `player`'s turn: advance their cards, then run begin-turn
    /// scripts. Clears the history.
    pub fn begin_turn<R>(&mut self, player: PlayerId, runtime: &mut R)
    where
        R: AbilityScriptRuntime + ?Sized,
    {
        let owned = self.owned_indices(player);
        for &i in &owned {
            self.cards[i].begin_turn();
        }
        for &i in &owned {
            if self.cards[i].can_run_begin_own_turn_script() {
                let id = CardId::from_index(i);
                let mut ctx = ScriptContext::new(id, &mut self.cards, CardCreationMethod::AbilityScript);
                runtime.run_begin_turn_script(&mut ctx);
            }
        }

        log::debug!("{} begins turn with {} cards", player, owned.len());
        self.history.clear();
    }

    /// End `player`'s turn. Clears the history.
    pub fn end_turn(&mut self, player: PlayerId) {
        for i in self.owned_indices(player) {
            self.cards[i].end_turn();
        }
        log::debug!("{} ends turn", player);
        self.history.clear();
    }

    // === Search helpers ===

    /// Cards of `player` that can use their ability now.
    #[must_use]
    pub fn legal_ability_users(&self, player: PlayerId) -> Vec<CardId> {
        self.cards_of(player)
            .filter(|c| c.can_use_ability())
            .map(Card::id)
            .collect()
    }

    /// Like `legal_ability_users`, keeping one card per isomorphism class.
    #[must_use]
    pub fn distinct_ability_users(&self, player: PlayerId) -> Vec<CardId> {
        let mut distinct: Vec<&Card> = Vec::new();
        for card in self.cards_of(player).filter(|c| c.can_use_ability()) {
            if !distinct.iter().any(|d| IsomorphicCardComparator::new(d).matches(card)) {
                distinct.push(card);
            }
        }
        distinct.into_iter().map(Card::id).collect()
    }

    /// Use random abilities of `player` until none are legal or
    /// `max_actions` have been taken. Returns the number taken.
    pub fn random_rollout<R>(
        &mut self,
        player: PlayerId,
        rng: &mut GameRng,
        runtime: &mut R,
        max_actions: usize,
    ) -> usize
    where
        R: AbilityScriptRuntime + ?Sized,
    {
        let mut taken = 0;
        while taken < max_actions {
            let users = self.legal_ability_users(player);
            let Some(&id) = rng.choose(&users) else {
                break;
            };
            self.use_ability(id, runtime);
            taken += 1;
        }
        taken
    }

    /// All cards sorted by `Ord`, so isomorphic cards are adjacent.
    #[must_use]
    pub fn canonical_cards(&self) -> Vec<&Card> {
        let mut sorted: Vec<&Card> = self.cards.iter().collect();
        sorted.sort();
        sorted
    }

    /// Number of cards isomorphic to `card`, itself included if on the board.
    #[must_use]
    pub fn count_isomorphic(&self, card: &Card) -> usize {
        let matches = IsomorphicCardComparator::new(card).as_predicate();
        self.cards.iter().filter(|&c| matches(c)).count()
    }
}
