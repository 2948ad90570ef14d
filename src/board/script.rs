//! Script call-outs.
//!
//! Card templates only say *that* they run a script; what the script does
//! is supplied by the embedding game through `AbilityScriptRuntime`. A
//! script sees the board through a `ScriptContext` and has exactly two
//! recorded side effects, killing and creating cards, so the board can
//! undo any script by walking the source card's causal lists backwards.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::cards::{Card, CardCreationMethod, CardType, CardTypeId, CauseOfDeath};
use crate::core::{CardId, PlayerId, TurnType};

/// View of the board handed to a running script.
pub struct ScriptContext<'a> {
    source: CardId,
    cards: &'a mut Vec<Card>,
    method: CardCreationMethod,
}

impl<'a> ScriptContext<'a> {
    pub(crate) fn new(source: CardId, cards: &'a mut Vec<Card>, method: CardCreationMethod) -> Self {
        Self { source, cards, method }
    }

    /// Id of the card whose script is running.
    #[must_use]
    pub fn source(&self) -> CardId {
        self.source
    }

    /// The card whose script is running.
    #[must_use]
    pub fn source_card(&self) -> &Card {
        &self.cards[self.source.index()]
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        self.cards.as_slice()
    }

    /// Kill `victim` and record the kill on the source card.
    pub fn kill(&mut self, victim: CardId, cause: CauseOfDeath) {
        let Some(card) = self.cards.get_mut(victim.index()) else {
            debug_assert!(false, "script killed unknown {}", victim);
            return;
        };
        card.kill(cause);
        self.cards[self.source.index()].add_killed_card_id(victim);
    }

    /// Put a new card into play and record the creation on the source card.
    ///
    /// Returns the new card's id.
    pub fn create(
        &mut self,
        card_type: Arc<CardType>,
        player: PlayerId,
        delay: TurnType,
        lifespan: TurnType,
    ) -> CardId {
        let id = CardId::from_index(self.cards.len());
        let mut card = Card::new(card_type, player, self.method, delay, lifespan);
        card.set_id(id);
        log::trace!("{} created {} ({})", self.source, id, card.card_type().name);
        self.cards.push(card);
        self.cards[self.source.index()].add_created_card_id(id);
        id
    }
}

/// Runs the scripts of card templates.
///
/// Every method defaults to doing nothing.
pub trait AbilityScriptRuntime {
    /// A card used its ability; its cost is already paid.
    fn run_ability_script(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// The owner's turn began and the card can run its begin-turn script.
    fn run_begin_turn_script(&mut self, _ctx: &mut ScriptContext<'_>) {}

    /// The card was just bought.
    fn run_buy_script(&mut self, _ctx: &mut ScriptContext<'_>) {}
}

/// Runtime for games whose cards have no scripts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScripts;

impl AbilityScriptRuntime for NoScripts {}

type ScriptFn = Box<dyn Fn(&mut ScriptContext<'_>) + Send + Sync>;

/// Scripts looked up by the source card's template.
///
/// ## Example
///
/// ```
/// use rust_ccg_units::board::ScriptTable;
/// use rust_ccg_units::cards::{CardTypeId, CauseOfDeath};
///
/// let mut scripts = ScriptTable::new();
/// scripts.on_ability(CardTypeId::new(0), |ctx| {
///     if let Some(target) = ctx.source_card().target_id() {
///         ctx.kill(target, CauseOfDeath::Sniped);
///     }
/// });
/// ```
#[derive(Default)]
pub struct ScriptTable {
    ability: FxHashMap<CardTypeId, ScriptFn>,
    begin_turn: FxHashMap<CardTypeId, ScriptFn>,
    buy: FxHashMap<CardTypeId, ScriptFn>,
}

impl ScriptTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ability script for a template, replacing any previous one.
    pub fn on_ability<F>(&mut self, card_type: CardTypeId, script: F)
    where
        F: Fn(&mut ScriptContext<'_>) + Send + Sync + 'static,
    {
        self.ability.insert(card_type, Box::new(script));
    }

    /// Register the begin-turn script for a template.
    pub fn on_begin_turn<F>(&mut self, card_type: CardTypeId, script: F)
    where
        F: Fn(&mut ScriptContext<'_>) + Send + Sync + 'static,
    {
        self.begin_turn.insert(card_type, Box::new(script));
    }

    /// Register the buy script for a template.
    pub fn on_buy<F>(&mut self, card_type: CardTypeId, script: F)
    where
        F: Fn(&mut ScriptContext<'_>) + Send + Sync + 'static,
    {
        self.buy.insert(card_type, Box::new(script));
    }

    fn run(table: &FxHashMap<CardTypeId, ScriptFn>, ctx: &mut ScriptContext<'_>) {
        if let Some(script) = table.get(&ctx.source_card().type_id()) {
            script(ctx);
        }
    }
}

impl AbilityScriptRuntime for ScriptTable {
    fn run_ability_script(&mut self, ctx: &mut ScriptContext<'_>) {
        Self::run(&self.ability, ctx);
    }

    fn run_begin_turn_script(&mut self, ctx: &mut ScriptContext<'_>) {
        Self::run(&self.begin_turn, ctx);
    }

    fn run_buy_script(&mut self, ctx: &mut ScriptContext<'_>) {
        Self::run(&self.buy, ctx);
    }
}

impl std::fmt::Debug for ScriptTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptTable")
            .field("ability", &self.ability.len())
            .field("begin_turn", &self.begin_turn.len())
            .field("buy", &self.buy.len())
            .finish()
    }
}
