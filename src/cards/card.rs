//! Card instances - the reversible per-unit state machine.
//!
//! A `Card` is one unit in one game: its combat counters, its construction
//! and lifespan clocks, its charges, and the ids of the cards its actions
//! killed or created. Search explores a game by mutating cards and then
//! undoing the mutation, so every forward mutator here has an exact inverse:
//!
//! | forward | inverse |
//! |---|---|
//! | `kill` | `undo_kill` |
//! | `use_ability` | `undo_use_ability` |
//! | `take_damage(_, Breach)` | `undo_breach` |
//! | `apply_chill` | `remove_chill` with the applied amount |
//! | `toggle_assigned` | `toggle_assigned` |
//! | `add_killed_card_id` / `add_created_card_id` | `pop_killed_card_id` / `pop_created_card_id` |
//!
//! ## Preconditions
//!
//! Mutators do not validate their inputs in release builds. Check the
//! matching `can_*` predicate first; debug builds assert it.
//!
//! ## Turn boundaries
//!
//! `begin_turn` and `end_turn` are called on the cards of the player whose
//! turn starts or ends. They are not undoable: search never backtracks
//! across a turn boundary without restoring a copied board.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;

use super::card_type::{CardType, CardTypeId};
use super::condition::Condition;
use super::status::{AliveStatus, CardCreationMethod, CardStatus, CauseOfDeath, DamageSource};
use crate::core::{CardId, ChargeType, HealthType, PlayerId, TurnType};

/// Ordered ids of cards this card killed or created.
///
/// Inline storage covers the common case of a handful of entries.
pub type CardIdList = SmallVec<[CardId; 4]>;

/// A card instance in a game.
///
/// Cloning is a full deep copy of the instance (the template is shared), so
/// a board of cards can be copied per search branch.
#[derive(Clone, Debug)]
pub struct Card {
    pub(crate) card_type: Arc<CardType>,
    pub(crate) id: CardId,
    pub(crate) target: Option<CardId>,
    pub(crate) player: Option<PlayerId>,

    pub(crate) current_health: HealthType,
    pub(crate) current_chill: HealthType,
    pub(crate) damage_taken: HealthType,
    /// Part of `damage_taken` that came from breaches.
    pub(crate) breach_damage: HealthType,

    pub(crate) construction_time: TurnType,
    pub(crate) current_delay: TurnType,
    pub(crate) lifespan: TurnType,
    pub(crate) current_charges: ChargeType,

    pub(crate) status: CardStatus,
    pub(crate) alive_status: AliveStatus,
    pub(crate) cause_of_death: CauseOfDeath,

    pub(crate) sellable: bool,
    pub(crate) in_play: bool,
    pub(crate) was_breached: bool,
    pub(crate) ability_used_this_turn: bool,

    pub(crate) killed_card_ids: CardIdList,
    pub(crate) created_card_ids: CardIdList,
}

impl Default for Card {
    /// An unowned, unplaced card of an empty template.
    fn default() -> Self {
        Self::blank(Arc::new(CardType::default()))
    }
}

impl Card {
    fn blank(card_type: Arc<CardType>) -> Self {
        Self {
            card_type,
            id: CardId::UNSET,
            target: None,
            player: None,
            current_health: 0,
            current_chill: 0,
            damage_taken: 0,
            breach_damage: 0,
            construction_time: 0,
            current_delay: 0,
            lifespan: 0,
            current_charges: 0,
            status: CardStatus::empty(),
            alive_status: AliveStatus::Alive,
            cause_of_death: CauseOfDeath::None,
            sellable: false,
            in_play: false,
            was_breached: false,
            ability_used_this_turn: false,
            killed_card_ids: CardIdList::new(),
            created_card_ids: CardIdList::new(),
        }
    }

    /// Create a card entering play.
    ///
    /// `Bought` cards take their build time and lifespan from the template
    /// and can be sold back this turn. Cards created any other way use
    /// `delay` as given, and `lifespan` unless it is 0, in which case the
    /// template's lifespan applies.
    #[must_use]
    pub fn new(
        card_type: Arc<CardType>,
        player: PlayerId,
        creation_method: CardCreationMethod,
        delay: TurnType,
        lifespan: TurnType,
    ) -> Self {
        let (delay, lifespan) = match creation_method {
            CardCreationMethod::Bought => (card_type.build_time, card_type.lifespan),
            _ if lifespan == 0 => (delay, card_type.lifespan),
            _ => (delay, lifespan),
        };

        Self {
            current_health: card_type.health,
            current_charges: card_type.starting_charges.min(card_type.max_charges),
            construction_time: delay,
            current_delay: delay,
            lifespan,
            player: Some(player),
            sellable: creation_method == CardCreationMethod::Bought,
            in_play: true,
            ..Self::blank(card_type)
        }
    }

    // === Accessors ===

    /// The card's template.
    #[must_use]
    pub fn card_type(&self) -> &Arc<CardType> {
        &self.card_type
    }

    /// Shortcut for `card_type().id`.
    #[must_use]
    pub fn type_id(&self) -> CardTypeId {
        self.card_type.id
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The targeted card, if any.
    #[must_use]
    pub fn target_id(&self) -> Option<CardId> {
        self.target
    }

    /// Owning side, `None` while unowned.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    #[must_use]
    pub fn current_health(&self) -> HealthType {
        self.current_health
    }

    #[must_use]
    pub fn current_chill(&self) -> HealthType {
        self.current_chill
    }

    #[must_use]
    pub fn damage_taken(&self) -> HealthType {
        self.damage_taken
    }

    /// Health left this turn: `current_health - damage_taken`.
    #[must_use]
    pub fn remaining_health(&self) -> HealthType {
        self.current_health - self.damage_taken
    }

    #[must_use]
    pub fn alive_status(&self) -> AliveStatus {
        self.alive_status
    }

    #[must_use]
    pub fn cause_of_death(&self) -> CauseOfDeath {
        self.cause_of_death
    }

    #[must_use]
    pub fn current_charges(&self) -> ChargeType {
        self.current_charges
    }

    /// Delay the card was created with.
    #[must_use]
    pub fn construction_time(&self) -> TurnType {
        self.construction_time
    }

    /// Turns left before expiry (0 = no lifespan).
    #[must_use]
    pub fn current_lifespan(&self) -> TurnType {
        self.lifespan
    }

    #[must_use]
    pub fn current_delay(&self) -> TurnType {
        self.current_delay
    }

    #[must_use]
    pub fn status(&self) -> CardStatus {
        self.status
    }

    #[must_use]
    pub fn killed_card_ids(&self) -> &[CardId] {
        &self.killed_card_ids
    }

    #[must_use]
    pub fn created_card_ids(&self) -> &[CardId] {
        &self.created_card_ids
    }

    // === Predicates ===

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive_status == AliveStatus::Alive
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Alive and still being built.
    #[must_use]
    pub fn is_under_construction(&self) -> bool {
        self.is_alive() && self.current_delay > 0
    }

    /// Has delay left, whatever its life state.
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        self.current_delay > 0
    }

    #[must_use]
    pub fn is_sellable(&self) -> bool {
        self.sellable && self.is_alive()
    }

    #[must_use]
    pub fn is_in_play(&self) -> bool {
        self.in_play
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn was_breached(&self) -> bool {
        self.was_breached
    }

    #[must_use]
    pub fn ability_used_this_turn(&self) -> bool {
        self.ability_used_this_turn
    }

    /// Died to its own ability.
    #[must_use]
    pub fn self_killed(&self) -> bool {
        self.cause_of_death.is_self_inflicted()
    }

    /// Chilled down to (or past) its remaining health.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.is_alive() && self.current_chill > 0 && self.current_chill >= self.remaining_health()
    }

    fn is_active(&self) -> bool {
        self.is_alive() && self.in_play
    }

    fn is_committed(&self) -> bool {
        self.status.intersects(CardStatus::ASSIGNED | CardStatus::INERT)
    }

    #[must_use]
    pub fn can_block(&self) -> bool {
        self.is_active()
            && self.card_type.can_block
            && !self.is_under_construction()
            && !self.is_frozen()
            && !self.ability_used_this_turn
            && !self.is_committed()
    }

    /// Can block and has nothing else to do.
    #[must_use]
    pub fn can_block_only(&self) -> bool {
        self.can_block() && !self.card_type.has_ability()
    }

    /// Can be destroyed by breach damage.
    #[must_use]
    pub fn is_breachable(&self) -> bool {
        self.is_active() && self.card_type.breachable && !self.is_under_construction()
    }

    /// Breach damage `damage` would destroy this card.
    #[must_use]
    pub fn can_breach_for(&self, damage: HealthType) -> bool {
        self.is_breachable() && damage >= self.remaining_health()
    }

    /// Under construction, so only damage left over after every breachable
    /// unit is gone can reach it.
    #[must_use]
    pub fn is_overkillable(&self) -> bool {
        self.is_active() && self.card_type.breachable && self.is_under_construction()
    }

    #[must_use]
    pub fn can_overkill_for(&self, damage: HealthType) -> bool {
        self.is_overkillable() && damage >= self.remaining_health()
    }

    /// A blocking unit that `damage` aimed at blockers would destroy.
    #[must_use]
    pub fn can_frontline_for(&self, damage: HealthType) -> bool {
        self.can_block() && damage >= self.remaining_health()
    }

    #[must_use]
    pub fn can_be_chilled(&self) -> bool {
        self.is_active() && self.card_type.can_block && self.current_chill < self.current_health
    }

    /// Can be sacrificed to pay a cost.
    #[must_use]
    pub fn can_sac(&self) -> bool {
        self.is_active()
    }

    #[must_use]
    pub fn can_use_ability(&self) -> bool {
        let Some(cost) = self.card_type.ability else {
            return false;
        };

        self.is_active()
            && !self.is_under_construction()
            && !self.is_frozen()
            && !self.is_committed()
            && !self.ability_used_this_turn
            && self.current_charges >= cost.charges
            && cost.health <= self.remaining_health()
            && cost.health <= self.current_health - self.current_chill
    }

    /// The ability was used this turn and nothing since has changed the
    /// card in a way the refund cannot reverse.
    ///
    /// Ordering across cards is the orchestrator's job.
    #[must_use]
    pub fn can_undo_use_ability(&self) -> bool {
        let cost = self.card_type.ability_cost();
        self.ability_used_this_turn
            && (self.is_alive() || self.self_killed())
            && self.current_charges as u16 + cost.charges as u16 <= self.card_type.max_charges as u16
    }

    #[must_use]
    pub fn can_run_begin_own_turn_script(&self) -> bool {
        self.is_active() && !self.is_under_construction() && self.card_type.begin_turn_script
    }

    /// Test this card against a condition.
    #[must_use]
    pub fn meets_condition<C: Condition + ?Sized>(&self, condition: &C) -> bool {
        condition.evaluate(self)
    }

    // === Combat ===

    /// Apply damage, saturating at the remaining health.
    ///
    /// Lethal damage kills the card with `Blocker` or `Breached`. Any excess
    /// is dropped; callers spill overkill with `can_overkill_for`.
    pub fn take_damage(&mut self, amount: HealthType, source: DamageSource) {
        debug_assert!(self.is_alive(), "{} took damage while dead", self.id);

        let applied = amount.min(self.remaining_health());
        self.damage_taken += applied;
        if source == DamageSource::Breach {
            self.breach_damage += applied;
            self.was_breached = true;
        }

        if self.damage_taken >= self.current_health {
            self.kill(source.lethal_cause());
        }
    }

    /// Reverse every breach since the last settlement, reviving the card if
    /// the breach killed it.
    pub fn undo_breach(&mut self) {
        debug_assert!(self.was_breached, "{} was not breached", self.id);

        if self.cause_of_death == CauseOfDeath::Breached {
            self.undo_kill();
        }
        self.damage_taken -= self.breach_damage;
        self.breach_damage = 0;
        self.was_breached = false;
    }

    /// Add chill, capped so chill never exceeds health.
    ///
    /// Returns the amount actually applied; pass it to `remove_chill` to undo.
    pub fn apply_chill(&mut self, amount: HealthType) -> HealthType {
        debug_assert!(self.can_be_chilled(), "{} cannot be chilled", self.id);

        let applied = amount.min(self.current_health - self.current_chill);
        self.current_chill += applied;
        applied
    }

    pub fn remove_chill(&mut self, amount: HealthType) {
        self.current_chill = self.current_chill.saturating_sub(amount);
    }

    // === Life and death ===

    /// Mark the card killed this turn.
    ///
    /// Only the victim changes. The killer records the kill itself with
    /// `add_killed_card_id`.
    pub fn kill(&mut self, cause: CauseOfDeath) {
        debug_assert!(self.is_alive(), "{} killed twice", self.id);
        debug_assert!(cause != CauseOfDeath::None, "kill needs a cause");

        log::trace!("{} killed ({:?})", self.id, cause);
        self.alive_status = AliveStatus::KilledThisTurn;
        self.cause_of_death = cause;
    }

    /// Bring a dead card back to exactly its state before `kill`.
    ///
    /// Undo kills in reverse order of the original kills.
    pub fn undo_kill(&mut self) {
        debug_assert!(self.is_dead(), "{} is not dead", self.id);

        log::trace!("{} revived (was {:?})", self.id, self.cause_of_death);
        self.alive_status = AliveStatus::Alive;
        self.cause_of_death = CauseOfDeath::None;
    }

    /// Settle a death from the turn in progress. Returns true if dead.
    fn settle_death(&mut self) -> bool {
        if self.alive_status == AliveStatus::KilledThisTurn {
            self.alive_status = AliveStatus::Dead;
        }
        self.is_dead()
    }

    // === Abilities ===

    /// Pay for and mark the ability as used.
    ///
    /// The script's effects on other cards are run by the orchestrator
    /// afterwards (`Board::use_ability`).
    pub fn use_ability(&mut self) {
        debug_assert!(self.can_use_ability(), "{} cannot use its ability", self.id);

        let cost = self.card_type.ability_cost();
        self.current_charges -= cost.charges;
        self.ability_used_this_turn = true;

        if cost.health > 0 {
            self.current_health -= cost.health;
            if self.current_health <= self.damage_taken {
                self.kill(CauseOfDeath::SelfAbilityHealthCost);
                return;
            }
        }
        if cost.sac_self {
            self.kill(CauseOfDeath::SelfSac);
        }
    }

    /// Refund the ability's cost and clear the used flag.
    ///
    /// Cards the script killed or created are restored by the orchestrator
    /// from `killed_card_ids` / `created_card_ids`, not here.
    pub fn undo_use_ability(&mut self) {
        debug_assert!(self.can_undo_use_ability(), "{} cannot undo its ability", self.id);

        let cost = self.card_type.ability_cost();
        if self.is_dead() {
            self.undo_kill();
        }
        self.current_health += cost.health;
        self.current_charges += cost.charges;
        self.ability_used_this_turn = false;
    }

    // === Turn boundaries ===

    /// The owner's turn starts.
    ///
    /// Settles deaths, counts down lifespan (expiring the card at zero) and
    /// construction, regenerates charges once built, and clears the per-turn
    /// flags.
    pub fn begin_turn(&mut self) {
        if self.settle_death() {
            return;
        }

        if self.lifespan > 0 {
            self.lifespan -= 1;
            if self.lifespan == 0 {
                self.kill(CauseOfDeath::Lifespan);
                return;
            }
        }

        if self.current_delay > 0 {
            self.current_delay -= 1;
        }
        if self.current_delay == 0 {
            self.current_charges = self
                .current_charges
                .saturating_add(self.card_type.charges_per_turn)
                .min(self.card_type.max_charges);
        }

        self.ability_used_this_turn = false;
        self.status.remove(CardStatus::ASSIGNED);
        self.sellable = false;
    }

    /// The owner's turn ends.
    ///
    /// Settles deaths and damage (fragile units keep it), and chill expires.
    pub fn end_turn(&mut self) {
        if self.settle_death() {
            return;
        }

        if self.card_type.fragile {
            self.current_health -= self.damage_taken;
        }
        self.damage_taken = 0;
        self.breach_damage = 0;
        self.was_breached = false;
        self.current_chill = 0;
    }

    // === Bookkeeping ===

    pub fn set_id(&mut self, id: CardId) {
        self.id = id;
    }

    pub fn set_status(&mut self, status: CardStatus) {
        self.status = status;
    }

    /// Flip the `ASSIGNED` flag. Its own inverse.
    pub fn toggle_assigned(&mut self) {
        self.status.toggle(CardStatus::ASSIGNED);
    }

    pub fn set_target_id(&mut self, target: CardId) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn set_in_play(&mut self, in_play: bool) {
        self.in_play = in_play;
    }

    /// Record that this card's action killed `id`.
    pub fn add_killed_card_id(&mut self, id: CardId) {
        self.killed_card_ids.push(id);
    }

    /// Record that this card's action created `id`.
    pub fn add_created_card_id(&mut self, id: CardId) {
        self.created_card_ids.push(id);
    }

    /// Drop the most recent kill record (undo only).
    pub fn pop_killed_card_id(&mut self) -> Option<CardId> {
        self.killed_card_ids.pop()
    }

    /// Drop the most recent creation record (undo only).
    pub fn pop_created_card_id(&mut self) -> Option<CardId> {
        self.created_card_ids.pop()
    }

    // === Comparison ===

    /// Interchangeable for search: everything but the id matches.
    #[must_use]
    pub fn is_isomorphic(&self, other: &Card) -> bool {
        self.cmp_state(other) == Ordering::Equal
    }

    /// Templates compare by value; a shared `Arc` short-circuits.
    fn cmp_type(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.card_type, &other.card_type) {
            Ordering::Equal
        } else {
            self.card_type.as_ref().cmp(other.card_type.as_ref())
        }
    }

    /// Compare every field except `id`.
    fn cmp_state(&self, other: &Self) -> Ordering {
        self.cmp_type(other)
            .then_with(|| self.player.cmp(&other.player))
            .then_with(|| self.alive_status.cmp(&other.alive_status))
            .then_with(|| self.cause_of_death.cmp(&other.cause_of_death))
            .then_with(|| self.current_health.cmp(&other.current_health))
            .then_with(|| self.damage_taken.cmp(&other.damage_taken))
            .then_with(|| self.breach_damage.cmp(&other.breach_damage))
            .then_with(|| self.current_chill.cmp(&other.current_chill))
            .then_with(|| self.current_charges.cmp(&other.current_charges))
            .then_with(|| self.current_delay.cmp(&other.current_delay))
            .then_with(|| self.construction_time.cmp(&other.construction_time))
            .then_with(|| self.lifespan.cmp(&other.lifespan))
            .then_with(|| self.status.bits().cmp(&other.status.bits()))
            .then_with(|| self.ability_used_this_turn.cmp(&other.ability_used_this_turn))
            .then_with(|| self.was_breached.cmp(&other.was_breached))
            .then_with(|| self.sellable.cmp(&other.sellable))
            .then_with(|| self.in_play.cmp(&other.in_play))
            .then_with(|| self.target.cmp(&other.target))
            .then_with(|| self.killed_card_ids.as_slice().cmp(other.killed_card_ids.as_slice()))
            .then_with(|| self.created_card_ids.as_slice().cmp(other.created_card_ids.as_slice()))
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Card {}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Card {
    /// State first, id last: sorting a board groups isomorphic cards.
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_state(other).then_with(|| self.id.cmp(&other.id))
    }
}

impl Hash for Card {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.card_type.id.hash(hasher);
        self.card_type.name.hash(hasher);
        self.id.hash(hasher);
        self.target.hash(hasher);
        self.player.hash(hasher);
        self.current_health.hash(hasher);
        self.current_chill.hash(hasher);
        self.damage_taken.hash(hasher);
        self.breach_damage.hash(hasher);
        self.construction_time.hash(hasher);
        self.current_delay.hash(hasher);
        self.lifespan.hash(hasher);
        self.current_charges.hash(hasher);
        self.status.hash(hasher);
        self.alive_status.hash(hasher);
        self.cause_of_death.hash(hasher);
        self.sellable.hash(hasher);
        self.in_play.hash(hasher);
        self.was_breached.hash(hasher);
        self.ability_used_this_turn.hash(hasher);
        self.killed_card_ids.hash(hasher);
        self.created_card_ids.hash(hasher);
    }
}
