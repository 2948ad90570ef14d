//! Board integration tests.
//!
//! These verify that scripted abilities, purchases, and turn transitions
//! touch the right cards, and that undo restores the board exactly.

use std::sync::Arc;

use rust_ccg_units::{
    AbilityCost, Board, BoardAction, BoardConfig, Card, CardCreationMethod, CardId, CardType,
    CardTypeRegistry, CauseOfDeath, GameRng, NoScripts, PlayerId, ScriptTable,
};

struct Skirmish {
    registry: CardTypeRegistry,
    scripts: ScriptTable,
}

/// A sniper that kills its target, a forge that builds charges each turn,
/// and a conscript that sacrifices itself for two tokens.
fn skirmish() -> Skirmish {
    let mut registry = CardTypeRegistry::new();
    registry.register(CardType::new("Wall").with_health(3).blocker());
    let charge = registry.register(CardType::new("Gauss Charge").with_ability(AbilityCost::free()));
    let sniper = registry.register(
        CardType::new("Apollo")
            .with_health(2)
            .with_charges(1, 1, 1)
            .with_ability(AbilityCost::free().with_charges(1)),
    );
    let forge = registry.register(CardType::new("Gauss Foundry").with_health(4).with_begin_turn_script());
    let conscript = registry.register(CardType::new("Conscript").with_ability(AbilityCost::free().sacrificing()));

    let mut scripts = ScriptTable::new();
    scripts.on_ability(sniper.id, |ctx| {
        if let Some(target) = ctx.source_card().target_id() {
            ctx.kill(target, CauseOfDeath::Sniped);
        }
    });

    let forge_charge = Arc::clone(&charge);
    scripts.on_begin_turn(forge.id, move |ctx| {
        let player = ctx.source_card().player().unwrap_or(PlayerId::new(0));
        ctx.create(Arc::clone(&forge_charge), player, 0, 1);
    });

    scripts.on_ability(conscript.id, move |ctx| {
        let player = ctx.source_card().player().unwrap_or(PlayerId::new(0));
        for _ in 0..2 {
            ctx.create(Arc::clone(&charge), player, 0, 1);
        }
    });

    Skirmish { registry, scripts }
}

fn place(board: &mut Board, registry: &CardTypeRegistry, name: &str, player: u8) -> CardId {
    let card_type = registry.resolve(name).unwrap();
    board.add_card(Card::new(card_type, PlayerId::new(player), CardCreationMethod::Manual, 0, 0))
}

/// A snipe kills the target and is recorded on the sniper; undo revives it.
#[test]
fn test_snipe_and_undo() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    let sniper = place(&mut board, &registry, "Apollo", 0);
    let wall = place(&mut board, &registry, "Wall", 1);
    board.card_mut(sniper).unwrap().set_target_id(wall);
    let before = board.clone();

    board.use_ability(sniper, &mut scripts);
    assert_eq!(board.card(wall).unwrap().cause_of_death(), CauseOfDeath::Sniped);
    assert_eq!(board.card(sniper).unwrap().killed_card_ids(), &[wall]);
    assert_eq!(board.card(sniper).unwrap().current_charges(), 0);
    assert!(board.can_undo_use_ability(sniper));

    board.undo_use_ability(sniper);
    assert_eq!(board.cards(), before.cards());
    assert_eq!(board.history_len(), 0);
}

/// A self-sacrificing ability that creates cards unwinds completely.
#[test]
fn test_sacrifice_and_create_undo() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    let conscript = place(&mut board, &registry, "Conscript", 0);
    let before = board.clone();

    board.use_ability(conscript, &mut scripts);
    assert_eq!(board.len(), 3);
    assert_eq!(board.card(conscript).unwrap().cause_of_death(), CauseOfDeath::SelfSac);
    assert_eq!(
        board.card(conscript).unwrap().created_card_ids(),
        &[CardId::new(1), CardId::new(2)]
    );
    assert!(board.card(CardId::new(1)).unwrap().can_use_ability());

    board.undo_last();
    assert_eq!(board.len(), 1);
    assert_eq!(board.cards(), before.cards());
}

/// Undoing to a mark only unwinds actions taken after it.
#[test]
fn test_nested_undo_to_mark() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    let sniper = place(&mut board, &registry, "Apollo", 0);
    let conscript = place(&mut board, &registry, "Conscript", 0);
    let wall = place(&mut board, &registry, "Wall", 1);
    let second_wall = place(&mut board, &registry, "Wall", 1);
    board.card_mut(sniper).unwrap().set_target_id(wall);

    board.use_ability(sniper, &mut scripts);
    let mark = board.history_len();
    let after_snipe = board.clone();

    board.use_ability(conscript, &mut scripts);
    board.chill(second_wall, 1);
    board.toggle_assigned(CardId::new(4));
    assert_eq!(board.history_len(), mark + 3);

    board.undo_to(mark);
    assert_eq!(board.cards(), after_snipe.cards());
    assert!(board.card(wall).unwrap().is_dead());
    assert!(matches!(board.history().back(), Some(BoardAction::UseAbility { card, .. }) if *card == sniper));
}

/// Begin-turn scripts run for built cards of the active player only, and the
/// cards they create expire on schedule.
#[test]
fn test_begin_turn_scripts() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::new(BoardConfig::default().with_players(2));
    let forge = place(&mut board, &registry, "Gauss Foundry", 0);
    let enemy_forge = place(&mut board, &registry, "Gauss Foundry", 1);

    board.begin_turn(PlayerId::new(0), &mut scripts);
    assert_eq!(board.len(), 3);
    assert_eq!(board.card(forge).unwrap().created_card_ids(), &[CardId::new(2)]);
    assert!(board.card(enemy_forge).unwrap().created_card_ids().is_empty());

    let charge = CardId::new(2);
    assert_eq!(board.card(charge).unwrap().player(), Some(PlayerId::new(0)));
    assert!(board.card(charge).unwrap().can_use_ability());
    board.end_turn(PlayerId::new(0));

    board.begin_turn(PlayerId::new(0), &mut scripts);
    assert_eq!(board.card(charge).unwrap().cause_of_death(), CauseOfDeath::Lifespan);
    assert_eq!(board.len(), 4);
}

/// Bought cards start under construction; undoing the purchase removes them.
#[test]
fn test_buy_and_undo() {
    let mut registry = CardTypeRegistry::new();
    let tarsier = registry.register(CardType::new("Tarsier").with_build_time(1).with_health(1).blocker());

    let mut board = Board::default();
    let id = board.buy(tarsier, PlayerId::new(1), &mut NoScripts);
    let card = board.card(id).unwrap();
    assert!(card.is_under_construction());
    assert!(card.is_sellable());
    assert!(!card.can_block());

    board.undo_last();
    assert!(board.is_empty());
}

/// A cloned board branches independently of the original.
#[test]
fn test_clone_branches_independently() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    for _ in 0..3 {
        place(&mut board, &registry, "Conscript", 0);
    }

    let mut branch = board.clone();
    let mut rng = GameRng::new(7);
    let taken = branch.random_rollout(PlayerId::new(0), &mut rng, &mut scripts, 10);

    assert_eq!(taken, 9);
    assert_eq!(board.len(), 3);
    assert_eq!(branch.len(), 9);
    assert!(board.cards().iter().all(Card::is_alive));
}

/// Isomorphic cards sort next to each other.
#[test]
fn test_canonical_order_groups_isomorphic_cards() {
    let Skirmish { registry, .. } = skirmish();
    let mut board = Board::default();
    place(&mut board, &registry, "Wall", 0);
    place(&mut board, &registry, "Apollo", 0);
    place(&mut board, &registry, "Wall", 0);

    let canonical = board.canonical_cards();
    let names: Vec<&str> = canonical.iter().map(|c| c.card_type().name.as_str()).collect();
    assert_eq!(names, vec!["Wall", "Wall", "Apollo"]);
    assert_eq!(board.count_isomorphic(canonical[0]), 2);
    assert_eq!(board.distinct_ability_users(PlayerId::new(0)), vec![CardId::new(1)]);
}

/// Restoring a saved rng checkpoint after undo replays the same rollout.
#[test]
fn test_rollout_replays_from_rng_checkpoint() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    place(&mut board, &registry, "Conscript", 0);
    place(&mut board, &registry, "Apollo", 0);
    place(&mut board, &registry, "Wall", 1);
    let before = board.clone();

    let mut rng = GameRng::new(11);
    let checkpoint = rng.state();
    let taken = board.random_rollout(PlayerId::new(0), &mut rng, &mut scripts, 5);
    let first = board.clone();

    board.undo_to(0);
    assert_eq!(board.cards(), before.cards());

    let mut replay = GameRng::from_state(&checkpoint);
    assert_eq!(board.random_rollout(PlayerId::new(0), &mut replay, &mut scripts, 5), taken);
    assert_eq!(board.cards(), first.cards());
    assert_eq!(replay.state(), rng.state());
}

/// Branches forked from the same checkpoint see the same random stream.
#[test]
fn test_forked_branches_are_reproducible() {
    let Skirmish { registry, mut scripts } = skirmish();
    let mut board = Board::default();
    for _ in 0..3 {
        place(&mut board, &registry, "Conscript", 0);
    }

    let mut rng = GameRng::new(3);
    let checkpoint = rng.state();
    let mut left = board.clone();
    left.random_rollout(PlayerId::new(0), &mut rng.fork(), &mut scripts, 2);

    let mut restored = GameRng::from_state(&checkpoint);
    let mut right = board.clone();
    right.random_rollout(PlayerId::new(0), &mut restored.fork(), &mut scripts, 2);

    assert_eq!(left.cards(), right.cards());
    assert_eq!(restored.state(), rng.state());
}
