//! Property tests for the card state machine and board undo.
//!
//! Cards are generated by running a random, gate-respecting sequence of
//! mutations on a freshly placed card of a random template, so every
//! generated card is a state reachable in a real game.

use std::sync::Arc;

use proptest::prelude::*;
use rust_ccg_units::{
    AbilityCost, Board, Card, CardCreationMethod, CardId, CardType, CardTypeRegistry, CauseOfDeath,
    DamageSource, GameRng, PlayerId, ScriptTable,
};

#[derive(Clone, Debug)]
enum Op {
    Block(u16),
    Breach(u16),
    Chill(u16),
    UseAbility,
    BeginTurn,
    EndTurn,
    ToggleAssigned,
    Kill(CauseOfDeath),
    RecordKill(u32),
    RecordCreate(u32),
    Target(u32),
}

fn cause() -> impl Strategy<Value = CauseOfDeath> {
    prop::sample::select(vec![
        CauseOfDeath::SelfSac,
        CauseOfDeath::SelfAbilityHealthCost,
        CauseOfDeath::Sniped,
        CauseOfDeath::BuySacCost,
        CauseOfDeath::AbilitySacCost,
        CauseOfDeath::Blocker,
        CauseOfDeath::Breached,
        CauseOfDeath::Lifespan,
        CauseOfDeath::UndoCreate,
        CauseOfDeath::Unknown,
        CauseOfDeath::Deleted,
    ])
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..4).prop_map(Op::Block),
        2 => (0u16..4).prop_map(Op::Breach),
        2 => (0u16..4).prop_map(Op::Chill),
        3 => Just(Op::UseAbility),
        3 => Just(Op::BeginTurn),
        3 => Just(Op::EndTurn),
        1 => Just(Op::ToggleAssigned),
        1 => cause().prop_map(Op::Kill),
        1 => (0u32..20).prop_map(Op::RecordKill),
        1 => (0u32..20).prop_map(Op::RecordCreate),
        1 => (0u32..20).prop_map(Op::Target),
    ]
}

fn template() -> impl Strategy<Value = CardType> {
    (
        1u16..6,
        0u8..4,
        0u8..4,
        0u8..3,
        0u16..3,
        0u16..4,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0u8..2,
        0u16..2,
        any::<bool>(),
    )
        .prop_map(
            |(health, start, max, per_turn, build, lifespan, has_ability, blocker, fragile, charge_cost, health_cost, sac)| {
                let mut card_type = CardType::new("Unit")
                    .with_health(health)
                    .with_charges(start, max, per_turn)
                    .with_build_time(build)
                    .with_lifespan(lifespan);
                if has_ability {
                    let mut cost = AbilityCost::free().with_charges(charge_cost).with_health(health_cost);
                    if sac {
                        cost = cost.sacrificing();
                    }
                    card_type = card_type.with_ability(cost);
                }
                if blocker {
                    card_type = card_type.blocker();
                }
                if fragile {
                    card_type = card_type.fragile();
                }
                card_type
            },
        )
}

fn apply(card: &mut Card, op: &Op) {
    match *op {
        Op::Block(d) if card.is_alive() => card.take_damage(d, DamageSource::Block),
        Op::Breach(d) if card.is_alive() => card.take_damage(d, DamageSource::Breach),
        Op::Chill(d) if card.can_be_chilled() => {
            let _ = card.apply_chill(d);
        }
        Op::UseAbility if card.can_use_ability() => card.use_ability(),
        Op::BeginTurn => card.begin_turn(),
        Op::EndTurn => card.end_turn(),
        Op::ToggleAssigned => card.toggle_assigned(),
        Op::Kill(cause) if card.is_alive() => card.kill(cause),
        Op::RecordKill(id) => card.add_killed_card_id(CardId::new(id)),
        Op::RecordCreate(id) => card.add_created_card_id(CardId::new(id)),
        Op::Target(id) => card.set_target_id(CardId::new(id)),
        _ => {}
    }
}

/// A registry holding one template, and a card of it in a reachable state.
fn unit() -> impl Strategy<Value = (CardTypeRegistry, Card)> {
    (
        template(),
        prop::collection::vec(op(), 0..12),
        0u32..50,
        0u8..2,
        prop::sample::select(vec![
            CardCreationMethod::Bought,
            CardCreationMethod::Manual,
            CardCreationMethod::AbilityScript,
        ]),
    )
        .prop_map(|(card_type, ops, id, player, method)| {
            let mut registry = CardTypeRegistry::new();
            let card_type = registry.register(card_type);
            let mut card = Card::new(card_type, PlayerId::new(player), method, 1, 0);
            card.set_id(CardId::new(id));
            for op in &ops {
                apply(&mut card, op);
            }
            (registry, card)
        })
}

fn card() -> impl Strategy<Value = Card> {
    unit().prop_map(|(_, card)| card)
}

proptest! {
    #[test]
    fn prop_json_round_trip((registry, card) in unit(), formatted in any::<bool>()) {
        let json = card.to_json_string(formatted).unwrap();
        let decoded = Card::from_json(&json, &registry).unwrap();
        prop_assert_eq!(decoded, card);
    }

    #[test]
    fn prop_damage_monotonic(card in card(), d1 in 0u16..8, extra in 0u16..8) {
        prop_assume!(card.is_alive());
        let d2 = d1 + extra;

        let mut light = card.clone();
        let mut heavy = card.clone();
        light.take_damage(d1, DamageSource::Block);
        heavy.take_damage(d2, DamageSource::Block);

        prop_assert!(heavy.remaining_health() <= light.remaining_health());
    }

    #[test]
    fn prop_kill_undo_kill(card in card(), cause in cause()) {
        prop_assume!(card.is_alive());
        let mut killed = card.clone();
        killed.kill(cause);
        prop_assert!(killed.is_dead());
        killed.undo_kill();
        prop_assert_eq!(killed, card);
    }

    #[test]
    fn prop_breach_undo(card in card(), damage in 0u16..8) {
        prop_assume!(card.is_alive() && !card.was_breached());
        let mut breached = card.clone();
        breached.take_damage(damage, DamageSource::Breach);
        breached.undo_breach();
        prop_assert_eq!(breached, card);
    }

    #[test]
    fn prop_charges_stay_bounded(card in card(), steps in prop::collection::vec(0u8..3, 0..24)) {
        let max = card.card_type().max_charges;
        let mut card = card;
        for step in steps {
            match step {
                0 if card.can_use_ability() => card.use_ability(),
                1 if card.can_undo_use_ability() => card.undo_use_ability(),
                2 => {
                    card.end_turn();
                    card.begin_turn();
                }
                _ => {}
            }
            prop_assert!(card.current_charges() <= max);
        }
    }

    #[test]
    fn prop_use_undo_restores(card in card()) {
        prop_assume!(card.can_use_ability());
        let mut used = card.clone();
        used.use_ability();
        prop_assert!(used.can_undo_use_ability());
        used.undo_use_ability();
        prop_assert_eq!(used, card);
    }

    #[test]
    fn prop_strict_weak_order(a in card(), b in card(), c in card()) {
        prop_assert!(!(a < a));
        if a < b {
            prop_assert!(!(b < a));
        }
        if a < b && b < c {
            prop_assert!(a < c);
        }
        let equivalent = !(a < b) && !(b < a);
        prop_assert_eq!(equivalent, a == b);
    }

    #[test]
    fn prop_sorting_is_deterministic(cards in prop::collection::vec(card(), 0..8)) {
        let mut forward = cards.clone();
        let mut backward: Vec<Card> = cards.into_iter().rev().collect();
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_isomorphism_symmetric(a in card(), b in card()) {
        prop_assert_eq!(a.is_isomorphic(&b), b.is_isomorphic(&a));
    }

    #[test]
    fn prop_isomorphic_json_differs_only_in_id(card in card(), other_id in 50u32..100) {
        let mut twin = card.clone();
        twin.set_id(CardId::new(other_id));
        prop_assert!(card.is_isomorphic(&twin));
        prop_assert!(twin.is_isomorphic(&card));

        let mut left = card.to_value().unwrap();
        let mut right = twin.to_value().unwrap();
        left.as_object_mut().unwrap().remove("id");
        right.as_object_mut().unwrap().remove("id");
        prop_assert_eq!(left, right);
    }
}

fn skirmish_board(templates: &[CardType], defenders: usize) -> (Board, ScriptTable) {
    let mut registry = CardTypeRegistry::new();
    let token = registry.register(CardType::new("Token").with_health(1).blocker());

    let mut board = Board::default();
    let mut scripts = ScriptTable::new();
    for (i, template) in templates.iter().enumerate() {
        let mut template = template.clone();
        template.name = format!("Unit {}", i);
        let card_type = registry.register(template);

        let token = Arc::clone(&token);
        scripts.on_ability(card_type.id, move |ctx| {
            let victim = ctx
                .cards()
                .iter()
                .find(|c| c.player() == Some(PlayerId::new(1)) && c.is_alive())
                .map(Card::id);
            if let Some(victim) = victim {
                ctx.kill(victim, CauseOfDeath::Sniped);
            }
            ctx.create(Arc::clone(&token), PlayerId::new(0), 0, 1);
        });

        board.add_card(Card::new(card_type, PlayerId::new(0), CardCreationMethod::Manual, 0, 0));
    }
    for _ in 0..defenders {
        board.add_card(Card::new(Arc::clone(&token), PlayerId::new(1), CardCreationMethod::Manual, 0, 0));
    }
    (board, scripts)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_rollout_undo_restores_board(
        templates in prop::collection::vec(template(), 1..6),
        defenders in 0usize..4,
        seed in any::<u64>(),
        max_actions in 0usize..10,
    ) {
        let (mut board, mut scripts) = skirmish_board(&templates, defenders);
        let before = board.clone();

        let mut rng = GameRng::new(seed);
        let taken = board.random_rollout(PlayerId::new(0), &mut rng, &mut scripts, max_actions);
        prop_assert_eq!(board.history_len(), taken);

        board.undo_to(0);
        prop_assert_eq!(board.cards(), before.cards());
    }

    #[test]
    fn prop_rollout_deterministic(
        templates in prop::collection::vec(template(), 1..6),
        seed in any::<u64>(),
    ) {
        let (mut first, mut scripts) = skirmish_board(&templates, 2);
        let mut second = first.clone();

        first.random_rollout(PlayerId::new(0), &mut GameRng::new(seed), &mut scripts, 8);
        second.random_rollout(PlayerId::new(0), &mut GameRng::new(seed), &mut scripts, 8);
        prop_assert_eq!(first.cards(), second.cards());
    }
}
