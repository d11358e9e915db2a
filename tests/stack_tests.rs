//! Stack and priority integration tests.
//!
//! Resolution only happens when every player passes in a row, and then only
//! the top object resolves.

mod common;

use common::*;
use rust_mtg::core::{Action, ManaColor, Phase};
use rust_mtg::stack::{pass_priority, push, PassOutcome};
use rust_mtg::zones::ZoneKind;

// =============================================================================
// Priority manager
// =============================================================================

/// Two passes resolve exactly the top object.
#[test]
fn test_two_passes_resolve_top_only() {
    let mut state = new_state();
    let bottom = put_in_hand(&mut state, creature(1, 2, 2), P0);
    let top = put_in_hand(&mut state, creature(2, 3, 3), P0);
    let state = push(&state, bottom, P0, &[]).unwrap();
    let state = push(&state, top, P0, &[]).unwrap();

    let (state, outcome) = pass_priority(&state).unwrap();
    assert_eq!(outcome, PassOutcome::Passed);
    assert_eq!(state.priority_player, P1);

    let (state, outcome) = pass_priority(&state).unwrap();
    assert_eq!(outcome, PassOutcome::Resolved(top));
    assert!(state.is_on_battlefield(top));
    assert_eq!(state.stack().unwrap().cards().len(), 1);
    assert_eq!(state.stack().unwrap().top(), Some(bottom));
    assert_eq!(state.priority_player, P0);
}

/// With an empty stack, a full round of passes leaves the stack alone.
#[test]
fn test_passes_on_empty_stack() {
    let state = new_state();

    let (state, _) = pass_priority(&state).unwrap();
    let (after, outcome) = pass_priority(&state).unwrap();

    assert_eq!(outcome, PassOutcome::AllPassed);
    assert!(after.stack_is_empty());
    assert_eq!(after.priority_player, P0);
    assert_eq!((after.phase, after.step), (state.phase, state.step));
}

/// A cast between passes starts the round of passes over.
#[test]
fn test_action_resets_passes() {
    let mut state = new_state();
    let salve = put_in_hand(&mut state, healing_salve(1), P1);
    let mut engine = engine_from(state);

    engine.try_action(P0, &Action::PassPriority).unwrap();
    engine.try_action(P1, &Action::cast(salve)).unwrap();
    assert_eq!(engine.state().priority_player, P1);

    engine.try_action(P1, &Action::PassPriority).unwrap();
    assert_eq!(engine.state().stack().unwrap().top(), Some(salve));

    engine.try_action(P0, &Action::PassPriority).unwrap();
    assert!(engine.state().stack_is_empty());
    assert_eq!(engine.state().player(P1).unwrap().life, 23);
    assert_eq!(engine.state().zone_kind_of(salve).unwrap(), ZoneKind::Graveyard);
}

// =============================================================================
// Casting through the engine
// =============================================================================

/// Land, mana, creature spell, two passes: the creature enters sick.
#[test]
fn test_cast_creature_from_land_mana() {
    let mut state = new_state();
    let land = put_in_hand(&mut state, forest(1), P0);
    let bears = put_in_hand(&mut state, creature(2, 2, 2).with_cost("{G}"), P0);
    let mut engine = engine_from(at(&state, Phase::PreCombatMain, None));

    engine.try_action(P0, &Action::PlayLand { card: land }).unwrap();
    let ability = engine.state().card(land).unwrap().activated_abilities[0].id;
    engine.try_action(P0, &Action::activate(land, ability)).unwrap();
    assert_eq!(engine.state().player(P0).unwrap().mana_pool.get(ManaColor::Green), 1);

    engine.try_action(P0, &Action::cast(bears)).unwrap();
    assert!(engine.state().player(P0).unwrap().mana_pool.is_empty());

    engine.try_action(P0, &Action::PassPriority).unwrap();
    engine.try_action(P1, &Action::PassPriority).unwrap();

    let card = engine.state().card(bears).unwrap();
    assert_eq!(engine.state().zone_kind_of(bears).unwrap(), ZoneKind::Battlefield);
    assert!(card.summoning_sick);
    assert_eq!(card.entered_battlefield_turn, Some(1));
}

/// A sorcery-speed spell can't be cast while something is on the stack.
#[test]
fn test_sorcery_speed_needs_empty_stack() {
    let mut state = new_state();
    let first = put_in_hand(&mut state, creature(1, 2, 2), P0);
    let second = put_in_hand(&mut state, creature(2, 2, 2), P0);
    let mut engine = engine_from(at(&state, Phase::PreCombatMain, None));

    assert!(engine.submit_action(P0, &Action::cast(first)).is_applied());
    assert!(!engine.submit_action(P0, &Action::cast(second)).is_applied());
}
