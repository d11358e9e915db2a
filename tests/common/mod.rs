//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use rust_mtg::abilities::AbilityRegistry;
use rust_mtg::cards::{CardCatalog, CardDefinition, CardId, CardType, Params};
use rust_mtg::core::{GameConfig, GameState, InstanceId, Phase, PlayerId, Step};
use rust_mtg::rules::Engine;

pub const P0: PlayerId = PlayerId::new(0);
pub const P1: PlayerId = PlayerId::new(1);

static LOGGING: OnceLock<()> = OnceLock::new();

/// Install a test-writer subscriber once. Level from `TEST_LOG`, then
/// `RUST_LOG`, else `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(tracing_subscriber::EnvFilter::new)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Proptest settings: few cases by default, `PROPTEST_CASES` to override.
pub fn proptest_config() -> proptest::prelude::ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(64)
        .max(1);

    proptest::prelude::ProptestConfig {
        failure_persistence: None,
        cases,
        ..proptest::prelude::ProptestConfig::default()
    }
}

pub fn registry() -> AbilityRegistry {
    AbilityRegistry::with_builtins()
}

/// A fresh two-player, 20-life snapshot.
pub fn new_state() -> GameState {
    GameState::new(2, 20)
}

pub fn creature(id: u32, power: i64, toughness: i64) -> CardDefinition {
    CardDefinition::creature(CardId::new(id), format!("Creature {}", id), power, toughness)
}

pub fn with_keywords(mut def: CardDefinition, keywords: &[&str]) -> CardDefinition {
    for keyword in keywords {
        def = def.with_ability("keyword", Params::new().with("keyword", *keyword));
    }
    def
}

pub fn forest(id: u32) -> CardDefinition {
    CardDefinition::land(CardId::new(id), "Forest")
        .with_ability("tap_add_mana", Params::new().with("color", "G"))
}

pub fn healing_salve(id: u32) -> CardDefinition {
    CardDefinition::new(CardId::new(id), "Healing Salve")
        .with_type(CardType::Instant)
        .with_effect("gain_life", Params::new().with("amount", 3))
}

fn create(state: &mut GameState, def: CardDefinition, player: PlayerId) -> InstanceId {
    let library = state.player(player).unwrap().zones.library;
    state
        .create_card(Arc::new(def), player, library, &registry())
        .unwrap()
}

/// Put a card onto `player`'s battlefield, ready to attack or tap.
pub fn put_ready(state: &mut GameState, def: CardDefinition, player: PlayerId) -> InstanceId {
    let id = create(state, def, player);
    state.put_onto_battlefield(id, player).unwrap();
    state.card_mut(id).unwrap().summoning_sick = false;
    id
}

pub fn put_in_hand(state: &mut GameState, def: CardDefinition, player: PlayerId) -> InstanceId {
    let id = create(state, def, player);
    let hand = state.player(player).unwrap().zones.hand;
    state.move_card(id, hand).unwrap();
    id
}

pub fn at(state: &GameState, phase: Phase, step: Option<Step>) -> GameState {
    let mut next = state.clone();
    next.phase = phase;
    next.step = step;
    next
}

/// Wrap a hand-built snapshot in an engine with the builtin registry.
pub fn engine_from(state: GameState) -> Engine {
    init_logging();
    Engine::from_state(
        GameConfig::default(),
        Arc::new(CardCatalog::new()),
        Arc::new(registry()),
        state,
    )
}
