//! Continuous effect processor.
//!
//! Derived characteristics are recomputed from scratch on every call:
//!
//! 1. Reset every card's working characteristics to its printed values.
//! 2. Collect the static abilities of every battlefield permanent, in
//!    instance id order and then ability order (discovery order).
//! 3. Stable-sort them by layer and apply them one by one.
//! 4. Apply +1/+1 and -1/-1 counters last.
//!
//! Because of step 1, applying twice is the same as applying once. Ordering
//! within a layer is discovery order; no timestamps are tracked.

use crate::abilities::StaticAbility;
use crate::cards::{MINUS_ONE, PLUS_ONE};
use crate::core::GameState;

/// Reset every card's derived characteristics to its printed values.
#[must_use]
pub fn reset_characteristics(state: &GameState) -> GameState {
    let mut next = state.clone();
    let ids: Vec<_> = next.cards.keys().copied().collect();
    for id in ids {
        if let Some(card) = next.cards.get_mut(&id) {
            card.reset_characteristics();
        }
    }
    next
}

/// Static abilities of battlefield permanents, in application order.
#[must_use]
pub fn active_static_abilities(state: &GameState) -> Vec<StaticAbility> {
    let mut abilities: Vec<StaticAbility> = state
        .battlefield()
        .flat_map(|card| card.static_abilities.iter().cloned())
        .collect();
    abilities.sort_by_key(StaticAbility::layer);
    abilities
}

/// Recompute all derived characteristics.
///
/// ```
/// use rust_mtg::core::GameState;
/// use rust_mtg::rules::layers::apply_continuous_effects;
///
/// let state = GameState::new(2, 20);
/// let once = apply_continuous_effects(&state);
/// assert_eq!(apply_continuous_effects(&once), once);
/// ```
#[must_use]
pub fn apply_continuous_effects(state: &GameState) -> GameState {
    let mut next = reset_characteristics(state);

    for ability in active_static_abilities(&next) {
        next = ability.apply_effect(&next);
    }

    let countered: Vec<_> = next
        .battlefield()
        .filter(|card| card.counter(PLUS_ONE) + card.counter(MINUS_ONE) > 0)
        .map(|card| card.id)
        .collect();
    for id in countered {
        if let Some(card) = next.cards.get_mut(&id) {
            let delta = i64::from(card.counter(PLUS_ONE)) - i64::from(card.counter(MINUS_ONE));
            let chars = &mut card.characteristics;
            if let (Some(power), Some(toughness)) = (chars.power, chars.toughness) {
                chars.power = Some(power + delta);
                chars.toughness = Some(toughness + delta);
            }
        }
    }

    next
}

/// Strip all derived characteristics. Called before an action so it never
/// sees stale values.
#[must_use]
pub fn remove_continuous_effects(state: &GameState) -> GameState {
    reset_characteristics(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::AbilityRegistry;
    use crate::cards::{CardDefinition, CardId, CardType, Keyword, Params};
    use crate::core::{InstanceId, PlayerId};

    fn put(state: &mut GameState, def: CardDefinition, player: u8) -> InstanceId {
        let player = PlayerId::new(player);
        let library = state.player(player).unwrap().zones.library;
        let id = state
            .create_card(Arc::new(def), player, library, &AbilityRegistry::with_builtins())
            .unwrap();
        state.put_onto_battlefield(id, player).unwrap();
        id
    }

    fn bears(id: u32) -> CardDefinition {
        CardDefinition::creature(CardId::new(id), "Grizzly Bears", 2, 2)
    }

    #[test]
    fn test_anthem_is_idempotent() {
        let mut state = GameState::new(2, 20);
        let lord = bears(1).with_ability("anthem", Params::new().with("power", 1).with("toughness", 1));
        put(&mut state, lord, 0);
        let friend = put(&mut state, bears(2), 0);

        let once = apply_continuous_effects(&state);
        let twice = apply_continuous_effects(&once);

        assert_eq!(once.card(friend).unwrap().power(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_then_modify_in_layer_order() {
        let mut state = GameState::new(2, 20);
        // The anthem is discovered first but modifies after the set.
        let lord = bears(1).with_ability(
            "anthem",
            Params::new()
                .with("power", 1)
                .with("toughness", 1)
                .with("include_self", true),
        );
        let lord = put(&mut state, lord, 0);
        let wall = bears(2).with_ability("set_base_pt", Params::new().with("power", 0).with("toughness", 4));
        let wall = put(&mut state, wall, 0);

        let next = apply_continuous_effects(&state);
        assert_eq!(next.card(wall).unwrap().characteristics.power, Some(1));
        assert_eq!(next.card(wall).unwrap().characteristics.toughness, Some(5));
        assert_eq!(next.card(lord).unwrap().power(), 3);
    }

    #[test]
    fn test_type_change_feeds_later_layers() {
        let mut state = GameState::new(2, 20);
        let lord = bears(1).with_ability("anthem", Params::new().with("power", 1).with("toughness", 1));
        put(&mut state, lord, 0);

        let statue = CardDefinition::new(CardId::new(3), "Statue")
            .with_type(CardType::Artifact)
            .with_ability("add_type", Params::new().with("type", "creature"))
            .with_ability("set_base_pt", Params::new().with("power", 3).with("toughness", 3));
        let statue = put(&mut state, statue, 0);

        let next = apply_continuous_effects(&state);
        let card = next.card(statue).unwrap();
        assert!(card.is_creature());
        assert_eq!((card.power(), card.toughness()), (4, 4));
    }

    #[test]
    fn test_counters_apply_last() {
        let mut state = GameState::new(2, 20);
        let id = put(&mut state, bears(1), 0);
        state.card_mut(id).unwrap().add_counters(PLUS_ONE, 2);
        state.card_mut(id).unwrap().add_counters(MINUS_ONE, 1);

        let next = apply_continuous_effects(&state);
        assert_eq!((next.card(id).unwrap().power(), next.card(id).unwrap().toughness()), (3, 3));
    }

    #[test]
    fn test_source_leaving_removes_effect() {
        let mut state = GameState::new(2, 20);
        let source = put(
            &mut state,
            bears(1).with_ability("keyword", Params::new().with("keyword", "flying")),
            0,
        );

        let next = apply_continuous_effects(&state);
        assert!(next.card(source).unwrap().has_keyword(Keyword::Flying));

        let mut gone = next.clone();
        gone.put_into_graveyard(source).unwrap();
        let gone = apply_continuous_effects(&gone);
        assert!(!gone.card(source).unwrap().has_keyword(Keyword::Flying));
    }

    #[test]
    fn test_remove_continuous_effects() {
        let mut state = GameState::new(2, 20);
        let lord = bears(1).with_ability("anthem", Params::new().with("power", 1).with("toughness", 1));
        put(&mut state, lord, 0);
        let friend = put(&mut state, bears(2), 0);

        let applied = apply_continuous_effects(&state);
        let removed = remove_continuous_effects(&applied);

        assert_eq!(removed.card(friend).unwrap().power(), 2);
        assert_eq!(removed, reset_characteristics(&state));
    }
}
