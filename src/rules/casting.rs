//! Casting spells, playing lands and activating abilities.
//!
//! Every action comes as a `check_*` function returning the reason it is
//! illegal, a `can_*` predicate over it, and the transform itself, which
//! runs the check first. Transforms keep priority with the acting player
//! and reset the run of consecutive passes.

use tracing::debug;

use super::layers::apply_continuous_effects;
use crate::cards::{CardInstance, CardType};
use crate::core::{AbilityId, GameState, IllegalAction, InstanceId, PlayerId, Result};
use crate::effects::Effect;
use crate::stack;

fn require_priority(state: &GameState, player: PlayerId) -> Result<()> {
    if state.priority_player != player {
        return Err(IllegalAction::NotPriorityHolder(player).into());
    }
    Ok(())
}

/// Active player, main phase, empty stack.
fn require_sorcery_timing(state: &GameState, player: PlayerId) -> Result<()> {
    if player != state.active_player {
        return Err(IllegalAction::NotActivePlayer(player).into());
    }
    if !state.phase.is_main() {
        return Err(IllegalAction::WrongTiming {
            phase: state.phase,
            step: state.step,
        }
        .into());
    }
    if !state.stack_is_empty() {
        return Err(IllegalAction::StackNotEmpty.into());
    }
    Ok(())
}

fn card_in_hand(state: &GameState, player: PlayerId, card: InstanceId) -> Result<&CardInstance> {
    let instance = state.card(card)?;
    if instance.zone != state.player(player)?.zones.hand {
        return Err(IllegalAction::NotInHand(card).into());
    }
    Ok(instance)
}

// === Spells ===

/// Why `player` can't cast `card` with `targets` right now, if they can't.
pub fn check_cast_spell(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    targets: &[InstanceId],
) -> Result<()> {
    require_priority(state, player)?;
    let instance = card_in_hand(state, player, card)?;
    if instance.is_land() {
        return Err(IllegalAction::CannotCastLand(card).into());
    }
    if !instance.definition.has_type(CardType::Instant) {
        require_sorcery_timing(state, player)?;
    }

    let cost = instance.definition.mana_cost()?;
    if !state.player(player)?.mana_pool.can_pay(&cost) {
        return Err(IllegalAction::CannotPayCost.into());
    }

    let view = apply_continuous_effects(state);
    for descriptor in &instance.definition.effects {
        Effect::from_descriptor(descriptor)?.validate_targets(&view, targets)?;
    }
    Ok(())
}

#[must_use]
pub fn can_cast_spell(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    targets: &[InstanceId],
) -> bool {
    check_cast_spell(state, player, card, targets).is_ok()
}

/// Pay the mana cost and put the card on the stack.
pub fn cast_spell(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    targets: &[InstanceId],
) -> Result<GameState> {
    check_cast_spell(state, player, card, targets)?;

    let cost = state.card(card)?.definition.mana_cost()?;
    let mut next = state.clone();
    let pool = &mut next.player_mut(player)?.mana_pool;
    *pool = pool.pay(&cost).ok_or(IllegalAction::CannotPayCost)?;

    let mut next = stack::push(&next, card, player, targets)?;
    stack::note_action(&mut next);
    debug!(player = %player, card = %card, "spell cast");
    Ok(next)
}

// === Lands ===

/// Why `player` can't play `card` as their land for the turn, if they can't.
pub fn check_play_land(state: &GameState, player: PlayerId, card: InstanceId) -> Result<()> {
    require_priority(state, player)?;
    require_sorcery_timing(state, player)?;
    if !card_in_hand(state, player, card)?.is_land() {
        return Err(IllegalAction::NotALand(card).into());
    }
    if state.player(player)?.lands_played_this_turn > 0 {
        return Err(IllegalAction::LandAlreadyPlayed.into());
    }
    Ok(())
}

#[must_use]
pub fn can_play_land(state: &GameState, player: PlayerId, card: InstanceId) -> bool {
    check_play_land(state, player, card).is_ok()
}

/// Put a land from hand onto the battlefield. Doesn't use the stack.
pub fn play_land(state: &GameState, player: PlayerId, card: InstanceId) -> Result<GameState> {
    check_play_land(state, player, card)?;

    let mut next = state.clone();
    next.put_onto_battlefield(card, player)?;
    next.player_mut(player)?.lands_played_this_turn += 1;
    stack::note_action(&mut next);
    debug!(player = %player, card = %card, "land played");
    Ok(next)
}

// === Activated abilities ===

/// Why `player` can't activate `ability` of `card`, if they can't.
///
/// Needs priority; the rest is the ability's own check against the current
/// derived characteristics.
pub fn check_activate_ability(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    ability: AbilityId,
    targets: &[InstanceId],
) -> Result<()> {
    require_priority(state, player)?;
    let view = apply_continuous_effects(state);
    let activated = view
        .card(card)?
        .activated(ability)
        .ok_or(IllegalAction::UnknownAbility { card, ability })?;
    activated.check(&view, player)?;
    activated.effect.validate_targets(&view, targets)
}

#[must_use]
pub fn can_activate_ability(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    ability: AbilityId,
    targets: &[InstanceId],
) -> bool {
    check_activate_ability(state, player, card, ability, targets).is_ok()
}

/// Pay the ability's costs and apply its effect right away.
pub fn activate_ability(
    state: &GameState,
    player: PlayerId,
    card: InstanceId,
    ability: AbilityId,
    targets: &[InstanceId],
) -> Result<GameState> {
    check_activate_ability(state, player, card, ability, targets)?;

    let view = apply_continuous_effects(state);
    let activated = view
        .card(card)?
        .activated(ability)
        .ok_or(IllegalAction::UnknownAbility { card, ability })?
        .clone();

    let mut next = activated.activate(&view, player, targets)?;
    stack::note_action(&mut next);
    debug!(player = %player, card = %card, ability = %ability, "ability activated");
    Ok(next)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::AbilityRegistry;
    use crate::cards::{CardDefinition, CardId, Params};
    use crate::core::{ManaColor, Phase, RulesError};
    use crate::zones::ZoneKind;

    fn in_hand(state: &mut GameState, def: CardDefinition, player: u8) -> InstanceId {
        let player = PlayerId::new(player);
        let hand = state.player(player).unwrap().zones.hand;
        state
            .create_card(Arc::new(def), player, hand, &AbilityRegistry::with_builtins())
            .unwrap()
    }

    fn main_phase() -> GameState {
        let mut state = GameState::new(2, 20);
        state.phase = Phase::PreCombatMain;
        state.step = None;
        state
    }

    fn bears() -> CardDefinition {
        CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2).with_cost("{1}{G}")
    }

    #[test]
    fn test_cast_pays_and_pushes() {
        let mut state = main_phase();
        let id = in_hand(&mut state, bears(), 0);
        state.player_mut(PlayerId::new(0)).unwrap().mana_pool.add(ManaColor::Green, 3);

        let next = cast_spell(&state, PlayerId::new(0), id, &[]).unwrap();

        assert_eq!(next.stack().unwrap().top(), Some(id));
        assert_eq!(next.player(PlayerId::new(0)).unwrap().mana_pool.total(), 1);
        assert_eq!(next.priority_player, PlayerId::new(0));
    }

    #[test]
    fn test_cast_without_mana() {
        let mut state = main_phase();
        let id = in_hand(&mut state, bears(), 0);

        assert_eq!(
            check_cast_spell(&state, PlayerId::new(0), id, &[]),
            Err(IllegalAction::CannotPayCost.into())
        );
        assert!(!can_cast_spell(&state, PlayerId::new(0), id, &[]));
    }

    #[test]
    fn test_sorcery_speed_needs_main_phase() {
        let mut state = GameState::new(2, 20);
        let id = in_hand(&mut state, bears().with_cost(""), 0);

        assert!(matches!(
            check_cast_spell(&state, PlayerId::new(0), id, &[]),
            Err(RulesError::IllegalAction(IllegalAction::WrongTiming { .. }))
        ));
    }

    #[test]
    fn test_instant_on_opponents_turn() {
        let mut state = GameState::new(2, 20);
        let salve = CardDefinition::new(CardId::new(2), "Healing Salve")
            .with_type(CardType::Instant)
            .with_effect("gain_life", Params::new().with("amount", 3));
        let id = in_hand(&mut state, salve, 1);
        state.priority_player = PlayerId::new(1);

        assert!(can_cast_spell(&state, PlayerId::new(1), id, &[]));
        assert_eq!(
            check_cast_spell(&state, PlayerId::new(0), id, &[]),
            Err(IllegalAction::NotPriorityHolder(PlayerId::new(0)).into())
        );
    }

    #[test]
    fn test_cast_checks_targets() {
        let mut state = main_phase();
        let murder = CardDefinition::new(CardId::new(3), "Murder")
            .with_type(CardType::Sorcery)
            .with_effect("destroy", Params::new());
        let spell = in_hand(&mut state, murder, 0);
        let not_on_battlefield = in_hand(&mut state, bears(), 1);

        assert_eq!(
            check_cast_spell(&state, PlayerId::new(0), spell, &[]),
            Err(IllegalAction::MissingTarget.into())
        );
        assert_eq!(
            check_cast_spell(&state, PlayerId::new(0), spell, &[not_on_battlefield]),
            Err(IllegalAction::InvalidTarget(not_on_battlefield).into())
        );
    }

    #[test]
    fn test_cannot_cast_land() {
        let mut state = main_phase();
        let forest = in_hand(&mut state, CardDefinition::land(CardId::new(4), "Forest"), 0);

        assert_eq!(
            check_cast_spell(&state, PlayerId::new(0), forest, &[]),
            Err(IllegalAction::CannotCastLand(forest).into())
        );
    }

    #[test]
    fn test_one_land_per_turn() {
        let mut state = main_phase();
        let first = in_hand(&mut state, CardDefinition::land(CardId::new(4), "Forest"), 0);
        let second = in_hand(&mut state, CardDefinition::land(CardId::new(4), "Forest"), 0);

        let next = play_land(&state, PlayerId::new(0), first).unwrap();
        assert_eq!(next.zone_kind_of(first).unwrap(), ZoneKind::Battlefield);
        assert_eq!(
            play_land(&next, PlayerId::new(0), second),
            Err(IllegalAction::LandAlreadyPlayed.into())
        );
    }

    #[test]
    fn test_play_land_needs_empty_stack() {
        let mut state = main_phase();
        let forest = in_hand(&mut state, CardDefinition::land(CardId::new(4), "Forest"), 0);
        let spell = in_hand(&mut state, bears().with_cost(""), 0);
        let state = stack::push(&state, spell, PlayerId::new(0), &[]).unwrap();

        assert_eq!(
            check_play_land(&state, PlayerId::new(0), forest),
            Err(IllegalAction::StackNotEmpty.into())
        );
    }

    #[test]
    fn test_activate_tap_for_mana() {
        let mut state = main_phase();
        let forest = CardDefinition::land(CardId::new(4), "Forest")
            .with_ability("tap_add_mana", Params::new().with("color", "G"));
        let id = in_hand(&mut state, forest, 0);
        state.put_onto_battlefield(id, PlayerId::new(0)).unwrap();
        let ability = state.card(id).unwrap().activated_abilities[0].id;

        let next = activate_ability(&state, PlayerId::new(0), id, ability, &[]).unwrap();

        assert!(next.card(id).unwrap().tapped);
        assert_eq!(next.player(PlayerId::new(0)).unwrap().mana_pool.get(ManaColor::Green), 1);
        assert_eq!(
            check_activate_ability(&next, PlayerId::new(0), id, ability, &[]),
            Err(IllegalAction::Tapped(id).into())
        );
    }

    #[test]
    fn test_unknown_ability() {
        let mut state = main_phase();
        let id = in_hand(&mut state, bears(), 0);
        let missing = AbilityId::new(999);

        assert_eq!(
            check_activate_ability(&state, PlayerId::new(0), id, missing, &[]),
            Err(IllegalAction::UnknownAbility { card: id, ability: missing }.into())
        );
    }
}
