//! State-based actions.
//!
//! Checked as a fixed point. One pass:
//!
//! - marks every player at 0 or less life who hasn't lost yet
//! - puts every battlefield creature with toughness 0 or less, or with
//!   lethal damage marked, into its owner's graveyard
//!
//! Violations found in one pass are all handled together. Each pass that
//! changes anything either marks a new loser or removes a creature, so the
//! number of changing passes is at most players + creatures.
//!
//! Toughness is the derived value after continuous effects, so a creature
//! that loses its anthem mid-fight can die from damage it survived before.

use tracing::{debug, error};

use super::layers::apply_continuous_effects;
use crate::core::{GameState, PlayerId, Result, RulesError};

/// Result of running state-based actions to a fixed point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SbaOutcome {
    /// Final state, with continuous effects applied.
    pub state: GameState,
    /// Passes that changed something.
    pub passes: usize,
}

impl SbaOutcome {
    /// Did any pass change the state?
    #[must_use]
    pub fn changed(&self) -> bool {
        self.passes > 0
    }
}

/// Run a single pass. Returns the new state and whether anything changed.
pub fn sba_pass(state: &GameState) -> Result<(GameState, bool)> {
    let mut next = apply_continuous_effects(state);
    let mut changed = false;

    for id in PlayerId::all(next.player_count()) {
        let player = next.player_mut(id)?;
        if player.life <= 0 && !player.has_lost {
            player.has_lost = true;
            changed = true;
            debug!(player = %player.id, life = player.life, "player lost");
        }
    }

    let dying: Vec<_> = next
        .battlefield_creatures()
        .filter(|card| card.has_lethal_damage())
        .map(|card| card.id)
        .collect();
    for id in dying {
        debug!(card = %id, "creature destroyed by state-based actions");
        next.put_into_graveyard(id)?;
        changed = true;
    }

    if changed {
        next = apply_continuous_effects(&next);
    }
    Ok((next, changed))
}

/// Repeat [`sba_pass`] until nothing changes.
///
/// Fails with `NonConvergence` if more than players + battlefield creatures
/// passes change the state, which the monotonicity argument rules out.
pub fn check_and_apply_sbas(state: &GameState) -> Result<SbaOutcome> {
    let derived = apply_continuous_effects(state);
    let bound = derived.player_count() + derived.battlefield_creatures().count();

    let mut current = derived;
    for passes in 0..=bound {
        let (next, changed) = sba_pass(&current)?;
        if !changed {
            return Ok(SbaOutcome {
                state: next,
                passes,
            });
        }
        current = next;
    }

    error!(bound, "state-based actions did not converge");
    Err(RulesError::NonConvergence { passes: bound + 1 })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::AbilityRegistry;
    use crate::cards::{CardDefinition, CardId, Params};
    use crate::core::{InstanceId, PlayerId};
    use crate::zones::ZoneKind;

    fn put(state: &mut GameState, def: CardDefinition, player: u8) -> InstanceId {
        let player = PlayerId::new(player);
        let library = state.player(player).unwrap().zones.library;
        let id = state
            .create_card(Arc::new(def), player, library, &AbilityRegistry::with_builtins())
            .unwrap();
        state.put_onto_battlefield(id, player).unwrap();
        id
    }

    #[test]
    fn test_clean_state_takes_no_passes() {
        let state = GameState::new(2, 20);
        let outcome = check_and_apply_sbas(&state).unwrap();

        assert_eq!(outcome.passes, 0);
        assert!(!outcome.changed());
        assert_eq!(outcome.state, state);
    }

    #[test]
    fn test_zero_life_loses() {
        let mut state = GameState::new(2, 20);
        state.player_mut(PlayerId::new(1)).unwrap().life = 0;

        let outcome = check_and_apply_sbas(&state).unwrap();

        assert!(outcome.state.player(PlayerId::new(1)).unwrap().has_lost);
        assert!(!outcome.state.player(PlayerId::new(0)).unwrap().has_lost);
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn test_lethal_damage_destroys() {
        let mut state = GameState::new(2, 20);
        let id = put(&mut state, CardDefinition::creature(CardId::new(1), "Bears", 2, 2), 0);
        state.card_mut(id).unwrap().damage = 2;

        let outcome = check_and_apply_sbas(&state).unwrap();
        let card = outcome.state.card(id).unwrap();

        assert_eq!(outcome.state.zone_kind_of(id).unwrap(), ZoneKind::Graveyard);
        assert_eq!(card.damage, 0);
    }

    #[test]
    fn test_zero_toughness_destroys() {
        let mut state = GameState::new(2, 20);
        let id = put(&mut state, CardDefinition::creature(CardId::new(1), "Shade", 1, 0), 0);

        let outcome = check_and_apply_sbas(&state).unwrap();
        assert!(!outcome.state.is_on_battlefield(id));
    }

    #[test]
    fn test_losing_anthem_cascades() {
        let mut state = GameState::new(2, 20);
        // The lord is 1/0 on its own; its anthem keeps only the others alive.
        let lord = CardDefinition::creature(CardId::new(1), "Frail Lord", 1, 0)
            .with_ability("anthem", Params::new().with("power", 0).with("toughness", 1));
        put(&mut state, lord, 0);
        let follower = put(&mut state, CardDefinition::creature(CardId::new(2), "Spirit", 1, 0), 0);

        let outcome = check_and_apply_sbas(&state).unwrap();

        assert!(!outcome.state.is_on_battlefield(follower));
        assert_eq!(outcome.passes, 2);
    }

    #[test]
    fn test_result_has_no_violations() {
        let mut state = GameState::new(2, 20);
        for id in 1..=4 {
            let card = put(&mut state, CardDefinition::creature(CardId::new(id), "Bears", 2, 2), 0);
            state.card_mut(card).unwrap().damage = i64::from(id);
        }
        state.player_mut(PlayerId::new(0)).unwrap().life = -3;

        let outcome = check_and_apply_sbas(&state).unwrap();
        let bound = state.player_count() + 4;

        assert!(outcome.passes <= bound);
        assert_eq!(outcome.state.battlefield_creatures().count(), 1);
        assert!(outcome
            .state
            .players
            .values()
            .all(|p| p.life > 0 || p.has_lost));
    }
}
