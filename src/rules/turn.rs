//! Turn/phase state machine.
//!
//! [`advance`] is a pure table transition over (phase, step). Ending/Cleanup
//! wraps to the next turn: the turn counter goes up by one, the next seat
//! becomes active and gets priority.
//!
//! Turn-based actions (untap, draw, combat damage, cleanup) are kept out of
//! `advance` and run by [`begin_step`] when the engine enters a step.

use tracing::trace;

use super::combat;
use crate::core::{GameConfig, GameState, Phase, PlayerId, Result, Step};

/// Every (phase, step) position of a turn, in order.
pub const TURN_SEQUENCE: [(Phase, Option<Step>); 12] = [
    (Phase::Beginning, Some(Step::Untap)),
    (Phase::Beginning, Some(Step::Upkeep)),
    (Phase::Beginning, Some(Step::Draw)),
    (Phase::PreCombatMain, None),
    (Phase::Combat, Some(Step::BeginCombat)),
    (Phase::Combat, Some(Step::DeclareAttackers)),
    (Phase::Combat, Some(Step::DeclareBlockers)),
    (Phase::Combat, Some(Step::CombatDamage)),
    (Phase::Combat, Some(Step::EndCombat)),
    (Phase::PostCombatMain, None),
    (Phase::Ending, Some(Step::EndStep)),
    (Phase::Ending, Some(Step::Cleanup)),
];

/// Position of (phase, step) in [`TURN_SEQUENCE`], if it is a real position.
#[must_use]
pub fn position(phase: Phase, step: Option<Step>) -> Option<usize> {
    TURN_SEQUENCE.iter().position(|&entry| entry == (phase, step))
}

/// The position after (phase, step) within the same turn. `None` after
/// Cleanup and for combinations that aren't in the table.
#[must_use]
pub fn next_step(phase: Phase, step: Option<Step>) -> Option<(Phase, Option<Step>)> {
    position(phase, step).and_then(|idx| TURN_SEQUENCE.get(idx + 1).copied())
}

/// Move to the next step, wrapping to the next turn after Cleanup.
///
/// Unmapped (phase, step) combinations are left unchanged.
///
/// ```
/// use rust_mtg::core::{GameState, Phase, PlayerId, Step};
/// use rust_mtg::rules::turn::advance;
///
/// let mut state = GameState::new(2, 20);
/// state.phase = Phase::Ending;
/// state.step = Some(Step::Cleanup);
///
/// let next = advance(&state);
/// assert_eq!(next.turn, 2);
/// assert_eq!((next.phase, next.step), (Phase::Beginning, Some(Step::Untap)));
/// assert_eq!(next.active_player, PlayerId::new(1));
/// assert_eq!(next.priority_player, PlayerId::new(1));
/// ```
#[must_use]
pub fn advance(state: &GameState) -> GameState {
    let mut next = state.clone();

    match next_step(state.phase, state.step) {
        Some((phase, step)) => {
            next.phase = phase;
            next.step = step;
        }
        None if position(state.phase, state.step).is_some() => {
            next.turn += 1;
            next.phase = Phase::Beginning;
            next.step = Some(Step::Untap);
            next.active_player = next.next_player(state.active_player);
            next.priority_player = next.active_player;
            next.consecutive_passes = 0;
            trace!(turn = next.turn, player = %next.active_player, "new turn");
        }
        None => return next,
    }

    trace!(phase = %next.phase, step = ?next.step, "advanced");
    next
}

/// Run the turn-based actions for the step just entered.
///
/// Mana pools empty on every transition. Then:
///
/// - Untap: the active player's permanents untap and lose summoning
///   sickness; every player's land count resets
/// - Draw: the active player draws (not on turn 1 if `skip_first_draw`)
/// - CombatDamage: combat damage is dealt
/// - EndCombat: combat state is cleared
/// - Cleanup: marked damage is removed
pub fn begin_step(state: &GameState, config: &GameConfig) -> Result<GameState> {
    let mut next = state.clone();
    next.empty_mana_pools();

    match next.step {
        Some(Step::Untap) => {
            let active = next.active_player;
            let permanents: Vec<_> = next
                .battlefield()
                .filter(|card| card.controller == active)
                .map(|card| card.id)
                .collect();
            for id in permanents {
                let card = next.card_mut(id)?;
                card.tapped = false;
                card.summoning_sick = false;
            }
            for player in PlayerId::all(next.player_count()) {
                next.player_mut(player)?.lands_played_this_turn = 0;
            }
        }

        Some(Step::Draw) => {
            if !(next.turn == 1 && config.skip_first_draw) {
                let active = next.active_player;
                next.draw_card(active)?;
            }
        }

        Some(Step::CombatDamage) => {
            next = combat::resolve_combat_damage(&next)?;
        }

        Some(Step::EndCombat) => {
            next.combat = None;
        }

        Some(Step::Cleanup) => {
            let damaged: Vec<_> = next
                .battlefield()
                .filter(|card| card.damage != 0)
                .map(|card| card.id)
                .collect();
            for id in damaged {
                next.card_mut(id)?.damage = 0;
            }
        }

        _ => {}
    }

    Ok(next)
}
