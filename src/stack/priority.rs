//! Priority manager.
//!
//! Priority passes in seat order (0 -> 1 -> ... -> 0). When every player has
//! passed in a row with no intervening action, the top of the stack resolves
//! and the active player gets priority again. Any other action resets the
//! run of passes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameState, InstanceId, Result};

/// What a single pass led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassOutcome {
    /// Priority moved to the next player.
    Passed,
    /// Everyone passed; this stack object resolved.
    Resolved(InstanceId),
    /// Everyone passed with an empty stack. The step does not end by
    /// itself; the active player advances it explicitly.
    AllPassed,
}

/// The priority holder passes.
///
/// ```
/// use rust_mtg::core::{GameState, PlayerId};
/// use rust_mtg::stack::{pass_priority, PassOutcome};
///
/// let state = GameState::new(2, 20);
/// let (state, outcome) = pass_priority(&state).unwrap();
/// assert_eq!(outcome, PassOutcome::Passed);
/// assert_eq!(state.priority_player, PlayerId::new(1));
///
/// let (state, outcome) = pass_priority(&state).unwrap();
/// assert_eq!(outcome, PassOutcome::AllPassed);
/// assert_eq!(state.priority_player, PlayerId::new(0));
/// ```
pub fn pass_priority(state: &GameState) -> Result<(GameState, PassOutcome)> {
    let mut next = state.clone();
    next.consecutive_passes += 1;

    if next.consecutive_passes < next.player_count() {
        next.priority_player = next.next_player(next.priority_player);
        return Ok((next, PassOutcome::Passed));
    }

    let top = next.stack()?.top();
    let outcome = match top {
        Some(card) => {
            debug!(card = %card, "all players passed, resolving top of stack");
            next = super::resolve_top(&next)?;
            PassOutcome::Resolved(card)
        }
        None => PassOutcome::AllPassed,
    };

    Ok((set_active_player_priority(&next), outcome))
}

/// Give priority to the active player and clear the run of passes. Used
/// after every step change and every resolution.
#[must_use]
pub fn set_active_player_priority(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.priority_player = next.active_player;
    next.consecutive_passes = 0;
    next
}

/// A player took an action other than passing. They keep priority.
pub(crate) fn note_action(state: &mut GameState) {
    state.consecutive_passes = 0;
}
