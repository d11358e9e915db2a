//! Stack manager and priority.
//!
//! The stack is an ordinary zone holding card instance ids, last pushed on
//! top. [`resolve_top`] resolves exactly one object per call:
//!
//! - permanent spells enter their controller's battlefield, summoning sick
//! - instants and sorceries resolve their effect descriptors with the
//!   targets chosen on cast, then go to their owner's graveyard
//!
//! Resolution is driven by [`pass_priority`].

mod priority;

pub use priority::{pass_priority, set_active_player_priority, PassOutcome};
pub(crate) use priority::note_action;

use tracing::debug;

use crate::core::{GameState, InstanceId, PlayerId, Result};
use crate::effects::{Effect, EffectContext};

/// Put a card from anywhere onto the stack under `controller`'s control.
pub fn push(
    state: &GameState,
    card: InstanceId,
    controller: PlayerId,
    targets: &[InstanceId],
) -> Result<GameState> {
    let mut next = state.clone();
    next.move_card(card, next.stack_zone)?;

    let instance = next.card_mut(card)?;
    instance.controller = controller;
    instance.targets = targets.iter().copied().collect();
    Ok(next)
}

/// Resolve the top object of the stack. No-op on an empty stack.
pub fn resolve_top(state: &GameState) -> Result<GameState> {
    let Some(top) = state.stack()?.top() else {
        return Ok(state.clone());
    };

    let card = state.card(top)?;
    let controller = card.controller;

    if card.definition.is_permanent() {
        let mut next = state.clone();
        next.put_onto_battlefield(top, controller)?;
        debug!(card = %top, name = card.name(), player = %controller, "permanent resolved");
        return Ok(next);
    }

    let ctx = EffectContext::new(top, controller).with_targets(&card.targets);
    let mut next = state.clone();
    for descriptor in &card.definition.effects {
        next = Effect::from_descriptor(descriptor)?.resolve(&next, &ctx)?;
    }
    next.put_into_graveyard(top)?;
    debug!(card = %top, name = card.name(), player = %controller, "spell resolved");
    Ok(next)
}
