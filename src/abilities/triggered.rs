//! Triggered abilities: effects that fire in response to game events.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AbilityId, GameState, InstanceId, Result};
use crate::effects::{Effect, EffectContext};
use crate::triggers::{ConditionContext, GameEvent, TriggerCondition};

/// "When/whenever <condition>, <effect>."
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub id: AbilityId,
    pub source: InstanceId,
    pub condition: TriggerCondition,
    pub effect: Effect,
}

impl TriggeredAbility {
    #[must_use]
    pub fn new(id: AbilityId, source: InstanceId, condition: TriggerCondition, effect: Effect) -> Self {
        Self {
            id,
            source,
            condition,
            effect,
        }
    }

    /// Does `event` fire this ability?
    #[must_use]
    pub fn check_trigger(&self, event: &GameEvent, state: &GameState) -> bool {
        self.condition
            .evaluate(&ConditionContext::new(event, state, self.source))
    }

    /// Resolve the effect for `event`.
    ///
    /// When the event is about the source itself (it just died), the effect
    /// goes to whoever controlled it at that moment. Otherwise it goes to the
    /// source's current controller.
    pub fn resolve(&self, state: &GameState, event: &GameEvent) -> Result<GameState> {
        let controller = if event.subject() == self.source {
            event.controller()
        } else {
            state.card(self.source)?.controller
        };

        debug!(ability = %self.id, source = %self.source, %event, "resolving triggered ability");
        self.effect
            .resolve(state, &EffectContext::new(self.source, controller))
    }
}
