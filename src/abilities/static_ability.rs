//! Static abilities: continuous effects active while the source is on the
//! battlefield.

use serde::{Deserialize, Serialize};

use crate::core::{AbilityId, GameState, InstanceId};
use crate::effects::{ContinuousEffect, Layer};

/// A static ability wrapping one continuous effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaticAbility {
    pub id: AbilityId,
    pub source: InstanceId,
    pub effect: ContinuousEffect,
}

impl StaticAbility {
    #[must_use]
    pub fn new(id: AbilityId, effect: ContinuousEffect) -> Self {
        Self {
            id,
            source: effect.source,
            effect,
        }
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.effect.layer()
    }

    #[must_use]
    pub fn apply_effect(&self, state: &GameState) -> GameState {
        self.effect.apply(state)
    }

    #[must_use]
    pub fn remove_effect(&self, state: &GameState) -> GameState {
        self.effect.remove(state)
    }
}
