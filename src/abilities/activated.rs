//! Activated abilities: "<cost>: <effect>".

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cost::Cost;
use crate::core::{AbilityId, GameState, IllegalAction, InstanceId, PlayerId, Result};
use crate::effects::{Effect, EffectContext};

/// An activated ability. Activation pays every cost in order and then
/// resolves the effect right away.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub id: AbilityId,
    pub source: InstanceId,
    pub costs: SmallVec<[Cost; 2]>,
    pub effect: Effect,
}

impl ActivatedAbility {
    #[must_use]
    pub fn new(id: AbilityId, source: InstanceId, effect: Effect) -> Self {
        Self {
            id,
            source,
            costs: SmallVec::new(),
            effect,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    /// Why `player` can't activate this right now, if they can't.
    ///
    /// The source must be on the battlefield under `player`'s control and
    /// every cost must be payable. Timing and priority are the caller's job.
    pub fn check(&self, state: &GameState, player: PlayerId) -> Result<()> {
        let source = state.card(self.source)?;
        if !state.is_on_battlefield(self.source) {
            return Err(IllegalAction::NotOnBattlefield(self.source).into());
        }
        if source.controller != player {
            return Err(IllegalAction::NotController {
                card: self.source,
                player,
            }
            .into());
        }
        self.costs
            .iter()
            .try_for_each(|cost| cost.check(state, self.source, player))
    }

    #[must_use]
    pub fn can_activate(&self, state: &GameState, player: PlayerId) -> bool {
        self.check(state, player).is_ok()
    }

    /// Pay the costs and resolve the effect.
    pub fn activate(
        &self,
        state: &GameState,
        player: PlayerId,
        targets: &[InstanceId],
    ) -> Result<GameState> {
        self.check(state, player)?;
        self.effect.validate_targets(state, targets)?;

        let mut next = state.clone();
        for cost in &self.costs {
            next = cost.pay(&next, self.source, player)?;
        }

        let ctx = EffectContext::new(self.source, player).with_targets(targets);
        self.effect.resolve(&next, &ctx)
    }
}
