//! Costs for activated abilities.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, IllegalAction, InstanceId, ManaCost, PlayerId, Result};

/// One part of an activation cost.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// {T}: tap the source.
    Tap,
    /// Pay mana from the activating player's pool.
    Mana(ManaCost),
    /// Pay life. Can't pay more than you have.
    PayLife(i64),
}

impl Cost {
    /// Why this cost can't be paid right now, if it can't.
    ///
    /// A {T} cost needs an untapped source, and a creature source must not be
    /// summoning sick. `state` should carry derived characteristics so haste
    /// and creature-ness are current.
    pub fn check(&self, state: &GameState, source: InstanceId, player: PlayerId) -> Result<()> {
        match self {
            Cost::Tap => {
                let card = state.card(source)?;
                if card.tapped {
                    return Err(IllegalAction::Tapped(source).into());
                }
                if card.is_creature() && card.is_summoning_sick() {
                    return Err(IllegalAction::SummoningSick(source).into());
                }
            }
            Cost::Mana(cost) => {
                if !state.player(player)?.mana_pool.can_pay(cost) {
                    return Err(IllegalAction::CannotPayCost.into());
                }
            }
            Cost::PayLife(amount) => {
                if state.player(player)?.life < *amount {
                    return Err(IllegalAction::CannotPayCost.into());
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn can_pay(&self, state: &GameState, source: InstanceId, player: PlayerId) -> bool {
        self.check(state, source, player).is_ok()
    }

    /// Pay the cost, returning the next snapshot.
    pub fn pay(&self, state: &GameState, source: InstanceId, player: PlayerId) -> Result<GameState> {
        self.check(state, source, player)?;

        let mut next = state.clone();
        match self {
            Cost::Tap => next.card_mut(source)?.tapped = true,
            Cost::Mana(cost) => {
                let pool = &mut next.player_mut(player)?.mana_pool;
                *pool = pool.pay(cost).ok_or(IllegalAction::CannotPayCost)?;
            }
            Cost::PayLife(amount) => next.player_mut(player)?.life -= amount,
        }
        Ok(next)
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Tap => write!(f, "{{T}}"),
            Cost::Mana(cost) => write!(f, "{}", cost),
            Cost::PayLife(amount) => write!(f, "Pay {} life", amount),
        }
    }
}
