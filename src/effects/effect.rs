//! One-shot effects.
//!
//! Effects are the atomic state changes abilities and spells perform:
//! add mana, gain life, destroy a creature, draw cards. They are plain data,
//! built either by the ability registry or from a spell's effect descriptors,
//! and resolved against a snapshot to produce the next one.

use serde::{Deserialize, Serialize};

use crate::cards::{EffectDescriptor, Params};
use crate::core::{
    GameState, IllegalAction, InstanceId, ManaColor, PlayerId, Result, RulesError, Targets,
};

/// Which card an effect acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The card the effect comes from.
    Source,
    /// Every target chosen when the spell or ability was put into motion.
    Chosen,
}

/// Who and what an effect resolves for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub source: InstanceId,
    /// The player the effect benefits ("you").
    pub controller: PlayerId,
    pub targets: Targets,
}

impl EffectContext {
    #[must_use]
    pub fn new(source: InstanceId, controller: PlayerId) -> Self {
        Self {
            source,
            controller,
            targets: Targets::new(),
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: &[InstanceId]) -> Self {
        self.targets = targets.iter().copied().collect();
        self
    }
}

/// An atomic game effect.
///
/// ```
/// use rust_mtg::core::{GameState, InstanceId, PlayerId};
/// use rust_mtg::effects::{Effect, EffectContext};
///
/// let state = GameState::new(2, 20);
/// let ctx = EffectContext::new(InstanceId::new(1), PlayerId::new(0));
///
/// let next = Effect::GainLife { amount: 3 }.resolve(&state, &ctx).unwrap();
/// assert_eq!(next.player(PlayerId::new(0)).unwrap().life, 23);
/// assert_eq!(state.player(PlayerId::new(0)).unwrap().life, 20);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Add mana to the controller's pool.
    AddMana { color: ManaColor, amount: u32 },

    /// The controller gains life.
    GainLife { amount: i64 },

    /// Put creatures into their owners' graveyards.
    Destroy { target: EffectTarget },

    /// The controller draws cards.
    DrawCards { count: u32 },
}

impl Effect {
    /// Build an effect from a spell's effect descriptor.
    pub fn from_descriptor(descriptor: &EffectDescriptor) -> Result<Self> {
        Self::from_params(&descriptor.key, &descriptor.params)
    }

    /// Build an effect from a key and its parameters.
    pub fn from_params(key: &str, params: &Params) -> Result<Self> {
        match key {
            "gain_life" => Ok(Effect::GainLife {
                amount: params.require_int(key, "amount")?,
            }),
            "add_mana" => Ok(Effect::AddMana {
                color: parse_color(key, params)?,
                amount: non_negative(key, "amount", params.int_or("amount", 1))?,
            }),
            "destroy" => Ok(Effect::Destroy {
                target: if params.bool_or("self", false) {
                    EffectTarget::Source
                } else {
                    EffectTarget::Chosen
                },
            }),
            "draw" => Ok(Effect::DrawCards {
                count: non_negative(key, "count", params.int_or("count", 1))?,
            }),
            _ => Err(RulesError::UnknownEffectKey(key.to_string())),
        }
    }

    /// Does resolving this effect need chosen targets?
    #[must_use]
    pub fn needs_targets(&self) -> bool {
        match self {
            Effect::Destroy { target } => *target == EffectTarget::Chosen,
            _ => false,
        }
    }

    /// Check chosen targets before a spell or ability is put into motion.
    ///
    /// Destroy needs at least one target, and every target must be a creature
    /// on the battlefield. `state` should carry derived characteristics.
    pub fn validate_targets(&self, state: &GameState, targets: &[InstanceId]) -> Result<()> {
        if !self.needs_targets() {
            return Ok(());
        }
        if targets.is_empty() {
            return Err(IllegalAction::MissingTarget.into());
        }
        for &target in targets {
            let legal = state.is_on_battlefield(target)
                && state.card(target).map(|c| c.is_creature()).unwrap_or(false);
            if !legal {
                return Err(IllegalAction::InvalidTarget(target).into());
            }
        }
        Ok(())
    }

    /// Apply the effect, returning the next snapshot.
    ///
    /// Targets that left the battlefield since they were chosen are skipped.
    pub fn resolve(&self, state: &GameState, ctx: &EffectContext) -> Result<GameState> {
        let mut next = state.clone();

        match self {
            Effect::AddMana { color, amount } => {
                next.player_mut(ctx.controller)?.mana_pool.add(*color, *amount);
            }

            Effect::GainLife { amount } => {
                next.player_mut(ctx.controller)?.life += amount;
            }

            Effect::Destroy { target } => {
                let cards: Targets = match target {
                    EffectTarget::Source => Targets::from_slice(&[ctx.source]),
                    EffectTarget::Chosen => ctx.targets.clone(),
                };
                for card in cards {
                    if next.is_on_battlefield(card) && next.card(card)?.is_creature() {
                        next.put_into_graveyard(card)?;
                    }
                }
            }

            Effect::DrawCards { count } => {
                for _ in 0..*count {
                    if next.draw_card(ctx.controller)?.is_none() {
                        break;
                    }
                }
            }
        }

        Ok(next)
    }
}

fn parse_color(key: &str, params: &Params) -> Result<ManaColor> {
    let text = params.require_text(key, "color")?;
    ManaColor::parse(text).ok_or_else(|| RulesError::InvalidParameter {
        key: key.to_string(),
        param: "color".to_string(),
        reason: format!("unknown color `{}`", text),
    })
}

fn non_negative(key: &str, param: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| RulesError::InvalidParameter {
        key: key.to_string(),
        param: param.to_string(),
        reason: format!("expected a non-negative count, got {}", value),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::AbilityRegistry;
    use crate::cards::{CardDefinition, CardId};

    #[test]
    fn test_effects_are_hashable() {
        let effects: rustc_hash::FxHashSet<Effect> = [
            Effect::GainLife { amount: 1 },
            Effect::GainLife { amount: 1 },
            Effect::DrawCards { count: 1 },
            Effect::Destroy {
                target: EffectTarget::Chosen,
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(effects.len(), 3);
    }

    fn state_with_bears() -> (GameState, InstanceId) {
        let mut state = GameState::new(2, 20);
        let def = Arc::new(CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2));
        let library = state.player(PlayerId::new(1)).unwrap().zones.library;
        let id = state
            .create_card(def, PlayerId::new(1), library, &AbilityRegistry::new())
            .unwrap();
        state.put_onto_battlefield(id, PlayerId::new(1)).unwrap();
        (state, id)
    }

    #[test]
    fn test_from_descriptor() {
        let params = Params::new().with("color", "G").with("amount", 2);
        assert_eq!(
            Effect::from_params("add_mana", &params).unwrap(),
            Effect::AddMana {
                color: ManaColor::Green,
                amount: 2
            }
        );

        assert_eq!(
            Effect::from_params("draw", &Params::new()).unwrap(),
            Effect::DrawCards { count: 1 }
        );
    }

    #[test]
    fn test_from_descriptor_errors() {
        assert_eq!(
            Effect::from_params("explode", &Params::new()),
            Err(RulesError::UnknownEffectKey("explode".into()))
        );
        assert!(matches!(
            Effect::from_params("gain_life", &Params::new()),
            Err(RulesError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Effect::from_params("add_mana", &Params::new().with("color", "purple")),
            Err(RulesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_add_mana() {
        let state = GameState::new(2, 20);
        let ctx = EffectContext::new(InstanceId::new(1), PlayerId::new(1));
        let effect = Effect::AddMana {
            color: ManaColor::Red,
            amount: 2,
        };

        let next = effect.resolve(&state, &ctx).unwrap();
        assert_eq!(next.player(PlayerId::new(1)).unwrap().mana_pool.get(ManaColor::Red), 2);
    }

    #[test]
    fn test_destroy_chosen_target() {
        let (state, bears) = state_with_bears();
        let ctx = EffectContext::new(InstanceId::new(99), PlayerId::new(0)).with_targets(&[bears]);
        let effect = Effect::Destroy {
            target: EffectTarget::Chosen,
        };

        effect.validate_targets(&state, &[bears]).unwrap();
        let next = effect.resolve(&state, &ctx).unwrap();

        assert!(!next.is_on_battlefield(bears));
        let graveyard = next.player(PlayerId::new(1)).unwrap().zones.graveyard;
        assert!(next.zone(graveyard).unwrap().contains(bears));
    }

    #[test]
    fn test_destroy_requires_target() {
        let (state, _) = state_with_bears();
        let effect = Effect::Destroy {
            target: EffectTarget::Chosen,
        };

        assert_eq!(
            effect.validate_targets(&state, &[]),
            Err(IllegalAction::MissingTarget.into())
        );
        assert_eq!(
            effect.validate_targets(&state, &[InstanceId::new(77)]),
            Err(IllegalAction::InvalidTarget(InstanceId::new(77)).into())
        );
    }

    #[test]
    fn test_draw_stops_at_empty_library() {
        let state = GameState::new(2, 20);
        let ctx = EffectContext::new(InstanceId::new(1), PlayerId::new(0));

        let next = Effect::DrawCards { count: 3 }.resolve(&state, &ctx).unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_effect_serialization() {
        let effect = Effect::GainLife { amount: 5 };
        let json = serde_json::to_string(&effect).unwrap();
        let deserialized: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, deserialized);
    }
}
