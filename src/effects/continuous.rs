//! Continuous effects and layers.
//!
//! A continuous effect changes the characteristics of permanents for as long
//! as its source is on the battlefield: "creatures you control get +1/+1",
//! "this has flying". Effects are applied in layer order by the continuous
//! effect processor in `rules::layers`.
//!
//! ## Apply / remove
//!
//! `apply` and `remove` are pure inverses over the derived characteristics.
//! Types and keywords are multisets, so two effects granting the same keyword
//! don't cancel each other out when one of them is removed. Applying then
//! removing an effect any number of times, alternately, leaves the state as
//! it found it.

use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, CardType, Keyword};
use crate::core::{GameState, InstanceId};

/// Continuous effect layers, in application order.
///
/// Only the layers with a modification below are populated; the rest exist
/// so the ordering reads like the comprehensive rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Copy,
    Control,
    Text,
    Type,
    Color,
    Ability,
    /// 7b: effects that set base power/toughness.
    PowerToughnessSet,
    /// 7c: effects that add to or subtract from power/toughness.
    PowerToughnessModify,
    /// 7d: +1/+1 and -1/-1 counters.
    PowerToughnessCounters,
}

impl Layer {
    /// Layer number; every power/toughness sublayer is 7.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Layer::Copy => 1,
            Layer::Control => 2,
            Layer::Text => 3,
            Layer::Type => 4,
            Layer::Color => 5,
            Layer::Ability => 6,
            Layer::PowerToughnessSet
            | Layer::PowerToughnessModify
            | Layer::PowerToughnessCounters => 7,
        }
    }
}

/// Which permanents an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AffectedObjects {
    /// Only the source itself.
    Source,
    /// Creatures controlled by the source's controller.
    CreaturesYouControl { include_source: bool },
    /// Every creature on the battlefield.
    AllCreatures,
}

/// What an effect changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modification {
    AddType(CardType),
    GrantKeyword(Keyword),
    SetPowerToughness { power: i64, toughness: i64 },
    ModifyPowerToughness { power: i64, toughness: i64 },
}

impl Modification {
    #[must_use]
    pub const fn layer(&self) -> Layer {
        match self {
            Modification::AddType(_) => Layer::Type,
            Modification::GrantKeyword(_) => Layer::Ability,
            Modification::SetPowerToughness { .. } => Layer::PowerToughnessSet,
            Modification::ModifyPowerToughness { .. } => Layer::PowerToughnessModify,
        }
    }
}

/// A continuous effect produced by a static ability.
///
/// ```
/// use rust_mtg::cards::Keyword;
/// use rust_mtg::core::InstanceId;
/// use rust_mtg::effects::{AffectedObjects, ContinuousEffect, Layer, Modification};
///
/// let effect = ContinuousEffect::new(
///     InstanceId::new(4),
///     AffectedObjects::Source,
///     Modification::GrantKeyword(Keyword::Flying),
/// );
/// assert_eq!(effect.layer(), Layer::Ability);
/// assert_eq!(effect.layer().number(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuousEffect {
    /// Weak reference to the permanent generating the effect.
    pub source: InstanceId,
    pub affected: AffectedObjects,
    pub modification: Modification,
}

impl ContinuousEffect {
    #[must_use]
    pub fn new(source: InstanceId, affected: AffectedObjects, modification: Modification) -> Self {
        Self {
            source,
            affected,
            modification,
        }
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.modification.layer()
    }

    /// Permanents this effect touches right now.
    ///
    /// Empty when the source is not on the battlefield. Creature checks use
    /// the current derived types, so a type-adding effect in an earlier layer
    /// is visible here.
    #[must_use]
    pub fn affected_cards(&self, state: &GameState) -> Vec<InstanceId> {
        if !state.is_on_battlefield(self.source) {
            return Vec::new();
        }
        let Ok(source) = state.card(self.source) else {
            return Vec::new();
        };

        match self.affected {
            AffectedObjects::Source => vec![self.source],
            AffectedObjects::CreaturesYouControl { include_source } => state
                .battlefield_creatures()
                .filter(|card| card.controller == source.controller)
                .filter(|card| include_source || card.id != self.source)
                .map(|card| card.id)
                .collect(),
            AffectedObjects::AllCreatures => {
                state.battlefield_creatures().map(|card| card.id).collect()
            }
        }
    }

    /// Apply the modification to every affected permanent.
    #[must_use]
    pub fn apply(&self, state: &GameState) -> GameState {
        self.update(state, |card, modification| apply_one(card, modification))
    }

    /// Undo a previous `apply`.
    #[must_use]
    pub fn remove(&self, state: &GameState) -> GameState {
        self.update(state, |card, modification| remove_one(card, modification))
    }

    fn update(
        &self,
        state: &GameState,
        f: impl Fn(&mut CardInstance, &Modification),
    ) -> GameState {
        let mut next = state.clone();
        for id in self.affected_cards(state) {
            if let Some(card) = next.cards.get_mut(&id) {
                f(card, &self.modification);
            }
        }
        next
    }
}

fn apply_one(card: &mut CardInstance, modification: &Modification) {
    let chars = &mut card.characteristics;
    match *modification {
        Modification::AddType(card_type) => chars.types.push(card_type),
        Modification::GrantKeyword(keyword) => chars.keywords.push(keyword),
        Modification::SetPowerToughness { power, toughness } => {
            chars.power = Some(power);
            chars.toughness = Some(toughness);
        }
        Modification::ModifyPowerToughness { power, toughness } => {
            chars.power = Some(chars.power.unwrap_or(0) + power);
            chars.toughness = Some(chars.toughness.unwrap_or(0) + toughness);
        }
    }
}

fn remove_one(card: &mut CardInstance, modification: &Modification) {
    let printed = (card.definition.power, card.definition.toughness);
    let chars = &mut card.characteristics;
    match *modification {
        Modification::AddType(card_type) => {
            if let Some(pos) = chars.types.iter().rposition(|t| *t == card_type) {
                chars.types.remove(pos);
            }
        }
        Modification::GrantKeyword(keyword) => {
            if let Some(pos) = chars.keywords.iter().rposition(|k| *k == keyword) {
                chars.keywords.remove(pos);
            }
        }
        Modification::SetPowerToughness { .. } => {
            chars.power = printed.0;
            chars.toughness = printed.1;
        }
        Modification::ModifyPowerToughness { power, toughness } => {
            chars.power = Some(chars.power.unwrap_or(0) - power);
            chars.toughness = Some(chars.toughness.unwrap_or(0) - toughness);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::AbilityRegistry;
    use crate::cards::{CardDefinition, CardId};
    use crate::core::PlayerId;

    fn setup() -> (GameState, InstanceId, InstanceId, InstanceId) {
        let mut state = GameState::new(2, 20);
        let registry = AbilityRegistry::new();
        let bears = Arc::new(CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2));
        let mut ids = Vec::new();
        for player in [0, 0, 1] {
            let player = PlayerId::new(player);
            let library = state.player(player).unwrap().zones.library;
            let id = state.create_card(bears.clone(), player, library, &registry).unwrap();
            state.put_onto_battlefield(id, player).unwrap();
            ids.push(id);
        }
        (state, ids[0], ids[1], ids[2])
    }

    #[test]
    fn test_layer_order() {
        assert!(Layer::Type < Layer::Ability);
        assert!(Layer::Ability < Layer::PowerToughnessSet);
        assert!(Layer::PowerToughnessSet < Layer::PowerToughnessModify);
        assert!(Layer::PowerToughnessModify < Layer::PowerToughnessCounters);
        assert_eq!(Layer::PowerToughnessCounters.number(), 7);
    }

    #[test]
    fn test_anthem_affects_controller_creatures() {
        let (state, source, friend, enemy) = setup();
        let anthem = ContinuousEffect::new(
            source,
            AffectedObjects::CreaturesYouControl {
                include_source: false,
            },
            Modification::ModifyPowerToughness {
                power: 1,
                toughness: 1,
            },
        );

        assert_eq!(anthem.affected_cards(&state), vec![friend]);

        let next = anthem.apply(&state);
        assert_eq!(next.card(friend).unwrap().power(), 3);
        assert_eq!(next.card(source).unwrap().power(), 2);
        assert_eq!(next.card(enemy).unwrap().power(), 2);
    }

    #[test]
    fn test_apply_then_remove_restores() {
        let (state, source, _, _) = setup();
        let effects = [
            Modification::AddType(CardType::Artifact),
            Modification::GrantKeyword(Keyword::Flying),
            Modification::SetPowerToughness {
                power: 0,
                toughness: 5,
            },
            Modification::ModifyPowerToughness {
                power: 2,
                toughness: -1,
            },
        ];

        for modification in effects {
            let effect = ContinuousEffect::new(source, AffectedObjects::AllCreatures, modification);
            let twice = effect.remove(&effect.apply(&effect.remove(&effect.apply(&state))));
            assert_eq!(twice, state, "{:?}", modification);
        }
    }

    #[test]
    fn test_keyword_multiset() {
        let (state, source, _, _) = setup();
        let flying = ContinuousEffect::new(
            source,
            AffectedObjects::Source,
            Modification::GrantKeyword(Keyword::Flying),
        );

        let next = flying.apply(&flying.apply(&state));
        let next = flying.remove(&next);
        assert!(next.card(source).unwrap().has_keyword(Keyword::Flying));

        let next = flying.remove(&next);
        assert!(!next.card(source).unwrap().has_keyword(Keyword::Flying));
    }

    #[test]
    fn test_source_off_battlefield_affects_nothing() {
        let (mut state, source, _, _) = setup();
        state.put_into_graveyard(source).unwrap();

        let effect = ContinuousEffect::new(
            source,
            AffectedObjects::AllCreatures,
            Modification::GrantKeyword(Keyword::Trample),
        );
        assert!(effect.affected_cards(&state).is_empty());
        assert_eq!(effect.apply(&state), state);
    }
}
