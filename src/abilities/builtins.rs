//! Built-in ability keys.
//!
//! A small catalog: enough to exercise every layer, every ability variant,
//! and the death trigger.

use super::{Ability, AbilityOrigin, AbilityRegistry, ActivatedAbility, Cost, StaticAbility, TriggeredAbility};
use crate::cards::{CardType, Keyword, Params};
use crate::core::{GameState, ManaCost, Result, RulesError};
use crate::effects::{AffectedObjects, ContinuousEffect, Effect, EffectTarget, Modification};
use crate::triggers::{EventKind, TriggerCondition, TriggerPredicate};

pub(super) fn register_all(registry: &mut AbilityRegistry) {
    registry.register("keyword", keyword);
    registry.register("anthem", anthem);
    registry.register("set_base_pt", set_base_pt);
    registry.register("add_type", add_type);
    registry.register("tap_add_mana", tap_add_mana);
    registry.register("activated_destroy", activated_destroy);
    registry.register("dies_gain_life", dies_gain_life);
    registry.register("creature_dies_gain_life", creature_dies_gain_life);
}

fn invalid(key: &str, param: &str, value: &str) -> RulesError {
    RulesError::InvalidParameter {
        key: key.to_string(),
        param: param.to_string(),
        reason: format!("unrecognized value `{}`", value),
    }
}

fn static_ability(origin: AbilityOrigin, affected: AffectedObjects, modification: Modification) -> Ability {
    Ability::Static(StaticAbility::new(
        origin.id,
        ContinuousEffect::new(origin.source, affected, modification),
    ))
}

/// `keyword {keyword}`: the source has the keyword.
fn keyword(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let text = params.require_text("keyword", "keyword")?;
    let keyword = Keyword::parse(text).ok_or_else(|| invalid("keyword", "keyword", text))?;
    Ok(static_ability(
        origin,
        AffectedObjects::Source,
        Modification::GrantKeyword(keyword),
    ))
}

/// `anthem {power, toughness, include_self?, scope?}`: other creatures you
/// control get +P/+T. `scope = "all"` reaches every creature, the source
/// included.
fn anthem(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let affected = match params.text("scope").unwrap_or("yours") {
        "yours" => AffectedObjects::CreaturesYouControl {
            include_source: params.bool_or("include_self", false),
        },
        "all" => AffectedObjects::AllCreatures,
        other => return Err(invalid("anthem", "scope", other)),
    };
    Ok(static_ability(
        origin,
        affected,
        Modification::ModifyPowerToughness {
            power: params.require_int("anthem", "power")?,
            toughness: params.require_int("anthem", "toughness")?,
        },
    ))
}

/// `set_base_pt {power, toughness}`
fn set_base_pt(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    Ok(static_ability(
        origin,
        AffectedObjects::Source,
        Modification::SetPowerToughness {
            power: params.require_int("set_base_pt", "power")?,
            toughness: params.require_int("set_base_pt", "toughness")?,
        },
    ))
}

/// `add_type {type}`
fn add_type(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let text = params.require_text("add_type", "type")?;
    let card_type = CardType::parse(text).ok_or_else(|| invalid("add_type", "type", text))?;
    Ok(static_ability(
        origin,
        AffectedObjects::Source,
        Modification::AddType(card_type),
    ))
}

/// `tap_add_mana {color, amount?}`: {T}: add mana.
fn tap_add_mana(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let effect = Effect::from_params("add_mana", params)?;
    Ok(Ability::Activated(
        ActivatedAbility::new(origin.id, origin.source, effect).with_cost(Cost::Tap),
    ))
}

/// `activated_destroy {cost?, life?}`: {cost}, pay life, {T}: destroy target
/// creature.
fn activated_destroy(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let mana = ManaCost::parse(params.text("cost").unwrap_or(""))?;
    let life = params.int_or("life", 0);
    if life < 0 {
        return Err(invalid("activated_destroy", "life", &life.to_string()));
    }
    let mut ability = ActivatedAbility::new(
        origin.id,
        origin.source,
        Effect::Destroy {
            target: EffectTarget::Chosen,
        },
    );
    if !mana.is_free() {
        ability = ability.with_cost(Cost::Mana(mana));
    }
    if life > 0 {
        ability = ability.with_cost(Cost::PayLife(life));
    }
    Ok(Ability::Activated(ability.with_cost(Cost::Tap)))
}

/// `dies_gain_life {amount}`: when this creature dies, gain life.
fn dies_gain_life(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    Ok(Ability::Triggered(TriggeredAbility::new(
        origin.id,
        origin.source,
        TriggerCondition::on(EventKind::CreatureDied).with(TriggerPredicate::SubjectIsSource),
        Effect::GainLife {
            amount: params.require_int("dies_gain_life", "amount")?,
        },
    )))
}

/// `creature_dies_gain_life {amount, whose?}`: whenever another creature dies
/// while this is on the battlefield, gain life. `whose` is `any` (default),
/// `yours` or `opponents`, judged by who controlled the creature as it died.
fn creature_dies_gain_life(params: &Params, origin: AbilityOrigin, _: &GameState) -> Result<Ability> {
    let mut condition = TriggerCondition::on(EventKind::CreatureDied)
        .with(TriggerPredicate::SubjectIsNotSource)
        .with(TriggerPredicate::SourceOnBattlefield);
    match params.text("whose").unwrap_or("any") {
        "any" => {}
        "yours" => condition = condition.with(TriggerPredicate::SubjectControlledBySourceController),
        "opponents" => {
            condition =
                condition.with(TriggerPredicate::SubjectControlledBySourceController.negate())
        }
        other => return Err(invalid("creature_dies_gain_life", "whose", other)),
    }
    Ok(Ability::Triggered(TriggeredAbility::new(
        origin.id,
        origin.source,
        condition,
        Effect::GainLife {
            amount: params.require_int("creature_dies_gain_life", "amount")?,
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AbilityId, InstanceId};
    use crate::effects::Layer;

    fn origin() -> AbilityOrigin {
        AbilityOrigin {
            id: AbilityId::new(3),
            source: InstanceId::new(9),
        }
    }

    fn state() -> GameState {
        GameState::new(2, 20)
    }

    #[test]
    fn test_keyword_layer() {
        let params = Params::new().with("keyword", "first strike");
        let Ability::Static(ability) = keyword(&params, origin(), &state()).unwrap() else {
            panic!("expected static ability");
        };

        assert_eq!(ability.layer(), Layer::Ability);
        assert_eq!(
            ability.effect.modification,
            Modification::GrantKeyword(Keyword::FirstStrike)
        );
    }

    #[test]
    fn test_bad_keyword() {
        let params = Params::new().with("keyword", "banding");
        assert!(matches!(
            keyword(&params, origin(), &state()),
            Err(RulesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_anthem_layer_and_scope() {
        let params = Params::new().with("power", 1).with("toughness", 1);
        let Ability::Static(ability) = anthem(&params, origin(), &state()).unwrap() else {
            panic!("expected static ability");
        };

        assert_eq!(ability.layer(), Layer::PowerToughnessModify);
        assert_eq!(
            ability.effect.affected,
            AffectedObjects::CreaturesYouControl {
                include_source: false
            }
        );
    }

    #[test]
    fn test_anthem_scope_all() {
        let params = Params::new()
            .with("power", 1)
            .with("toughness", 1)
            .with("scope", "all");
        let Ability::Static(ability) = anthem(&params, origin(), &state()).unwrap() else {
            panic!("expected static ability");
        };
        assert_eq!(ability.effect.affected, AffectedObjects::AllCreatures);

        let params = params.with("scope", "theirs");
        assert!(matches!(
            anthem(&params, origin(), &state()),
            Err(RulesError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_activated_destroy_life_cost() {
        let params = Params::new().with("life", 2);
        let Ability::Activated(ability) = activated_destroy(&params, origin(), &state()).unwrap()
        else {
            panic!("expected activated ability");
        };
        assert_eq!(ability.costs.as_slice(), &[Cost::PayLife(2), Cost::Tap]);

        let params = Params::new().with("life", -1);
        assert!(activated_destroy(&params, origin(), &state()).is_err());
    }

    #[test]
    fn test_creature_dies_whose() {
        let params = Params::new().with("amount", 1).with("whose", "opponents");
        let Ability::Triggered(ability) = creature_dies_gain_life(&params, origin(), &state()).unwrap()
        else {
            panic!("expected triggered ability");
        };
        assert!(matches!(
            ability.condition.predicate,
            TriggerPredicate::All(ref p) if p.len() == 3
        ));

        let params = params.with("whose", "everyone");
        assert!(creature_dies_gain_life(&params, origin(), &state()).is_err());
    }

    #[test]
    fn test_activated_destroy_costs() {
        let params = Params::new().with("cost", "{2}{B}");
        let Ability::Activated(ability) = activated_destroy(&params, origin(), &state()).unwrap()
        else {
            panic!("expected activated ability");
        };

        assert_eq!(ability.costs.len(), 2);
        assert_eq!(ability.costs[1], Cost::Tap);
        assert!(ability.effect.needs_targets());
    }

    #[test]
    fn test_dies_gain_life_requires_amount() {
        assert!(dies_gain_life(&Params::new(), origin(), &state()).is_err());

        let params = Params::new().with("amount", 1);
        let ability = dies_gain_life(&params, origin(), &state()).unwrap();
        assert!(matches!(ability, Ability::Triggered(_)));
    }
}
