//! Combat: declarations and damage.
//!
//! ## Declarations
//!
//! [`declare_attackers`] and [`declare_blockers`] validate every creature
//! and fail with a tagged `IllegalAction` instead of silently ignoring bad
//! input. A flying attacker can only be blocked by a flying creature.
//!
//! ## Damage
//!
//! [`resolve_combat_damage`] runs two passes. The first-strike pass covers
//! creatures with first strike or double strike; the regular pass covers
//! creatures without first strike plus double strikers again. Within a pass:
//!
//! - an unblocked attacker deals its power to the defending player
//! - a blocked attacker splits its power over its surviving blockers in
//!   declaration order, giving each at most its remaining capacity
//!   (toughness minus damage assigned earlier in this call); the rest goes
//!   to the defending player with trample, or onto the last blocker without
//! - each eligible blocker deals its power to the attacker it blocks
//!
//! All damage of a pass is computed first and applied afterwards, so no
//! assignment sees another's result. State-based actions run between the
//! passes; creatures killed by first-strike damage deal no regular damage.

use im::{OrdMap, Vector};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layers::apply_continuous_effects;
use super::sba::check_and_apply_sbas;
use crate::cards::{CardInstance, Keyword};
use crate::core::{GameState, IllegalAction, InstanceId, Phase, PlayerId, Result, Step};

/// Attackers and blocks for the current combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub attacking_player: PlayerId,
    pub defending_player: PlayerId,
    /// Attackers in declaration order.
    pub attackers: Vector<InstanceId>,
    /// Attacker -> its blockers in declaration order.
    pub blocks: OrdMap<InstanceId, Vector<InstanceId>>,
}

impl CombatState {
    #[must_use]
    pub fn new(attacking_player: PlayerId, defending_player: PlayerId) -> Self {
        Self {
            attacking_player,
            defending_player,
            attackers: Vector::new(),
            blocks: OrdMap::new(),
        }
    }

    #[must_use]
    pub fn is_attacking(&self, card: InstanceId) -> bool {
        self.attackers.contains(&card)
    }

    #[must_use]
    pub fn is_blocking(&self, card: InstanceId) -> bool {
        self.blocks.values().any(|blockers| blockers.contains(&card))
    }

    /// Was this attacker blocked? Stays true even if every blocker is gone.
    #[must_use]
    pub fn is_blocked(&self, attacker: InstanceId) -> bool {
        self.blocks.get(&attacker).is_some_and(|b| !b.is_empty())
    }

    /// Blockers of one attacker, in declaration order.
    #[must_use]
    pub fn blockers_of(&self, attacker: InstanceId) -> Vec<InstanceId> {
        self.blocks
            .get(&attacker)
            .map(|b| b.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn require_step(state: &GameState, step: Step) -> Result<()> {
    if state.phase != Phase::Combat || state.step != Some(step) {
        return Err(IllegalAction::WrongTiming {
            phase: state.phase,
            step: state.step,
        }
        .into());
    }
    Ok(())
}

/// An untapped creature `player` controls on the battlefield.
fn check_ready_creature(view: &GameState, card: InstanceId, player: PlayerId) -> Result<&CardInstance> {
    let instance = view.card(card)?;
    if !view.is_on_battlefield(card) {
        return Err(IllegalAction::NotOnBattlefield(card).into());
    }
    if instance.controller != player {
        return Err(IllegalAction::NotController { card, player }.into());
    }
    if !instance.is_creature() {
        return Err(IllegalAction::NotACreature(card).into());
    }
    if instance.tapped {
        return Err(IllegalAction::Tapped(card).into());
    }
    Ok(instance)
}

/// Declare attackers for the active player.
///
/// Attackers tap unless they have vigilance. Declaring no attackers is
/// allowed and still opens combat.
pub fn declare_attackers(
    state: &GameState,
    player: PlayerId,
    attackers: &[InstanceId],
) -> Result<GameState> {
    require_step(state, Step::DeclareAttackers)?;
    if player != state.active_player {
        return Err(IllegalAction::NotActivePlayer(player).into());
    }
    if state.combat.is_some() {
        return Err(IllegalAction::WrongTiming {
            phase: state.phase,
            step: state.step,
        }
        .into());
    }

    let view = apply_continuous_effects(state);
    let mut combat = CombatState::new(player, state.next_player(player));
    let mut to_tap = Vec::new();

    for &attacker in attackers {
        if combat.is_attacking(attacker) {
            return Err(IllegalAction::DuplicateDeclaration(attacker).into());
        }
        let card = check_ready_creature(&view, attacker, player)?;
        if card.is_summoning_sick() {
            return Err(IllegalAction::SummoningSick(attacker).into());
        }
        if !card.has_keyword(Keyword::Vigilance) {
            to_tap.push(attacker);
        }
        combat.attackers.push_back(attacker);
    }

    let mut next = state.clone();
    for id in to_tap {
        next.card_mut(id)?.tapped = true;
    }
    debug!(player = %player, count = combat.attackers.len(), "attackers declared");
    next.combat = Some(combat);
    Ok(next)
}

/// Declare blockers for the defending player, as `(blocker, attacker)` pairs.
pub fn declare_blockers(
    state: &GameState,
    player: PlayerId,
    blocks: &[(InstanceId, InstanceId)],
) -> Result<GameState> {
    require_step(state, Step::DeclareBlockers)?;
    let Some(current) = &state.combat else {
        return Err(IllegalAction::WrongTiming {
            phase: state.phase,
            step: state.step,
        }
        .into());
    };
    if player != current.defending_player {
        return Err(IllegalAction::NotDefendingPlayer(player).into());
    }

    let view = apply_continuous_effects(state);
    let mut combat = current.clone();

    for &(blocker, attacker) in blocks {
        if combat.is_blocking(blocker) {
            return Err(IllegalAction::DuplicateDeclaration(blocker).into());
        }
        let blocking = check_ready_creature(&view, blocker, player)?;
        if !combat.is_attacking(attacker) {
            return Err(IllegalAction::NotAttacking(attacker).into());
        }
        if view.card(attacker)?.has_keyword(Keyword::Flying) && !blocking.has_keyword(Keyword::Flying) {
            return Err(IllegalAction::CannotBlock { blocker, attacker }.into());
        }
        let mut blockers = combat.blocks.get(&attacker).cloned().unwrap_or_default();
        blockers.push_back(blocker);
        combat.blocks.insert(attacker, blockers);
    }

    let mut next = state.clone();
    debug!(player = %player, count = blocks.len(), "blockers declared");
    next.combat = Some(combat);
    Ok(next)
}

/// One of the two combat damage passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamagePass {
    FirstStrike,
    Regular,
}

impl DamagePass {
    /// Does `card` deal damage in this pass?
    #[must_use]
    pub fn includes(self, card: &CardInstance) -> bool {
        let first = card.has_keyword(Keyword::FirstStrike);
        let double = card.has_keyword(Keyword::DoubleStrike);
        match self {
            DamagePass::FirstStrike => first || double,
            DamagePass::Regular => !first || double,
        }
    }
}

/// Damage computed for one pass, applied all at once.
#[derive(Debug, Default)]
struct DamagePlan {
    to_cards: Vec<(InstanceId, i64)>,
    to_player: i64,
}

impl DamagePlan {
    fn is_empty(&self) -> bool {
        self.to_cards.is_empty() && self.to_player == 0
    }
}

fn plan_pass(
    state: &GameState,
    combat: &CombatState,
    pass: DamagePass,
    assigned: &mut FxHashMap<InstanceId, i64>,
) -> Result<DamagePlan> {
    let mut plan = DamagePlan::default();

    for &attacker_id in combat.attackers.iter() {
        if !state.is_on_battlefield(attacker_id) {
            continue;
        }
        let attacker = state.card(attacker_id)?;
        let blockers: Vec<&CardInstance> = combat
            .blockers_of(attacker_id)
            .into_iter()
            .filter(|&b| state.is_on_battlefield(b))
            .map(|b| state.card(b))
            .collect::<Result<_>>()?;

        let power = attacker.power();
        if pass.includes(attacker) && power > 0 {
            if !combat.is_blocked(attacker_id) {
                plan.to_player += power;
            } else {
                let mut remaining = power;
                for blocker in &blockers {
                    let already = assigned.get(&blocker.id).copied().unwrap_or(0);
                    let capacity = (blocker.toughness() - already).max(0);
                    let dealt = remaining.min(capacity);
                    if dealt > 0 {
                        plan.to_cards.push((blocker.id, dealt));
                        *assigned.entry(blocker.id).or_insert(0) += dealt;
                        remaining -= dealt;
                    }
                }
                if remaining > 0 {
                    if attacker.has_keyword(Keyword::Trample) {
                        plan.to_player += remaining;
                    } else if let Some(last) = blockers.last() {
                        plan.to_cards.push((last.id, remaining));
                        *assigned.entry(last.id).or_insert(0) += remaining;
                    }
                }
            }
        }

        for blocker in &blockers {
            let power = blocker.power();
            if pass.includes(blocker) && power > 0 {
                plan.to_cards.push((attacker_id, power));
            }
        }
    }

    Ok(plan)
}

fn apply_plan(state: &GameState, defending: PlayerId, plan: &DamagePlan) -> Result<GameState> {
    let mut next = state.clone();
    for &(card, amount) in &plan.to_cards {
        next.card_mut(card)?.damage += amount;
    }
    if plan.to_player != 0 {
        next.player_mut(defending)?.life -= plan.to_player;
    }
    Ok(next)
}

/// Deal combat damage for the current combat. No-op without a combat.
pub fn resolve_combat_damage(state: &GameState) -> Result<GameState> {
    let Some(combat) = state.combat.clone() else {
        return Ok(state.clone());
    };
    if combat.attackers.is_empty() {
        return Ok(state.clone());
    }

    let mut assigned = FxHashMap::default();
    let mut current = apply_continuous_effects(state);

    let first = plan_pass(&current, &combat, DamagePass::FirstStrike, &mut assigned)?;
    if !first.is_empty() {
        current = apply_plan(&current, combat.defending_player, &first)?;
        debug!(
            to_player = first.to_player,
            to_creatures = first.to_cards.len(),
            "first-strike damage dealt"
        );
        current = check_and_apply_sbas(&current)?.state;
    }

    let regular = plan_pass(&current, &combat, DamagePass::Regular, &mut assigned)?;
    current = apply_plan(&current, combat.defending_player, &regular)?;
    debug!(
        to_player = regular.to_player,
        to_creatures = regular.to_cards.len(),
        "combat damage dealt"
    );

    Ok(current)
}
