//! Error type shared by every rules operation.
//!
//! Callers need to tell two things apart: "that move is illegal right now,
//! try something else" ([`RulesError::IllegalAction`]) and "the data or the
//! engine is broken" (everything else). [`RulesError::is_recoverable`] makes
//! that split explicit.

use thiserror::Error;

use super::config::ZoneId;
use super::entity::{AbilityId, InstanceId};
use super::phase::{Phase, Step};
use super::player::PlayerId;
use crate::cards::CardId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RulesError>;

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("{0} does not hold priority")]
    NotPriorityHolder(PlayerId),
    #[error("{0} is not the active player")]
    NotActivePlayer(PlayerId),
    #[error("{0} is not the defending player")]
    NotDefendingPlayer(PlayerId),
    #[error("not allowed during {phase:?}/{step:?}")]
    WrongTiming { phase: Phase, step: Option<Step> },
    #[error("the stack is not empty")]
    StackNotEmpty,
    #[error("a land was already played this turn")]
    LandAlreadyPlayed,
    #[error("{0} is not in its controller's hand")]
    NotInHand(InstanceId),
    #[error("{0} is not a land")]
    NotALand(InstanceId),
    #[error("{0} is a land and cannot be cast")]
    CannotCastLand(InstanceId),
    #[error("{0} is not a creature")]
    NotACreature(InstanceId),
    #[error("{0} is not on the battlefield")]
    NotOnBattlefield(InstanceId),
    #[error("{card} is not controlled by {player}")]
    NotController { card: InstanceId, player: PlayerId },
    #[error("{0} has summoning sickness")]
    SummoningSick(InstanceId),
    #[error("{0} is tapped")]
    Tapped(InstanceId),
    #[error("{0} is not attacking")]
    NotAttacking(InstanceId),
    #[error("{blocker} cannot block {attacker}")]
    CannotBlock {
        blocker: InstanceId,
        attacker: InstanceId,
    },
    #[error("{0} was declared more than once")]
    DuplicateDeclaration(InstanceId),
    #[error("cost cannot be paid")]
    CannotPayCost,
    #[error("invalid target {0}")]
    InvalidTarget(InstanceId),
    #[error("a target is required")]
    MissingTarget,
    #[error("{card} has no activated ability {ability}")]
    UnknownAbility { card: InstanceId, ability: AbilityId },
    #[error("the game is over")]
    GameOver,
}

/// An id that did not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Reference {
    #[error("{0}")]
    Card(InstanceId),
    #[error("{0}")]
    Player(PlayerId),
    #[error("{0}")]
    Zone(ZoneId),
    #[error("{0}")]
    Definition(CardId),
}

/// Errors raised by rules operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Wrong turn, phase, priority, or unmet cost. Recoverable.
    #[error("illegal action: {0}")]
    IllegalAction(#[from] IllegalAction),

    /// A dangling card, player, zone, or definition id.
    #[error("malformed reference: {0}")]
    MalformedReference(#[from] Reference),

    /// Ability descriptor names a key the registry doesn't know.
    #[error("unknown ability key `{0}`")]
    UnknownAbilityKey(String),

    /// Effect descriptor names a key no effect is built for.
    #[error("unknown effect key `{0}`")]
    UnknownEffectKey(String),

    /// A descriptor parameter is missing or has the wrong shape.
    #[error("invalid parameter `{param}` for `{key}`: {reason}")]
    InvalidParameter {
        key: String,
        param: String,
        reason: String,
    },

    /// A fixed-point loop hit its iteration bound.
    #[error("rules loop did not converge after {passes} passes")]
    NonConvergence { passes: usize },
}

impl RulesError {
    /// Is this an ordinary "try something else" refusal?
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RulesError::IllegalAction(_))
    }

    pub(crate) fn missing_param(key: &str, param: &str) -> Self {
        RulesError::InvalidParameter {
            key: key.to_string(),
            param: param.to_string(),
            reason: "missing or wrong type".to_string(),
        }
    }
}
