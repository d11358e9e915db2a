//! Actions a player can submit to the engine.
//!
//! This is a closed set. Each variant carries only the ids it needs; targets
//! are card instance ids.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{AbilityId, InstanceId};

/// Chosen targets. Almost always zero or one.
pub type Targets = SmallVec<[InstanceId; 2]>;

/// A player action.
///
/// ```
/// use rust_mtg::core::{Action, InstanceId};
///
/// let cast = Action::cast(InstanceId::new(12));
/// assert!(matches!(cast, Action::CastSpell { .. }));
/// assert!(!cast.is_pass());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Put a land from hand onto the battlefield.
    PlayLand { card: InstanceId },

    /// Move a spell from hand to the stack.
    CastSpell { card: InstanceId, targets: Targets },

    /// Pay an activated ability's costs and apply its effect.
    ActivateAbility {
        card: InstanceId,
        ability: AbilityId,
        targets: Targets,
    },

    /// Give priority to the next player.
    PassPriority,

    /// Move to the next step (or phase).
    AdvanceStep,

    /// Advance until the next turn begins.
    AdvanceTurn,
}

impl Action {
    /// Cast a spell with no targets.
    #[must_use]
    pub fn cast(card: InstanceId) -> Self {
        Action::CastSpell {
            card,
            targets: Targets::new(),
        }
    }

    /// Cast a spell with targets.
    #[must_use]
    pub fn cast_targeting(card: InstanceId, targets: &[InstanceId]) -> Self {
        Action::CastSpell {
            card,
            targets: Targets::from_slice(targets),
        }
    }

    /// Activate an ability with no targets.
    #[must_use]
    pub fn activate(card: InstanceId, ability: AbilityId) -> Self {
        Action::ActivateAbility {
            card,
            ability,
            targets: Targets::new(),
        }
    }

    /// Activate an ability with targets.
    #[must_use]
    pub fn activate_targeting(card: InstanceId, ability: AbilityId, targets: &[InstanceId]) -> Self {
        Action::ActivateAbility {
            card,
            ability,
            targets: Targets::from_slice(targets),
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::PassPriority)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::PlayLand { .. } => "play_land",
            Action::CastSpell { .. } => "cast_spell",
            Action::ActivateAbility { .. } => "activate_ability",
            Action::PassPriority => "pass_priority",
            Action::AdvanceStep => "advance_step",
            Action::AdvanceTurn => "advance_turn",
        }
    }
}
