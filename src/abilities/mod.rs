//! Ability runtime.
//!
//! Every ability is one of three closed variants:
//!
//! - [`StaticAbility`]: a continuous effect applied in its layer while the
//!   source is on the battlefield
//! - [`TriggeredAbility`]: a condition over game events plus an effect
//! - [`ActivatedAbility`]: a list of [`Cost`]s plus an effect
//!
//! Abilities refer to their source card by [`InstanceId`] only, so a card and
//! its abilities can move between zones independently. The
//! [`AbilityRegistry`] builds abilities from data-driven keys when a card
//! instance is created; the instance sorts them into its three collections.
//!
//! [`InstanceId`]: crate::core::InstanceId

mod activated;
mod builtins;
mod cost;
mod registry;
mod static_ability;
mod triggered;

pub use activated::ActivatedAbility;
pub use cost::Cost;
pub use registry::{AbilityFactory, AbilityOrigin, AbilityRegistry};
pub use static_ability::StaticAbility;
pub use triggered::TriggeredAbility;

use serde::{Deserialize, Serialize};

use crate::core::{AbilityId, InstanceId};

/// An instantiated ability.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Static(StaticAbility),
    Triggered(TriggeredAbility),
    Activated(ActivatedAbility),
}

impl Ability {
    #[must_use]
    pub fn id(&self) -> AbilityId {
        match self {
            Ability::Static(a) => a.id,
            Ability::Triggered(a) => a.id,
            Ability::Activated(a) => a.id,
        }
    }

    #[must_use]
    pub fn source(&self) -> InstanceId {
        match self {
            Ability::Static(a) => a.source,
            Ability::Triggered(a) => a.source,
            Ability::Activated(a) => a.source,
        }
    }
}
