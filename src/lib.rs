//! # rust-mtg
//!
//! Rules engine for a two-player Magic-style trading card game.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: every rules function takes a `&GameState`
//!    and returns a new one. Persistent maps (`im`) make the copies cheap,
//!    which keeps undo and roll-back-on-error trivial.
//!
//! 2. **Rules as data**: cards carry ability and effect descriptors (a key
//!    plus parameters). The [`AbilityRegistry`] turns them into one of three
//!    closed ability variants when a card instance is created.
//!
//! 3. **Recompute, don't patch**: derived characteristics are rebuilt from
//!    printed values in layer order every time they are needed.
//!
//! ## Modules
//!
//! - `core`: ids, players, mana, phases, actions, configuration, errors, and
//!   the `GameState` snapshot
//! - `zones`: zones and their kinds
//! - `cards`: card definitions, instances, and the catalog
//! - `effects`: one-shot effects and layered continuous effects
//! - `triggers`: game events and trigger conditions
//! - `abilities`: static, triggered, and activated abilities, costs, and the
//!   ability registry
//! - `stack`: the stack and priority
//! - `rules`: turn structure, layers, state-based actions, combat, casting,
//!   and the [`Engine`]

pub mod core;
pub mod zones;
pub mod cards;
pub mod effects;
pub mod triggers;
pub mod abilities;
pub mod stack;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    AbilityId, Action, GameConfig, GameRng, GameState, IllegalAction, InstanceId, ManaColor,
    ManaCost, ManaPool, Phase, Player, PlayerId, Result, RulesError, Step, Targets, ZoneId,
};

pub use crate::zones::{Zone, ZoneKind};

pub use crate::cards::{
    CardCatalog, CardDefinition, CardId, CardInstance, CardType, Keyword, Params,
};

pub use crate::effects::{ContinuousEffect, Effect, Layer};

pub use crate::triggers::{EventKind, GameEvent, TriggerCondition};

pub use crate::abilities::{
    Ability, AbilityRegistry, ActivatedAbility, Cost, StaticAbility, TriggeredAbility,
};

pub use crate::stack::PassOutcome;

pub use crate::rules::{ActionOutcome, CombatState, Engine, SbaOutcome};
