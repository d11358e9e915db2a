//! Trigger system for event-driven abilities.
//!
//! - [`GameEvent`]: something that happened (a creature died)
//! - [`TriggerCondition`]: event kind plus a [`TriggerPredicate`]
//!
//! The engine diffs snapshots to find events and offers each one to every
//! triggered ability in the game, in ability id order. The abilities
//! themselves live in `abilities`.

mod condition;
mod event;

pub use condition::{ConditionContext, TriggerCondition, TriggerPredicate};
pub use event::{EventKind, GameEvent};
