//! Core engine types: ids, players, mana, phases, state, actions, RNG,
//! configuration, and the crate error type.
//!
//! Everything here is plain data. The rules that move a `GameState` from one
//! snapshot to the next live in `rules`, `stack` and `abilities`.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod mana;
pub mod phase;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, Targets};
pub use config::{GameConfig, ZoneId};
pub use entity::{AbilityId, InstanceId};
pub use error::{IllegalAction, Reference, Result, RulesError};
pub use mana::{ManaColor, ManaCost, ManaPool};
pub use phase::{Phase, Step};
pub use player::{Player, PlayerId, PlayerZones};
pub use rng::GameRng;
pub use state::GameState;
