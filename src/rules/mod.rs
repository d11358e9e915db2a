//! Rules: the turn machine, continuous effects, state-based actions, combat,
//! casting, and the engine that sequences them.
//!
//! Each submodule is a set of pure functions from one snapshot to the next.
//! Only [`Engine`] holds state.

pub mod casting;
pub mod combat;
pub mod engine;
pub mod layers;
pub mod sba;
pub mod turn;

pub use casting::{
    activate_ability, can_activate_ability, can_cast_spell, can_play_land, cast_spell,
    check_activate_ability, check_cast_spell, check_play_land, play_land,
};
pub use combat::{declare_attackers, declare_blockers, resolve_combat_damage, CombatState, DamagePass};
pub use engine::{ActionOutcome, Engine};
pub use layers::{apply_continuous_effects, remove_continuous_effects};
pub use sba::{check_and_apply_sbas, SbaOutcome};
pub use turn::{advance, begin_step, TURN_SEQUENCE};
