//! Effect system.
//!
//! - `Effect`: one-shot state changes (add mana, gain life, destroy, draw)
//! - `EffectContext`: source, controller, and chosen targets for a resolution
//! - `ContinuousEffect`: characteristic-changing effects of static abilities,
//!   tagged with the `Layer` they apply in
//!
//! Every effect is a pure function from one snapshot to the next.

mod continuous;
mod effect;

pub use continuous::{AffectedObjects, ContinuousEffect, Layer, Modification};
pub use effect::{Effect, EffectContext, EffectTarget};
