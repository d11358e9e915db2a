//! Zone system.
//!
//! A zone is an ordered sequence of card instance ids with a kind and an
//! optional owner. Order matters for the library (top = last) and the stack
//! (top = last pushed). Every player has a hand, library, graveyard, exile and
//! battlefield; the stack is shared.
//!
//! A card instance id appears in at most one zone at any time. Movement is
//! done by [`GameState::move_card`](crate::core::GameState::move_card), which
//! removes from the source and appends to the destination in one step.

pub mod zone;

pub use zone::{Zone, ZoneKind};
