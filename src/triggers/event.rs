//! Game events.
//!
//! Events are published by the engine after it diffs the snapshot before and
//! after an action (and after state-based actions). Triggered abilities
//! listen for them. Creature death is the only event modeled.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, InstanceId, PlayerId};
use crate::zones::ZoneKind;

/// Event kind, used by trigger conditions to pick what they listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CreatureDied,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::CreatureDied => write!(f, "CREATURE_DIED"),
        }
    }
}

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// A creature moved from a battlefield to a graveyard.
    ///
    /// `controller` is who controlled it on the battlefield.
    CreatureDied {
        card: InstanceId,
        controller: PlayerId,
        owner: PlayerId,
    },
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::CreatureDied { .. } => EventKind::CreatureDied,
        }
    }

    /// The card the event is about.
    #[must_use]
    pub fn subject(&self) -> InstanceId {
        match self {
            GameEvent::CreatureDied { card, .. } => *card,
        }
    }

    /// Who controlled the subject when the event happened.
    #[must_use]
    pub fn controller(&self) -> PlayerId {
        match self {
            GameEvent::CreatureDied { controller, .. } => *controller,
        }
    }

    /// Deaths between two snapshots: creatures on a battlefield in `before`
    /// that sit in a graveyard in `after`. Ordered by instance id.
    ///
    /// Creature-ness and controller come from `before`, so they reflect the
    /// last moment the card was on the battlefield.
    #[must_use]
    pub fn diff_deaths(before: &GameState, after: &GameState) -> Vec<GameEvent> {
        before
            .battlefield_creatures()
            .filter(|card| {
                after
                    .zone_kind_of(card.id)
                    .map(|kind| kind == ZoneKind::Graveyard)
                    .unwrap_or(false)
            })
            .map(|card| GameEvent::CreatureDied {
                card: card.id,
                controller: card.controller,
                owner: card.owner,
            })
            .collect()
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::CreatureDied { card, .. } => write!(f, "{}{{{}}}", self.kind(), card),
        }
    }
}
