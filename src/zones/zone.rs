//! A single zone and its card sequence.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::config::ZoneId;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;

/// What kind of zone this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Hand,
    Library,
    Graveyard,
    Exile,
    Battlefield,
    Stack,
}

impl ZoneKind {
    /// Zones whose cards are permanents in play.
    #[must_use]
    pub const fn is_battlefield(self) -> bool {
        matches!(self, ZoneKind::Battlefield)
    }

    /// Display name used when zones are created.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ZoneKind::Hand => "Hand",
            ZoneKind::Library => "Library",
            ZoneKind::Graveyard => "Graveyard",
            ZoneKind::Exile => "Exile",
            ZoneKind::Battlefield => "Battlefield",
            ZoneKind::Stack => "Stack",
        }
    }
}

/// A zone: an ordered list of card instance ids.
///
/// Index 0 is the bottom; the last element is the top.
///
/// ```
/// use rust_mtg::core::{InstanceId, PlayerId, ZoneId};
/// use rust_mtg::zones::{Zone, ZoneKind};
///
/// let mut library = Zone::new(ZoneId::new(1), ZoneKind::Library, Some(PlayerId::new(0)));
/// library.push(InstanceId::new(10));
/// library.push(InstanceId::new(11));
///
/// assert_eq!(library.top(), Some(InstanceId::new(11)));
/// assert_eq!(library.name, "Player 0 Library");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,

    /// Display name.
    pub name: String,

    pub kind: ZoneKind,

    /// `None` for shared zones (the stack).
    pub owner: Option<PlayerId>,

    cards: Vector<InstanceId>,
}

impl Zone {
    /// Create an empty zone with a generated display name.
    #[must_use]
    pub fn new(id: ZoneId, kind: ZoneKind, owner: Option<PlayerId>) -> Self {
        let name = match owner {
            Some(player) => format!("{} {}", player, kind.label()),
            None => kind.label().to_string(),
        };

        Self {
            id,
            name,
            kind,
            owner,
            cards: Vector::new(),
        }
    }

    /// Cards in order, bottom first.
    #[must_use]
    pub fn cards(&self) -> &Vector<InstanceId> {
        &self.cards
    }

    /// Replace the whole sequence (used for shuffling).
    pub fn set_cards(&mut self, cards: Vector<InstanceId>) {
        self.cards = cards;
    }

    #[must_use]
    pub fn contains(&self, card: InstanceId) -> bool {
        self.cards.contains(&card)
    }

    /// The top card (last pushed).
    #[must_use]
    pub fn top(&self) -> Option<InstanceId> {
        self.cards.last().copied()
    }

    /// Put a card on top.
    pub fn push(&mut self, card: InstanceId) {
        self.cards.push_back(card);
    }

    /// Remove and return the top card.
    pub fn pop(&mut self) -> Option<InstanceId> {
        self.cards.pop_back()
    }

    /// Remove a card wherever it is. Returns whether it was present.
    pub fn remove(&mut self, card: InstanceId) -> bool {
        match self.cards.index_of(&card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> Zone {
        Zone::new(ZoneId::new(10), ZoneKind::Stack, None)
    }

    #[test]
    fn test_shared_zone_name() {
        assert_eq!(stack().name, "Stack");
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut zone = stack();
        zone.push(InstanceId::new(1));
        zone.push(InstanceId::new(2));
        zone.push(InstanceId::new(3));

        assert_eq!(zone.pop(), Some(InstanceId::new(3)));
        assert_eq!(zone.pop(), Some(InstanceId::new(2)));
        assert_eq!(zone.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut zone = stack();
        for id in 1..=4 {
            zone.push(InstanceId::new(id));
        }

        assert!(zone.remove(InstanceId::new(2)));
        assert!(!zone.remove(InstanceId::new(2)));

        let order: Vec<_> = zone.cards().iter().map(|c| c.raw()).collect();
        assert_eq!(order, vec![1, 3, 4]);
    }

    #[test]
    fn test_battlefield_kind() {
        assert!(ZoneKind::Battlefield.is_battlefield());
        assert!(!ZoneKind::Graveyard.is_battlefield());
    }
}
