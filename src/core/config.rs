//! Game configuration types.
//!
//! The engine is configured once at game start with a `GameConfig`. All
//! fields have rules-accurate defaults; builders override the ones a test or
//! host needs.

use serde::{Deserialize, Serialize};

/// Zone identifier.
///
/// Zone ids are allocated at game start: five per player plus one shared
/// stack zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u16);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// Complete game configuration.
///
/// ## Example
///
/// ```
/// use rust_mtg::core::GameConfig;
///
/// let config = GameConfig::new(2)
///     .with_starting_life(30)
///     .with_seed(7)
///     .without_shuffle();
///
/// assert_eq!(config.starting_life, 30);
/// assert!(!config.shuffle_libraries);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players. Combat assumes exactly two.
    pub player_count: usize,

    /// Life total each player starts with.
    pub starting_life: i64,

    /// Cards drawn into each hand at game start.
    pub opening_hand_size: usize,

    /// Seed for library shuffling.
    pub seed: u64,

    /// Shuffle libraries at game start.
    pub shuffle_libraries: bool,

    /// The starting player skips the draw on turn 1.
    pub skip_first_draw: bool,

    /// Bound on trigger/SBA cascade rounds per action.
    pub max_event_rounds: usize,

    /// Applied actions kept for undo. Oldest checkpoints are dropped first.
    pub max_undo_depth: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            starting_life: 20,
            opening_hand_size: 7,
            seed: 0,
            shuffle_libraries: true,
            skip_first_draw: true,
            max_event_rounds: 16,
            max_undo_depth: 64,
        }
    }
}

impl GameConfig {
    /// Create a configuration for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(player_count >= 2, "Must have at least 2 players");
        assert!(player_count <= 8, "At most 8 players supported");

        Self {
            player_count,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep libraries in deck-list order (top = last card listed).
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_libraries = false;
        self
    }

    #[must_use]
    pub fn with_first_draw(mut self) -> Self {
        self.skip_first_draw = false;
        self
    }

    #[must_use]
    pub fn with_max_event_rounds(mut self, rounds: usize) -> Self {
        self.max_event_rounds = rounds;
        self
    }

    #[must_use]
    pub fn with_max_undo_depth(mut self, depth: usize) -> Self {
        self.max_undo_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id() {
        let id = ZoneId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Zone(5)");
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();

        assert_eq!(config.player_count, 2);
        assert_eq!(config.starting_life, 20);
        assert_eq!(config.opening_hand_size, 7);
        assert!(config.shuffle_libraries);
        assert!(config.skip_first_draw);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new(2)
            .with_opening_hand_size(0)
            .with_first_draw()
            .with_max_event_rounds(4)
            .with_max_undo_depth(2);

        assert_eq!(config.opening_hand_size, 0);
        assert!(!config.skip_first_draw);
        assert_eq!(config.max_event_rounds, 4);
        assert_eq!(config.max_undo_depth, 2);
    }

    #[test]
    #[should_panic(expected = "Must have at least 2 players")]
    fn test_single_player_rejected() {
        GameConfig::new(1);
    }
}
