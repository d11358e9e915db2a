//! Player identification and per-player game data.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Seats are 0-based and turn order is seat order.
//!
//! ## Player
//!
//! Life total, mana pool, the ids of the player's personal zones, and the
//! per-turn land counter. Players are created at game start and never removed;
//! losing only sets the `has_lost` flag.

use serde::{Deserialize, Serialize};

use super::config::ZoneId;
use super::mana::ManaPool;

/// Player identifier (seat index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_mtg::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(2).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The next seat in turn order, wrapping around.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count.max(1)) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Ids of the zones a single player owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerZones {
    pub hand: ZoneId,
    pub library: ZoneId,
    pub graveyard: ZoneId,
    pub exile: ZoneId,
    pub battlefield: ZoneId,
}

impl PlayerZones {
    /// All five zone ids, in a fixed order.
    #[must_use]
    pub fn all(&self) -> [ZoneId; 5] {
        [self.hand, self.library, self.graveyard, self.exile, self.battlefield]
    }
}

/// A player in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Life total. No floor: it can go arbitrarily negative.
    pub life: i64,

    pub mana_pool: ManaPool,

    pub zones: PlayerZones,

    /// Lands played during the current turn.
    pub lands_played_this_turn: u32,

    /// Set by state-based actions; never cleared.
    pub has_lost: bool,
}

impl Player {
    /// Create a player with an empty mana pool.
    #[must_use]
    pub fn new(id: PlayerId, life: i64, zones: PlayerZones) -> Self {
        Self {
            id,
            life,
            mana_pool: ManaPool::default(),
            zones,
            lands_played_this_turn: 0,
            has_lost: false,
        }
    }

    /// Does this player own the given zone?
    #[must_use]
    pub fn owns_zone(&self, zone: ZoneId) -> bool {
        self.zones.all().contains(&zone)
    }
}
