//! The game state snapshot.
//!
//! `GameState` is the single root value the rules operate on. Players, zones
//! and card instances live in `im` persistent maps, so cloning a state is O(1)
//! and every rules function can follow the same contract: take `&GameState`,
//! return a new `GameState`. The engine keeps the previous snapshots around
//! for undo at almost no cost.
//!
//! ## Zone layout
//!
//! Player `i` owns zones `5i..5i+4` (hand, library, graveyard, exile,
//! battlefield). The shared stack zone comes after the last player's zones.
//!
//! ## Invariants
//!
//! - `active_player` and `priority_player` are always valid player ids.
//! - A card instance id appears in exactly one zone sequence, and that zone
//!   is the instance's `zone`. [`GameState::move_card`] keeps both in sync.
//! - Card instances are never removed from `cards`; leaving play is a zone
//!   change.

use std::sync::Arc;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::config::ZoneId;
use super::entity::{AbilityId, InstanceId};
use super::error::{Reference, Result};
use super::phase::{Phase, Step};
use super::player::{Player, PlayerId, PlayerZones};
use crate::abilities::{AbilityOrigin, AbilityRegistry};
use crate::cards::{CardDefinition, CardInstance};
use crate::rules::combat::CombatState;
use crate::zones::{Zone, ZoneKind};

/// Zones per player: hand, library, graveyard, exile, battlefield.
const ZONES_PER_PLAYER: u16 = 5;

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: OrdMap<PlayerId, Player>,

    pub zones: OrdMap<ZoneId, Zone>,

    /// Every card instance ever created in this game.
    pub cards: OrdMap<InstanceId, CardInstance>,

    /// Whose turn it is.
    pub active_player: PlayerId,

    /// Who may act right now.
    pub priority_player: PlayerId,

    /// Turn number (starts at 1).
    pub turn: u32,

    pub phase: Phase,

    /// `None` during main phases.
    pub step: Option<Step>,

    pub stack_zone: ZoneId,

    /// Passes in a row with no intervening action.
    pub consecutive_passes: usize,

    /// Attackers and blocks for the current combat, if any.
    pub combat: Option<CombatState>,

    next_instance_id: u32,
    next_ability_id: u32,
}

impl GameState {
    /// Create an empty game: players with their zones and no cards.
    ///
    /// Starts at turn 1, Beginning/Untap, with seat 0 active and holding
    /// priority.
    ///
    /// ```
    /// use rust_mtg::core::{GameState, Phase, PlayerId, Step};
    ///
    /// let state = GameState::new(2, 20);
    /// assert_eq!(state.player_count(), 2);
    /// assert_eq!(state.turn, 1);
    /// assert_eq!((state.phase, state.step), (Phase::Beginning, Some(Step::Untap)));
    /// assert_eq!(state.priority_player, PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn new(player_count: usize, starting_life: i64) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 51, "Too many players for the zone id space");

        let mut players = OrdMap::new();
        let mut zones = OrdMap::new();

        for player in PlayerId::all(player_count) {
            let base = player.0 as u16 * ZONES_PER_PLAYER;
            let player_zones = PlayerZones {
                hand: ZoneId::new(base),
                library: ZoneId::new(base + 1),
                graveyard: ZoneId::new(base + 2),
                exile: ZoneId::new(base + 3),
                battlefield: ZoneId::new(base + 4),
            };

            for (id, kind) in [
                (player_zones.hand, ZoneKind::Hand),
                (player_zones.library, ZoneKind::Library),
                (player_zones.graveyard, ZoneKind::Graveyard),
                (player_zones.exile, ZoneKind::Exile),
                (player_zones.battlefield, ZoneKind::Battlefield),
            ] {
                zones.insert(id, Zone::new(id, kind, Some(player)));
            }
            players.insert(player, Player::new(player, starting_life, player_zones));
        }

        let stack_zone = ZoneId::new(player_count as u16 * ZONES_PER_PLAYER);
        zones.insert(stack_zone, Zone::new(stack_zone, ZoneKind::Stack, None));

        Self {
            players,
            zones,
            cards: OrdMap::new(),
            active_player: PlayerId::new(0),
            priority_player: PlayerId::new(0),
            turn: 1,
            phase: Phase::Beginning,
            step: Some(Step::Untap),
            stack_zone,
            consecutive_passes: 0,
            combat: None,
            next_instance_id: 1,
            next_ability_id: 1,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// All player ids in seat order.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.keys().copied()
    }

    /// The next seat after `player`. In a two-player game, the opponent.
    #[must_use]
    pub fn next_player(&self, player: PlayerId) -> PlayerId {
        player.next(self.player_count())
    }

    // === Lookups ===

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(&id).ok_or_else(|| Reference::Player(id).into())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players.get_mut(&id).ok_or_else(|| Reference::Player(id).into())
    }

    pub fn zone(&self, id: ZoneId) -> Result<&Zone> {
        self.zones.get(&id).ok_or_else(|| Reference::Zone(id).into())
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Result<&mut Zone> {
        self.zones.get_mut(&id).ok_or_else(|| Reference::Zone(id).into())
    }

    pub fn card(&self, id: InstanceId) -> Result<&CardInstance> {
        self.cards.get(&id).ok_or_else(|| Reference::Card(id).into())
    }

    pub fn card_mut(&mut self, id: InstanceId) -> Result<&mut CardInstance> {
        self.cards.get_mut(&id).ok_or_else(|| Reference::Card(id).into())
    }

    /// Kind of the zone a card is in.
    pub fn zone_kind_of(&self, card: InstanceId) -> Result<ZoneKind> {
        let zone = self.card(card)?.zone;
        Ok(self.zone(zone)?.kind)
    }

    /// Is the card on any battlefield? Unknown ids are not.
    #[must_use]
    pub fn is_on_battlefield(&self, card: InstanceId) -> bool {
        self.zone_kind_of(card)
            .map(ZoneKind::is_battlefield)
            .unwrap_or(false)
    }

    /// Battlefield permanents in instance-id order.
    pub fn battlefield(&self) -> impl Iterator<Item = &CardInstance> + '_ {
        self.cards.values().filter(move |card| {
            self.zones
                .get(&card.zone)
                .map(|zone| zone.kind.is_battlefield())
                .unwrap_or(false)
        })
    }

    /// Battlefield creatures, by current (derived) types.
    pub fn battlefield_creatures(&self) -> impl Iterator<Item = &CardInstance> + '_ {
        self.battlefield().filter(|card| card.is_creature())
    }

    /// The shared stack zone.
    pub fn stack(&self) -> Result<&Zone> {
        self.zone(self.stack_zone)
    }

    #[must_use]
    pub fn stack_is_empty(&self) -> bool {
        self.stack().map(Zone::is_empty).unwrap_or(true)
    }

    // === Game over ===

    /// Players not yet marked as having lost.
    pub fn remaining_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.values().filter(|p| !p.has_lost).map(|p| p.id)
    }

    /// At most one player remains.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.remaining_players().count() <= 1
    }

    /// The sole remaining player, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let mut remaining = self.remaining_players();
        match (remaining.next(), remaining.next()) {
            (Some(player), None) => Some(player),
            _ => None,
        }
    }

    // === Card creation and movement ===

    /// Allocate a fresh ability id.
    pub fn alloc_ability_id(&mut self) -> AbilityId {
        let id = AbilityId::new(self.next_ability_id);
        self.next_ability_id += 1;
        id
    }

    /// Create a card instance on top of `zone`.
    ///
    /// Every ability descriptor on the definition is instantiated through the
    /// registry. Fails without changing the state if the zone is unknown or a
    /// descriptor can't be built.
    pub fn create_card(
        &mut self,
        definition: Arc<CardDefinition>,
        owner: PlayerId,
        zone: ZoneId,
        registry: &AbilityRegistry,
    ) -> Result<InstanceId> {
        self.player(owner)?;
        self.zone(zone)?;

        let id = InstanceId::new(self.next_instance_id);
        let first_ability_id = self.next_ability_id;

        let mut abilities = Vec::with_capacity(definition.abilities.len());
        for descriptor in &definition.abilities {
            let origin = AbilityOrigin {
                id: self.alloc_ability_id(),
                source: id,
            };
            match registry.instantiate(descriptor, origin, self) {
                Ok(ability) => abilities.push(ability),
                Err(err) => {
                    self.next_ability_id = first_ability_id;
                    return Err(err);
                }
            }
        }

        self.next_instance_id += 1;
        let instance = CardInstance::new(id, definition, owner, zone).with_abilities(abilities);
        self.cards.insert(id, instance);
        self.zone_mut(zone)?.push(id);
        Ok(id)
    }

    /// Move a card to the top of another zone.
    ///
    /// Both zones are checked before anything changes. A card leaving the
    /// battlefield loses damage, counters, tapped state and sickness; a card
    /// landing anywhere but the stack or battlefield reverts to its owner's
    /// control.
    pub fn move_card(&mut self, card: InstanceId, to: ZoneId) -> Result<()> {
        let from = self.card(card)?.zone;
        let from_kind = self.zone(from)?.kind;
        let to_kind = self.zone(to)?.kind;

        self.zone_mut(from)?.remove(card);
        self.zone_mut(to)?.push(card);

        let instance = self.card_mut(card)?;
        instance.zone = to;

        if from_kind.is_battlefield() && !to_kind.is_battlefield() {
            instance.tapped = false;
            instance.damage = 0;
            instance.counters.clear();
            instance.summoning_sick = false;
            instance.entered_battlefield_turn = None;
        }
        if to_kind != ZoneKind::Stack {
            instance.targets.clear();
        }
        if !matches!(to_kind, ZoneKind::Stack | ZoneKind::Battlefield) {
            instance.controller = instance.owner;
        }
        Ok(())
    }

    /// Move the top card of a player's library to their hand.
    ///
    /// Drawing from an empty library does nothing and returns `None`.
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Option<InstanceId>> {
        let zones = self.player(player)?.zones;
        let Some(card) = self.zone(zones.library)?.top() else {
            return Ok(None);
        };
        self.move_card(card, zones.hand)?;
        Ok(Some(card))
    }

    /// Put a card onto its controller's battlefield as a new permanent.
    pub fn put_onto_battlefield(&mut self, card: InstanceId, controller: PlayerId) -> Result<()> {
        let battlefield = self.player(controller)?.zones.battlefield;
        self.move_card(card, battlefield)?;

        let turn = self.turn;
        let instance = self.card_mut(card)?;
        instance.controller = controller;
        instance.entered_battlefield_turn = Some(turn);
        instance.summoning_sick = true;
        Ok(())
    }

    /// Move a card to its owner's graveyard.
    pub fn put_into_graveyard(&mut self, card: InstanceId) -> Result<()> {
        let owner = self.card(card)?.owner;
        let graveyard = self.player(owner)?.zones.graveyard;
        self.move_card(card, graveyard)
    }

    /// Empty every player's mana pool.
    pub fn empty_mana_pools(&mut self) {
        let ids: Vec<_> = self.players.keys().copied().collect();
        for id in ids {
            if let Some(player) = self.players.get_mut(&id) {
                player.mana_pool.clear();
            }
        }
    }
}
