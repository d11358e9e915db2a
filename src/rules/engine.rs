//! Engine orchestrator.
//!
//! The [`Engine`] owns the current snapshot and sequences every rules
//! component for each submitted action:
//!
//! 1. strip continuous effects so the action sees printed values
//! 2. apply the action-specific transform
//! 3. reapply continuous effects
//! 4. diff against the pre-action snapshot and publish `CREATURE_DIED`
//!    events to triggered abilities
//! 5. run state-based actions to a fixed point
//! 6. diff again and publish, repeating 4-6 while anything still dies
//!
//! Step 6 is bounded by `GameConfig::max_event_rounds`.
//!
//! ## Two entry points
//!
//! [`Engine::try_action`] returns the reason an action was refused.
//! [`Engine::submit_action`] never fails: a refused action is reported as
//! [`ActionOutcome::Ignored`] and leaves the state untouched.

use std::collections::VecDeque;
use std::sync::Arc;

use im::Vector;
use tracing::{debug, error};

use super::layers::{apply_continuous_effects, remove_continuous_effects};
use super::sba::check_and_apply_sbas;
use super::{casting, combat, turn};
use crate::abilities::{AbilityRegistry, TriggeredAbility};
use crate::cards::{CardCatalog, CardId};
use crate::core::{
    Action, GameConfig, GameRng, GameState, IllegalAction, InstanceId, PlayerId, Result,
    RulesError,
};
use crate::stack;
use crate::triggers::GameEvent;

/// What happened to a submitted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was applied; these events were published.
    Applied { events: Vec<GameEvent> },
    /// The action was refused and nothing changed.
    Ignored { reason: RulesError },
}

impl ActionOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied { .. })
    }

    /// Events published by an applied action. Empty when ignored.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        match self {
            ActionOutcome::Applied { events } => events,
            ActionOutcome::Ignored { .. } => &[],
        }
    }
}

/// Snapshot kept for undo.
#[derive(Clone, Debug)]
struct Checkpoint {
    state: GameState,
    event_log: Vector<GameEvent>,
}

/// A running game.
///
/// The catalog and registry are read-only context shared with the host.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
///
/// use rust_mtg::abilities::AbilityRegistry;
/// use rust_mtg::cards::{CardCatalog, CardDefinition, CardId};
/// use rust_mtg::core::{Action, GameConfig, PlayerId};
/// use rust_mtg::rules::Engine;
///
/// let catalog = CardCatalog::new()
///     .with_card(CardDefinition::creature(CardId::new(1), "Grizzly Bears", 2, 2));
/// let deck = vec![CardId::new(1); 10];
///
/// let mut engine = Engine::new(
///     GameConfig::default().with_seed(3),
///     Arc::new(catalog),
///     Arc::new(AbilityRegistry::with_builtins()),
///     &[deck.clone(), deck],
/// )
/// .unwrap();
///
/// assert!(engine.submit_action(PlayerId::new(0), &Action::PassPriority).is_applied());
/// // Player 0 no longer holds priority.
/// assert!(!engine.submit_action(PlayerId::new(0), &Action::PassPriority).is_applied());
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    config: GameConfig,
    catalog: Arc<CardCatalog>,
    registry: Arc<AbilityRegistry>,
    state: GameState,
    history: VecDeque<Checkpoint>,
    event_log: Vector<GameEvent>,
}

impl Engine {
    /// Set up a new game, one deck per seat.
    ///
    /// Each deck is instantiated into its owner's library (shuffled with the
    /// configured seed unless shuffling is off) and opening hands are drawn.
    pub fn new(
        config: GameConfig,
        catalog: Arc<CardCatalog>,
        registry: Arc<AbilityRegistry>,
        decks: &[Vec<CardId>],
    ) -> Result<Self> {
        if !(2..=8).contains(&config.player_count) {
            return Err(RulesError::InvalidParameter {
                key: "game_config".to_string(),
                param: "player_count".to_string(),
                reason: format!("{} seats, expected 2 to 8", config.player_count),
            });
        }
        if decks.len() != config.player_count {
            return Err(RulesError::InvalidParameter {
                key: "game_config".to_string(),
                param: "player_count".to_string(),
                reason: format!(
                    "{} decks for {} players",
                    decks.len(),
                    config.player_count
                ),
            });
        }

        let mut state = GameState::new(config.player_count, config.starting_life);
        let rng = GameRng::new(config.seed);

        for (player, deck) in PlayerId::all(config.player_count).zip(decks) {
            let mut order = deck.clone();
            if config.shuffle_libraries {
                rng.for_context(&format!("library:{}", player.index()))
                    .shuffle(&mut order);
            }
            let library = state.player(player)?.zones.library;
            for card in order {
                state.create_card(catalog.lookup(card)?, player, library, &registry)?;
            }
        }

        for player in PlayerId::all(config.player_count) {
            for _ in 0..config.opening_hand_size {
                state.draw_card(player)?;
            }
        }

        debug!(
            players = config.player_count,
            seed = config.seed,
            cards = state.cards.len(),
            "game started"
        );

        Ok(Self::from_state(config, catalog, registry, apply_continuous_effects(&state)))
    }

    /// Wrap an existing snapshot.
    #[must_use]
    pub fn from_state(
        config: GameConfig,
        catalog: Arc<CardCatalog>,
        registry: Arc<AbilityRegistry>,
        state: GameState,
    ) -> Self {
        Self {
            config,
            catalog,
            registry,
            state,
            history: VecDeque::new(),
            event_log: Vector::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// Every event published so far, oldest first.
    #[must_use]
    pub fn event_log(&self) -> &Vector<GameEvent> {
        &self.event_log
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// The last player standing, once everyone else has lost.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    /// Number of applied actions that can still be undone. At most
    /// `GameConfig::max_undo_depth`.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    // === Actions ===

    /// Apply an action, or report why not. Illegal input never raises.
    pub fn submit_action(&mut self, player: PlayerId, action: &Action) -> ActionOutcome {
        match self.try_action(player, action) {
            Ok(events) => ActionOutcome::Applied { events },
            Err(reason) => {
                if reason.is_recoverable() {
                    debug!(player = %player, action = action.name(), %reason, "action ignored");
                } else {
                    error!(player = %player, action = action.name(), %reason, "action failed");
                }
                ActionOutcome::Ignored { reason }
            }
        }
    }

    /// Apply an action. On error the state is unchanged.
    ///
    /// Only the priority holder may act.
    pub fn try_action(&mut self, player: PlayerId, action: &Action) -> Result<Vec<GameEvent>> {
        if self.state.is_game_over() {
            return Err(IllegalAction::GameOver.into());
        }
        self.state.player(player)?;
        if self.state.priority_player != player {
            return Err(IllegalAction::NotPriorityHolder(player).into());
        }

        let (next, events) = self.run(&self.state, player, action)?;
        debug!(player = %player, action = action.name(), events = events.len(), "action applied");
        self.commit(next, events.clone());
        Ok(events)
    }

    /// Declare attackers for the active player.
    ///
    /// Not part of the [`Action`] set, so it bypasses the priority filter
    /// and reports errors directly.
    pub fn declare_attackers(
        &mut self,
        player: PlayerId,
        attackers: &[InstanceId],
    ) -> Result<Vec<GameEvent>> {
        self.apply_declaration(|state| combat::declare_attackers(state, player, attackers))
    }

    /// Declare blockers for the defending player, as `(blocker, attacker)`.
    pub fn declare_blockers(
        &mut self,
        player: PlayerId,
        blocks: &[(InstanceId, InstanceId)],
    ) -> Result<Vec<GameEvent>> {
        self.apply_declaration(|state| combat::declare_blockers(state, player, blocks))
    }

    /// Run state-based actions and publish deaths, without an action.
    ///
    /// Hosts that edit the snapshot directly (tests, scenario setup) use this
    /// to bring it back to a settled state. Leaves no undo checkpoint when
    /// nothing changed.
    pub fn check_state(&mut self) -> Result<Vec<GameEvent>> {
        let (next, events) = self.settle(&self.state, &self.state)?;
        if next != self.state || !events.is_empty() {
            self.commit(next, events.clone());
        }
        Ok(events)
    }

    /// Restore the snapshot from before the last applied action.
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(checkpoint) => {
                self.state = checkpoint.state;
                self.event_log = checkpoint.event_log;
                debug!(turn = self.state.turn, "undo");
                true
            }
            None => false,
        }
    }

    fn apply_declaration(
        &mut self,
        declare: impl FnOnce(&GameState) -> Result<GameState>,
    ) -> Result<Vec<GameEvent>> {
        if self.state.is_game_over() {
            return Err(IllegalAction::GameOver.into());
        }
        let mut declared = declare(&remove_continuous_effects(&self.state))?;
        stack::note_action(&mut declared);
        let (next, events) = self.settle(&self.state, &declared)?;
        self.commit(next, events.clone());
        Ok(events)
    }

    fn commit(&mut self, next: GameState, events: Vec<GameEvent>) {
        let previous = std::mem::replace(&mut self.state, next);
        if self.config.max_undo_depth > 0 {
            if self.history.len() >= self.config.max_undo_depth {
                self.history.pop_front();
            }
            self.history.push_back(Checkpoint {
                state: previous,
                event_log: self.event_log.clone(),
            });
        }
        self.event_log.extend(events);
    }

    /// Transform and settle one action without touching `self`.
    fn run(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<(GameState, Vec<GameEvent>)> {
        let stripped = remove_continuous_effects(state);
        let transformed = match action {
            Action::PlayLand { card } => casting::play_land(&stripped, player, *card)?,
            Action::CastSpell { card, targets } => {
                casting::cast_spell(&stripped, player, *card, targets)?
            }
            Action::ActivateAbility {
                card,
                ability,
                targets,
            } => casting::activate_ability(&stripped, player, *card, *ability, targets)?,
            Action::PassPriority => stack::pass_priority(&stripped)?.0,
            Action::AdvanceStep => self.advance_step(&stripped, player)?,
            Action::AdvanceTurn => return self.advance_turn(state, player),
        };

        self.settle(state, &transformed)
    }

    /// Step until the turn number changes, settling after every step so
    /// combat deaths happen before cleanup.
    fn advance_turn(&self, state: &GameState, player: PlayerId) -> Result<(GameState, Vec<GameEvent>)> {
        let start = state.turn;
        let mut current = state.clone();
        let mut events = Vec::new();
        while current.turn == start && !current.is_game_over() {
            let (next, more) = self.run(&current, player, &Action::AdvanceStep)?;
            current = next;
            events.extend(more);
        }
        Ok((current, events))
    }

    fn advance_step(&self, state: &GameState, player: PlayerId) -> Result<GameState> {
        if player != state.active_player {
            return Err(IllegalAction::NotActivePlayer(player).into());
        }
        if !state.stack_is_empty() {
            return Err(IllegalAction::StackNotEmpty.into());
        }
        let next = turn::begin_step(&turn::advance(state), &self.config)?;
        Ok(stack::set_active_player_priority(&next))
    }

    /// Reapply layers, then publish deaths and run state-based actions until
    /// nothing else dies.
    fn settle(&self, before: &GameState, after: &GameState) -> Result<(GameState, Vec<GameEvent>)> {
        let mut baseline = before.clone();
        let mut current = apply_continuous_effects(after);
        let mut events = Vec::new();

        for _ in 0..self.config.max_event_rounds {
            let deaths = GameEvent::diff_deaths(&baseline, &current);
            let resolved = self.dispatch(&current, &deaths)?;
            let sba = check_and_apply_sbas(&resolved)?;

            let quiet = deaths.is_empty() && !sba.changed();
            events.extend(deaths);
            if quiet {
                return Ok((sba.state, events));
            }
            baseline = current;
            current = sba.state;
        }

        error!(rounds = self.config.max_event_rounds, "event cascade did not converge");
        Err(RulesError::NonConvergence {
            passes: self.config.max_event_rounds,
        })
    }

    /// Resolve every triggered ability that fires on `events`.
    ///
    /// Events are handled in order; for each one, the abilities that fire
    /// resolve in ability id order.
    fn dispatch(&self, state: &GameState, events: &[GameEvent]) -> Result<GameState> {
        let mut next = state.clone();
        for event in events {
            debug!(%event, "event published");
            let mut fired: Vec<TriggeredAbility> = next
                .cards
                .values()
                .flat_map(|card| card.triggered_abilities.iter())
                .filter(|ability| ability.check_trigger(event, &next))
                .cloned()
                .collect();
            fired.sort_by_key(|ability| ability.id);

            for ability in fired {
                next = apply_continuous_effects(&ability.resolve(&next, event)?);
            }
        }
        Ok(next)
    }
}
