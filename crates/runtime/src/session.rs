//! Authoritative game session.
//!
//! The session is the explicit dependency-injection context the core asks
//! for: one tile grid, one obstacle registry, one deck, and a resolver plus
//! travel slot per actor, owned together and passed by reference into the
//! core. Scheduling is cooperative and single-threaded; all mutation runs
//! through [`GameSession::tick`] and the command methods, so the shared
//! board needs no locking.

use game_content::LevelData;
use game_core::{
    ActorId, ActorState, Card, Coordinate, Deck, Directive, Facing, GameConfig, GameRng,
    InterruptCause, ObstacleRegistry, Signal, SignalQueue, TileGrid, TravelProgress, TravelTask,
    TurnResolver,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};
use crate::events::{DeathCause, Event, EventBus, ObstacleEvent, SessionEvent, TurnEvent};

/// Unique identity handed to dealt cards for UI bookkeeping. The core only
/// ever sees the card values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u64);

/// A card as dealt into a hand: core value plus external identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtCard {
    pub id: CardId,
    pub card: Card,
}

/// Session tuning.
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub game: GameConfig,
    /// Seed for the shuffle and resolver stream; drawn from entropy when
    /// absent.
    pub seed: Option<u64>,
}

struct ActorSlot {
    state: ActorState,
    resolver: TurnResolver,
    travel: Option<TravelTask>,
    start: (Coordinate, Facing),
    turn_active: bool,
    alive: bool,
}

/// One live level: board, obstacles, deck, and the resolver-driven actors.
pub struct GameSession {
    config: GameConfig,
    grid: TileGrid,
    obstacles: ObstacleRegistry,
    deck: Deck<Card>,
    deck_source: Vec<Card>,
    rng: GameRng,
    seed: u64,
    actors: Vec<ActorSlot>,
    signals: SignalQueue,
    bus: EventBus,
    next_card_id: u64,
    complete: bool,
}

impl GameSession {
    /// Builds a session from loaded level data. Obstacles reset to their
    /// authored defaults before any turn, and the deck is shuffled once.
    pub fn new(level: LevelData, config: SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = GameRng::new(seed);

        let mut obstacles = level.obstacles;
        obstacles.reset_to_defaults();

        let mut deck = Deck::from_cards(level.deck.clone());
        deck.shuffle(&mut rng);

        let mut actors = vec![Self::slot(ActorId::PLAYER, level.player_start, &level.grid)];
        if let Some(start) = level.ghost_start {
            actors.push(Self::slot(ActorId::GHOST, start, &level.grid));
        }

        info!(level = %level.name, seed, actors = actors.len(), "session created");
        Self {
            config: config.game,
            grid: level.grid,
            obstacles,
            deck,
            deck_source: level.deck,
            rng,
            seed,
            actors,
            signals: SignalQueue::new(),
            bus: EventBus::new(),
            next_card_id: 0,
            complete: false,
        }
    }

    fn slot(id: ActorId, start: (Coordinate, Facing), grid: &TileGrid) -> ActorSlot {
        let mut state = ActorState::new(id, start.0, start.1);
        if let Some(tile) = grid.tile_at(start.0) {
            state.position = tile.snap_position();
        }
        ActorSlot {
            state,
            resolver: TurnResolver::new(),
            travel: None,
            start,
            turn_active: false,
            alive: true,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn actor(&self, actor: ActorId) -> Option<&ActorState> {
        self.actors
            .iter()
            .find(|slot| slot.state.id == actor)
            .map(|slot| &slot.state)
    }

    /// True when the actor has no travel in flight and its resolver idles.
    pub fn is_actor_idle(&self, actor: ActorId) -> bool {
        self.actors
            .iter()
            .find(|slot| slot.state.id == actor)
            .is_some_and(|slot| slot.travel.is_none() && slot.resolver.is_idle())
    }

    /// True when every actor has settled.
    pub fn is_idle(&self) -> bool {
        self.actors
            .iter()
            .all(|slot| slot.travel.is_none() && slot.resolver.is_idle())
    }

    /// Deals up to `count` cards off the top of the deck. A dry deck with
    /// the level unfinished is one of the terminal conditions.
    pub fn deal_hand(&mut self, count: usize) -> Vec<DealtCard> {
        let mut hand = Vec::with_capacity(count);
        for _ in 0..count {
            match self.deck.deal() {
                Some(card) => {
                    let id = CardId(self.next_card_id);
                    self.next_card_id += 1;
                    hand.push(DealtCard { id, card });
                }
                None => break,
            }
        }
        if hand.is_empty() && count > 0 && !self.complete {
            warn!("deck exhausted");
            self.bus.publish(Event::Session(SessionEvent::OutOfCards {
                actor: ActorId::PLAYER,
            }));
        }
        debug!(dealt = hand.len(), remaining = self.deck.len(), "hand dealt");
        hand
    }

    /// Inbound entry point: commits an ordered card list for one actor.
    /// Wild cards must already be resolved to a concrete kind by the
    /// caller; anything else left unresolved is skipped by the resolver.
    pub fn play_cards(&mut self, actor: ActorId, cards: Vec<Card>) -> Result<()> {
        let index = self.slot_index(actor)?;
        {
            let slot = &self.actors[index];
            if !slot.alive {
                return Err(RuntimeError::ActorDead(actor));
            }
            if slot.travel.is_some() || !slot.resolver.is_idle() {
                return Err(RuntimeError::TurnInProgress(actor));
            }
        }
        debug!(%actor, count = cards.len(), "action order committed");

        let Self {
            actors,
            grid,
            config,
            rng,
            signals,
            ..
        } = self;
        let slot = &mut actors[index];
        let dropped = slot.resolver.start_card_actions(cards);
        if dropped > 0 {
            warn!(%actor, dropped, "action order truncated to queue capacity");
        }
        slot.turn_active = !slot.resolver.is_idle();
        let directive = slot
            .resolver
            .advance(&mut slot.state, grid, config, rng, signals);
        if let Directive::StartTravel(task) = directive {
            slot.travel = Some(task);
        }
        self.drain_signals();
        Ok(())
    }

    /// External interruption from the collision collaborators (walls,
    /// spikes). Cancels the in-flight travel before touching actor state.
    pub fn interrupt(&mut self, actor: ActorId, cause: InterruptCause) -> Result<()> {
        let index = self.slot_index(actor)?;
        debug!(%actor, ?cause, "external interruption");

        let Self {
            actors,
            grid,
            config,
            rng,
            signals,
            ..
        } = self;
        let slot = &mut actors[index];
        slot.travel = None;
        let directive = slot
            .resolver
            .interrupt(cause, &mut slot.state, grid, config, rng, signals);
        if let Directive::StartTravel(task) = directive {
            slot.travel = Some(task);
        }

        if matches!(cause, InterruptCause::SpikeContact { .. }) {
            let slot = &mut self.actors[index];
            slot.alive = false;
            slot.turn_active = false;
            self.bus.publish(Event::Session(SessionEvent::ActorDied {
                actor,
                cause: DeathCause::Spiked,
            }));
        }
        self.drain_signals();
        Ok(())
    }

    /// Advances every actor's in-flight travel by `dt` seconds and feeds
    /// completions back into the resolvers.
    pub fn tick(&mut self, dt: f32) {
        for index in 0..self.actors.len() {
            self.tick_actor(index, dt);
        }
        self.drain_signals();
    }

    fn tick_actor(&mut self, index: usize, dt: f32) {
        let Self {
            actors,
            grid,
            obstacles,
            config,
            rng,
            signals,
            ..
        } = self;
        let slot = &mut actors[index];
        let Some(task) = slot.travel.as_mut() else {
            return;
        };
        match task.poll(dt, grid, obstacles) {
            TravelProgress::InProgress => {}
            TravelProgress::Completed(outcome) => {
                slot.travel = None;
                let directive = slot.resolver.on_travel_complete(
                    outcome,
                    &mut slot.state,
                    grid,
                    obstacles,
                    config,
                    rng,
                    signals,
                );
                if let Directive::StartTravel(next) = directive {
                    slot.travel = Some(next);
                }
            }
        }
    }

    /// Restores the level to its authored state for a retry: obstacles to
    /// defaults, actors to their starts, deck rebuilt and reshuffled.
    pub fn reset_level(&mut self) {
        info!("level reset");
        self.obstacles.reset_to_defaults();
        self.deck = Deck::from_cards(self.deck_source.clone());
        self.deck.shuffle(&mut self.rng);
        self.complete = false;
        for slot in &mut self.actors {
            let (start, facing) = slot.start;
            slot.resolver = TurnResolver::new();
            slot.travel = None;
            slot.turn_active = false;
            slot.alive = true;
            slot.state = ActorState::new(slot.state.id, start, facing);
            if let Some(tile) = self.grid.tile_at(start) {
                slot.state.position = tile.snap_position();
            }
        }
    }

    /// Logical state snapshot for the persistence collaborator: obstacle
    /// flags and actor poses only, never movement state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed,
            complete: self.complete,
            cards_remaining: self.deck.len(),
            obstacles: self
                .obstacles
                .iter()
                .map(|(coordinate, obstacle)| ObstacleSnapshot {
                    coordinate: *coordinate,
                    kind: obstacle.kind_name().to_string(),
                    is_active: obstacle.is_active(),
                })
                .collect(),
            actors: self
                .actors
                .iter()
                .map(|slot| ActorSnapshot {
                    actor: slot.state.id,
                    tile: slot.state.current_tile,
                    facing: slot.state.facing,
                    alive: slot.alive,
                })
                .collect(),
        }
    }

    fn slot_index(&self, actor: ActorId) -> Result<usize> {
        self.actors
            .iter()
            .position(|slot| slot.state.id == actor)
            .ok_or(RuntimeError::UnknownActor(actor))
    }

    /// Fans accumulated core signals out to the log and the event bus, and
    /// reports turns that resolved to completion.
    fn drain_signals(&mut self) {
        let signals: Vec<Signal> = self.signals.drain().collect();
        for signal in signals {
            match signal {
                Signal::ReachedDestination { actor, tile } => {
                    debug!(%actor, %tile, "reached destination");
                    self.bus
                        .publish(Event::Turn(TurnEvent::ReachedDestination { actor, tile }));
                }
                Signal::ObstacleTriggered {
                    actor,
                    coordinate,
                    effect,
                } => {
                    debug!(%actor, %coordinate, ?effect, "obstacle triggered");
                    self.bus.publish(Event::Obstacle(ObstacleEvent::Triggered {
                        actor,
                        coordinate,
                        effect,
                    }));
                }
                Signal::LevelComplete { actor } => {
                    info!(%actor, "level complete");
                    // A ghost replay crossing the finish does not win the
                    // level for the player.
                    if actor.is_player() {
                        self.complete = true;
                    }
                    if let Ok(index) = self.slot_index(actor) {
                        self.actors[index].turn_active = false;
                    }
                    self.bus
                        .publish(Event::Session(SessionEvent::LevelComplete { actor }));
                }
                Signal::ActorKnockedBack { actor, from } => {
                    debug!(%actor, %from, "actor knocked back");
                    self.bus
                        .publish(Event::Turn(TurnEvent::ActorKnockedBack { actor, from }));
                }
                Signal::ActorFell { actor, tile } => {
                    info!(%actor, %tile, "actor fell into a hole");
                    if let Ok(index) = self.slot_index(actor) {
                        let slot = &mut self.actors[index];
                        slot.alive = false;
                        slot.turn_active = false;
                    }
                    self.bus.publish(Event::Session(SessionEvent::ActorDied {
                        actor,
                        cause: DeathCause::FellInHole,
                    }));
                }
                Signal::ActionSkipped {
                    actor,
                    card,
                    reason,
                } => {
                    // Log-only diagnostic; never broadcast.
                    warn!(%actor, %card, ?reason, "action skipped");
                }
            }
        }

        for index in 0..self.actors.len() {
            let resolved = {
                let slot = &self.actors[index];
                slot.turn_active && slot.travel.is_none() && slot.resolver.is_idle()
            };
            if resolved {
                self.actors[index].turn_active = false;
                let actor = self.actors[index].state.id;
                debug!(%actor, "action order resolved");
                self.bus
                    .publish(Event::Turn(TurnEvent::ActionsResolved { actor }));
            }
        }
    }
}

/// Serializable logical snapshot of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub complete: bool,
    pub cards_remaining: usize,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub actors: Vec<ActorSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub coordinate: Coordinate,
    pub kind: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub actor: ActorId,
    pub tile: Coordinate,
    pub facing: Facing,
    pub alive: bool,
}
