//! The per-actor turn state machine.
//!
//! Phases cycle `WaitingForActions -> PrepareNextAction ->
//! FindTileUponAction -> PlayResult -> (loop)`; the machine idles in
//! `WaitingForActions` between turns and re-enters whenever a new ordered
//! card list arrives. Actions execute strictly in queue order: nothing
//! starts until the previous travel's completion or interruption has been
//! processed.

use crate::board::TileGrid;
use crate::card::{Card, CardKind};
use crate::config::GameConfig;
use crate::deck::GameRng;
use crate::state::{ActionQueue, ActorState, Coordinate, Facing, ObstacleRegistry, TriggerEffect};

use super::signals::{Signal, SignalQueue, SkipReason};
use super::travel::{TravelOutcome, TravelTask};

/// Phases of the per-actor turn state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolverPhase {
    #[default]
    WaitingForActions,
    PrepareNextAction,
    FindTileUponAction,
    PlayResult,
}

/// What the driving session must do after advancing the machine.
#[derive(Debug, PartialEq)]
pub enum Directive {
    /// Nothing in flight; the machine idles until the next card list.
    Idle,
    /// Bind this travel to the actor's slot and poll it each tick.
    StartTravel(TravelTask),
}

/// External interruption raised by collaborators outside the core (wall
/// and spike proximity triggers). The caller must drop the actor's travel
/// slot before forwarding the interruption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptCause {
    /// Collision with a non-passive wall; recover on the given tile and
    /// continue with the remaining cards.
    WallCollision { recover: Coordinate },
    /// Contact with a spike; the turn ends and the session owns the death
    /// transition.
    SpikeContact { recover: Coordinate },
}

/// Walks an ordered card list one action at a time against the board.
///
/// One instance per actor: the player and the ghost replay actor run
/// independent resolvers over the shared read-mostly board.
#[derive(Clone, Debug, Default)]
pub struct TurnResolver {
    phase: ResolverPhase,
    queue: ActionQueue,
    current_card: Option<Card>,
    target: Option<Coordinate>,
    in_flight: bool,
}

impl TurnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ResolverPhase {
        self.phase
    }

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// True when the machine sits in `WaitingForActions` with no travel
    /// outstanding.
    pub fn is_idle(&self) -> bool {
        self.phase == ResolverPhase::WaitingForActions && !self.in_flight
    }

    /// Entry point: replaces the action order for this turn. An empty list
    /// leaves the machine idling with no signals. Returns how many trailing
    /// cards were dropped for exceeding the queue bound.
    pub fn start_card_actions(&mut self, cards: impl IntoIterator<Item = Card>) -> usize {
        debug_assert!(!self.in_flight, "new action order while a travel is in flight");
        self.in_flight = false;
        let dropped = self.queue.replace(cards);
        self.current_card = None;
        self.target = None;
        self.phase = if self.queue.is_empty() {
            ResolverPhase::WaitingForActions
        } else {
            ResolverPhase::PrepareNextAction
        };
        dropped
    }

    /// Runs the machine until it idles or hands the driver a travel.
    pub fn advance(
        &mut self,
        actor: &mut ActorState,
        grid: &TileGrid,
        config: &GameConfig,
        rng: &mut GameRng,
        signals: &mut SignalQueue,
    ) -> Directive {
        if self.in_flight {
            debug_assert!(false, "advance called while a travel is in flight");
            return Directive::Idle;
        }
        loop {
            match self.phase {
                ResolverPhase::WaitingForActions => return Directive::Idle,
                ResolverPhase::PrepareNextAction => match self.queue.pop_front() {
                    None => {
                        self.current_card = None;
                        self.target = None;
                        self.phase = ResolverPhase::WaitingForActions;
                    }
                    Some(card) => {
                        self.current_card = Some(card);
                        self.phase = ResolverPhase::FindTileUponAction;
                    }
                },
                ResolverPhase::FindTileUponAction => {
                    let Some(card) = self.current_card else {
                        debug_assert!(false, "FindTileUponAction with no current card");
                        self.phase = ResolverPhase::PrepareNextAction;
                        continue;
                    };
                    self.target = grid
                        .tile_in_direction(actor.current_tile, actor.facing, card.distance)
                        .map(|tile| tile.coordinate());
                    self.phase = ResolverPhase::PlayResult;
                }
                ResolverPhase::PlayResult => {
                    let Some(card) = self.current_card else {
                        debug_assert!(false, "PlayResult with no current card");
                        self.phase = ResolverPhase::PrepareNextAction;
                        continue;
                    };
                    match card.kind {
                        CardKind::TurnLeft | CardKind::TurnRight => {
                            actor.facing = if card.kind == CardKind::TurnLeft {
                                actor.facing.rotated_left()
                            } else {
                                actor.facing.rotated_right()
                            };
                            // No travel time; the destination is where we stand.
                            signals.push(Signal::ReachedDestination {
                                actor: actor.id,
                                tile: actor.current_tile,
                            });
                            self.finish_action();
                        }
                        CardKind::Move => match self.target.and_then(|cell| grid.tile_at(cell)) {
                            None => self.skip(actor, card, SkipReason::NoTile, signals),
                            Some(tile) => {
                                let task = TravelTask::linear(
                                    actor.id,
                                    actor.position,
                                    actor.current_tile,
                                    tile.snap_position(),
                                    tile.coordinate(),
                                    config,
                                );
                                self.in_flight = true;
                                return Directive::StartTravel(task);
                            }
                        },
                        CardKind::Jump => {
                            match self.jump_destination(actor, card, grid, config, rng) {
                                None => self.skip(actor, card, SkipReason::NoTile, signals),
                                Some((destination, snap)) => {
                                    let task = TravelTask::parabolic(
                                        actor.id,
                                        actor.position,
                                        actor.current_tile,
                                        snap,
                                        destination,
                                        config,
                                    );
                                    self.in_flight = true;
                                    return Directive::StartTravel(task);
                                }
                            }
                        }
                        _ => self.skip(actor, card, SkipReason::UnhandledCard, signals),
                    }
                }
            }
        }
    }

    /// Consumes a finished travel: snaps the actor, runs the obstacle-card
    /// injection and trigger, emits the arrival signal, and continues the
    /// machine.
    pub fn on_travel_complete(
        &mut self,
        outcome: TravelOutcome,
        actor: &mut ActorState,
        grid: &TileGrid,
        obstacles: &mut ObstacleRegistry,
        config: &GameConfig,
        rng: &mut GameRng,
        signals: &mut SignalQueue,
    ) -> Directive {
        if !self.in_flight {
            debug_assert!(false, "travel completion without a travel in flight");
            return Directive::Idle;
        }
        self.in_flight = false;
        actor.place(outcome.arrived, outcome.final_position);

        if outcome.into_hole {
            signals.push(Signal::ReachedDestination {
                actor: actor.id,
                tile: outcome.arrived,
            });
            signals.push(Signal::ActorFell {
                actor: actor.id,
                tile: outcome.arrived,
            });
            self.halt();
            return Directive::Idle;
        }

        if let Some((coordinate, card)) = outcome.captured {
            let still_active = obstacles
                .obstacle_at(coordinate)
                .is_some_and(|obstacle| obstacle.is_active());
            if still_active {
                if let Some(card) = card {
                    // Single-use injection; a saturated queue drops it.
                    self.queue.push_front(card);
                }
                let effect = obstacles.trigger(coordinate, actor.id, signals);
                signals.push(Signal::ReachedDestination {
                    actor: actor.id,
                    tile: outcome.arrived,
                });
                self.finish_action();
                if matches!(effect, Ok(TriggerEffect::FinishReached)) {
                    self.halt();
                    return Directive::Idle;
                }
                return self.advance(actor, grid, config, rng, signals);
            }
        }

        signals.push(Signal::ReachedDestination {
            actor: actor.id,
            tile: outcome.arrived,
        });
        self.finish_action();
        self.advance(actor, grid, config, rng, signals)
    }

    /// External interruption; the caller has already dropped the travel
    /// slot. Walls recover and continue; spikes end the turn.
    pub fn interrupt(
        &mut self,
        cause: InterruptCause,
        actor: &mut ActorState,
        grid: &TileGrid,
        config: &GameConfig,
        rng: &mut GameRng,
        signals: &mut SignalQueue,
    ) -> Directive {
        self.in_flight = false;
        let recover = match cause {
            InterruptCause::WallCollision { recover } | InterruptCause::SpikeContact { recover } => {
                recover
            }
        };
        let position = grid
            .tile_at(recover)
            .map(|tile| tile.snap_position())
            .unwrap_or_else(|| recover.to_world());
        actor.place(recover, position);

        match cause {
            InterruptCause::WallCollision { .. } => {
                self.finish_action();
                self.advance(actor, grid, config, rng, signals)
            }
            InterruptCause::SpikeContact { .. } => {
                self.halt();
                Directive::Idle
            }
        }
    }

    /// Spring-assisted jumps pick a pseudo-random diagonal at distance-1;
    /// normal jumps overshoot one extra tile when the naive target sits
    /// lower than the launch tile.
    fn jump_destination(
        &self,
        actor: &ActorState,
        card: Card,
        grid: &TileGrid,
        config: &GameConfig,
        rng: &mut GameRng,
    ) -> Option<(Coordinate, glam::Vec3)> {
        if card.distance > config.normal_jump_threshold {
            // TODO: pick the diagonal from the direction of travel once
            // that design lands; uniform choice is the current placeholder.
            let diagonal = Facing::DIAGONALS[rng.index(Facing::DIAGONALS.len())];
            let tile = grid.tile_in_direction(actor.current_tile, diagonal, card.distance - 1)?;
            return Some((tile.coordinate(), tile.snap_position()));
        }
        let naive = self.target.and_then(|cell| grid.tile_at(cell))?;
        let launch = grid.tile_at(actor.current_tile)?;
        if naive.elevation() < launch.elevation() {
            if let Some(overshoot) =
                grid.tile_in_direction(actor.current_tile, actor.facing, card.distance + 1)
            {
                return Some((overshoot.coordinate(), overshoot.snap_position()));
            }
        }
        Some((naive.coordinate(), naive.snap_position()))
    }

    fn skip(
        &mut self,
        actor: &ActorState,
        card: Card,
        reason: SkipReason,
        signals: &mut SignalQueue,
    ) {
        signals.push(Signal::ActionSkipped {
            actor: actor.id,
            card,
            reason,
        });
        self.finish_action();
    }

    fn finish_action(&mut self) {
        self.current_card = None;
        self.target = None;
        self.phase = ResolverPhase::PrepareNextAction;
    }

    /// Ends the turn early: queue cleared, machine back to idle.
    fn halt(&mut self) {
        self.queue.clear();
        self.current_card = None;
        self.target = None;
        self.phase = ResolverPhase::WaitingForActions;
    }
}
