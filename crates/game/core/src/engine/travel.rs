//! Travel tasks: the movement executor.
//!
//! A travel is a small state object advanced once per tick by the driving
//! session. Cancellation is dropping or replacing the task; there is no
//! stop call. While a walk or jump is in flight the task periodically
//! re-samples the grid cell under the actor and may morph itself into a
//! fall (lower ledge, hole) or capture an active obstacle for arrival
//! handling.

use glam::Vec3;

use crate::board::TileGrid;
use crate::card::Card;
use crate::config::GameConfig;
use crate::state::{ActorId, Coordinate, ObstacleRegistry};

/// Geometric path a travel follows, parameterized over normalized time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TravelPath {
    Linear {
        from: Vec3,
        to: Vec3,
    },
    /// Quadratic Bezier with the control point lifted `arc_height` above
    /// the chord midpoint.
    Parabolic {
        from: Vec3,
        to: Vec3,
        arc_height: f32,
    },
    Fall {
        from: Vec3,
        to: Vec3,
    },
}

impl TravelPath {
    pub fn end(&self) -> Vec3 {
        match *self {
            TravelPath::Linear { to, .. }
            | TravelPath::Parabolic { to, .. }
            | TravelPath::Fall { to, .. } => to,
        }
    }

    /// Position at normalized time `t`, clamped to [0, 1].
    pub fn position_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            TravelPath::Linear { from, to } | TravelPath::Fall { from, to } => from.lerp(to, t),
            TravelPath::Parabolic {
                from,
                to,
                arc_height,
            } => {
                let control = from.midpoint(to) + Vec3::Y * arc_height;
                let a = from.lerp(control, t);
                let b = control.lerp(to, t);
                a.lerp(b, t)
            }
        }
    }
}

/// How a travel is descending, when it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Descent {
    None,
    LowerLedge,
    Hole,
}

/// Final report of a finished travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TravelOutcome {
    pub actor: ActorId,
    pub arrived: Coordinate,
    pub final_position: Vec3,
    /// Active obstacle entered during travel, with its associated card.
    pub captured: Option<(Coordinate, Option<Card>)>,
    /// The travel ended as a plunge below a hole tile.
    pub into_hole: bool,
}

/// Progress report from polling a travel task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TravelProgress {
    InProgress,
    Completed(TravelOutcome),
}

/// A movement operation advanced once per tick by the driving session.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelTask {
    actor: ActorId,
    path: TravelPath,
    origin_cell: Coordinate,
    destination: Coordinate,
    duration: f32,
    elapsed: f32,
    check_interval: f32,
    check_timer: f32,
    fall_speed: f32,
    last_sample: Coordinate,
    position: Vec3,
    captured: Option<(Coordinate, Option<Card>)>,
    descent: Descent,
}

impl TravelTask {
    /// Straight walk between two snap positions.
    pub fn linear(
        actor: ActorId,
        from: Vec3,
        origin: Coordinate,
        to: Vec3,
        destination: Coordinate,
        config: &GameConfig,
    ) -> Self {
        let duration = horizontal_tiles(from, to) / config.move_speed.max(f32::EPSILON);
        Self::with_path(
            actor,
            TravelPath::Linear { from, to },
            origin,
            destination,
            duration,
            config,
        )
    }

    /// Jump arc between two snap positions.
    pub fn parabolic(
        actor: ActorId,
        from: Vec3,
        origin: Coordinate,
        to: Vec3,
        destination: Coordinate,
        config: &GameConfig,
    ) -> Self {
        let duration = horizontal_tiles(from, to) / config.jump_speed.max(f32::EPSILON);
        Self::with_path(
            actor,
            TravelPath::Parabolic {
                from,
                to,
                arc_height: config.jump_arc_height,
            },
            origin,
            destination,
            duration,
            config,
        )
    }

    fn with_path(
        actor: ActorId,
        path: TravelPath,
        origin: Coordinate,
        destination: Coordinate,
        duration: f32,
        config: &GameConfig,
    ) -> Self {
        let position = path.position_at(0.0);
        Self {
            actor,
            path,
            origin_cell: origin,
            destination,
            duration,
            elapsed: 0.0,
            check_interval: config.check_interval,
            check_timer: 0.0,
            fall_speed: config.fall_speed,
            last_sample: origin,
            position,
            captured: None,
            descent: Descent::None,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Advances the travel by `dt` seconds, running the periodic grid
    /// re-sample. The grid must not change while a travel is in flight.
    pub fn poll(
        &mut self,
        dt: f32,
        grid: &TileGrid,
        obstacles: &ObstacleRegistry,
    ) -> TravelProgress {
        self.elapsed += dt;
        let t = if self.duration <= f32::EPSILON {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        self.position = self.path.position_at(t);

        if t >= 1.0 {
            return self.complete(grid, obstacles);
        }

        // Falls are terminal; no further sampling once one starts.
        if matches!(self.path, TravelPath::Fall { .. }) {
            return TravelProgress::InProgress;
        }

        self.check_timer += dt;
        if self.check_timer < self.check_interval {
            return TravelProgress::InProgress;
        }
        self.check_timer = 0.0;

        let cell = Coordinate::from_world(self.position);
        if cell == self.last_sample {
            return TravelProgress::InProgress;
        }
        let left = self.last_sample;
        self.last_sample = cell;

        match grid.tile_at(cell) {
            Some(tile) if tile.is_hole() => {
                let bottom = tile.snap_position() - Vec3::Y * GameConfig::HOLE_FALL_DEPTH;
                self.begin_fall(bottom, cell, Descent::Hole);
            }
            Some(tile) => {
                // Walking off a ledge becomes a drop; jump arcs handle
                // their landing height through target selection instead.
                let walked_off_ledge = matches!(self.path, TravelPath::Linear { .. })
                    && grid
                        .tile_at(left)
                        .is_some_and(|leaving| tile.elevation() < leaving.elevation());
                if walked_off_ledge {
                    self.begin_fall(tile.snap_position(), cell, Descent::LowerLedge);
                } else if let Some(obstacle) = obstacles.obstacle_at(cell) {
                    if obstacle.is_active() {
                        self.captured = Some((cell, obstacle.card()));
                    }
                }
            }
            // Unregistered cells are overflown; arcs may cross gaps.
            None => {}
        }
        TravelProgress::InProgress
    }

    fn complete(&mut self, grid: &TileGrid, obstacles: &ObstacleRegistry) -> TravelProgress {
        if self.descent != Descent::Hole {
            if let Some(tile) = grid.tile_at(self.destination) {
                if tile.is_hole() {
                    let bottom = tile.snap_position() - Vec3::Y * GameConfig::HOLE_FALL_DEPTH;
                    self.begin_fall(bottom, self.destination, Descent::Hole);
                    return TravelProgress::InProgress;
                }
            }
            // Arrival may land on an active obstacle the interval sampling
            // missed; zero-length travels never capture, which keeps the
            // queue-front injection single-use per arrival.
            if self.captured.is_none() && self.destination != self.origin_cell {
                if let Some(obstacle) = obstacles.obstacle_at(self.destination) {
                    if obstacle.is_active() {
                        self.captured = Some((self.destination, obstacle.card()));
                    }
                }
            }
        }
        TravelProgress::Completed(TravelOutcome {
            actor: self.actor,
            arrived: self.destination,
            final_position: self.path.end(),
            captured: self.captured,
            into_hole: self.descent == Descent::Hole,
        })
    }

    /// Aborts the current path and drops straight down to `to`.
    fn begin_fall(&mut self, to: Vec3, destination: Coordinate, descent: Descent) {
        let drop = (self.position.y - to.y).max(0.0);
        self.path = TravelPath::Fall {
            from: self.position,
            to,
        };
        self.destination = destination;
        self.duration = drop / self.fall_speed.max(f32::EPSILON);
        self.elapsed = 0.0;
        self.descent = descent;
        self.last_sample = destination;
    }
}

fn horizontal_tiles(from: Vec3, to: Vec3) -> f32 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    (dx * dx + dz * dz).sqrt() / GameConfig::TILE_SIZE
}
