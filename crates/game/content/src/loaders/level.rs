//! Level data loader.
//!
//! Loads tile layout, obstacle placement, actor starts, and the per-level
//! card pool from level RON files. Card kinds and facings are authored as
//! names and parsed through the core enums.

use std::path::Path;
use std::str::FromStr;

use game_core::{
    Card, CardKind, Coordinate, Facing, MovingWall, ObstacleKind, ObstacleRegistry, ObstacleState,
    Tile, TileGrid,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Level file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelRon {
    name: String,
    /// (x, y, elevation); negative elevation is a hole.
    tiles: Vec<(i32, i32, i32)>,
    #[serde(default)]
    obstacles: Vec<ObstacleRon>,
    player_start: StartRon,
    #[serde(default)]
    ghost_start: Option<StartRon>,
    /// Card pool expanded into the level deck.
    cards: Vec<CardPoolRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StartRon {
    at: (i32, i32),
    #[serde(default)]
    facing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObstacleRon {
    at: (i32, i32),
    kind: ObstacleKindRon,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    card: Option<CardRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum ObstacleKindRon {
    Spike,
    Spring,
    Ramp,
    TurnTable,
    MovingWall { track: Vec<(i32, i32)> },
    Finish,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardRon {
    kind: String,
    distance: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardPoolRon {
    kind: String,
    distance: i32,
    copies: u32,
}

fn default_active() -> bool {
    true
}

/// Fully assembled level ready to hand to a session.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub name: String,
    pub grid: TileGrid,
    pub obstacles: ObstacleRegistry,
    pub player_start: (Coordinate, Facing),
    pub ghost_start: Option<(Coordinate, Facing)>,
    /// Unshuffled level deck; the session shuffles it once at start.
    pub deck: Vec<Card>,
}

/// Loader for level data from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level from a RON file.
    pub fn load(path: &Path) -> LoadResult<LevelData> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse level RON text into core types.
    pub fn parse(content: &str) -> LoadResult<LevelData> {
        // Enable `implicit_some` so optional actor/obstacle fields may be
        // authored as bare values (e.g. `ghost_start: (...)`) as well as the
        // explicit `Some(...)` form.
        let options = ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME);
        let data: LevelRon = options
            .from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON: {}", e))?;

        let grid = TileGrid::new(
            data.tiles
                .iter()
                .map(|&(x, y, elevation)| Tile::new(Coordinate::new(x, y), elevation)),
        );

        let mut obstacles = ObstacleRegistry::new();
        for entry in &data.obstacles {
            let coordinate = Coordinate::new(entry.at.0, entry.at.1);
            anyhow::ensure!(
                grid.tile_at(coordinate).is_some(),
                "level '{}': obstacle at {} has no tile",
                data.name,
                coordinate
            );
            let kind = match &entry.kind {
                ObstacleKindRon::Spike => ObstacleKind::Spike,
                ObstacleKindRon::Spring => ObstacleKind::Spring,
                ObstacleKindRon::Ramp => ObstacleKind::Ramp,
                ObstacleKindRon::TurnTable => ObstacleKind::TurnTable,
                ObstacleKindRon::Finish => ObstacleKind::Finish,
                ObstacleKindRon::MovingWall { track } => {
                    let track: Vec<Coordinate> = track
                        .iter()
                        .map(|&(x, y)| Coordinate::new(x, y))
                        .collect();
                    let start = track.iter().position(|&cell| cell == coordinate).unwrap_or(0);
                    let wall = MovingWall::new(track, start).map_err(|e| {
                        anyhow::anyhow!("level '{}': wall at {}: {}", data.name, coordinate, e)
                    })?;
                    ObstacleKind::MovingWall(wall)
                }
            };
            let mut state = ObstacleState::new(kind, entry.active);
            if let Some(card) = &entry.card {
                state = state.with_card(parse_card(&card.kind, card.distance)?);
            }
            obstacles
                .insert(coordinate, state)
                .map_err(|e| anyhow::anyhow!("level '{}': {}", data.name, e))?;
        }

        let player_start = parse_start(&data.player_start)?;
        anyhow::ensure!(
            grid.tile_at(player_start.0).is_some(),
            "level '{}': player start {} has no tile",
            data.name,
            player_start.0
        );
        let ghost_start = data.ghost_start.as_ref().map(parse_start).transpose()?;

        let mut deck = Vec::new();
        for entry in &data.cards {
            let card = parse_card(&entry.kind, entry.distance)?;
            for _ in 0..entry.copies {
                deck.push(card);
            }
        }

        Ok(LevelData {
            name: data.name,
            grid,
            obstacles,
            player_start,
            ghost_start,
            deck,
        })
    }
}

fn parse_card(kind: &str, distance: i32) -> LoadResult<Card> {
    let kind = CardKind::from_str(kind)
        .map_err(|_| anyhow::anyhow!("unknown card kind '{}'", kind))?;
    Ok(Card::new(kind, distance))
}

fn parse_start(start: &StartRon) -> LoadResult<(Coordinate, Facing)> {
    let facing = match &start.facing {
        None => Facing::North,
        Some(name) => {
            Facing::from_str(name).map_err(|_| anyhow::anyhow!("unknown facing '{}'", name))?
        }
    };
    Ok((Coordinate::new(start.at.0, start.at.1), facing))
}
