/// Tunable parameters and compile-time bounds for the puzzle rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Linear travel speed in tiles per second.
    pub move_speed: f32,
    /// Horizontal speed of jump arcs in tiles per second.
    pub jump_speed: f32,
    /// Vertical fall speed in world units per second.
    pub fall_speed: f32,
    /// Apex height of parabolic jump paths, in world units above the chord.
    pub jump_arc_height: f32,
    /// Seconds between mid-travel grid re-samples.
    pub check_interval: f32,
    /// Jump distances above this count as spring-assisted.
    pub normal_jump_threshold: i32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum cards queued for one turn: the committed order plus any
    /// injected obstacle card.
    pub const MAX_QUEUE_CARDS: usize = 16;

    // ===== world geometry =====
    /// Grid pitch in world units.
    pub const TILE_SIZE: f32 = 1.0;
    /// World-space height of one elevation step.
    pub const ELEVATION_STEP: f32 = 0.5;
    /// How far below a hole tile's snap point a hole plunge targets.
    pub const HOLE_FALL_DEPTH: f32 = 10.0;

    // ===== shuffle pass counts =====
    pub const MIN_MACRO_SHUFFLES: u32 = 10;
    pub const MAX_MACRO_SHUFFLES: u32 = 15;
    pub const MIN_PASSES_PER_MACRO: u32 = 7;
    pub const MAX_PASSES_PER_MACRO: u32 = 15;

    // ===== moving walls =====
    /// Track advance speed in tiles per second.
    pub const WALL_SPEED: f32 = 2.5;
    /// Upper bound on a single wall move, whatever the track step length.
    pub const MAX_WALL_MOVE_SECONDS: f32 = 1.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MOVE_SPEED: f32 = 2.0;
    pub const DEFAULT_JUMP_SPEED: f32 = 2.5;
    pub const DEFAULT_FALL_SPEED: f32 = 6.0;
    pub const DEFAULT_JUMP_ARC_HEIGHT: f32 = 0.75;
    pub const DEFAULT_CHECK_INTERVAL: f32 = 0.1;
    pub const DEFAULT_NORMAL_JUMP_THRESHOLD: i32 = 1;

    pub fn new() -> Self {
        Self {
            move_speed: Self::DEFAULT_MOVE_SPEED,
            jump_speed: Self::DEFAULT_JUMP_SPEED,
            fall_speed: Self::DEFAULT_FALL_SPEED,
            jump_arc_height: Self::DEFAULT_JUMP_ARC_HEIGHT,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
            normal_jump_threshold: Self::DEFAULT_NORMAL_JUMP_THRESHOLD,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
