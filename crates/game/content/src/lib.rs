//! Authoring-format loaders for the puzzle: level layouts, per-level card
//! pools, and config overrides, all converted into `game-core` types.
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LevelData, LevelLoader, LoadResult};
