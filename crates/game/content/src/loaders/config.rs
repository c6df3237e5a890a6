//! Game configuration loader.
//!
//! Reads optional tuning overrides from a TOML file; fields left out keep
//! the built-in defaults.

use std::path::Path;

use game_core::GameConfig;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Config file structure; every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigToml {
    move_speed: Option<f32>,
    jump_speed: Option<f32>,
    fall_speed: Option<f32>,
    jump_arc_height: Option<f32>,
    check_interval: Option<f32>,
    normal_jump_threshold: Option<i32>,
}

/// Loader for config overrides from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config overrides on top of the defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config TOML text on top of the defaults.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let overrides: ConfigToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        let mut config = GameConfig::default();
        if let Some(value) = overrides.move_speed {
            config.move_speed = value;
        }
        if let Some(value) = overrides.jump_speed {
            config.jump_speed = value;
        }
        if let Some(value) = overrides.fall_speed {
            config.fall_speed = value;
        }
        if let Some(value) = overrides.jump_arc_height {
            config.jump_arc_height = value;
        }
        if let Some(value) = overrides.check_interval {
            config.check_interval = value;
        }
        if let Some(value) = overrides.normal_jump_threshold {
            config.normal_jump_threshold = value;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = ConfigLoader::parse("move_speed = 3.5\nnormal_jump_threshold = 2\n").unwrap();
        assert_eq!(config.move_speed, 3.5);
        assert_eq!(config.normal_jump_threshold, 2);
        assert_eq!(config.jump_speed, GameConfig::DEFAULT_JUMP_SPEED);
    }

    #[test]
    fn empty_file_keeps_the_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn loads_from_a_file_on_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fall_speed = 9.0\n").unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.fall_speed, 9.0);
    }
}
