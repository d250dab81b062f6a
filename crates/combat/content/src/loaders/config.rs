//! Challenge configuration loader.

use std::path::Path;

use combat_core::ChallengeConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for challenge configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`ChallengeConfig`] from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> LoadResult<ChallengeConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ChallengeConfig> {
        let config: ChallengeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse challenge config TOML: {}", e))?;

        if config.width == 0 || config.height == 0 {
            anyhow::bail!(
                "Challenge grid must be non-empty (got {}x{})",
                config.width,
                config.height
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use combat_core::Area;

    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = ConfigLoader::parse("max_rounds = 5").unwrap();
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.width, ChallengeConfig::DEFAULT_WIDTH);
        assert_eq!(config.move_limit, ChallengeConfig::DEFAULT_MOVE_LIMIT);
        assert!(config.restricted_areas.is_empty());
    }

    #[test]
    fn loads_restricted_areas_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
width = 12
height = 8
exchanges_per_round = 2
restricted_areas = [
    [{{ x = 6, y = 0, width = 6, height = 8 }}],
    [{{ x = 0, y = 0, width = 6, height = 8 }}],
]
"#
        )
        .unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!((config.width, config.height), (12, 8));
        assert_eq!(config.exchanges_per_round, 2);
        assert_eq!(config.restrictions_for(1), &[Area::new(0, 0, 6, 8)]);
    }

    #[test]
    fn rejects_empty_grid_and_missing_file() {
        assert!(ConfigLoader::parse("width = 0").is_err());

        let dir = tempfile::tempdir().unwrap();
        let error = ConfigLoader::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}
