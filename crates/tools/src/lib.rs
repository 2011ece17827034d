//! Helpers shared by the developer binaries: config loading, CLI flag mapping, and
//! logging setup.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use dungeon::{CorridorStrategy, DungeonConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Corridor strategy as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Nearest,
    Chaotic,
    Generic,
}

impl From<StrategyArg> for CorridorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Nearest => CorridorStrategy::NearestSibling,
            StrategyArg::Chaotic => CorridorStrategy::Chaotic,
            StrategyArg::Generic => CorridorStrategy::GenericSibling,
        }
    }
}

/// Reads a TOML dungeon config; missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<DungeonConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: DungeonConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate().with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Flags that override individual config fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overrides {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub strategy: Option<StrategyArg>,
}

impl Overrides {
    pub fn apply(self, mut config: DungeonConfig) -> DungeonConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        config
    }
}

/// Installs an env-filtered subscriber writing to stderr, `info` unless `RUST_LOG` says
/// otherwise.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon::Size;
    use tempfile::tempdir;

    #[test]
    fn partial_config_files_keep_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.toml");
        fs::write(
            &path,
            "width = 60\nstrategy = \"chaotic\"\n\n[min_region]\nwidth = 12\nheight = 9\n",
        )
        .expect("write config");

        let config = load_config(&path).expect("load");
        assert_eq!(config.width, 60);
        assert_eq!(config.height, DungeonConfig::default().height);
        assert_eq!(config.strategy, CorridorStrategy::Chaotic);
        assert_eq!(config.min_region, Size::new(12, 9));
    }

    #[test]
    fn invalid_and_missing_files_are_errors() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        fs::write(&path, "padding = 0\n").expect("write config");
        assert!(load_config(&path).is_err());
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = Overrides { width: Some(50), height: None, strategy: Some(StrategyArg::Generic) };
        let config = overrides.apply(DungeonConfig::default());
        assert_eq!(config.width, 50);
        assert_eq!(config.height, 40);
        assert_eq!(config.strategy, CorridorStrategy::GenericSibling);
    }
}
