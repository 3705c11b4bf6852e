mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Returns the config directory: <platform config dir>/inertia/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("inertia");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: <platform config dir>/inertia/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from disk, or return default if not found.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if path.exists() {
        load_config_from(&path)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&contents)?;
    config
        .fusion
        .validate()
        .with_context(|| format!("invalid fusion settings in {}", path.display()))?;
    info!(?path, "Loaded config");
    Ok(config)
}

/// Save config to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("inertia-config-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn saved_config_loads_back() {
        let path = scratch_path("saved");
        let mut config = AppConfig::default();
        config.fusion.history_window_capacity = 10;
        config.replay.capture_path = Some(PathBuf::from("inertial-events.json"));

        save_config_to(&path, &config).unwrap();
        let loaded = load_config_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.fusion, config.fusion);
        assert_eq!(loaded.replay.capture_path, config.replay.capture_path);
    }

    #[test]
    fn invalid_file_is_rejected() {
        let path = scratch_path("invalid");
        std::fs::write(&path, "[fusion]\nlow_pass_alpha = 2.0\n").unwrap();
        let result = load_config_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
