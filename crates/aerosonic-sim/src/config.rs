//! Soundscape settings persisted as TOML in the platform config directory

use std::path::{Path, PathBuf};

use aerosonic_core::SoundscapeConfig;
use toml::{Table, Value};
use tracing::{debug, info};

use crate::error::Result;

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aerosonic")
        .join("soundscape.toml")
}

/// Load settings key by key. Anything missing, unreadable or mistyped keeps its default.
pub fn load_config(path: &Path) -> SoundscapeConfig {
    let mut config = SoundscapeConfig::default();
    let Some(table) = std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.parse::<Table>().ok())
    else {
        debug!("No usable config at {}, using defaults", path.display());
        return config;
    };

    for (key, value) in &table {
        let number = match value {
            Value::Float(f) => *f as f32,
            Value::Integer(i) => *i as f32,
            _ => {
                debug!("Ignoring non-numeric setting {}", key);
                continue;
            }
        };
        if !config.apply_setting(key, number) {
            debug!("Ignoring unknown setting {}", key);
        }
    }

    let config = config.sanitized();
    for (key, value) in config.settings() {
        info!("{}: {}", key, value);
    }
    config
}

pub fn save_config(path: &Path, config: &SoundscapeConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut table = Table::new();
    for (key, value) in config.settings() {
        // Shortest decimal form: 0.8 rather than 0.800000011920929
        let value = value.to_string().parse::<f64>().unwrap_or(f64::from(value));
        table.insert(key.to_string(), Value::Float(value));
    }
    std::fs::write(path, toml::to_string_pretty(&table)?)?;
    info!("Saved soundscape settings to {}", path.display());
    Ok(())
}
