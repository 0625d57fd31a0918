mod types;

pub use types::*;

use anyhow::{Context, Result};
use sportforged_common::Show;
use sportforged_matcher::SportMatcher;
use std::collections::HashSet;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./sportforged.toml",
        "~/.config/sportforged/config.toml",
        "/etc/sportforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    tracing::debug!("No config file found, using defaults");
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &config.sports {
        let sport = &entry.sport;
        if sport.id.trim().is_empty() {
            anyhow::bail!("Sport entry has an empty id");
        }
        if !seen.insert(sport.id.as_str()) {
            anyhow::bail!("Duplicate sport id '{}'", sport.id);
        }
        if !sport.enabled {
            continue;
        }

        if sport.patterns.is_empty() && sport.pattern_sets.is_empty() && !sport.structured_matching
        {
            anyhow::bail!(
                "Sport '{}' is enabled but has no patterns and structured matching is off",
                sport.id
            );
        }

        for name in &sport.pattern_sets {
            if !config.pattern_sets.contains_key(name) {
                anyhow::bail!("Sport '{}' references unknown pattern set '{}'", sport.id, name);
            }
        }

        if let Some(table) = &sport.team_alias_table {
            if !config.team_aliases.contains_key(table) {
                anyhow::bail!(
                    "Sport '{}' references unknown team alias table '{}'",
                    sport.id,
                    table
                );
            }
        }

        match &entry.show {
            Some(path) if !path.exists() => {
                tracing::warn!("Show file for sport '{}' does not exist: {:?}", sport.id, path);
            }
            None => {
                tracing::warn!("Sport '{}' has no show file configured", sport.id);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Compile a sport's patterns against the shared library.
pub fn compile_sport(config: &Config, entry: &SportEntry) -> Result<SportMatcher> {
    SportMatcher::new(&entry.sport, &config.library())
        .with_context(|| format!("Failed to compile sport '{}'", entry.sport.id))
}

/// Load a show snapshot from JSON.
pub fn load_show(path: &Path) -> Result<Show> {
    Show::load(path).with_context(|| format!("Failed to load show file: {:?}", path))
}
