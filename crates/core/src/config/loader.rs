//! Configuration file loader for the `.fitkit/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.fitkit/` directory, including:
//! - `config.toml`: Global settings
//! - `routines/*.yaml`: Routine definitions for the local store

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::routines::validate_routine;
use fk_protocol::config_models::GlobalConfig;
use fk_protocol::routine_models::{Routine, RoutineEdit};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Name of the project configuration directory.
pub const CONFIG_DIR: &str = ".fitkit";

/// Loads all configuration from the `.fitkit/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.fitkit/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns an empty/default configuration
/// rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or YAML)
/// - A routine breaks the validation rules or reuses another routine's id
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let fk_dir = root.join(CONFIG_DIR);

    // If .fitkit doesn't exist, return default config
    if !fk_dir.exists() {
        return Ok(AppConfig {
            root: root.to_path_buf(),
            ..AppConfig::default()
        });
    }

    let global = load_global_config(&fk_dir)?;
    let routines = load_routines(&fk_dir)?;

    debug!(
        routines = routines.len(),
        backend = global.backend.is_some(),
        "configuration loaded"
    );

    Ok(AppConfig {
        global,
        routines,
        root: root.to_path_buf(),
    })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(fk_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = fk_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.tick_millis == 0 {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "tick-millis must be greater than zero".to_string(),
        });
    }

    Ok(config)
}

/// Loads all routine definitions from `routines/*.yaml`.
fn load_routines(fk_dir: &Path) -> ConfigResult<Vec<Routine>> {
    let routines_dir = fk_dir.join("routines");

    if !routines_dir.exists() {
        return Ok(Vec::new());
    }

    let mut routines = Vec::new();
    let mut seen_ids = HashSet::new();

    for entry in WalkDir::new(&routines_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: routines_dir.clone(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let routine: Routine =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        validate_routine(&routine).map_err(|e| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !seen_ids.insert(routine.id) {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("duplicate routine id {}", routine.id),
            });
        }

        routines.push(routine);
    }

    Ok(routines)
}

/// Reads a routine edit (weekday plus exercise list) from a YAML file.
///
/// Only the syntax is checked here; the exercise rules are applied when the
/// edit is written.
pub fn load_routine_edit(path: &Path) -> ConfigResult<RoutineEdit> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}
