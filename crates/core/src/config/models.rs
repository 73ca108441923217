//! Configuration models that aggregate all settings.

use crate::config::loader::CONFIG_DIR;
use fk_protocol::config_models::GlobalConfig;
use fk_protocol::routine_models::Routine;
use std::path::PathBuf;

/// File under `.fitkit/` holding the local store's tables.
pub const DATA_FILE: &str = "data.json";

/// Unified application configuration loaded from the `.fitkit/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `routines/*.yaml`: Routines seeding the local store
///
/// `root` is the directory the `.fitkit/` folder was looked up in.
///
/// # Example
///
/// ```rust,no_run
/// use fk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} routines", config.routines.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All routines loaded from `routines/*.yaml`, ordered by file name.
    pub routines: Vec<Routine>,

    pub root: PathBuf,
}

impl AppConfig {
    /// Where the local store keeps its data.
    pub fn data_file(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(DATA_FILE)
    }
}
