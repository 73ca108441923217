//! Store selection from configuration.

use crate::config::models::AppConfig;
use crate::session::Session;
use crate::store::base::{Store, StoreResult};
use crate::store::file::FileStore;
use crate::store::rest::RestStore;
use std::sync::Arc;
use tracing::info;

/// Open the store described by `config` for `session`.
///
/// With a `[backend]` section the hosted REST backend is used; otherwise
/// the local [`FileStore`] at [`AppConfig::data_file`], seeded with the
/// routines loaded from `.fitkit/routines/`.
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if the backend API key is missing or
/// the local data file cannot be read.
pub async fn open_store(config: &AppConfig, session: &Session) -> StoreResult<Arc<dyn Store>> {
    match &config.global.backend {
        Some(backend) => {
            info!(url = %backend.url, "using hosted backend");
            Ok(Arc::new(RestStore::from_config(backend, session)?))
        }
        None => {
            let path = config.data_file();
            info!(path = %path.display(), routines = config.routines.len(), "using local store");
            Ok(Arc::new(
                FileStore::open(path, config.routines.iter().cloned()).await?,
            ))
        }
    }
}
