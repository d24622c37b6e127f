use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::satellite::SatelliteTileLocator;
use crate::store::SpotStore;
use crate::uploads::UploadPolicy;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SpotStore>,
    pub locator: Arc<SatelliteTileLocator>,
    pub uploads_dir: Arc<PathBuf>,
    pub static_dir: Arc<PathBuf>,
    pub upload_policy: UploadPolicy,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(config: &ServerConfig, store: Arc<dyn SpotStore>) -> Self {
        Self {
            store,
            locator: Arc::new(SatelliteTileLocator::new(config.satellite_base_url.clone())),
            uploads_dir: Arc::new(config.uploads_dir.clone()),
            static_dir: Arc::new(config.static_dir.clone()),
            upload_policy: UploadPolicy::default(),
            environment: Arc::from(config.environment.as_str()),
        }
    }
}
