use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::storage::UploadStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Live-update fan-out registry, injected rather than ambient.
    pub notifier: Arc<Notifier>,
    pub uploads: UploadStore,
    pub config: AppConfig,
}
