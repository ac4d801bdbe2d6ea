use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{Level, info, warn};

use server::config::{AppConfig, CorsConfig};
use server::notify::Notifier;
use server::state::AppState;
use server::storage::UploadStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    let db = server::database::init_db(&config.database.url).await?;

    let uploads = UploadStore::new(&config.storage.upload_dir, config.storage.max_upload_size);
    uploads.ensure_root().await?;

    let state = AppState {
        db,
        notifier: Arc::new(Notifier::new()),
        uploads,
        config: config.clone(),
    };

    let app = server::build_router(state).layer(cors_layer(&config.server.cors));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cfg.max_age));

    if cfg.allow_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("skipping invalid CORS origin '{origin}': {e}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
