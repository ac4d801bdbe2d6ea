//! One-shot import of legacy flat-file articles into the database.
//!
//! The earlier persistence mode kept one JSON file per article in a data
//! directory. This tool walks that directory and inserts every article that
//! is not already present; existing IDs are skipped.
//!
//! Usage: `import-articles [data-dir]` (defaults to `./data`).

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing::{Level, info, warn};
use uuid::Uuid;

use server::config::AppConfig;
use server::entity::article;

#[derive(serde::Deserialize)]
struct LegacyArticle {
    id: Uuid,
    title: String,
    content: String,
    #[serde(default)]
    attachments: serde_json::Value,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./data".to_string());

    let config = AppConfig::load()?;
    let db = server::database::init_db(&config.database.url).await?;

    let mut entries = match tokio::fs::read_dir(&data_dir).await {
        Ok(entries) => entries,
        Err(_) => {
            info!("No data directory at '{data_dir}'. Nothing to import.");
            return Ok(());
        }
    };

    let mut imported = 0u32;
    let mut skipped = 0u32;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let raw = tokio::fs::read_to_string(&path).await?;
        let legacy: LegacyArticle = match serde_json::from_str(&raw) {
            Ok(legacy) => legacy,
            Err(e) => {
                warn!("Skipping '{}': {e}", path.display());
                continue;
            }
        };

        if legacy.title.trim().is_empty() || legacy.content.trim().is_empty() {
            warn!("Skipping {} (empty title or content)", legacy.id);
            continue;
        }

        if article::Entity::find_by_id(legacy.id)
            .one(&db)
            .await?
            .is_some()
        {
            info!("Skipping {} (exists)", legacy.id);
            skipped += 1;
            continue;
        }

        // Old files may carry no attachment list at all; normalize to [].
        let attachments = match legacy.attachments {
            serde_json::Value::Array(list) => serde_json::Value::Array(list),
            _ => serde_json::Value::Array(Vec::new()),
        };

        let now = chrono::Utc::now();
        article::ActiveModel {
            id: Set(legacy.id),
            title: Set(legacy.title),
            content: Set(legacy.content),
            attachments: Set(attachments),
            workspace_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await?;

        info!("Imported {}", legacy.id);
        imported += 1;
    }

    info!("Done. {imported} imported, {skipped} skipped.");
    Ok(())
}
