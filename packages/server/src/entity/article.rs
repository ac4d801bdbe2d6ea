use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single stored file reference, kept as a JSON array on the article row.
///
/// Records are append-only: uploads add to the list, nothing removes or
/// reorders entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AttachmentRecord {
    /// Server-generated storage name (uuid plus the original extension).
    pub filename: String,
    /// Client-supplied name at upload time.
    pub originalname: String,
    pub mimetype: String,
    /// Path the stored bytes are served from.
    pub url: String,
    /// Size in bytes.
    pub size: i64,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String, // rich text (HTML)

    /// Attachment records stored as a JSON array of `AttachmentRecord`.
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: serde_json::Value,

    /// NULL for articles outside any workspace.
    pub workspace_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "workspace_id", to = "id")]
    pub workspace: Option<super::workspace::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Decode the JSON attachment column into typed records.
    pub fn attachment_records(&self) -> Result<Vec<AttachmentRecord>, serde_json::Error> {
        serde_json::from_value(self.attachments.clone())
    }
}

impl ActiveModelBehavior for ActiveModel {}
