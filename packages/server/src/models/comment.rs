use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::comment;
use crate::error::AppError;

/// Display label used when a comment was posted without an author.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
    pub author: Option<String>,
}

#[derive(Deserialize, Default, ToSchema)]
pub struct UpdateCommentRequest {
    /// Replacement content. Empty or absent leaves the comment unchanged.
    pub content: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    /// Author display label; anonymous when none was supplied.
    pub author: String,
    pub article_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            content: m.content,
            author: m.author.unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            article_id: m.article_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_comment(req: &CreateCommentRequest) -> Result<(), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required.".into()));
    }
    Ok(())
}

/// Normalize an optional author: whitespace-only input counts as absent.
pub fn normalize_author(author: Option<String>) -> Option<String> {
    author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}
