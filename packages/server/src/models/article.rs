use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entity::article::{self, AttachmentRecord};
use crate::entity::{comment, workspace};
use crate::error::AppError;
use crate::models::comment::CommentResponse;
use crate::models::workspace::WorkspaceResponse;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub workspace_id: Option<Uuid>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ArticleListQuery {
    /// Restrict the listing to one workspace.
    pub workspace_id: Option<Uuid>,
}

/// Listing entry. Content and attachments are omitted from list results.
#[derive(Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    pub id: Uuid,
    pub title: String,
    pub workspace_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub attachments: Vec<AttachmentRecord>,
    pub workspace_id: Option<Uuid>,
    /// Owning workspace, when the article belongs to one.
    pub workspace: Option<WorkspaceResponse>,
    /// Comments ordered oldest first.
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct ArticleCreatedResponse {
    #[schema(example = "Article created successfully.")]
    pub message: String,
    pub id: Uuid,
}

impl ArticleResponse {
    pub fn from_parts(
        article: article::Model,
        workspace: Option<workspace::Model>,
        comments: Vec<comment::Model>,
    ) -> Result<Self, AppError> {
        let attachments = article.attachment_records().map_err(|e| {
            AppError::Internal(format!(
                "Corrupt attachment list on article {}: {e}",
                article.id
            ))
        })?;
        Ok(Self {
            id: article.id,
            title: article.title,
            content: article.content,
            attachments,
            workspace_id: article.workspace_id,
            workspace: workspace.map(WorkspaceResponse::from),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        })
    }
}

pub fn validate_article_payload(title: &str, content: &str) -> Result<(), AppError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required.".into(),
        ));
    }
    Ok(())
}
