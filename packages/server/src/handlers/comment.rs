use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::comment;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::article::find_article;
use crate::models::comment::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "listComments",
    summary = "List comments for an article",
    description = "Returns all comments for the article, oldest first.",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "List of comments", body = Vec<CommentResponse>),
    ),
)]
#[instrument(skip(state), fields(article_id))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = comment::Entity::find()
        .filter(comment::Column::ArticleId.eq(article_id))
        .order_by_asc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/comments",
    tag = "Comments",
    operation_id = "createComment",
    summary = "Post a comment on an article",
    description = "Creates a comment. The author is optional and renders as an \
        anonymous label when omitted.",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Missing content", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(article_id))]
pub async fn create_comment(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_comment(&payload)?;

    find_article(&state.db, article_id).await?;

    let now = chrono::Utc::now();
    let new_comment = comment::ActiveModel {
        id: Set(Uuid::new_v4()),
        content: Set(payload.content),
        author: Set(normalize_author(payload.author)),
        article_id: Set(article_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_comment.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Comments",
    operation_id = "updateComment",
    summary = "Update a comment",
    description = "Replaces the comment content. An empty or absent value leaves \
        the existing content unchanged.",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment (updated or unchanged)", body = CommentResponse),
        (status = 404, description = "Comment not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let existing = find_comment(&state.db, id).await?;

    let Some(content) = payload.content.filter(|c| !c.trim().is_empty()) else {
        return Ok(Json(CommentResponse::from(existing)));
    };

    let mut active: comment::ActiveModel = existing.into();
    active.content = Set(content);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    Ok(Json(CommentResponse::from(model)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Comments",
    operation_id = "deleteComment",
    summary = "Delete a comment",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageResponse),
        (status = 404, description = "Comment not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = find_comment(&state.db, id).await?;

    comment::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully.".into(),
    }))
}

async fn find_comment<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<comment::Model, AppError> {
    comment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".into()))
}
