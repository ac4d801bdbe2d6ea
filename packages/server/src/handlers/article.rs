use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{article, comment, workspace};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::handlers::workspace::find_workspace;
use crate::models::article::*;
use crate::models::shared::MessageResponse;
use crate::notify::LiveEvent;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Articles",
    operation_id = "listArticles",
    summary = "List articles",
    description = "Returns id, title and workspace of every article, newest first. \
        Pass `workspaceId` to restrict the listing to one workspace. Content and \
        attachments are omitted from list results.",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "List of articles", body = Vec<ArticleListItem>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<Vec<ArticleListItem>>, AppError> {
    let mut select = article::Entity::find();
    if let Some(workspace_id) = query.workspace_id {
        select = select.filter(article::Column::WorkspaceId.eq(workspace_id));
    }

    let items = select
        .select_only()
        .column(article::Column::Id)
        .column(article::Column::Title)
        .column(article::Column::WorkspaceId)
        .order_by_desc(article::Column::CreatedAt)
        .into_model::<ArticleListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Articles",
    operation_id = "getArticle",
    summary = "Get an article by ID",
    description = "Returns the full article, including its attachment records, \
        nested comments (oldest first) and owning workspace.",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article details", body = ArticleResponse),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = find_article(&state.db, id).await?;

    let workspace = match article.workspace_id {
        Some(workspace_id) => {
            workspace::Entity::find_by_id(workspace_id)
                .one(&state.db)
                .await?
        }
        None => None,
    };

    let comments = comment::Entity::find()
        .filter(comment::Column::ArticleId.eq(id))
        .order_by_asc(comment::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(ArticleResponse::from_parts(
        article, workspace, comments,
    )?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Articles",
    operation_id = "createArticle",
    summary = "Create a new article",
    description = "Creates an article with an empty attachment list. An optional \
        `workspaceId` places the article in a workspace.",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleCreatedResponse),
        (status = 400, description = "Missing title or content", body = ErrorBody),
        (status = 404, description = "Workspace not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_article(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_article_payload(&payload.title, &payload.content)?;

    if let Some(workspace_id) = payload.workspace_id {
        find_workspace(&state.db, workspace_id).await?;
    }

    let now = chrono::Utc::now();
    let new_article = article::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        attachments: Set(serde_json::Value::Array(Vec::new())),
        workspace_id: Set(payload.workspace_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_article.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ArticleCreatedResponse {
            message: "Article created successfully.".into(),
            id: model.id,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Articles",
    operation_id = "updateArticle",
    summary = "Update an article",
    description = "Overwrites title and content in place. Attachments and workspace \
        membership are untouched. Broadcasts an `article_updated` live event.",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = MessageResponse),
        (status = 400, description = "Missing title or content", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateArticleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_article_payload(&payload.title, &payload.content)?;

    let existing = find_article(&state.db, id).await?;
    let mut active: article::ActiveModel = existing.into();
    active.title = Set(payload.title.trim().to_string());
    active.content = Set(payload.content);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;

    state
        .notifier
        .broadcast(&LiveEvent::article_updated(model.id));

    Ok(Json(MessageResponse {
        message: "Article updated successfully.".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Articles",
    operation_id = "deleteArticle",
    summary = "Delete an article",
    description = "Deletes the article and cascade-deletes all its comments.",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let txn = state.db.begin().await?;

    find_article(&txn, id).await?;

    comment::Entity::delete_many()
        .filter(comment::Column::ArticleId.eq(id))
        .exec(&txn)
        .await?;
    article::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(Json(MessageResponse {
        message: "Article deleted successfully.".into(),
    }))
}

pub(crate) async fn find_article<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<article::Model, AppError> {
    article::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Article not found.".into()))
}
