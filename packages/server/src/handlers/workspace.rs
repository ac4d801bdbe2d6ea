use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{article, comment, workspace};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::MessageResponse;
use crate::models::workspace::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Workspaces",
    operation_id = "listWorkspaces",
    summary = "List workspaces",
    description = "Returns all workspaces, oldest first.",
    responses(
        (status = 200, description = "List of workspaces", body = Vec<WorkspaceResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_workspaces(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkspaceResponse>>, AppError> {
    let workspaces = workspace::Entity::find()
        .order_by_asc(workspace::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        workspaces.into_iter().map(WorkspaceResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Workspaces",
    operation_id = "createWorkspace",
    summary = "Create a new workspace",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = WorkspaceResponse),
        (status = 400, description = "Missing name", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_workspace(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateWorkspaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_workspace(&payload)?;

    let now = chrono::Utc::now();
    let new_workspace = workspace::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_workspace.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(WorkspaceResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Workspaces",
    operation_id = "deleteWorkspace",
    summary = "Delete a workspace",
    description = "Deletes the workspace and cascade-deletes its articles and \
        their comments.",
    params(("id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace deleted", body = MessageResponse),
        (status = 404, description = "Workspace not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let txn = state.db.begin().await?;

    find_workspace(&txn, id).await?;

    comment::Entity::delete_many()
        .filter(
            comment::Column::ArticleId.in_subquery(
                SeaQuery::select()
                    .column(article::Column::Id)
                    .from(article::Entity)
                    .and_where(article::Column::WorkspaceId.eq(id))
                    .to_owned(),
            ),
        )
        .exec(&txn)
        .await?;

    article::Entity::delete_many()
        .filter(article::Column::WorkspaceId.eq(id))
        .exec(&txn)
        .await?;
    workspace::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(Json(MessageResponse {
        message: "Workspace deleted successfully.".into(),
    }))
}

pub(crate) async fn find_workspace<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<workspace::Model, AppError> {
    workspace::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Workspace not found.".into()))
}
