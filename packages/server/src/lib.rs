pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod routes;
pub mod state;
pub mod storage;

use axum::routing::get;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkwell Publishing API",
        version = "1.0.0",
        description = "REST API for the Inkwell article-publishing application"
    ),
    tags(
        (name = "Articles", description = "Article CRUD operations"),
        (name = "Attachments", description = "File attachments on articles"),
        (name = "Workspaces", description = "Workspace management"),
        (name = "Comments", description = "Comments on articles"),
    ),
)]
struct ApiDoc;

/// Build the application router.
///
/// The REST resources come from [`routes::api_routes`]; the WebSocket
/// live-update endpoint sits at the server root and stored attachment files
/// are served verbatim under `/uploads`.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::api_routes())
        .split_for_parts();

    let upload_dir = state.config.storage.upload_dir.clone();

    router
        .route("/", get(handlers::live::live_updates))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}
