use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::article::*;
use crate::handlers::attachment::*;
use crate::handlers::comment::*;
use crate::handlers::workspace::*;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/articles", article_routes())
        .nest("/workspaces", workspace_routes())
        .nest("/comments", comment_routes())
}

fn article_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(list_articles, create_article))
        .routes(routes!(get_article, update_article, delete_article))
        .routes(routes!(list_comments, create_comment));

    let upload = OpenApiRouter::new()
        .routes(routes!(upload_attachment))
        .layer(attachment_upload_body_limit());

    crud.merge(upload)
}

fn workspace_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_workspaces, create_workspace))
        .routes(routes!(delete_workspace))
}

fn comment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(update_comment, delete_comment))
}
