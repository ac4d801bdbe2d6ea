use serde::Serialize;

/// Plain confirmation body for mutations that return no resource.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Article deleted successfully.")]
    pub message: String,
}
