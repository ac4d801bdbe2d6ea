use serde::Serialize;
use utoipa::ToSchema;

use crate::entity::article::AttachmentRecord;

/// Response for a successful attachment upload.
#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "Attachment uploaded successfully.")]
    pub message: String,
    pub attachment: AttachmentRecord,
}
