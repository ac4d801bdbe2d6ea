use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::{ActiveModelTrait, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::entity::article::{self, AttachmentRecord};
use crate::error::{AppError, ErrorBody};
use crate::handlers::article::find_article;
use crate::models::attachment::UploadResponse;
use crate::notify::LiveEvent;
use crate::state::AppState;
use crate::storage::UploadStore;

pub fn attachment_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB
}

/// File types an article attachment may declare.
const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "application/pdf"];

fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

#[utoipa::path(
    post,
    path = "/{id}/attachments",
    tag = "Attachments",
    operation_id = "uploadAttachment",
    summary = "Upload an attachment to an article",
    description = "Uploads one file from the `file` multipart field. The declared \
        content type must be JPEG, PNG, GIF or PDF. The file is stored under a \
        generated unique name and a record is appended to the article's attachment \
        list. Broadcasts an `attachment_added` live event. Clients upload multiple \
        files by issuing one call per file; calls are independent.",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 201, description = "Attachment created", body = UploadResponse),
        (status = 400, description = "Missing file or disallowed type", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(article_id))]
pub async fn upload_attachment(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut stored: Option<AttachmentRecord> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }

        let originalname = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;

        // The client's declared type decides; fall back to guessing from the name.
        let mimetype = match field.content_type() {
            Some(ct) => ct.to_string(),
            None => mime_guess::from_path(&originalname)
                .first()
                .map(|m| m.to_string())
                .unwrap_or_default(),
        };
        if !is_allowed_mime(&mimetype) {
            return Err(AppError::Validation(
                "Only JPEG, PNG, GIF and PDF files are allowed.".into(),
            ));
        }

        let filename = UploadStore::storage_name(&originalname);
        let size = stream_field_to_store(&mut field, &state.uploads, &filename).await?;

        stored = Some(AttachmentRecord {
            url: UploadStore::url_for(&filename),
            filename,
            originalname,
            mimetype,
            size,
        });
        break;
    }

    let record = stored.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    // The file is already on disk; a missing article must not leave it orphaned.
    let article = match find_article(&state.db, article_id).await {
        Ok(article) => article,
        Err(err) => {
            state.uploads.remove(&record.filename).await;
            return Err(err);
        }
    };

    let mut records = article.attachment_records().map_err(|e| {
        AppError::Internal(format!(
            "Corrupt attachment list on article {article_id}: {e}"
        ))
    })?;
    records.push(record.clone());

    let mut active: article::ActiveModel = article.into();
    active.attachments = Set(serde_json::to_value(&records)?);
    active.updated_at = Set(chrono::Utc::now());

    if let Err(err) = active.update(&state.db).await {
        state.uploads.remove(&record.filename).await;
        return Err(err.into());
    }

    state
        .notifier
        .broadcast(&LiveEvent::attachment_added(article_id, &record.originalname));

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Attachment uploaded successfully.".into(),
            attachment: record,
        }),
    ))
}

/// Stream a multipart field to the upload store, removing the partial file on
/// any failure.
async fn stream_field_to_store(
    field: &mut axum::extract::multipart::Field<'_>,
    store: &UploadStore,
    filename: &str,
) -> Result<i64, AppError> {
    let mut sink = store.create(filename).await?;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                drop(sink);
                store.remove(filename).await;
                return Err(AppError::Validation(format!("Upload read error: {e}")));
            }
        };
        if let Err(e) = sink.write_chunk(&chunk).await {
            drop(sink);
            store.remove(filename).await;
            return Err(e.into());
        }
    }

    match sink.finish().await {
        Ok(size) => Ok(i64::try_from(size).unwrap_or(i64::MAX)),
        Err(e) => {
            store.remove(filename).await;
            Err(e.into())
        }
    }
}
