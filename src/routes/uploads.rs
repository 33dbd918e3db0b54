use std::path::Path;

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addPostImage", post(add_post_image))
        .route("/addUserImage", post(add_user_image))
}

async fn add_post_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<String>> {
    store_upload(&state, multipart).await.map(Json)
}

async fn add_user_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<String>> {
    store_upload(&state, multipart).await.map(Json)
}

/// Write the `file` field under the uploads directory.
///
/// Returns the stored name relative to the public root, e.g.
/// `/uploads/1700000000000-cat.png`, which is also its URL path.
async fn store_upload(state: &AppState, mut multipart: Multipart) -> AppResult<String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!(error = ?e, "could not read multipart body");
        AppError::BadRequest("Could not read multipart body".into())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original = field
            .file_name()
            .and_then(base_name)
            .unwrap_or("upload")
            .to_string();

        let content = field.bytes().await.map_err(|e| {
            tracing::error!(error = ?e, "could not read uploaded bytes");
            AppError::BadRequest("Could not read uploaded file".into())
        })?;

        let stored = stored_name(chrono::Utc::now().timestamp_millis(), &original);
        let dir = state.config.uploads_path();
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&stored), &content).await?;

        tracing::info!("Stored upload {} ({} bytes)", stored, content.len());
        return Ok(format!("/uploads/{}", stored));
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

/// Last path component of a client-supplied filename.
fn base_name(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
}

fn stored_name(millis: i64, original: &str) -> String {
    format!("{}-{}", millis, original)
}
