use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use timer_sounds_core::UploadedFile;
use timer_sounds_types::{MessageResponse, RandomResponse, UPLOAD_FIELD, messages};

use crate::AppState;
use crate::error::ApiError;

/// `POST /upload`: every file in the `sounds` field becomes a new asset.
/// Other fields and non-file parts are ignored.
pub(crate) async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if files.len() == state.max_files_per_upload {
            return Err(ApiError::TooManyFiles {
                max: state.max_files_per_upload,
            });
        }

        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        files.push(UploadedFile::new(original_name, content));
    }

    let names = state.store.upload(files).await?;
    tracing::info!(count = names.len(), assets = ?names, "stored upload");

    Ok(Json(MessageResponse::new(messages::UPLOADED)))
}

/// `GET /sounds`
pub(crate) async fn list_sounds(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// `GET /random`
pub(crate) async fn random_sound(
    State(state): State<AppState>,
) -> Result<Json<RandomResponse>, ApiError> {
    let file = state.store.pick_random().await?;
    Ok(Json(RandomResponse { file }))
}

/// `GET /uploads/{name}`: raw bytes of one asset
pub(crate) async fn retrieve_sound(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.store.get(&name).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&name))], content).into_response())
}

/// `DELETE /delete/{name}`
pub(crate) async fn delete_sound(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&name).await?;
    tracing::info!(asset = %name, "deleted asset");
    Ok(Json(MessageResponse::new(messages::DELETED)))
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}
