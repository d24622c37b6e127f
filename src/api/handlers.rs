use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rayon::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use super::models::*;
use super::state::AppState;
use crate::error::Error;
use crate::parse::parse_coordinates;
use crate::store::StoreState;
use crate::types::{Spot, SpotInput};
use crate::uploads::{process_upload, remove_photo_files, safe_unlink, stored_file_name, UploadError};

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<T, ApiError>;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

fn api_error(status: StatusCode, body: ErrorResponse) -> ApiError {
    (status, Json(body))
}

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, ErrorResponse::new("Spot not found"))
}

fn to_response(state: &AppState, spot: Spot) -> SpotResponse {
    let images = state.locator.images_for(Some(spot.lat), Some(spot.lng));
    SpotResponse { spot, images }
}

/// Rejects spot requests while the store cannot serve them
pub async fn require_store(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.store.is_available() {
        let store_state = state.store.state();
        tracing::warn!(state = store_state.as_str(), "spot store unavailable");
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse {
                database_state: Some(store_state.as_str()),
                ..ErrorResponse::new("Database not connected")
                    .with_message("Spot store is not available. Check DATA_FILE and its permissions.")
            },
        )
        .into_response();
    }
    next.run(request).await
}

pub async fn list_spots(State(state): State<AppState>) -> ApiResult<Json<Vec<SpotResponse>>> {
    tracing::info!("fetching spots");
    let mut spots = state.store.list().map_err(|e| {
        tracing::error!(error = %e, "error fetching spots");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Database error")
                .with_message("Unable to read from the spot store")
                .with_details(&e),
        )
    })?;
    spots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracing::info!(count = spots.len(), "found spots");

    Ok(Json(spots.into_iter().map(|spot| to_response(&state, spot)).collect()))
}

pub async fn get_spot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SpotResponse>> {
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let spot = state
        .store
        .get(&id)
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Error fetching spot").with_details(&e),
            )
        })?
        .ok_or_else(not_found)?;

    Ok(Json(to_response(&state, spot)))
}

pub async fn list_spots_minimal(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SpotSummaryResponse>>> {
    let mut spots = state.store.list().map_err(|e| {
        tracing::error!(error = %e, "error fetching minimal spots");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Database error").with_details(&e),
        )
    })?;
    spots.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Json(
        spots
            .iter()
            .map(|spot| SpotSummaryResponse {
                spot: spot.summary(),
                images: state.locator.images_for(Some(spot.lat), Some(spot.lng)),
            })
            .collect(),
    ))
}

pub async fn create_spot(
    State(state): State<AppState>,
    payload: Result<Json<SpotInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SpotResponse>)> {
    let creation_error = |details: String| {
        api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Error creating spot").with_details(details),
        )
    };

    let Json(input) = payload.map_err(|rejection| creation_error(rejection.body_text()))?;
    tracing::info!(name = input.name.as_deref().unwrap_or(""), "creating spot");

    let spot = Spot::create(input, Utc::now()).map_err(|e| creation_error(e.to_string()))?;
    let saved = state.store.insert(spot).map_err(|e| {
        tracing::error!(error = %e, "error creating spot");
        creation_error(e.to_string())
    })?;

    tracing::info!(id = %saved.id, "spot created");
    Ok((StatusCode::CREATED, Json(to_response(&state, saved))))
}

pub async fn update_spot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SpotInput>, JsonRejection>,
) -> ApiResult<Json<SpotResponse>> {
    let update_error = |status: StatusCode, details: String| {
        api_error(status, ErrorResponse::new("Error updating spot").with_details(details))
    };

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let Json(input) =
        payload.map_err(|rejection| update_error(StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let now = Utc::now();
    let updated = state
        .store
        .modify(&id, Box::new(move |spot: &mut Spot| spot.apply(input, now)))
        .map_err(|e| match e {
            Error::Validation(_) => update_error(StatusCode::BAD_REQUEST, e.to_string()),
            _ => {
                tracing::error!(error = %e, "error updating spot");
                update_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        })?
        .ok_or_else(not_found)?;

    tracing::info!(id = %updated.id, "spot updated");
    Ok(Json(to_response(&state, updated)))
}

pub async fn delete_spot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let delete_error = |e: Error| {
        tracing::error!(error = %e, "error deleting spot");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("Error deleting spot").with_details(&e),
        )
    };

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let spot = state.store.get(&id).map_err(delete_error)?.ok_or_else(not_found)?;

    if !spot.photos.is_empty() {
        let dir = state.uploads_dir.clone();
        let photos = spot.photos.clone();
        let removed = tokio::task::spawn_blocking(move || remove_photo_files(&dir, &photos))
            .await
            .map_err(|e| delete_error(Error::Io(std::io::Error::other(e))))?;
        tracing::debug!(files = removed.len(), "removed photo files");
    }

    state.store.remove(&id).map_err(delete_error)?;
    tracing::info!(%id, "spot deleted");

    Ok(Json(MessageResponse {
        message: "Spot deleted".to_string(),
    }))
}

pub async fn upload_photos(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut stored = Vec::new();

    if let Err(e) = receive_photos(&state, &mut multipart, &mut stored).await {
        for name in &stored {
            safe_unlink(&state.uploads_dir.join(name));
        }
        return Err(upload_error(&state, e));
    }

    if stored.is_empty() {
        return Err(upload_error(&state, UploadError::NoFiles));
    }

    tracing::info!(count = stored.len(), "processing uploaded photos");
    let dir = state.uploads_dir.clone();
    let urls = tokio::task::spawn_blocking(move || {
        stored
            .par_iter()
            .map(|name| process_upload(&dir, name))
            .collect::<Vec<String>>()
    })
    .await
    .map_err(|e| upload_error(&state, UploadError::Io(std::io::Error::other(e))))?;

    tracing::info!(count = urls.len(), "photos uploaded");
    Ok(Json(UploadResponse {
        message: "Photos uploaded successfully".to_string(),
        count: urls.len(),
        urls,
    }))
}

/// Streams the `photos` fields to disk, enforcing the upload policy
async fn receive_photos(
    state: &AppState,
    multipart: &mut Multipart,
    stored: &mut Vec<String>,
) -> Result<(), UploadError> {
    let policy = state.upload_policy;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some("photos") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if stored.len() >= policy.max_files {
            return Err(UploadError::TooManyFiles);
        }
        if !policy.accepts(&file_name, field.content_type()) {
            return Err(UploadError::InvalidType(file_name));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?
        {
            if data.len() + chunk.len() > policy.max_file_size {
                return Err(UploadError::FileTooLarge(file_name));
            }
            data.extend_from_slice(&chunk);
        }

        let name = stored_file_name(&file_name, Utc::now().timestamp_millis());
        tokio::fs::write(state.uploads_dir.join(&name), &data).await?;
        stored.push(name);
    }

    Ok(())
}

fn upload_error(state: &AppState, error: UploadError) -> ApiError {
    let policy = state.upload_policy;
    match error {
        UploadError::NoFiles => api_error(StatusCode::BAD_REQUEST, ErrorResponse::new("No files uploaded")),
        UploadError::FileTooLarge(_) => api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("File too large").with_message(format!(
                "Maximum file size is {}MB per image",
                policy.max_file_size / (1024 * 1024)
            )),
        ),
        UploadError::TooManyFiles => api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Too many files")
                .with_message(format!("Maximum {} photos allowed", policy.max_files)),
        ),
        e @ UploadError::InvalidType(_) => api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Invalid file type").with_message(e.to_string()),
        ),
        UploadError::Multipart(details) => api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Malformed upload").with_details(details),
        ),
        e @ UploadError::Io(_) => {
            tracing::error!(error = %e, "upload error");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    suggestion: Some(
                        "Try with smaller images or different format (JPEG recommended)".to_string(),
                    ),
                    ..ErrorResponse::new("Error uploading photos").with_details(&e)
                },
            )
        }
    }
}

/// Text to parse from the `input` field; `None` for absent or falsy values
fn input_text(input: Option<&Value>) -> Option<String> {
    match input? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

pub async fn parse_coordinates_handler(payload: Result<Json<ParseRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return api_error(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid request body").with_details(rejection.body_text()),
            )
            .into_response();
        }
    };

    let Some(input) = input_text(request.input.as_ref()) else {
        return api_error(StatusCode::BAD_REQUEST, ErrorResponse::new("No input provided")).into_response();
    };

    match parse_coordinates(&input) {
        Some(coordinates) => Json(ParseSuccess {
            success: true,
            coordinates,
        })
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ParseFailure {
                success: false,
                error: "Invalid coordinate format".to_string(),
                suggestions: vec![
                    "Format: \"latitude,longitude\" (e.g., 45.4642,9.1900)".to_string(),
                    "Google Maps link: https://maps.google.com/?q=45.4642,9.1900".to_string(),
                ],
            }),
        )
            .into_response(),
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_state = state.store.state();
    let connected = store_state == StoreState::Connected;
    let uploads_ok = tokio::fs::metadata(state.uploads_dir.as_path())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    Json(HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" },
        database: if connected { "connected" } else { "disconnected" },
        database_state: store_state.as_str(),
        uploads: if uploads_ok { "available" } else { "unavailable" },
        timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        environment: state.environment.to_string(),
    })
}

pub async fn store_test(State(state): State<AppState>) -> ApiResult<Json<StoreTestResponse>> {
    let store_state = state.store.state();
    let backend = state.store.backend();

    if store_state != StoreState::Connected {
        return Ok(Json(StoreTestResponse {
            status: "ERROR",
            message: "Store not connected".to_string(),
            state: store_state.as_str(),
            backend,
            spot_count: None,
        }));
    }

    let count = state.store.count().map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse {
                database_state: Some(store_state.as_str()),
                ..ErrorResponse::new("ERROR").with_message(e.to_string())
            },
        )
    })?;

    Ok(Json(StoreTestResponse {
        status: "OK",
        message: "Store connected".to_string(),
        state: store_state.as_str(),
        backend,
        spot_count: Some(count),
    }))
}

pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    let policy = state.upload_policy;
    Json(json!({
        "message": "URBEX HUD API",
        "version": API_VERSION,
        "features": [
            "photo-upload",
            "image-optimization",
            "alternative-spots",
            "satelliteImage-field",
            "coordinate-parsing"
        ],
        "limits": {
            "maxFileSize": format!("{}MB", policy.max_file_size / (1024 * 1024)),
            "maxFiles": policy.max_files,
            "allowedFormats": ["JPEG", "PNG", "GIF", "WEBP", "HEIC", "HEIF"]
        },
        "endpoints": {
            "spots": "GET/POST /api/spots",
            "spot": "GET/PUT/DELETE /api/spots/:id",
            "spotsMinimal": "GET /api/spots-minimal",
            "upload": "POST /api/upload",
            "parseCoordinates": "POST /api/parse-coordinates",
            "test": "GET /api/test",
            "health": "GET /api/health"
        },
        "database": state.store.state().as_str()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_text_falsy_values() {
        assert_eq!(input_text(None), None);
        assert_eq!(input_text(Some(&json!(null))), None);
        assert_eq!(input_text(Some(&json!(""))), None);
        assert_eq!(input_text(Some(&json!(false))), None);
        assert_eq!(input_text(Some(&json!(0))), None);
    }

    #[test]
    fn test_input_text_stringifies() {
        assert_eq!(input_text(Some(&json!("45,9"))), Some("45,9".to_string()));
        assert_eq!(input_text(Some(&json!("  "))), Some("  ".to_string()));
        assert_eq!(input_text(Some(&json!(45.5))), Some("45.5".to_string()));
    }
}
