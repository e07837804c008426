//! Found item endpoints
//!
//! POST /api/items takes `multipart/form-data` (text fields plus an
//! optional `image` file) as sent by the admin form, or the same text
//! fields as JSON or urlencoded.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Form, Json, Router,
};
use lostfound_common::models::Item;
use tracing::debug;

use super::lifecycle_error;
use crate::coordinator::{ImageUpload, NewItem};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const CREATE_FAILED: &str = "Failed to add item";
const FETCH_FAILED: &str = "Failed to fetch item";

/// Build item routes
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", get(get_item))
}

/// GET /api/items
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.coordinator.list_items().await)
}

/// GET /api/items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Item>> {
    state
        .coordinator
        .get_item(&id)
        .await
        .map(Json)
        .map_err(|e| lifecycle_error(e, FETCH_FAILED))
}

/// POST /api/items
///
/// Returns 201 with the created item.
pub async fn create_item(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let (fields, image) = read_item_request(&state, request).await?;

    let item = state
        .coordinator
        .create_item(fields, image)
        .await
        .map_err(|e| lifecycle_error(e, CREATE_FAILED))?;

    Ok((StatusCode::CREATED, Json(item)))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

async fn read_item_request(
    state: &AppState,
    request: Request,
) -> ApiResult<(NewItem, Option<ImageUpload>)> {
    let mime = content_type(request.headers()).map(|ct| ct.to_ascii_lowercase());

    match mime.as_deref() {
        Some(ct) if ct.starts_with("multipart/form-data") => {
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            read_item_form(multipart).await
        }
        Some(ct) if ct.starts_with("application/json") => {
            let Json(fields) = Json::<NewItem>::from_request(request, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok((fields, None))
        }
        Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
            let Form(fields) = Form::<NewItem>::from_request(request, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok((fields, None))
        }
        // No body: every field falls back to its default
        None => Ok((NewItem::default(), None)),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unsupported content type: {}",
            other
        ))),
    }
}

/// Collect the admin form's fields and photo
async fn read_item_form(mut multipart: Multipart) -> ApiResult<(NewItem, Option<ImageUpload>)> {
    let mut fields = NewItem::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;

            // Browsers send an empty part when no file was chosen
            if !filename.is_empty() || !bytes.is_empty() {
                image = Some(ImageUpload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        match name.as_str() {
            "title" => fields.title = Some(value),
            "category" => fields.category = Some(value),
            "location" => fields.location = Some(value),
            "description" => fields.description = Some(value),
            "dateFound" => fields.date_found = Some(value),
            other => debug!("Ignoring unknown item form field: {}", other),
        }
    }

    Ok((fields, image))
}
