//! # HTTP API
//!
//! Routes (all multipart uploads accept the image under `file` or `image`):
//!
//! ```text
//! POST /steganography/hide      file + token   -> image/png (or JSON with ?format=json)
//! POST /steganography/reveal    file           -> {"success", "message", "data": {"token"}}
//! POST /steganography/capacity  file [+ token] -> capacity report
//! GET  /health                                 -> status and request counters
//! ```

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

use super::error::ApiError;
use super::metrics::{MetricsSnapshot, Operation, ServiceMetrics};
use super::service::{CapacityReport, StegCore};

/// Shared state handed to every handler.
pub struct AppState {
    pub core: StegCore,
    pub metrics: ServiceMetrics,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            core: StegCore::new(),
            metrics: ServiceMetrics::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Response envelope shared by the JSON endpoints.
#[derive(Debug, Serialize)]
pub struct StegResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct HiddenImageData {
    pub filename: String,
    pub image_base64: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HideQuery {
    /// `json` to receive the image base64-encoded inside a JSON envelope
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    requests: MetricsSnapshot,
}

/// Fields collected from a multipart upload.
#[derive(Debug, Default)]
struct UploadForm {
    image: Option<Vec<u8>>,
    filename: Option<String>,
    token: Option<String>,
}

impl UploadForm {
    async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" | "image" => {
                    form.filename = field.file_name().map(|s| s.to_string());
                    form.image = Some(field.bytes().await?.to_vec());
                }
                "token" => {
                    form.token = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn take_image(&mut self) -> Result<Vec<u8>, ApiError> {
        self.image
            .take()
            .ok_or_else(|| ApiError::BadRequest("No image provided".to_string()))
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/steganography/hide", post(hide_handler))
        .route("/steganography/reveal", post(reveal_handler))
        .route("/steganography/capacity", post(capacity_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "token-steganography",
        requests: state.metrics.snapshot(),
    })
}

async fn hide_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HideQuery>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let started = Instant::now();
    let result = hide(&state, query, multipart).await;
    record(&state, Operation::Hide, result.is_ok(), started);
    result
}

async fn hide(
    state: &AppState,
    query: HideQuery,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;
    let image = form.take_image()?;
    let token = form
        .token
        .take()
        .ok_or_else(|| ApiError::BadRequest("No token provided".to_string()))?;
    let filename = form.filename.unwrap_or_else(|| "image.png".to_string());

    let request_id = rand::random::<u64>();
    let hidden = state.core.hide(request_id, image, filename, token).await?;

    if query.format.as_deref() == Some("json") {
        let body = StegResponse {
            success: true,
            message: "Token hidden successfully".to_string(),
            data: Some(HiddenImageData {
                filename: hidden.filename,
                image_base64: general_purpose::STANDARD.encode(&hidden.png),
            }),
        };
        return Ok(Json(body).into_response());
    }

    let disposition = format!("attachment; filename=\"{}\"", hidden.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        hidden.png,
    )
        .into_response())
}

async fn reveal_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<StegResponse<TokenData>>, ApiError> {
    let started = Instant::now();
    let result = reveal(&state, multipart).await;
    record(&state, Operation::Reveal, result.is_ok(), started);
    result
}

async fn reveal(
    state: &AppState,
    multipart: Multipart,
) -> Result<Json<StegResponse<TokenData>>, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;
    let image = form.take_image()?;

    let request_id = rand::random::<u64>();
    let token = state.core.reveal(request_id, image).await?;

    Ok(Json(StegResponse {
        success: true,
        message: "Token revealed successfully".to_string(),
        data: Some(TokenData { token }),
    }))
}

async fn capacity_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<StegResponse<CapacityReport>>, ApiError> {
    let started = Instant::now();
    let result = capacity(&state, multipart).await;
    record(&state, Operation::Capacity, result.is_ok(), started);
    result
}

async fn capacity(
    state: &AppState,
    multipart: Multipart,
) -> Result<Json<StegResponse<CapacityReport>>, ApiError> {
    let mut form = UploadForm::parse(multipart).await?;
    let image = form.take_image()?;
    let report = state.core.capacity(image, form.token).await?;

    Ok(Json(StegResponse {
        success: true,
        message: format!("Image can hold {} bytes", report.max_payload_bytes),
        data: Some(report),
    }))
}

fn record(state: &AppState, operation: Operation, success: bool, started: Instant) {
    let elapsed = started.elapsed().as_micros() as u64;
    state.metrics.record(operation, success, elapsed);
}
