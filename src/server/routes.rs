use std::net::SocketAddr;
use std::sync::Arc;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, DefaultBodyLimit, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use crate::capture::camera::SharedCamera;
use crate::pipeline::passport_pipeline::pipeline::{PassportPhoto, PassportPipeline};
use crate::server::error::ApiError;
use crate::server::stream::mjpeg_response;
use crate::utils::utils::byte_data_to_base64;

pub const DOWNLOAD_FILENAME: &str = "passport_photo.jpg";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PassportPipeline>,
    /// `None` when the service runs without a capture device.
    pub camera: Option<SharedCamera>,
    pub stream_fps: u32,
    pub upload_limit_bytes: usize,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub status: String,
    pub image: String,
}

impl PhotoResponse {
    fn success(photo: &PassportPhoto) -> Self {
        PhotoResponse {
            status: "success".to_string(),
            image: byte_data_to_base64(&photo.jpeg),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_limit_bytes;
    Router::new()
        .route("/", get(capture_photo))
        .route("/capture/download", get(capture_photo_download))
        .route("/upload", post(upload_photo))
        .route("/upload/download", post(upload_photo_download))
        .route("/video_feed", get(video_feed))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
}

async fn capture_photo(
    State(state): State<AppState>,
    caller: Option<ConnectInfo<SocketAddr>>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let photo = capture_passport(&state)
        .await
        .map_err(|e| report(caller, "/", e))?;
    Ok(Json(PhotoResponse::success(&photo)))
}

async fn capture_photo_download(
    State(state): State<AppState>,
    caller: Option<ConnectInfo<SocketAddr>>,
) -> Result<Response, ApiError> {
    let photo = capture_passport(&state)
        .await
        .map_err(|e| report(caller, "/capture/download", e))?;
    Ok(jpeg_attachment(photo))
}

async fn upload_photo(
    State(state): State<AppState>,
    caller: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<PhotoResponse>, ApiError> {
    let photo = upload_passport(&state, payload)
        .await
        .map_err(|e| report(caller, "/upload", e))?;
    Ok(Json(PhotoResponse::success(&photo)))
}

async fn upload_photo_download(
    State(state): State<AppState>,
    caller: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let photo = upload_passport(&state, payload)
        .await
        .map_err(|e| report(caller, "/upload/download", e))?;
    Ok(jpeg_attachment(photo))
}

async fn video_feed(
    State(state): State<AppState>,
    caller: Option<ConnectInfo<SocketAddr>>,
) -> Result<Response, ApiError> {
    let camera = state.camera.clone().ok_or_else(|| {
        report(
            caller,
            "/video_feed",
            ApiError::CaptureFailure(anyhow::Error::msg("no capture device configured")),
        )
    })?;
    let quality = state.pipeline.config().encode.jpeg_quality;
    Ok(mjpeg_response(camera, state.stream_fps, quality))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn capture_passport(state: &AppState) -> Result<PassportPhoto, ApiError> {
    let camera = state
        .camera
        .clone()
        .ok_or_else(|| ApiError::CaptureFailure(anyhow::Error::msg("no capture device configured")))?;
    let pipeline = state.pipeline.clone();

    run_blocking(move || {
        let frame = camera.capture().map_err(ApiError::CaptureFailure)?;
        Ok(pipeline.process(&frame)?)
    })
    .await
}

async fn upload_passport(
    state: &AppState,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<PassportPhoto, ApiError> {
    let Json(request) = payload?;
    let encoded = request
        .image
        .filter(|image| !image.trim().is_empty())
        .ok_or(ApiError::InputMissing)?;
    let pipeline = state.pipeline.clone();

    run_blocking(move || Ok(pipeline.process_base64(&encoded)?)).await
}

/// Detection, resizing and device reads are CPU or I/O bound; keep them off
/// the async workers.
async fn run_blocking<F>(job: F) -> Result<PassportPhoto, ApiError>
where
    F: FnOnce() -> Result<PassportPhoto, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Unexpected(anyhow::Error::new(e)))?
}

fn jpeg_attachment(photo: PassportPhoto) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
            ),
        ],
        photo.jpeg,
    )
        .into_response()
}

/// Log a failed request with the caller's address and hand the error back.
fn report(caller: Option<ConnectInfo<SocketAddr>>, route: &str, err: ApiError) -> ApiError {
    let caller = caller
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if err.status().is_server_error() {
        error!(%caller, route, error = %err, "request failed");
    } else {
        info!(%caller, route, reason = %err, "request rejected");
    }
    err
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::pipeline::module::face_detection::{FaceRect, FixedFaceDetector};
    use crate::pipeline::passport_pipeline::config::PassportConfig;
    use crate::pipeline::passport_pipeline::pipeline::PassportPipeline;
    use crate::server::error::ApiError;
    use crate::server::routes::{upload_passport, AppState, UploadRequest};
    use crate::utils::utils::{byte_data_to_base64, make_test_png};
    use axum::Json;

    fn state_with(faces: Vec<FaceRect>) -> AppState {
        AppState {
            pipeline: Arc::new(PassportPipeline::new(
                Arc::new(FixedFaceDetector::new(faces)),
                PassportConfig::default(),
            )),
            camera: None,
            stream_fps: 10,
            upload_limit_bytes: 1024,
        }
    }

    #[tokio::test]
    async fn test_upload_without_image() {
        let state = state_with(vec![FaceRect::new(100, 100, 50, 60)]);

        let err = upload_passport(&state, Ok(Json(UploadRequest { image: None })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InputMissing));

        let err = upload_passport(&state, Ok(Json(UploadRequest { image: Some("  ".to_string()) })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InputMissing));
    }

    #[tokio::test]
    async fn test_upload_success() {
        let state = state_with(vec![FaceRect::new(100, 100, 50, 60)]);
        let request = UploadRequest {
            image: Some(byte_data_to_base64(&make_test_png(640, 480))),
        };
        let photo = upload_passport(&state, Ok(Json(request))).await.unwrap();
        assert_eq!(photo.image.dimensions(), (200, 200));
    }
}
