use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::{Error, Result};
use rs_passport_photo_svc::capture::camera::SharedCamera;
use rs_passport_photo_svc::capture::opencv_camera::OpenCvCamera;
use rs_passport_photo_svc::pipeline::module::cascade_detection::CascadeFaceDetection;
use rs_passport_photo_svc::pipeline::passport_pipeline::pipeline::PassportPipeline;
use rs_passport_photo_svc::server::config::AppConfig;
use rs_passport_photo_svc::server::routes::{router, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

async fn run() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let detector = CascadeFaceDetection::new(&config.cascade_model_path, &config.passport.detection)?;
    info!(model = %config.cascade_model_path, "face cascade loaded");

    let camera = if config.camera.enabled {
        match OpenCvCamera::open(config.camera.index, config.camera.width, config.camera.height) {
            Ok(camera) => Some(SharedCamera::new(Box::new(camera))),
            Err(e) => {
                warn!(error = %e, "camera unavailable, capture routes will fail");
                None
            }
        }
    } else {
        info!("camera disabled");
        None
    };

    let state = AppState {
        pipeline: Arc::new(PassportPipeline::new(Arc::new(detector), config.passport.clone())),
        camera,
        stream_fps: config.stream_fps,
        upload_limit_bytes: config.upload_limit_bytes,
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .map_err(|e| Error::msg(format!("failed to bind {}: {}", config.bind_address(), e)))?;
    info!(addr = %listener.local_addr()?, "passport photo service listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // the camera handle is released when the last state clone drops
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "service failed");
        std::process::exit(1);
    }
}
