use std::time::Duration;
use async_stream::stream;
use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};
use crate::capture::camera::SharedCamera;
use crate::utils::utils::image_to_jpeg;

pub const BOUNDARY: &str = "frame";

/// Wrap one JPEG as a part of a `multipart/x-mixed-replace` body.
pub fn mjpeg_part(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        BOUNDARY,
        jpeg.len()
    );
    let mut part = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
    part.put_slice(header.as_bytes());
    part.put_slice(jpeg);
    part.put_slice(b"\r\n");
    part.freeze()
}

/// Live camera preview, independent from the passport capture path.
///
/// The stream ends on the first failed read; a client that drops the
/// connection ends it as well.
pub fn mjpeg_response(camera: SharedCamera, fps: u32, jpeg_quality: u8) -> Response {
    let interval = Duration::from_millis((1000 / fps.max(1) as u64).max(1));

    let frames = stream! {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;

            let camera = camera.clone();
            let grabbed = tokio::task::spawn_blocking(move || {
                camera.capture().and_then(|frame| image_to_jpeg(&frame, jpeg_quality))
            })
            .await;

            match grabbed {
                Ok(Ok(jpeg)) => {
                    yield Ok::<Bytes, std::io::Error>(mjpeg_part(&jpeg));
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "preview stream stopped: capture failed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "preview stream stopped: capture task aborted");
                    break;
                }
            }
        }
        debug!("preview stream closed");
    };

    (
        [(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={}", BOUNDARY),
        )],
        Body::from_stream(frames),
    )
        .into_response()
}
