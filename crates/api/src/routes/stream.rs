//! MJPEG video feed

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::Stream;
use tracing::debug;

use crate::AppState;

/// Stream cadence (25 frames per second)
const FRAME_INTERVAL: Duration = Duration::from_millis(40);

const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";

/// Unbounded multipart JPEG stream annotated with the live verdict.
///
/// Ticks with no published frame emit nothing rather than a blank image;
/// the stream ends when the client disconnects.
pub async fn video_feed(State(state): State<AppState>) -> Response {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            "multipart/x-mixed-replace; boundary=frame",
        )
        .body(Body::from_stream(mjpeg_parts(state)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn mjpeg_parts(state: AppState) -> impl Stream<Item = Result<Bytes, Infallible>> {
    async_stream::stream! {
        let mut interval = tokio::time::interval(FRAME_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;

            let shared = state.monitor.shared();
            let Some(frame) = shared.latest_frame().await else {
                continue;
            };
            let snapshot = shared.latest_snapshot().await.unwrap_or_default();

            let overlay = Arc::clone(&state.overlay);
            let encoded = tokio::task::spawn_blocking(move || {
                overlay.annotate(&frame, snapshot.ear, snapshot.is_drowsy)
            })
            .await;
            let jpeg = match encoded {
                Ok(Ok(jpeg)) => jpeg,
                Ok(Err(e)) => {
                    debug!(error = %e, "overlay encode failed");
                    continue;
                }
                Err(e) => {
                    debug!(error = %e, "overlay task failed");
                    continue;
                }
            };

            let mut part = Vec::with_capacity(PART_HEADER.len() + jpeg.len() + 2);
            part.extend_from_slice(PART_HEADER);
            part.extend_from_slice(&jpeg);
            part.extend_from_slice(b"\r\n");
            yield Ok::<_, Infallible>(Bytes::from(part));
        }
    }
}
