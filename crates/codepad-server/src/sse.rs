//! Server-Sent Events plumbing for run event streams.

use axum::response::sse::{Event as AxumEvent, KeepAlive};
use axum::response::{IntoResponse, Response, Sse};
use codepad_core::RunEvent;
use futures_util::Stream;
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// An SSE event ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
}

impl SseEvent {
    pub fn with_type(event_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            data: data.into(),
        }
    }

    /// Serialize a run event with its variant name as the SSE event type.
    pub fn from_run_event(event: &RunEvent) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_string(event)?;
        Ok(Self::with_type(event.event_name(), data))
    }
}

impl From<SseEvent> for AxumEvent {
    fn from(event: SseEvent) -> Self {
        let mut axum_event = AxumEvent::default().data(event.data);
        if let Some(event_type) = event.event_type {
            axum_event = axum_event.event(event_type);
        }
        axum_event
    }
}

pin_project! {
    /// Converts a stream of run events into SSE frames.
    pub struct SseStream<S> {
        #[pin]
        inner: S,
    }
}

impl<S> SseStream<S> {
    pub fn new(stream: S) -> Self {
        Self { inner: stream }
    }
}

impl<S> Stream for SseStream<S>
where
    S: Stream<Item = RunEvent>,
{
    type Item = std::result::Result<AxumEvent, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(event)) => match SseEvent::from_run_event(&event) {
                Ok(sse_event) => Poll::Ready(Some(Ok(sse_event.into()))),
                Err(e) => {
                    log::error!("Failed to serialize run event: {}", e);
                    let error_event = SseEvent::with_type(
                        "error",
                        format!(r#"{{"error": "Failed to serialize event: {}"}}"#, e),
                    );
                    Poll::Ready(Some(Ok(error_event.into())))
                }
            },
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Wrap a run event stream in an SSE response with keep-alives.
pub fn create_sse_response<S>(stream: S) -> Response
where
    S: Stream<Item = RunEvent> + Send + 'static,
{
    Sse::new(SseStream::new(stream))
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
        .into_response()
}
