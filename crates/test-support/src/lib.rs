//! Test helpers shared by the workspace crates.
//!
//! [`MockUpstream`] stands in for the Aladhan API: an in-process HTTP server on an ephemeral
//! localhost port that records every request and answers with a scripted response.

use anyhow::Context as _;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse as _, Response};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the mock saw for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
}

/// Scripted reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
}

impl MockResponse {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self::status(200, body)
    }

    /// Arbitrary status with a JSON body.
    #[must_use]
    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            delay: None,
        }
    }

    /// `200 OK` with a non-JSON body.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body: body.into(),
            delay: None,
        }
    }

    /// Hold the reply back for `delay` (to trip client timeouts).
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Responder,
}

/// Running mock API. Shuts down when dropped.
pub struct MockUpstream {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    /// Serve the same response to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if binding an ephemeral localhost port fails.
    pub async fn start(response: MockResponse) -> anyhow::Result<Self> {
        Self::start_with(move |_| response.clone()).await
    }

    /// Serve a response computed from each request.
    ///
    /// # Errors
    ///
    /// Returns an error if binding an ephemeral localhost port fails.
    pub async fn start_with<F>(responder: F) -> anyhow::Result<Self>
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: Arc::clone(&requests),
            responder: Arc::new(responder),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock upstream")?;
        let addr = listener.local_addr().context("mock upstream local_addr")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/v1"),
            requests,
            shutdown: Some(shutdown_tx),
        })
    }

    /// API root to configure the client with (includes a `/v1` prefix like the real API).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle(State(state): State<MockState>, uri: Uri) -> Response {
    let request = RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
    };
    let reply = (state.responder)(&request);
    state.requests.lock().push(request);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response()
}
