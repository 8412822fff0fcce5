//! In-memory transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

use sensorwatch_types::{AlertRecord, HistoryPoint, StatusView};

use crate::error::{JobError, TransportError};
use crate::renderer::Renderer;
use crate::transport::{ApiRequest, ApiResponse, Transport};

type Scripted = Result<ApiResponse, TransportError>;

/// Answers requests from per-path queues and records everything it was sent.
///
/// When a path's queue is empty the path's fallback answer (if any) is used,
/// otherwise the request fails with a connection error. Paths given a delay
/// sleep on the tokio clock before answering.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    fallback: Mutex<HashMap<String, Scripted>>,
    delays: Mutex<HashMap<String, Duration>>,
    sent: Mutex<Vec<ApiRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, path: &str, status: StatusCode, body: &str) {
        self.push(path, Ok(ApiResponse::new(status, body)));
    }

    pub(crate) fn push_error(&self, path: &str, error: TransportError) {
        self.push(path, Err(error));
    }

    /// Answer every otherwise unscripted request to `path` with this response.
    pub(crate) fn always_json(&self, path: &str, status: StatusCode, body: &str) {
        self.fallback
            .lock()
            .insert(path.to_string(), Ok(ApiResponse::new(status, body)));
    }

    /// Hold every answer to `path` for `delay`.
    pub(crate) fn delay(&self, path: &str, delay: Duration) {
        self.delays.lock().insert(path.to_string(), delay);
    }

    /// Highest number of requests that were awaiting an answer at once.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn push(&self, path: &str, answer: Scripted) {
        self.queued
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(answer);
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().clone()
    }

    /// Number of requests sent to `path`.
    pub(crate) fn count(&self, path: &str) -> usize {
        self.sent.lock().iter().filter(|r| r.path == path).count()
    }

    /// Bearer tokens presented on requests to `path`, in order.
    pub(crate) fn bearer_tokens(&self, path: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .filter_map(|r| r.headers.get(AUTHORIZATION))
            .filter_map(|v| v.to_str().ok())
            .map(|v| v.trim_start_matches("Bearer ").to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.path.clone();
        self.sent.lock().push(request);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().get(&path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let queued = self
            .queued
            .lock()
            .get_mut(&path)
            .and_then(|queue| queue.pop_front());

        match queued {
            Some(answer) => answer,
            None => self
                .fallback
                .lock()
                .get(&path)
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Connect(format!("no route for {}", path)))),
        }
    }
}

/// Everything a [`RecordingRenderer`] was asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rendered {
    Status(Result<StatusView, JobError>),
    Series(Result<Vec<HistoryPoint>, JobError>),
    Alerts(Result<Vec<AlertRecord>, JobError>),
    Fatal(String),
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    rendered: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rendered(&self) -> Vec<Rendered> {
        self.rendered.lock().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render_status(&self, status: Result<StatusView, JobError>) {
        self.rendered.lock().push(Rendered::Status(status));
    }

    fn render_series(&self, series: Result<Vec<HistoryPoint>, JobError>) {
        self.rendered.lock().push(Rendered::Series(series));
    }

    fn render_alerts(&self, alerts: Result<Vec<AlertRecord>, JobError>) {
        self.rendered.lock().push(Rendered::Alerts(alerts));
    }

    fn render_fatal_error(&self, message: &str) {
        self.rendered.lock().push(Rendered::Fatal(message.to_string()));
    }
}
