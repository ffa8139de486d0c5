//! HTTP surface: the page itself plus a small JSON API per view.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::analysis::ScenarioAnalysis;
use crate::analyzer::{AnalyzerState, ScenarioAnalyzer, SkipReason, SubmitOutcome};
use crate::assessment::AssessmentService;
use crate::error::VIEW_EXPIRED_MESSAGE;
use crate::page::{render_error_panel, render_page, render_panel};
use crate::ServerConfig;

struct ViewEntry {
    analyzer: Arc<ScenarioAnalyzer>,
    last_seen: Instant,
}

/// Live views, each with its own analyzer.
///
/// All views share one assessment service. A view is dropped when the page
/// closes it, when it has been idle longer than `idle`, or when the registry
/// is full and it is the least recently used one. Dropped views are closed so
/// any response still in flight for them is discarded.
pub struct ViewRegistry {
    service: Option<Arc<dyn AssessmentService>>,
    views: Mutex<HashMap<Uuid, ViewEntry>>,
    idle: Duration,
    max_views: usize,
}

impl ViewRegistry {
    pub fn new(service: Option<Arc<dyn AssessmentService>>, config: &ServerConfig) -> Self {
        Self {
            service,
            views: Mutex::new(HashMap::new()),
            idle: config.view_idle(),
            max_views: config.max_views.max(1),
        }
    }

    fn views(&self) -> MutexGuard<'_, HashMap<Uuid, ViewEntry>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self) -> (Uuid, Arc<ScenarioAnalyzer>) {
        let analyzer = Arc::new(match &self.service {
            Some(service) => ScenarioAnalyzer::new(Arc::clone(service)),
            None => ScenarioAnalyzer::unconfigured(),
        });
        let id = Uuid::new_v4();
        let now = Instant::now();

        let mut views = self.views();
        views.retain(|view_id, entry| {
            let keep = now.duration_since(entry.last_seen) < self.idle;
            if !keep {
                crate::log_debug!("Evicting idle view {}", view_id);
                entry.analyzer.close();
            }
            keep
        });
        while views.len() >= self.max_views {
            let oldest = views
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(view_id, _)| *view_id);
            match oldest.and_then(|view_id| views.remove(&view_id)) {
                Some(entry) => entry.analyzer.close(),
                None => break,
            }
        }
        views.insert(
            id,
            ViewEntry {
                analyzer: Arc::clone(&analyzer),
                last_seen: now,
            },
        );
        (id, analyzer)
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<ScenarioAnalyzer>> {
        let mut views = self.views();
        let entry = views.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.analyzer))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        match self.views().remove(id) {
            Some(entry) => {
                entry.analyzer.close();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.views().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
struct AppState {
    views: Arc<ViewRegistry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewCreated {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub scenario: String,
}

/// JSON view of an analyzer, returned by every API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub status: String,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ScenarioAnalysis>,
    pub panel: String,
}

impl ViewResponse {
    fn from_state(state: &AnalyzerState) -> Self {
        Self {
            status: state.status().to_string(),
            busy: state.is_busy(),
            outcome: None,
            error_kind: None,
            message: state.error_message().map(str::to_string),
            analysis: state.analysis().cloned(),
            panel: render_panel(state),
        }
    }

    /// Body for a view that was evicted, closed, or never existed.
    fn expired() -> Self {
        Self {
            status: "expired".to_string(),
            busy: false,
            outcome: None,
            error_kind: Some("view_expired".to_string()),
            message: Some(VIEW_EXPIRED_MESSAGE.to_string()),
            analysis: None,
            panel: render_error_panel(VIEW_EXPIRED_MESSAGE),
        }
    }

    fn with_outcome(mut self, outcome: &SubmitOutcome) -> Self {
        let label = match outcome {
            SubmitOutcome::Skipped(SkipReason::EmptyInput) => "skipped_empty",
            SubmitOutcome::Skipped(SkipReason::Busy) => "skipped_busy",
            SubmitOutcome::Skipped(SkipReason::Closed) => "closed",
            SubmitOutcome::Analyzed(_) => "analyzed",
            SubmitOutcome::Failed(_) => "failed",
            SubmitOutcome::Discarded => "discarded",
        };
        self.outcome = Some(label.to_string());
        if let SubmitOutcome::Failed(err) = outcome {
            self.error_kind = Some(err.kind().to_string());
        }
        self
    }
}

pub fn router(views: Arc<ViewRegistry>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/views", post(create_view))
        .route("/api/views/:id", get(view_state))
        .route("/api/views/:id/analyze", post(analyze))
        .route("/api/views/:id/input", post(edit_input))
        .route("/api/views/:id/close", post(close_view))
        .with_state(AppState { views })
        .layer(middleware::from_fn(log_http_request))
}

/// Bind `listen_addr` and serve until Ctrl-C.
pub async fn serve(listen_addr: &str, views: Arc<ViewRegistry>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    crate::log_info!("Serving AI Sentinel on http://{}", listener.local_addr()?);
    axum::serve(listener, router(views))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    crate::log_info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        crate::log_warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    Html(render_page(&AnalyzerState::Idle))
}

type ViewResult = (StatusCode, Json<ViewResponse>);

fn not_found() -> ViewResult {
    (StatusCode::NOT_FOUND, Json(ViewResponse::expired()))
}

async fn create_view(State(app): State<AppState>) -> (StatusCode, Json<ViewCreated>) {
    let (id, _) = app.views.register();
    crate::log_debug!("Registered view {}", id);
    (StatusCode::CREATED, Json(ViewCreated { id }))
}

async fn view_state(State(app): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    match app.views.get(&id) {
        Some(analyzer) => (StatusCode::OK, Json(ViewResponse::from_state(&analyzer.state()))),
        None => not_found(),
    }
}

async fn analyze(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> ViewResult {
    let Some(analyzer) = app.views.get(&id) else {
        return not_found();
    };
    let outcome = analyzer.submit(&request.scenario).await;
    match outcome {
        SubmitOutcome::Skipped(SkipReason::Busy) => (
            StatusCode::CONFLICT,
            Json(ViewResponse::from_state(&analyzer.state()).with_outcome(&outcome)),
        ),
        SubmitOutcome::Skipped(SkipReason::Closed) | SubmitOutcome::Discarded => (
            StatusCode::GONE,
            Json(ViewResponse::expired().with_outcome(&outcome)),
        ),
        _ => (
            StatusCode::OK,
            Json(ViewResponse::from_state(&analyzer.state()).with_outcome(&outcome)),
        ),
    }
}

async fn edit_input(State(app): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    match app.views.get(&id) {
        Some(analyzer) => {
            analyzer.edit_input();
            (StatusCode::OK, Json(ViewResponse::from_state(&analyzer.state())))
        }
        None => not_found(),
    }
}

async fn close_view(State(app): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if app.views.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "http request"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::create_default_config;

    fn registry(max_views: usize, idle_secs: u64) -> ViewRegistry {
        let mut config = create_default_config().server;
        config.max_views = max_views;
        config.view_idle_secs = idle_secs;
        ViewRegistry::new(None, &config)
    }

    #[test]
    fn registered_views_are_independent() {
        let views = registry(8, 60);
        let (a, analyzer_a) = views.register();
        let (b, _) = views.register();
        assert_ne!(a, b);
        assert_eq!(views.len(), 2);
        assert!(Arc::ptr_eq(&views.get(&a).unwrap(), &analyzer_a));
        assert!(!analyzer_a.has_credential());
    }

    #[test]
    fn full_registry_evicts_least_recently_used() {
        let views = registry(2, 60);
        let pause = || std::thread::sleep(Duration::from_millis(5));
        let (first, first_analyzer) = views.register();
        pause();
        let (second, _) = views.register();
        pause();
        views.get(&first);
        pause();
        let (third, _) = views.register();

        assert_eq!(views.len(), 2);
        assert!(views.get(&second).is_none());
        assert!(views.get(&first).is_some());
        assert!(views.get(&third).is_some());
        assert!(!first_analyzer.is_closed());
    }

    #[test]
    fn idle_views_are_closed_on_next_registration() {
        let views = registry(8, 0);
        let (stale, stale_analyzer) = views.register();
        views.register();
        assert!(views.get(&stale).is_none());
        assert!(stale_analyzer.is_closed());
    }

    #[test]
    fn removing_a_view_closes_it() {
        let views = registry(8, 60);
        let (id, analyzer) = views.register();
        assert!(views.remove(&id));
        assert!(analyzer.is_closed());
        assert!(!views.remove(&id));
        assert!(views.is_empty());
    }
}
