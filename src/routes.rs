//! HTTP surface for the wizard.
//!
//! One process serves one session. The session sits behind a single async
//! mutex, held for the whole of each action (including the summary call), so
//! nothing else can touch it while a summary is being generated.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{CheckpointError, ConfigError, Error, FlowError};
use crate::flow::FlowEngine;
use crate::session::{SessionState, checkpoint};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FlowEngine>,
    pub session: Arc<Mutex<SessionState>>,
}

impl AppState {
    pub fn new(engine: Arc<FlowEngine>) -> Self {
        Self {
            engine,
            session: Arc::new(Mutex::new(SessionState::default())),
        }
    }
}

/// Build the router with the session REST routes.
pub fn session_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(get_status))
        .route("/api/session/start", post(start_session))
        .route("/api/session/step", get(render_step))
        .route("/api/session/advance", post(advance_step))
        .route("/api/session/generate", post(generate_summary))
        .route("/api/session/model", put(set_model))
        .route(
            "/api/session/checkpoint",
            get(download_checkpoint).post(upload_checkpoint),
        )
        .route("/api/session/export", get(export_answers))
        .route("/api/session/reset", post(reset_session))
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────────────────────

/// An `Error` rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        Self(err.into())
    }
}

impl From<CheckpointError> for ApiError {
    fn from(err: CheckpointError) -> Self {
        Self(err.into())
    }
}

fn classify(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::Flow(FlowError::StepNotFound(_)) => (StatusCode::NOT_FOUND, "step_not_found"),
        Error::Flow(FlowError::SummaryNotFound(_)) => (StatusCode::NOT_FOUND, "summary_not_found"),
        Error::Flow(FlowError::UnknownStepKind { .. }) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "unknown_step_kind")
        }
        Error::Flow(FlowError::EmptyProjectName) => (StatusCode::BAD_REQUEST, "empty_project_name"),
        Error::Flow(FlowError::NotStarted) => (StatusCode::CONFLICT, "not_started"),
        Error::Flow(FlowError::NoSummaryTrigger(_)) => (StatusCode::CONFLICT, "no_summary_trigger"),
        Error::Flow(FlowError::NotASummaryStep(_)) => (StatusCode::CONFLICT, "not_a_summary_step"),
        Error::Config(ConfigError::MissingEnvVar(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "missing_credential")
        }
        Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        Error::Llm(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
        Error::Checkpoint(_) => (StatusCode::BAD_REQUEST, "malformed_checkpoint"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        warn!(code = code, error = %self.0, "Request failed");
        (
            status,
            Json(serde_json::json!({"error": self.0.to_string(), "code": code})),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "socrates"
    }))
}

// ── Session lifecycle ───────────────────────────────────────────────────

/// Session summary for the sidebar.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStatus {
    pub started: bool,
    pub project_name: String,
    pub current_step: String,
    pub answered: usize,
    pub summaries: usize,
    /// Model that summaries will use: the session override or the default.
    pub model: Option<String>,
    pub generation_available: bool,
    /// Whether the one-time intro notice has already been shown.
    pub intro_displayed: bool,
}

fn status_of(state: &AppState, session: &SessionState) -> SessionStatus {
    let generator = state.engine.generator();
    SessionStatus {
        started: session.started,
        project_name: session.project_name.clone(),
        current_step: session.current_step.clone(),
        answered: session.answers.len(),
        summaries: session.generated_summaries.len(),
        model: session
            .model_override
            .clone()
            .or_else(|| generator.default_model().map(String::from)),
        generation_available: generator.is_configured(),
        intro_displayed: session.intro_displayed,
    }
}

async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(status_of(&state, &session))
}

#[derive(Deserialize)]
struct StartRequest {
    project_name: String,
}

async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartRequest>,
) -> ApiResult<impl IntoResponse> {
    let fresh = SessionState::start(&body.project_name)?;
    let mut session = state.session.lock().await;
    let model_override = session.model_override.take();
    *session = fresh;
    session.model_override = model_override;
    info!(project = %session.project_name, "Session started");
    Ok((StatusCode::CREATED, Json(status_of(&state, &session))))
}

async fn reset_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.reset();
    info!("Session reset");
    Json(status_of(&state, &session))
}

#[derive(Deserialize)]
struct ModelRequest {
    #[serde(default)]
    model: Option<String>,
}

async fn set_model(
    State(state): State<AppState>,
    Json(body): Json<ModelRequest>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    session.set_model_override(body.model.as_deref());
    Json(status_of(&state, &session))
}

// ── Steps ───────────────────────────────────────────────────────────────

async fn render_step(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let rendered = state.engine.render(&mut session)?;
    Ok(Json(rendered))
}

#[derive(Deserialize)]
struct AdvanceRequest {
    #[serde(default)]
    answer: Option<String>,
}

async fn advance_step(
    State(state): State<AppState>,
    Json(body): Json<AdvanceRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let transition = state
        .engine
        .advance(&mut session, body.answer.as_deref())?;
    Ok(Json(transition))
}

async fn generate_summary(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let text = state.engine.generate(&mut session).await?;
    Ok(Json(serde_json::json!({ "text": text })))
}

// ── Checkpoint / export ─────────────────────────────────────────────────

async fn download_checkpoint(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let session = state.session.lock().await;
    let body = checkpoint::to_json(&session)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        checkpoint::checkpoint_file_name(&session.project_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

async fn upload_checkpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    // Decode before locking: a bad document never touches the live session.
    let restored = checkpoint::decode(checkpoint_text(&body)?)?;
    let mut session = state.session.lock().await;
    let model_override = session.model_override.take();
    *session = restored;
    session.model_override = model_override;
    info!(
        project = %session.project_name,
        step = %session.current_step,
        "Checkpoint loaded"
    );
    Ok(Json(status_of(&state, &session)))
}

fn checkpoint_text(body: &[u8]) -> Result<&str, CheckpointError> {
    std::str::from_utf8(body).map_err(|e| CheckpointError::Malformed(e.to_string()))
}

async fn export_answers(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(checkpoint::export(&session))
}
