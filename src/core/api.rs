//! HTTP API for LUKU
//!
//! Endpoints:
//! - POST /chat - One conversational turn
//! - POST /session/start - Greet and deal the first riddle
//! - GET /user/:id/profile - Score and persona
//! - POST /user/:id/category - Switch category, forget used riddles
//! - GET /puzzle/random - Standalone riddle
//! - GET /health - Health check

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::core::orchestrator::{TurnOrchestrator, TurnRequest};
use crate::core::replies;
use crate::core::store::new_user_id;
use crate::types::{Intent, TurnOutcome};
use crate::DEFAULT_CATEGORY;

/// App state
pub struct AppState {
    pub engine: TurnOrchestrator,
}

/// Boundary errors shown to the user
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("المستخدم غير موجود")]
    UserNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
        };
        let body = Json(json!({
            "success": false,
            "error": true,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Chat request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub is_first_message: bool,
}

/// Chat / session-start response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
    pub session_id: String,
    pub user_id: String,
    pub points: u32,
    pub streak: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub intent: Intent,
    pub persona: String,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(out: TurnOutcome) -> Self {
        Self {
            success: !out.faulted,
            reply: out.reply,
            session_id: out.session_id,
            user_id: out.user_id,
            points: out.points,
            streak: out.streak,
            correct_answers: out.correct_answers,
            total_answers: out.total_answers,
            intent: out.intent,
            persona: out.persona,
        }
    }
}

/// Session start request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
}

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileView,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub points: u32,
    pub streak: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub accuracy: f64,
    pub persona: String,
    pub category: String,
    pub level: String,
    pub join_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// Category change request
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: Option<String>,
}

/// Random puzzle query
#[derive(Debug, Deserialize)]
pub struct RandomPuzzleQuery {
    pub category: Option<String>,
    pub user_id: Option<String>,
}

/// Random puzzle response
#[derive(Debug, Serialize)]
pub struct RandomPuzzleResponse {
    pub success: bool,
    pub puzzle: String,
    pub category: String,
    pub user_id: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users_count: usize,
    pub sessions_active: usize,
    pub puzzles_available: usize,
    pub generation_enabled: bool,
}

/// Create the API router
pub fn create_router(engine: TurnOrchestrator) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/session/start", post(start_session))
        .route("/user/:id/profile", get(get_profile))
        .route("/user/:id/category", post(change_category))
        .route("/puzzle/random", get(random_puzzle))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = &state.engine;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        users_count: engine.store().user_count().await,
        sessions_active: engine.store().active_sessions().await,
        puzzles_available: engine.puzzles().bank().len(),
        generation_enabled: engine.generation_enabled(),
    })
}

/// One conversational turn
async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    let message = req.message.unwrap_or_default().trim().to_string();
    if message.is_empty() && !req.is_first_message {
        return Err(ApiError::Validation("الرسالة مطلوبة 📝".to_string()));
    }

    let user_id = non_blank(req.user_id).unwrap_or_else(new_user_id);
    let outcome = state
        .engine
        .handle_turn(TurnRequest {
            user_id,
            message,
            category: req.category,
            level: req.level,
            session_id: req.session_id,
            is_first_message: req.is_first_message,
        })
        .await;

    Ok(Json(outcome.into()))
}

/// Explicit session start
async fn start_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    let user_id = non_blank(req.user_id).unwrap_or_else(new_user_id);
    let outcome = state
        .engine
        .start_session(&user_id, req.category, req.level, req.session_id)
        .await;
    Ok(Json(outcome.into()))
}

/// Profile read
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.engine.store().profile(&id).await.ok_or(ApiError::UserNotFound)?;

    Ok(Json(ProfileResponse {
        success: true,
        profile: ProfileView {
            points: profile.points,
            streak: profile.streak,
            correct_answers: profile.correct_answers,
            total_answers: profile.total_answers,
            accuracy: profile.accuracy(),
            persona: profile.persona().name().to_string(),
            category: profile.category.clone(),
            level: profile.level.clone(),
            join_date: profile.joined_at,
            last_active: profile.last_active,
        },
    }))
}

/// Category change
async fn change_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    let requested = req.category.unwrap_or_default();
    let category = state
        .engine
        .change_category(&id, &requested)
        .await
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(json!({
        "success": true,
        "new_category": category,
        "message": format!("🎯 تم تغيير المجال إلى {}! استمتع بألغاز جديدة!", category),
    })))
}

/// Standalone riddle
async fn random_puzzle(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RandomPuzzleQuery>,
) -> Json<RandomPuzzleResponse> {
    let bank = state.engine.puzzles().bank();
    let category = non_blank(query.category).unwrap_or_else(|| {
        bank.categories()
            .choose(&mut rand::thread_rng())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string()
    });
    let user_id = non_blank(query.user_id).unwrap_or_else(new_user_id);

    let puzzle = state.engine.random_puzzle(&user_id, &category).await;
    let shown = replies::present_riddle(&puzzle.record.riddle, &mut rand::thread_rng());

    Json(RandomPuzzleResponse {
        success: true,
        puzzle: shown,
        category: puzzle.category,
        user_id,
    })
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(format!("طلب غير صالح: {}", rejection.body_text()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Run the API server
pub async fn run_server(addr: &str, engine: TurnOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "LUKU API listening");
    info!("  POST /chat                - Conversational turn");
    info!("  POST /session/start       - Start session");
    info!("  GET  /user/:id/profile    - Profile");
    info!("  POST /user/:id/category   - Change category");
    info!("  GET  /puzzle/random       - Random riddle");
    info!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
