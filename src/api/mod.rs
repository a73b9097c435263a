//! REST endpoints for users, gardens, friends and chat.

pub mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::{ChatRequest, ChatService};
use crate::classifier::{Intent, TaskSize};
use crate::error::{ConfigError, GardenError};
use crate::garden::store::GardenStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GardenStore>,
    pub chat: Arc<ChatService>,
}

type ApiResult = Result<Json<Value>, ApiError>;

/// Build the Axum router with all garden routes.
pub fn garden_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/users/register", post(register))
        .route("/api/users/{user_id}", get(get_user))
        .route("/api/users/{user_id}/friends", post(add_friend))
        .route("/api/garden/{user_id}", get(get_garden))
        .route("/api/garden/{user_id}/plant", post(plant_task))
        .route("/api/garden/{user_id}/stats", get(garden_stats))
        .route("/api/garden/{user_id}/friend/{friend_id}", get(friend_garden))
        .route(
            "/api/garden/{user_id}/task/{task_id}/status",
            patch(update_task_status),
        )
        .route("/api/chat", post(chat))
        .route("/api/chat-history/{user_id}", get(chat_history))
        .with_state(state)
}

/// CORS for the frontend: one configured origin with credentials, or any origin.
pub fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let Some(origin) = frontend_url else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
        key: "FRONTEND_URL".to_string(),
        message: e.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
    }))
}

// ── Users & friends ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    username: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    body: Result<Option<Json<RegisterRequest>>, JsonRejection>,
) -> ApiResult {
    let username = body?.and_then(|Json(b)| b.username);
    let user = state.store.register(username.as_deref()).await;
    Ok(Json(json!({
        "success": true,
        "userId": user.id,
        "user": user,
    })))
}

async fn get_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult {
    let (user, friends) = state.store.profile(&user_id).await?;
    Ok(Json(json!({ "user": user, "friends": friends })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFriendRequest {
    friend_username: String,
}

async fn add_friend(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<AddFriendRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let (friend, friends) = state
        .store
        .add_friend(&user_id, body.friend_username.trim())
        .await?;
    Ok(Json(json!({
        "success": true,
        "friend": friend,
        "friends": friends,
    })))
}

async fn friend_garden(
    State(state): State<AppState>,
    Path((user_id, friend_id)): Path<(String, String)>,
) -> ApiResult {
    let (garden, user) = state.store.friend_garden(&user_id, &friend_id).await?;
    Ok(Json(json!({ "garden": garden, "user": user })))
}

// ── Garden ──────────────────────────────────────────────────────────────

async fn get_garden(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<Value> {
    let garden = state.store.garden(&user_id).await;
    Json(json!({ "garden": garden }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantRequest {
    task_size: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

async fn plant_task(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<PlantRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let size: TaskSize = body
        .task_size
        .parse()
        .map_err(GardenError::InvalidSize)?;
    let status: Intent = match body.status {
        Some(s) => s.parse().map_err(GardenError::InvalidStatus)?,
        None => Intent::Todo,
    };

    let plant = state
        .store
        .plant(
            &user_id,
            body.description.as_deref().unwrap_or_default(),
            size,
            status,
        )
        .await;
    let garden = state.store.garden(&user_id).await;
    Ok(Json(json!({ "plant": plant, "garden": garden })))
}

#[derive(Deserialize)]
struct StatusRequest {
    status: String,
}

async fn update_task_status(
    State(state): State<AppState>,
    Path((user_id, task_id)): Path<(String, String)>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let status: Intent = body.status.parse().map_err(GardenError::InvalidStatus)?;
    let plant_id = Uuid::parse_str(&task_id)
        .map_err(|_| GardenError::PlantNotFound { id: task_id.clone() })?;

    let task = state.store.update_status(&user_id, plant_id, status).await?;
    let garden = state.store.garden(&user_id).await;
    Ok(Json(json!({ "task": task, "garden": garden })))
}

async fn garden_stats(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<Value> {
    let stats = state.store.stats(&user_id).await;
    Json(json!({ "stats": stats }))
}

// ── Chat ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatBody {
    message: String,
    user_id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    is_gardener: bool,
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    debug!(user_id = %body.user_id, is_gardener = body.is_gardener, "Chat request");
    let outcome = state
        .chat
        .handle(ChatRequest {
            user_id: body.user_id,
            username: body.username,
            message: body.message,
            is_gardener: body.is_gardener,
        })
        .await?;

    if let Some(ref plant) = outcome.plant {
        info!(plant_id = %plant.id, status = %plant.status, "Task planted from chat");
    }

    Ok(Json(json!({
        "response": outcome.reply,
        "plantAdded": outcome.plant.is_some(),
        "plant": outcome.plant,
        "garden": outcome.garden,
    })))
}

async fn chat_history(State(state): State<AppState>, Path(user_id): Path<String>) -> Json<Value> {
    let history = state.store.history(&user_id).await;
    Json(json!({ "history": history }))
}
