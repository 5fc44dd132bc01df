//! API router and route handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use replyai_config::AppConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use super::cors::cors_layer;
use super::error::ApiError;
use super::types::*;
use crate::personalization::PersonalizationStore;
use crate::provider::SuggestResponse;
use crate::registry::ProviderRegistry;

/// Shared state accessible to all route handlers.
pub struct ApiState {
    pub config: AppConfig,
    pub registry: Arc<ProviderRegistry>,
    pub store: Arc<dyn PersonalizationStore>,
}

/// Build the axum router with all API routes and the configured CORS policy.
pub fn router(state: Arc<ApiState>) -> axum::Router {
    let cors = cors_layer(&state.config.cors);
    axum::Router::new()
        .route("/health", get(handle_health))
        .route("/suggest", post(handle_suggest))
        .route("/providers", get(handle_providers))
        .route("/train", post(handle_train))
        .route("/upload_personalization", post(handle_upload_personalization))
        .route("/delete_personalization", post(handle_delete_personalization))
        .route("/personalization/{user_id}", get(handle_get_personalization))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown_rx` turns true.
///
/// A request made before this future is first polled is still honoured.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ApiState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<(), std::io::Error> {
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
            info!("API server shutting down");
        })
        .await
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::build_info::VERSION.to_string(),
        git_hash: crate::build_info::GIT_HASH.to_string(),
    })
}

async fn handle_suggest(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<SuggestBody>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let SuggestBody { request, provider } = body;
    if request.context.trim().is_empty() {
        return Err(ApiError::bad_request("Empty context"));
    }

    let requested = provider
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(state.config.suggest.default_provider.as_str());
    let provider = state.registry.resolve(requested);
    info!(user = %request.user_id, provider = %provider.id(), "/suggest called");

    match provider.generate(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!(provider = %e.provider(), error = %e, retryable = e.retryable(), "suggestion failed");
            Err(e.into())
        }
    }
}

async fn handle_providers(State(state): State<Arc<ApiState>>) -> Json<ProvidersResponse> {
    let providers = state
        .registry
        .ids()
        .into_iter()
        .filter_map(|id| state.registry.get(id))
        .map(|p| ProviderSummary {
            id: p.id().to_string(),
            name: p.name().to_string(),
            available: p.is_available(),
        })
        .collect();
    Json(ProvidersResponse {
        providers,
        default_provider: state.config.suggest.default_provider.clone(),
    })
}

async fn handle_train() -> Json<StatusResponse> {
    info!("/train called (mock)");
    Json(StatusResponse {
        message: Some("training queued (mock)".to_string()),
        ..StatusResponse::ok()
    })
}

async fn handle_upload_personalization(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<UploadPersonalizationRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let user_id = req.user_id.filter(|u| !u.is_empty());
    let (Some(user_id), Some(artifacts)) = (user_id, req.artifacts) else {
        return Err(ApiError::bad_request("user_id and artifacts required"));
    };

    let keys: Vec<&str> = artifacts
        .as_object()
        .map(|o| o.keys().map(String::as_str).collect())
        .unwrap_or_default();
    info!(user = %user_id, ?keys, "saved personalization");

    state.store.put(&user_id, json!({ "artifacts": artifacts }));
    Ok(Json(StatusResponse::ok()))
}

async fn handle_delete_personalization(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<DeletePersonalizationRequest>,
) -> Result<Json<DeletePersonalizationResponse>, ApiError> {
    let Some(user_id) = req.user_id.filter(|u| !u.is_empty()) else {
        return Err(ApiError::bad_request("user_id required"));
    };

    let deleted = state.store.delete(&user_id);
    if deleted {
        info!(user = %user_id, "deleted personalization");
    }
    Ok(Json(DeletePersonalizationResponse {
        status: "ok".to_string(),
        deleted,
    }))
}

async fn handle_get_personalization(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    Json(state.store.get(&user_id).unwrap_or_else(|| json!({})))
}
