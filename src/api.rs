use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ConvertError;
use crate::pipeline::{CancelToken, ConversionPipeline};
use crate::render::{RenderSkip, StrategyBlocks};
use crate::schema::Schema;

pub struct AppState {
    pub pipeline: ConversionPipeline,
    pub schema: Schema,
    pub config: AppConfig,
}

pub async fn run_server(state: Arc<AppState>) {
    let bind_addr = state.config.server.bind_addr.clone();
    let app = Router::new()
        .route("/convert", post(convert))
        .route("/schema", get(get_schema))
        .route("/health", get(health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("API Server listening on {}", bind_addr);
    axum::serve(listener, app).await.unwrap();
}

#[derive(Deserialize)]
pub struct ConvertRequest {
    pub instruction: String,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub request_id: String,
    pub generated_at: String,
    /// The repaired document exactly as parsed
    pub json: Value,
    /// Rendered strategy card text
    pub text: String,
    /// Per-phase YAML fragments
    pub blocks: Vec<StrategyBlocks>,
    /// Fragments the renderer had to skip
    pub skipped: Vec<RenderSkip>,
}

async fn convert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> impl IntoResponse {
    let instruction = request.instruction.trim().to_string();
    if instruction.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "instruction must not be empty"})),
        )
            .into_response();
    }

    let request_id = Uuid::new_v4().to_string();
    info!(
        "🧾 [API] ({}) Converting instruction ({} chars)",
        request_id,
        instruction.len()
    );

    let cancel = CancelToken::new();
    match state.pipeline.convert(&instruction, &cancel).await {
        Ok(conversion) => {
            let response = ConvertResponse {
                request_id,
                generated_at: Utc::now().to_rfc3339(),
                json: conversion.json,
                text: conversion.rendered.text,
                blocks: conversion.blocks,
                skipped: conversion.rendered.skipped,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            error!("❌ [API] ({}) Conversion failed: {}", request_id, err);
            let status = match &err {
                ConvertError::Transport { .. } => StatusCode::BAD_GATEWAY,
                ConvertError::MalformedDocument { .. }
                | ConvertError::ValidationExhausted { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ConvertError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = json!({
                "request_id": request_id,
                "error": err.to_string(),
                "raw": err.raw_artifact(),
            });
            (status, Json(body)).into_response()
        }
    }
}

async fn get_schema(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.schema.as_value().clone())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
