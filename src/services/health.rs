use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::drafts::sqlite::SqliteDraftStore;
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub drafts: DraftStoreHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DraftStoreHealth {
    /// "sqlite" or "memory"
    pub backend: String,
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    /// `None` when drafts live in memory
    pub drafts: Option<Arc<SqliteDraftStore>>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(drafts: Option<Arc<SqliteDraftStore>>) -> Self {
        let state = AppState {
            drafts,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();
    let healthy = check_draft_store(&state).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let drafts = match &state.drafts {
        Some(store) => DraftStoreHealth {
            backend: "sqlite".to_string(),
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            connection_pool_size: store.pool.size(),
            response_time_ms,
        },
        None => DraftStoreHealth {
            backend: "memory".to_string(),
            status: "healthy".to_string(),
            connection_pool_size: 0,
            response_time_ms,
        },
    };

    if !healthy {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        drafts,
        uptime_seconds: uptime,
    }))
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    if check_draft_store(&state).await {
        Ok(Json("ready"))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn check_draft_store(state: &AppState) -> bool {
    match &state.drafts {
        Some(store) => match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Draft store health check failed: {}", e);
                false
            }
        },
        None => true,
    }
}
