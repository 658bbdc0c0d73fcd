// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::config;
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": config::config().logging.service_name,
            "version": version,
            "description": "Multi-tenant dealership management API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "token": "/auth/:dealership_id (public, when enabled)",
                "dealerships": "/api/dealerships[/:id][/sales] (protected)",
                "customers": "/api/customers[/:id] (protected)",
                "vehicles": "/api/vehicles[/:id] (protected)",
                "sales": "/api/sales[/:id] (protected)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.stores.backend();

    match state.stores.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": backend
                    }
                })),
            )
        }
    }
}
