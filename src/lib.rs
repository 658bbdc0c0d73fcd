pub mod access;
pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
pub mod testing;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

/// Full HTTP surface: public routes, the bearer-protected `/api` tree and the
/// global layers.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health));

    if state.enable_token_endpoint {
        router = router.route("/auth/:dealership_id", get(public::token_get));
    } else {
        tracing::info!("Token endpoint disabled");
    }

    let protected = api_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        crate::middleware::jwt_auth_middleware,
    ));

    let router = router.merge(protected).layer(TraceLayer::new_for_http());

    let router = match cors_layer(security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn api_routes() -> Router<AppState> {
    use protected::{customer, dealership, sale, vehicle};

    Router::new()
        .route("/api/dealerships", get(dealership::list).post(dealership::post))
        .route("/api/dealerships/:id", get(dealership::get).put(dealership::put))
        .route("/api/dealerships/:id/sales", get(dealership::sales))
        .route("/api/customers", get(customer::search).post(customer::post))
        .route(
            "/api/customers/:id",
            get(customer::get).put(customer::put).delete(customer::delete),
        )
        .route("/api/vehicles", get(vehicle::search).post(vehicle::post))
        .route(
            "/api/vehicles/:id",
            get(vehicle::get).put(vehicle::put).delete(vehicle::delete),
        )
        .route("/api/sales", axum::routing::post(sale::post))
        .route("/api/sales/:id", get(sale::get).put(sale::put).delete(sale::delete))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
