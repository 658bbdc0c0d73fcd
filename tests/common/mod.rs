use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use dms_api_rust::auth::TokenIssuer;
use dms_api_rust::config::AppConfig;
use dms_api_rust::database::models::NewDealership;
use dms_api_rust::database::MemoryStore;
use dms_api_rust::state::{AppState, Stores};

/// The full router over a fresh in-memory backend, driven in-process.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    issuer: TokenIssuer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(Stores::memory(MemoryStore::new()), &config);
        let router = dms_api_rust::app(state.clone(), &config.security);

        Self {
            router,
            state,
            issuer: TokenIssuer::new(&config.security),
        }
    }

    /// Insert a dealership without any caller check and return its id.
    pub async fn seed(&self, name: &str, parent: Option<&str>) -> Result<String> {
        let dealership = self
            .state
            .dealerships
            .create_unscoped(NewDealership {
                name: name.to_string(),
                address: format!("{} Test Ave", name),
                parent_dealership_id: parent.map(str::to_string),
            })
            .await
            .context("failed to seed dealership")?;
        Ok(dealership.dealership_id)
    }

    pub fn token(&self, dealership_id: &str) -> Result<String> {
        Ok(self.issuer.issue(dealership_id)?)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body from {}", uri))?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}
