use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::context::CallerContext;
use crate::database::models::{Customer, CustomerChanges, NewCustomer};
use crate::handlers::ScopeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomerSearchQuery {
    /// Substring of the last name. Omit to list every customer.
    pub last_name: Option<String>,
    pub dealership_id: Option<String>,
}

/// GET /api/customers?last_name=&dealership_id=
pub async fn search(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    query: Result<Query<CustomerSearchQuery>, QueryRejection>,
) -> ApiResult<Vec<Customer>> {
    let Query(query) = query?;
    let customers = state
        .customers
        .customers_by_last_name(&caller, query.last_name.as_deref(), query.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(customers))
}

/// GET /api/customers/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Customer> {
    let Query(scope) = scope?;
    let customer = state
        .customers
        .get_customer(&caller, &id, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(customer))
}

/// POST /api/customers
pub async fn post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> ApiResult<Customer> {
    let Query(scope) = scope?;
    let Json(input) = payload?;
    let created = state
        .customers
        .create_customer(&caller, input, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/customers/:id
pub async fn put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<CustomerChanges>, JsonRejection>,
) -> ApiResult<Customer> {
    let Query(scope) = scope?;
    let Json(changes) = payload?;
    let updated = state
        .customers
        .update_customer(&caller, &id, changes, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/customers/:id - responds with the removed record
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Customer> {
    let Query(scope) = scope?;
    let deleted = state
        .customers
        .delete_customer(&caller, &id, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(deleted))
}
