use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::context::CallerContext;
use crate::database::models::{NewSale, Sale, SaleChanges};
use crate::handlers::ScopeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/sales/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Sale> {
    let Query(scope) = scope?;
    let sale = state.sales.get_sale(&caller, &id, scope.dealership_id.as_deref()).await?;
    Ok(ApiResponse::success(sale))
}

/// POST /api/sales
pub async fn post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> ApiResult<Sale> {
    let Query(scope) = scope?;
    let Json(input) = payload?;
    let created = state
        .sales
        .create_sale(&caller, input, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/sales/:id
pub async fn put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<SaleChanges>, JsonRejection>,
) -> ApiResult<Sale> {
    let Query(scope) = scope?;
    let Json(changes) = payload?;
    let updated = state
        .sales
        .update_sale(&caller, &id, changes, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/sales/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Sale> {
    let Query(scope) = scope?;
    let deleted = state
        .sales
        .delete_sale(&caller, &id, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(deleted))
}
