use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::context::CallerContext;
use crate::database::models::{NewVehicle, Vehicle, VehicleChanges, VehicleCriteria};
use crate::handlers::ScopeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VehicleSearchQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub dealership_id: Option<String>,
}

/// GET /api/vehicles?make=&model=&year=&dealership_id=
pub async fn search(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    query: Result<Query<VehicleSearchQuery>, QueryRejection>,
) -> ApiResult<Vec<Vehicle>> {
    let Query(query) = query?;
    let criteria = VehicleCriteria {
        make: query.make,
        model: query.model,
        year: query.year,
    };
    let vehicles = state
        .vehicles
        .vehicles_by_criteria(&caller, &criteria, query.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(vehicles))
}

/// GET /api/vehicles/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Vehicle> {
    let Query(scope) = scope?;
    let vehicle = state
        .vehicles
        .get_vehicle(&caller, &id, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(vehicle))
}

/// POST /api/vehicles
pub async fn post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<NewVehicle>, JsonRejection>,
) -> ApiResult<Vehicle> {
    let Query(scope) = scope?;
    let Json(input) = payload?;
    let created = state
        .vehicles
        .create_vehicle(&caller, input, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/vehicles/:id
pub async fn put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
    payload: Result<Json<VehicleChanges>, JsonRejection>,
) -> ApiResult<Vehicle> {
    let Query(scope) = scope?;
    let Json(changes) = payload?;
    let updated = state
        .vehicles
        .update_vehicle(&caller, &id, changes, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/vehicles/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    scope: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Vehicle> {
    let Query(scope) = scope?;
    let deleted = state
        .vehicles
        .delete_vehicle(&caller, &id, scope.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(deleted))
}
