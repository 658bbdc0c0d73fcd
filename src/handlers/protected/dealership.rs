use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};

use crate::context::CallerContext;
use crate::database::models::{Dealership, DealershipDetail, DealershipNode, DealershipUpdate, NewDealership, Sale};
use crate::handlers::ScopeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/dealerships - the caller's subtree, or the subtree of `?dealership_id=`
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
) -> ApiResult<Vec<DealershipNode>> {
    let Query(query) = query?;
    let nodes = state
        .dealerships
        .list_dealerships(&caller, query.dealership_id.as_deref())
        .await?;
    Ok(ApiResponse::success(nodes))
}

/// GET /api/dealerships/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> ApiResult<DealershipDetail> {
    let detail = state.dealerships.get_dealership(&caller, &id).await?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/dealerships
pub async fn post(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<NewDealership>, JsonRejection>,
) -> ApiResult<Dealership> {
    let Json(input) = payload?;
    let created = state.dealerships.create_dealership(&caller, input).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /api/dealerships/:id
pub async fn put(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    payload: Result<Json<DealershipUpdate>, JsonRejection>,
) -> ApiResult<Dealership> {
    let Json(input) = payload?;
    let updated = state.dealerships.update_dealership(&caller, &id, input).await?;
    Ok(ApiResponse::success(updated))
}

/// GET /api/dealerships/:id/sales
pub async fn sales(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Sale>> {
    let sales = state.sales.sales_by_dealership(&caller, &id).await?;
    Ok(ApiResponse::success(sales))
}
