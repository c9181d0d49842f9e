//! Sales API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::Sale;
use crate::query::ListParams;
use crate::services::sales::{self, SalesPage};
use crate::utils::AppResult;

/// GET /sales - paginated, filterable, sortable sales listing
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<SalesPage>> {
    let page = sales::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /sales/:id - single sale by identifier
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Sale>> {
    let sale = sales::get_by_id(&state.pool, &id).await?;
    Ok(Json(sale))
}
