//! Filter options API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::services::sales::{self, FilterOptions};
use crate::utils::AppResult;

/// GET /filters/options - dropdown values derived from the data
pub async fn options(State(state): State<ServerState>) -> AppResult<Json<FilterOptions>> {
    let options = sales::filter_options(&state.pool).await?;
    Ok(Json(options))
}
