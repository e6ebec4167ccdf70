use axum::{extract::State, Json};
use serde::Serialize;

use crate::database::Franchise;
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize)]
pub struct FranchiseResponse {
    pub app_name: String,
    pub franchise: Franchise,
}

/// Header data; the placeholder profile when the franchise record is missing.
pub async fn franchise_handler(
    State(state): State<AppState>,
) -> Result<Json<FranchiseResponse>, ApiError> {
    let data = state.menu_service.data()?;

    Ok(Json(FranchiseResponse {
        app_name: state.view_options.app_name.clone(),
        franchise: data.franchise.clone(),
    }))
}
