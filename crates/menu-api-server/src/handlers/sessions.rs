use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use super::parse_session_id;
use crate::database::Portion;
use crate::services::{derive_view, view::price_label, JumpTarget, SessionCache, SessionId, ViewState};
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Deserialize)]
pub struct PortionRequest {
    pub portion: Portion,
}

#[derive(Debug, Serialize)]
pub struct PortionResponse {
    pub item_id: String,
    pub portion: Portion,
    pub display_price: f64,
    pub price_label: String,
}

#[derive(Debug, Serialize)]
pub struct NavToggleResponse {
    pub open: bool,
}

#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub category_id: String,
    pub q: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

pub async fn create_session_handler(
    State(sessions): State<SessionCache>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = sessions.create();
    info!("Session {} created ({} active)", session_id, sessions.len());
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

pub async fn select_portion_handler(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(String, String)>,
    Json(request): Json<PortionRequest>,
) -> Result<Json<PortionResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let data = state.menu_service.data()?;

    let item = data
        .items
        .iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| ApiError::NotFound(format!("menu item {} not found", item_id)))?;

    if request.portion == Portion::Half && !item.offers_half_portion() {
        return Err(ApiError::BadRequest(format!(
            "menu item {} has no half portion",
            item_id
        )));
    }

    state.sessions.select_portion(id, &item.id, request.portion)?;

    let display_price = item.price_for(request.portion);
    Ok(Json(PortionResponse {
        item_id: item.id.clone(),
        portion: request.portion,
        display_price,
        price_label: price_label(&state.view_options.currency, display_price),
    }))
}

pub async fn toggle_nav_handler(
    State(sessions): State<SessionCache>,
    Path(id): Path<String>,
) -> Result<Json<NavToggleResponse>, ApiError> {
    let id = parse_session_id(&id)?;
    let open = sessions.toggle_nav(id)?;
    Ok(Json(NavToggleResponse { open }))
}

/// Resolve a quick-nav click against the categories shown for the given inputs.
pub async fn jump_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<JumpTarget>, ApiError> {
    let id = parse_session_id(&id)?;
    let view_state = ViewState::parse(
        request.q.as_deref(),
        request.filter.as_deref(),
        request.sort.as_deref(),
    )?;
    let data = state.menu_service.data()?;

    let view = derive_view(&view_state, &data, &HashMap::new(), &state.view_options);
    let target = state.sessions.jump_to(id, &request.category_id, &view.quick_nav)?;

    Ok(Json(target))
}
