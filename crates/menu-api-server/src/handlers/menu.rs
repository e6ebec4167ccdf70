use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::parse_session_id;
use crate::database::Portion;
use crate::services::{derive_view, CategorySummary, SessionCache, ViewModel, ViewState};
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub session: Option<String>,
}

impl MenuQuery {
    pub fn view_state(&self) -> Result<ViewState, ApiError> {
        ViewState::parse(self.q.as_deref(), self.filter.as_deref(), self.sort.as_deref())
    }
}

pub async fn menu_handler(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<ViewModel>, ApiError> {
    let view_state = query.view_state()?;
    let data = state.menu_service.data()?;
    let portions = session_portions(&state.sessions, query.session.as_deref())?;

    debug!(
        "Menu view: q={:?} filter={} sort={}",
        view_state.query,
        view_state.filter.as_str(),
        view_state.sort.as_str()
    );

    Ok(Json(derive_view(&view_state, &data, &portions, &state.view_options)))
}

/// Quick-nav entries for the same inputs as the menu view.
pub async fn nav_handler(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let view_state = query.view_state()?;
    let data = state.menu_service.data()?;

    let view = derive_view(&view_state, &data, &HashMap::new(), &state.view_options);
    Ok(Json(view.quick_nav))
}

fn session_portions(
    sessions: &SessionCache,
    session: Option<&str>,
) -> Result<HashMap<String, Portion>, ApiError> {
    let Some(raw) = session else {
        return Ok(HashMap::new());
    };

    let id = parse_session_id(raw)?;
    sessions
        .get(id)
        .map(|session| session.portions)
        .ok_or_else(|| ApiError::NotFound(format!("session {} not found", id)))
}
