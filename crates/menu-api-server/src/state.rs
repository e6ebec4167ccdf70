use axum::extract::FromRef;
use std::sync::Arc;

use crate::services::{MenuService, SessionCache, ViewOptions};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub menu_service: Arc<MenuService>,
    pub sessions: SessionCache,
    pub view_options: Arc<ViewOptions>,
}

impl FromRef<AppState> for Arc<MenuService> {
    fn from_ref(state: &AppState) -> Self {
        state.menu_service.clone()
    }
}

impl FromRef<AppState> for SessionCache {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
