use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::database::{MenuData, MenuRepository};
use crate::utils::error::ApiError;

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(Arc<MenuData>),
}

/// Owns the one-shot menu load and hands out the settled data.
pub struct MenuService {
    repository: Arc<MenuRepository>,
    state: RwLock<LoadState>,
}

impl MenuService {
    pub fn new(repository: Arc<MenuRepository>) -> Self {
        Self {
            repository,
            state: RwLock::new(LoadState::Loading),
        }
    }

    pub fn franchise_id(&self) -> &str {
        self.repository.franchise_id()
    }

    /// Spawn the load. Abort the handle to cancel it.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            info!("Loading menu for franchise {}", service.franchise_id());
            let data = service.repository.load_menu().await;
            *service.state.write() = LoadState::Ready(Arc::new(data));
            info!("Menu ready");
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), LoadState::Ready(_))
    }

    pub fn data(&self) -> Result<Arc<MenuData>, ApiError> {
        match &*self.state.read() {
            LoadState::Ready(data) => Ok(Arc::clone(data)),
            LoadState::Loading => Err(ApiError::NotReady("menu is still loading".to_string())),
        }
    }
}
