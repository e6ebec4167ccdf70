use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::grouping::CategorySummary;
use crate::database::Portion;
use crate::utils::error::ApiError;

pub type SessionId = Uuid;

/// Fixed header height the client compensates for when scrolling to a section.
pub const HEADER_OFFSET_PX: u32 = 120;

/// Per-diner UI interaction state. Never persisted.
#[derive(Debug, Clone)]
pub struct ViewSession {
    pub id: SessionId,
    /// Only items the diner touched; absent means full portion.
    pub portions: HashMap<String, Portion>,
    pub nav_open: bool,
    pub created_at: Instant,
}

impl ViewSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            portions: HashMap::new(),
            nav_open: false,
            created_at: Instant::now(),
        }
    }

    pub fn portion_for(&self, item_id: &str) -> Portion {
        self.portions.get(item_id).copied().unwrap_or_default()
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpTarget {
    pub category_id: String,
    pub anchor: String,
    pub header_offset: u32,
}

impl JumpTarget {
    pub fn for_category(category_id: &str) -> Self {
        Self {
            category_id: category_id.to_string(),
            anchor: format!("category-{}", category_id),
            header_offset: HEADER_OFFSET_PX,
        }
    }
}

/// Thread-safe in-memory session cache
#[derive(Clone)]
pub struct SessionCache {
    storage: Arc<DashMap<SessionId, ViewSession>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        info!("Initializing view session cache (ttl: {:?})", ttl);
        Self {
            storage: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn create(&self) -> SessionId {
        let id = Uuid::new_v4();
        self.storage.insert(id, ViewSession::new(id));
        debug!("Created view session {}", id);
        id
    }

    /// Returns None if not found or expired
    pub fn get(&self, id: SessionId) -> Option<ViewSession> {
        let entry = self.storage.get(&id)?;
        let session = entry.value().clone();

        // lazy deletion
        if session.is_expired(self.ttl) {
            drop(entry);
            self.remove(id);
            debug!("Session {} expired, removed from cache", id);
            return None;
        }

        Some(session)
    }

    pub fn remove(&self, id: SessionId) -> Option<ViewSession> {
        self.storage.remove(&id).map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn select_portion(
        &self,
        id: SessionId,
        item_id: &str,
        portion: Portion,
    ) -> Result<ViewSession, ApiError> {
        self.update(id, |session| {
            session.portions.insert(item_id.to_string(), portion);
            session.clone()
        })
    }

    /// Flip the quick-nav panel; returns the new open state.
    pub fn toggle_nav(&self, id: SessionId) -> Result<bool, ApiError> {
        self.update(id, |session| {
            session.nav_open = !session.nav_open;
            session.nav_open
        })
    }

    /// Resolve a quick-nav selection against the categories currently shown.
    /// Closes the panel on success.
    pub fn jump_to(
        &self,
        id: SessionId,
        category_id: &str,
        quick_nav: &[CategorySummary],
    ) -> Result<JumpTarget, ApiError> {
        if !quick_nav.iter().any(|entry| entry.id == category_id) {
            return Err(ApiError::NotFound(format!(
                "category {} is not in the current view",
                category_id
            )));
        }

        self.update(id, |session| {
            session.nav_open = false;
            JumpTarget::for_category(category_id)
        })
    }

    /// Returns number of sessions removed
    pub fn cleanup_expired(&self) -> usize {
        let start_len = self.storage.len();
        let ttl = self.ttl;
        self.storage.retain(|_, session| !session.is_expired(ttl));
        let count = start_len.saturating_sub(self.storage.len());

        if count > 0 {
            info!("Cleaned up {} expired sessions", count);
        }

        count
    }

    pub fn spawn_cleanup(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                cache.cleanup_expired();
            }
        })
    }

    fn update<R>(&self, id: SessionId, apply: impl FnOnce(&mut ViewSession) -> R) -> Result<R, ApiError> {
        let not_found = || ApiError::NotFound(format!("session {} not found", id));

        let mut entry = self.storage.get_mut(&id).ok_or_else(not_found)?;
        if entry.is_expired(self.ttl) {
            drop(entry);
            self.remove(id);
            return Err(not_found());
        }

        Ok(apply(entry.value_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn nav() -> Vec<CategorySummary> {
        vec![
            CategorySummary {
                id: "starters".to_string(),
                name: "Starters".to_string(),
                item_count: 2,
            },
            CategorySummary {
                id: "mains".to_string(),
                name: "Main Course".to_string(),
                item_count: 1,
            },
        ]
    }

    #[test]
    fn test_cache_basic_operations() {
        let cache = SessionCache::new(HOUR);
        let id = cache.create();
        assert_eq!(cache.len(), 1);

        let session = cache.get(id).unwrap();
        assert_eq!(session.id, id);
        assert!(session.portions.is_empty());
        assert!(!session.nav_open);

        cache.remove(id);
        assert!(cache.is_empty());
        assert!(cache.get(id).is_none());
    }

    #[test]
    fn test_portion_defaults_to_full_and_is_created_lazily() {
        let cache = SessionCache::new(HOUR);
        let id = cache.create();

        assert_eq!(cache.get(id).unwrap().portion_for("3"), Portion::Full);

        let session = cache.select_portion(id, "3", Portion::Half).unwrap();
        assert_eq!(session.portion_for("3"), Portion::Half);
        assert_eq!(session.portions.len(), 1);

        let session = cache.select_portion(id, "3", Portion::Full).unwrap();
        assert_eq!(session.portion_for("3"), Portion::Full);
    }

    #[test]
    fn test_toggle_nav() {
        let cache = SessionCache::new(HOUR);
        let id = cache.create();

        assert!(cache.toggle_nav(id).unwrap());
        assert!(!cache.toggle_nav(id).unwrap());
    }

    #[test]
    fn test_jump_closes_panel() {
        let cache = SessionCache::new(HOUR);
        let id = cache.create();
        cache.toggle_nav(id).unwrap();

        let target = cache.jump_to(id, "mains", &nav()).unwrap();
        assert_eq!(
            target,
            JumpTarget {
                category_id: "mains".to_string(),
                anchor: "category-mains".to_string(),
                header_offset: 120,
            }
        );
        assert!(!cache.get(id).unwrap().nav_open);
    }

    #[test]
    fn test_jump_to_unknown_category() {
        let cache = SessionCache::new(HOUR);
        let id = cache.create();
        cache.toggle_nav(id).unwrap();

        let err = cache.jump_to(id, "desserts", &nav()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(cache.get(id).unwrap().nav_open);
    }

    #[test]
    fn test_unknown_session() {
        let cache = SessionCache::new(HOUR);
        let id = Uuid::new_v4();

        assert!(matches!(cache.toggle_nav(id), Err(ApiError::NotFound(_))));
        assert!(matches!(
            cache.select_portion(id, "1", Portion::Half),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_expired_sessions_are_dropped() {
        let cache = SessionCache::new(Duration::ZERO);
        let id = cache.create();

        assert!(cache.get(id).is_none());
        assert!(cache.is_empty());

        let id = cache.create();
        assert!(matches!(cache.toggle_nav(id), Err(ApiError::NotFound(_))));

        cache.create();
        cache.create();
        assert_eq!(cache.cleanup_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cleanup_keeps_live_sessions() {
        let cache = SessionCache::new(HOUR);
        cache.create();
        assert_eq!(cache.cleanup_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_cleanup_can_be_aborted() {
        let cache = SessionCache::new(HOUR);
        let handle = cache.spawn_cleanup(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
