use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::models::{Category, Franchise, MenuData, MenuItem};
use super::sample::{sample_categories, sample_menu_items};
use super::store::{
    decode_all, DocumentStore, StoreError, CATEGORIES_COLLECTION, FRANCHISES_COLLECTION,
    MENU_ITEMS_COLLECTION,
};

pub const PLACEHOLDER_FRANCHISE_NAME: &str = "Premium Restaurant";
pub const PLACEHOLDER_FRANCHISE_ADDRESS: &str = "123 Main Street, City, State 12345";
pub const PLACEHOLDER_FRANCHISE_LOGO: &str =
    "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?w=1200&h=200&fit=crop";

/// Run `primary`; an empty result or a store error is replaced wholesale by
/// `fallback()`. Live and fallback rows are never merged.
pub async fn load_with_fallback<T, P, F>(label: &str, primary: P, fallback: F) -> Vec<T>
where
    P: Future<Output = Result<Vec<T>, StoreError>>,
    F: FnOnce() -> Vec<T>,
{
    match primary.await {
        Ok(rows) if !rows.is_empty() => {
            debug!("Loaded {} {} from store", rows.len(), label);
            rows
        }
        Ok(_) => {
            warn!("No {} found in store, using sample data", label);
            fallback()
        }
        Err(e) => {
            error!("Error fetching {}, using sample data: {}", label, e);
            fallback()
        }
    }
}

/// Keep only the categories referenced by at least one item, in category order.
pub fn narrow_categories(categories: Vec<Category>, items: &[MenuItem]) -> Vec<Category> {
    let used: HashSet<&str> = items.iter().map(|item| item.category_id.as_str()).collect();

    categories
        .into_iter()
        .filter(|category| used.contains(category.id.as_str()))
        .collect()
}

pub fn placeholder_franchise(franchise_id: &str) -> Franchise {
    Franchise {
        id: franchise_id.to_string(),
        name: PLACEHOLDER_FRANCHISE_NAME.to_string(),
        address: PLACEHOLDER_FRANCHISE_ADDRESS.to_string(),
        logo_url: Some(PLACEHOLDER_FRANCHISE_LOGO.to_string()),
    }
}

/// Read access to one franchise's menu, with sample-data fallback on every
/// collection. None of the fetch methods can fail.
pub struct MenuRepository {
    store: Arc<dyn DocumentStore>,
    franchise_id: String,
}

impl MenuRepository {
    pub fn new(store: Arc<dyn DocumentStore>, franchise_id: impl Into<String>) -> Self {
        Self {
            store,
            franchise_id: franchise_id.into(),
        }
    }

    pub fn franchise_id(&self) -> &str {
        &self.franchise_id
    }

    /// Menu items of the configured franchise.
    pub async fn fetch_menu_items(&self) -> Vec<MenuItem> {
        let franchise_id = self.franchise_id.as_str();

        load_with_fallback(
            "menu items",
            async {
                let docs = self
                    .store
                    .query_equal(MENU_ITEMS_COLLECTION, "franchiseId", franchise_id)
                    .await?;
                Ok::<_, StoreError>(decode_all::<MenuItem>(MENU_ITEMS_COLLECTION, &docs))
            },
            || sample_menu_items(franchise_id),
        )
        .await
    }

    async fn fetch_all_categories(&self) -> Vec<Category> {
        load_with_fallback(
            "categories",
            async {
                let docs = self.store.list(CATEGORIES_COLLECTION).await?;
                Ok::<_, StoreError>(decode_all::<Category>(CATEGORIES_COLLECTION, &docs))
            },
            sample_categories,
        )
        .await
    }

    /// Categories used by the configured franchise.
    ///
    /// Re-fetches the item set to decide which categories are in use;
    /// `load_menu` narrows against a single item fetch instead.
    pub async fn fetch_categories(&self) -> Vec<Category> {
        let categories = self.fetch_all_categories().await;
        let items = self.fetch_menu_items().await;

        narrow_categories(categories, &items)
    }

    /// The configured franchise, or the placeholder profile when it is missing
    /// or the collection cannot be read.
    pub async fn fetch_franchise(&self) -> Franchise {
        match self.store.list(FRANCHISES_COLLECTION).await {
            Ok(docs) => {
                let found = docs
                    .iter()
                    .find(|doc| doc.id == self.franchise_id)
                    .and_then(|doc| match doc.decode::<Franchise>() {
                        Ok(franchise) => Some(franchise),
                        Err(e) => {
                            warn!("Franchise record is malformed: {}", e);
                            None
                        }
                    });

                found.unwrap_or_else(|| {
                    warn!(
                        "Franchise {} not found, using placeholder profile",
                        self.franchise_id
                    );
                    placeholder_franchise(&self.franchise_id)
                })
            }
            Err(e) => {
                error!("Error fetching franchise, using placeholder profile: {}", e);
                placeholder_franchise(&self.franchise_id)
            }
        }
    }

    /// Fetch all three collections concurrently and narrow categories against
    /// the one item set that was fetched.
    pub async fn load_menu(&self) -> MenuData {
        let (items, categories, franchise) = tokio::join!(
            self.fetch_menu_items(),
            self.fetch_all_categories(),
            self.fetch_franchise()
        );

        let categories = narrow_categories(categories, &items);

        info!(
            "Menu loaded for franchise {}: {} items, {} categories",
            self.franchise_id,
            items.len(),
            categories.len()
        );

        MenuData {
            items,
            categories,
            franchise,
        }
    }
}
