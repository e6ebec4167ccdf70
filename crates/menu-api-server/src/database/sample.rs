use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::error;

use super::models::{Category, MenuItem};

const SAMPLE_MENU: &str = include_str!("../../data/sample_menu.toml");

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SampleMenu {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    menu_items: Vec<MenuItem>,
}

static SAMPLE: Lazy<SampleMenu> = Lazy::new(|| {
    toml::from_str(SAMPLE_MENU).unwrap_or_else(|e| {
        error!("Bundled sample menu is invalid, fallback data disabled: {}", e);
        SampleMenu::default()
    })
});

/// Sample items owned by `franchise_id`; never items of another franchise.
pub fn sample_menu_items(franchise_id: &str) -> Vec<MenuItem> {
    SAMPLE
        .menu_items
        .iter()
        .filter(|item| item.franchise_id == franchise_id)
        .cloned()
        .collect()
}

/// All bundled categories, unnarrowed.
pub fn sample_categories() -> Vec<Category> {
    SAMPLE.categories.clone()
}
