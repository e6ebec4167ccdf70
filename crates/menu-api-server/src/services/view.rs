//! View derivation
//!
//! `derive_view` is the single reducer from (inputs, fetched data, portion
//! selections) to everything the menu page shows. It is pure and recomputed
//! per request.

use serde::Serialize;
use std::collections::HashMap;

use super::filter::{filter_and_sort, DietaryFilter, SortMode};
use super::grouping::{group_by_category, CategorySummary};
use crate::config::{FeatureConfig, Settings};
use crate::database::{Franchise, MenuData, MenuItem, Portion};
use crate::utils::error::ApiError;

pub const NO_SEARCH_RESULTS_MESSAGE: &str = "No items found matching your search.";
pub const NO_ITEMS_MESSAGE: &str = "No menu items available.";

/// Live search/filter/sort inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub query: String,
    pub filter: DietaryFilter,
    pub sort: SortMode,
}

impl ViewState {
    /// Parse raw request parameters; absent values take their defaults.
    pub fn parse(
        query: Option<&str>,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self, ApiError> {
        let filter = match filter {
            Some(raw) => raw.parse::<DietaryFilter>().map_err(ApiError::BadRequest)?,
            None => DietaryFilter::default(),
        };
        let sort = match sort {
            Some(raw) => raw.parse::<SortMode>().map_err(ApiError::BadRequest)?,
            None => SortMode::default(),
        };

        Ok(Self {
            query: query.unwrap_or_default().to_string(),
            filter,
            sort,
        })
    }

    /// Drop inputs whose feature is switched off.
    pub fn with_features(mut self, features: &FeatureConfig) -> Self {
        if !features.enable_search {
            self.query.clear();
        }
        if !features.enable_filtering {
            self.filter = DietaryFilter::All;
        }
        if !features.enable_sorting {
            self.sort = SortMode::Default;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub app_name: String,
    pub currency: String,
    pub features: FeatureConfig,
}

impl ViewOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            app_name: settings.franchise.app_name.clone(),
            currency: settings.franchise.currency.clone(),
            features: settings.features.clone(),
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            app_name: "Restaurant Menu".to_string(),
            currency: "₹".to_string(),
            features: FeatureConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub app_name: String,
    pub franchise: Franchise,
    pub query: String,
    pub filter: DietaryFilter,
    pub sort: SortMode,
    pub sections: Vec<MenuSection>,
    pub quick_nav: Vec<CategorySummary>,
    pub total_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuSection {
    pub category: SectionCategory,
    pub item_count: usize,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: MenuItem,
    pub selected_portion: Portion,
    pub display_price: f64,
    pub price_label: String,
}

/// `<currency><amount>`; whole amounts carry no fractional part.
pub fn price_label(currency: &str, amount: f64) -> String {
    format!("{}{}", currency, amount)
}

pub fn derive_view(
    state: &ViewState,
    data: &MenuData,
    portions: &HashMap<String, Portion>,
    options: &ViewOptions,
) -> ViewModel {
    let state = state.clone().with_features(&options.features);

    let filtered = filter_and_sort(&data.items, &state.query, state.filter, state.sort);
    let grouping = group_by_category(&filtered, &data.categories, state.sort);

    let sections: Vec<MenuSection> = grouping
        .groups
        .into_iter()
        .map(|group| MenuSection {
            category: SectionCategory {
                id: group.category.id,
                name: group.category.name,
            },
            item_count: group.items.len(),
            items: group
                .items
                .into_iter()
                .map(|item| {
                    let selected_portion = portions.get(&item.id).copied().unwrap_or_default();
                    let display_price = item.price_for(selected_portion);
                    ItemView {
                        price_label: price_label(&options.currency, display_price),
                        item,
                        selected_portion,
                        display_price,
                    }
                })
                .collect(),
        })
        .collect();

    let total_items = filtered.len();
    let empty_message = match (total_items, state.query.is_empty()) {
        (0, false) => Some(NO_SEARCH_RESULTS_MESSAGE.to_string()),
        (0, true) => Some(NO_ITEMS_MESSAGE.to_string()),
        _ => None,
    };

    ViewModel {
        app_name: options.app_name.clone(),
        franchise: data.franchise.clone(),
        query: state.query,
        filter: state.filter,
        sort: state.sort,
        sections,
        quick_nav: grouping.summaries,
        total_items,
        empty_message,
    }
}
