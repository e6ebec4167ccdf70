//! Grouping/Category-Ordering Engine
//!
//! Buckets an already filtered and sorted item list by `categoryId` and
//! orders the buckets:
//! - default sort: the category named "Starters" first, the rest in the
//!   order their first item appears in the input
//! - price ascending: by the cheapest item, ties by average price
//! - price descending: by the priciest item, ties by average price
//!
//! Only categories with at least one item are emitted, so the price
//! statistics are always defined.

use serde::Serialize;
use std::collections::HashMap;

use super::filter::SortMode;
use crate::database::{Category, MenuItem};

pub const PINNED_CATEGORY_NAME: &str = "Starters";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

impl CategoryGroup {
    pub fn price_stats(&self) -> PriceStats {
        PriceStats::of(&self.items)
    }
}

/// Quick-nav entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl PriceStats {
    /// Callers only pass non-empty slices; an empty one yields zeros.
    pub fn of(items: &[MenuItem]) -> Self {
        if items.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                avg: 0.0,
            };
        }

        let (min, max, sum) = items.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), item| (min.min(item.price), max.max(item.price), sum + item.price),
        );

        Self {
            min,
            max,
            avg: sum / items.len() as f64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub groups: Vec<CategoryGroup>,
    pub summaries: Vec<CategorySummary>,
}

impl Grouping {
    pub fn total_items(&self) -> usize {
        self.summaries.iter().map(|s| s.item_count).sum()
    }
}

pub fn group_by_category(items: &[MenuItem], categories: &[Category], sort: SortMode) -> Grouping {
    let mut buckets: Vec<(String, Vec<MenuItem>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        match index.get(item.category_id.as_str()) {
            Some(&slot) => buckets[slot].1.push(item.clone()),
            None => {
                index.insert(item.category_id.as_str(), buckets.len());
                buckets.push((item.category_id.clone(), vec![item.clone()]));
            }
        }
    }

    let by_id: HashMap<&str, &Category> = categories
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect();

    // buckets are in first-appearance order, which is the base order
    let mut groups: Vec<CategoryGroup> = buckets
        .into_iter()
        .map(|(category_id, items)| {
            let category = match by_id.get(category_id.as_str()) {
                Some(&category) => category.clone(),
                None => Category::unknown(&category_id),
            };
            CategoryGroup { category, items }
        })
        .collect();

    order_groups(&mut groups, sort);

    let summaries = groups
        .iter()
        .map(|group| CategorySummary {
            id: group.category.id.clone(),
            name: group.category.name.clone(),
            item_count: group.items.len(),
        })
        .collect();

    Grouping { groups, summaries }
}

fn order_groups(groups: &mut [CategoryGroup], sort: SortMode) {
    match sort {
        SortMode::Default => {
            groups.sort_by_key(|group| group.category.name != PINNED_CATEGORY_NAME);
        }
        SortMode::PriceLowHigh => {
            groups.sort_by(|a, b| {
                let (a, b) = (a.price_stats(), b.price_stats());
                a.min.total_cmp(&b.min).then_with(|| a.avg.total_cmp(&b.avg))
            });
        }
        SortMode::PriceHighLow => {
            groups.sort_by(|a, b| {
                let (a, b) = (a.price_stats(), b.price_stats());
                b.max
                    .total_cmp(&a.max)
                    .then_with(|| b.avg.total_cmp(&a.avg))
            });
        }
    }
}
