//! Filter-Sort Engine
//! Narrows the item list by search text and dietary flag, then orders it by
//! full-portion price. The caller's slice is never touched.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::database::MenuItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "veg")]
    Vegetarian,
    #[serde(rename = "non-veg")]
    NonVegetarian,
}

impl DietaryFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Vegetarian => "veg",
            Self::NonVegetarian => "non-veg",
        }
    }

    pub fn matches(&self, item: &MenuItem) -> bool {
        match self {
            Self::All => true,
            Self::Vegetarian => item.is_vegetarian,
            Self::NonVegetarian => !item.is_vegetarian,
        }
    }
}

impl FromStr for DietaryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "veg" | "vegetarian" => Ok(Self::Vegetarian),
            "non-veg" | "non-vegetarian" => Ok(Self::NonVegetarian),
            other => Err(format!("unknown dietary filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    Default,
    PriceLowHigh,
    PriceHighLow,
}

impl SortMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
        }
    }

    pub fn is_price_based(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "price-low-high" => Ok(Self::PriceLowHigh),
            "price-high-low" => Ok(Self::PriceHighLow),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}

/// Case-insensitive substring match on name or description.
/// An empty query matches everything.
pub fn matches_query(item: &MenuItem, query_lower: &str) -> bool {
    query_lower.is_empty()
        || item.name.to_lowercase().contains(query_lower)
        || item.description_or_empty().to_lowercase().contains(query_lower)
}

pub fn filter_and_sort(
    items: &[MenuItem],
    query: &str,
    filter: DietaryFilter,
    sort: SortMode,
) -> Vec<MenuItem> {
    let query_lower = query.to_lowercase();

    let mut filtered: Vec<MenuItem> = items
        .iter()
        .filter(|item| matches_query(item, &query_lower) && filter.matches(item))
        .cloned()
        .collect();

    // sort_by is stable; ties keep filter-pass order
    match sort {
        SortMode::Default => {}
        SortMode::PriceLowHigh => filtered.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceHighLow => filtered.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, description: Option<&str>, price: f64, veg: bool) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            price,
            has_half_portion: None,
            half_portion_cost: None,
            is_vegetarian: veg,
            category_id: "starters".to_string(),
            image_url: None,
            allergens: vec![],
            franchise_id: "f1".to_string(),
            created_at: None,
        }
    }

    fn menu() -> Vec<MenuItem> {
        vec![
            item("1", "Salad", Some("Crisp greens"), 8.0, true),
            item("2", "Wings", Some("Spicy CHICKEN wings"), 12.0, false),
            item("3", "Paneer Tikka", None, 10.0, true),
            item("4", "Fish Fry", Some("Coastal style"), 15.0, false),
            item("5", "Soup", Some("Tomato and basil"), 6.0, true),
        ]
    }

    fn ids(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_all_default_keeps_everything_in_order() {
        let items = menu();
        let result = filter_and_sort(&items, "", DietaryFilter::All, SortMode::Default);
        assert_eq!(result, items);
    }

    #[test]
    fn test_query_matches_name_and_description_case_insensitive() {
        let items = menu();
        assert_eq!(
            ids(&filter_and_sort(&items, "chicken", DietaryFilter::All, SortMode::Default)),
            vec!["2"]
        );
        assert_eq!(
            ids(&filter_and_sort(&items, "PANEER", DietaryFilter::All, SortMode::Default)),
            vec!["3"]
        );
        assert!(filter_and_sort(&items, "pizza", DietaryFilter::All, SortMode::Default).is_empty());
    }

    #[test]
    fn test_missing_description_is_searchable_as_empty() {
        let items = vec![item("3", "Paneer Tikka", None, 10.0, true)];
        assert!(filter_and_sort(&items, "greens", DietaryFilter::All, SortMode::Default).is_empty());
    }

    #[test]
    fn test_dietary_filters_successively() {
        let items = menu();

        let non_veg = filter_and_sort(&items, "", DietaryFilter::NonVegetarian, SortMode::Default);
        assert!(!non_veg.is_empty());
        assert!(non_veg.iter().all(|i| !i.is_vegetarian));

        let veg = filter_and_sort(&items, "", DietaryFilter::Vegetarian, SortMode::Default);
        assert!(!veg.is_empty());
        assert!(veg.iter().all(|i| i.is_vegetarian));

        let all = filter_and_sort(&items, "", DietaryFilter::All, SortMode::Default);
        assert_eq!(all, items);
    }

    #[test]
    fn test_price_sorts_are_reverses_without_ties() {
        let items = menu();
        let asc = filter_and_sort(&items, "", DietaryFilter::All, SortMode::PriceLowHigh);
        let desc = filter_and_sort(&items, "", DietaryFilter::All, SortMode::PriceHighLow);

        assert_eq!(ids(&asc), vec!["5", "1", "3", "2", "4"]);
        let mut reversed = desc.clone();
        reversed.reverse();
        assert_eq!(asc, reversed);
    }

    #[test]
    fn test_price_sort_is_stable_for_ties() {
        let items = vec![
            item("a", "A", None, 10.0, true),
            item("b", "B", None, 5.0, true),
            item("c", "C", None, 10.0, true),
            item("d", "D", None, 10.0, true),
        ];

        let asc = filter_and_sort(&items, "", DietaryFilter::All, SortMode::PriceLowHigh);
        assert_eq!(ids(&asc), vec!["b", "a", "c", "d"]);

        let desc = filter_and_sort(&items, "", DietaryFilter::All, SortMode::PriceHighLow);
        assert_eq!(ids(&desc), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let items = menu();
        let before = items.clone();
        let _ = filter_and_sort(&items, "", DietaryFilter::All, SortMode::PriceHighLow);
        assert_eq!(items, before);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_and_sort(&[], "x", DietaryFilter::Vegetarian, SortMode::PriceLowHigh).is_empty());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("veg".parse::<DietaryFilter>().unwrap(), DietaryFilter::Vegetarian);
        assert_eq!("Non-Veg".parse::<DietaryFilter>().unwrap(), DietaryFilter::NonVegetarian);
        assert_eq!("".parse::<DietaryFilter>().unwrap(), DietaryFilter::All);
        assert!("vegan".parse::<DietaryFilter>().is_err());

        assert_eq!("price-high-low".parse::<SortMode>().unwrap(), SortMode::PriceHighLow);
        assert!("name".parse::<SortMode>().is_err());
    }
}
