use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown Category";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Full-portion price.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_half_portion: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_portion_cost: Option<f64>,
    #[serde(default)]
    pub is_vegetarian: bool,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    pub franchise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn offers_half_portion(&self) -> bool {
        self.has_half_portion.unwrap_or(false) && self.half_portion_cost.is_some()
    }

    /// Price shown for the given portion; falls back to the full price when
    /// the item has no half portion.
    pub fn price_for(&self, portion: Portion) -> f64 {
        match (portion, self.half_portion_cost) {
            (Portion::Half, Some(half)) if self.has_half_portion.unwrap_or(false) => half,
            _ => self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
}

impl Category {
    pub fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: UNKNOWN_CATEGORY_NAME.to_string(),
            subcategories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portion {
    #[default]
    Full,
    Half,
}

/// Everything fetched for one franchise at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuData {
    pub items: Vec<MenuItem>,
    pub categories: Vec<Category>,
    pub franchise: Franchise,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paneer_tikka(has_half: Option<bool>, half_cost: Option<f64>) -> MenuItem {
        MenuItem {
            id: "1".into(),
            name: "Paneer Tikka".into(),
            description: None,
            price: 280.0,
            has_half_portion: has_half,
            half_portion_cost: half_cost,
            is_vegetarian: true,
            category_id: "starters".into(),
            image_url: None,
            allergens: vec![],
            franchise_id: "f1".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_price_for_half_portion() {
        let item = paneer_tikka(Some(true), Some(160.0));
        assert_eq!(item.price_for(Portion::Full), 280.0);
        assert_eq!(item.price_for(Portion::Half), 160.0);
        assert!(item.offers_half_portion());
    }

    #[test]
    fn test_price_for_half_without_half_portion_flag() {
        let item = paneer_tikka(None, Some(160.0));
        assert_eq!(item.price_for(Portion::Half), 280.0);
        assert!(!item.offers_half_portion());

        let item = paneer_tikka(Some(true), None);
        assert_eq!(item.price_for(Portion::Half), 280.0);
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_optionals() {
        let json = serde_json::json!({
            "id": "abc",
            "name": "Wings",
            "price": 12,
            "categoryId": "starters",
            "franchiseId": "f1",
            "createdAt": "2024-05-01T10:00:00Z"
        });
        let item: MenuItem = serde_json::from_value(json).unwrap();

        assert_eq!(item.price, 12.0);
        assert!(!item.is_vegetarian);
        assert!(item.allergens.is_empty());
        assert_eq!(item.description_or_empty(), "");
        assert!(item.created_at.is_some());
    }
}
