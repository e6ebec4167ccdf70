use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const MENU_ITEMS_COLLECTION: &str = "menuItems";
pub const CATEGORIES_COLLECTION: &str = "categories";
pub const FRANCHISES_COLLECTION: &str = "franchises";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

/// One record from a collection: the document id plus its plain-JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Deserialize into a domain record. The document id wins over any `id`
    /// field stored in the body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));

        serde_json::from_value(Value::Object(object))
            .map_err(|e| StoreError::Decode(format!("document {}: {}", self.id, e)))
    }
}

/// Decode every document, skipping the ones that do not fit `T`.
pub fn decode_all<T: DeserializeOwned>(collection: &str, documents: &[Document]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} record: {}", collection, e);
                None
            }
        })
        .collect()
}

/// Read-only access to the hosted document database.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents of `collection` whose `field` equals `value`, filtered server-side.
    async fn query_equal(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// Every document of `collection`.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}
