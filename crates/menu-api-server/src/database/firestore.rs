//! Firestore REST client
//!
//! Only the two read paths the menu needs: a structured equality query
//! (`documents:runQuery`) and a paged collection listing. Firestore wraps
//! every field in a typed value (`{"stringValue": "..."}`); those wrappers
//! are flattened into plain JSON before the rows reach the repository.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};
use std::time::Duration;
use tracing::debug;

use super::store::{Document, DocumentStore, StoreError};
use crate::config::FirestoreConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    structured_query: Value,
}

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RawDocument {
    fn into_document(self) -> Document {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or(self.name.as_str())
            .to_string();

        Document::new(id, decode_fields(&self.fields))
    }
}

#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()?,
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                config.base_url.trim_end_matches('/'),
                config.project_id
            ),
            api_key: config.api_key.clone(),
            page_size: config.page_size.max(1),
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, StoreError> {
        let mut pairs: Vec<(&str, String)> = params.to_vec();
        if let Some(key) = &self.api_key {
            pairs.push(("key", key.clone()));
        }

        Url::parse_with_params(&format!("{}{}", self.documents_url, path), &pairs)
            .map_err(|e| StoreError::Decode(format!("invalid store url: {}", e)))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn query_equal(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let url = self.url(":runQuery", &[])?;
        let request = RunQueryRequest {
            structured_query: json!({
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value }
                    }
                }
            }),
        };

        let response = self.client.post(url).json(&request).send().await?;
        let rows: Vec<RunQueryRow> = Self::read_json(response).await?;

        let documents: Vec<Document> = rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(RawDocument::into_document)
            .collect();

        debug!(
            "runQuery {} where {} == {} returned {} documents",
            collection,
            field,
            value,
            documents.len()
        );

        Ok(documents)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("pageSize", self.page_size.to_string())];
            if let Some(token) = page_token.take() {
                params.push(("pageToken", token));
            }

            let url = self.url(&format!("/{}", collection), &params)?;
            let response = self.client.get(url).send().await?;
            let page: ListResponse = Self::read_json(response).await?;

            documents.extend(page.documents.into_iter().map(RawDocument::into_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} documents from {}", documents.len(), collection);

        Ok(documents)
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Flatten one typed Firestore value into plain JSON.
pub fn decode_value(value: &Value) -> Value {
    let Some(object) = value.as_object() else {
        return value.clone();
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        // 64-bit integers arrive as JSON strings
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(Number::from(n)))
                .unwrap_or(Value::Null),
            other => other.clone(),
        },
        "doubleValue" => match inner {
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            other => other.clone(),
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        // stringValue, booleanValue, timestampValue, referenceValue, geoPointValue, ...
        _ => inner.clone(),
    }
}
