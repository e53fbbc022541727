// src/services/listing.rs

//! Listing source: fetches the current set of adoptable cats.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{AnimalRecord, SourceConfig};
use crate::utils::http::{create_async_client, fetch_json};

/// Anything that can produce the current listing.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch every currently listed record, in source order.
    async fn fetch(&self) -> Result<Vec<AnimalRecord>>;
}

/// Listing source backed by the public JSON endpoint.
pub struct HttpListingSource {
    client: Client,
    url: String,
    records_key: String,
}

impl HttpListingSource {
    /// Create a source from configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            url: config.url.clone(),
            records_key: config.records_key.clone(),
        })
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self) -> Result<Vec<AnimalRecord>> {
        log::debug!("Fetching listing from {}", self.url);
        let body = fetch_json(&self.client, &self.url).await?;
        let records = parse_listing(body, &self.records_key)?;
        log::info!("Fetched {} listed cats", records.len());
        Ok(records)
    }
}

/// Extract the records array held under `records_key`.
pub fn parse_listing(mut body: Value, records_key: &str) -> Result<Vec<AnimalRecord>> {
    let records = body
        .get_mut(records_key)
        .map(Value::take)
        .ok_or_else(|| {
            AppError::malformed(
                "<response>",
                format!("listing has no top-level '{}' key", records_key),
            )
        })?;

    Ok(serde_json::from_value(records)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_listing() {
        let body = json!({
            "animals": [
                {"nid": "1", "title": "Pip", "field_animal_reserved": "", "field_animal_rehomed": ""},
                {"nid": "2", "title": "Moss", "field_animal_reserved": "Reserved", "field_animal_rehomed": ""}
            ],
            "total": 2
        });

        let records = parse_listing(body, "animals").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name.as_deref(), Some("Moss"));
        assert!(records[1].is_reserved());
    }

    #[test]
    fn test_missing_records_key() {
        let err = parse_listing(json!({"cats": []}), "animals").unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { .. }));
    }

    #[test]
    fn test_records_without_id_fail() {
        let err = parse_listing(json!({"animals": [{"title": "Nameless"}]}), "animals")
            .unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
