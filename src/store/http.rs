use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{Envelope, RemoteStore};
use crate::error::StoreError;
use crate::models::{Library, Review};

/// REST client for the Nexo backend
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<Envelope<T>, StoreError> {
        let response = request.send().await.map_err(|source| StoreError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|source| StoreError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    #[instrument(skip(self))]
    async fn fetch_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let url = self.url("resenas");
        debug!(url = %url, "Fetching reviews");

        let records = self
            .send::<Vec<Value>>(self.client.get(&url), &url)
            .await?
            .into_data("fetch reviews")?;

        // One malformed record must not hide the rest of the collection
        let total = records.len();
        let reviews: Vec<Review> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.get("_id").and_then(Value::as_str).map(str::to_string);
                match serde_json::from_value(record) {
                    Ok(review) => Some(review),
                    Err(e) => {
                        warn!(id = ?id, error = %e, "Skipping malformed review");
                        None
                    }
                }
            })
            .collect();

        info!(count = reviews.len(), skipped = total - reviews.len(), "Reviews loaded");
        Ok(reviews)
    }

    #[instrument(skip(self, review), fields(name = %review.name))]
    async fn create_review(&self, review: &Review) -> Result<(), StoreError> {
        let url = self.url("resenas");
        debug!(url = %url, "Submitting review");

        self.send::<IgnoredAny>(self.client.post(&url).json(review), &url)
            .await?
            .into_ack("create review")?;

        info!("Review saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_review(&self, id: &str) -> Result<(), StoreError> {
        let url = self.url(&format!("resenas/{}", id));
        debug!(url = %url, "Deleting review");

        self.send::<IgnoredAny>(self.client.delete(&url), &url)
            .await?
            .into_ack("delete review")?;

        info!("Review deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_library(&self, user_id: &str) -> Result<Library, StoreError> {
        let url = self.url(&format!("biblioteca/{}", user_id));
        debug!(url = %url, "Fetching library");

        let library = self
            .send::<Library>(self.client.get(&url), &url)
            .await?
            .into_data("fetch library")?;

        info!(items = library.total(), "Library loaded");
        Ok(library)
    }

    #[instrument(skip(self, library))]
    async fn replace_library(&self, user_id: &str, library: &Library) -> Result<(), StoreError> {
        let url = self.url(&format!("biblioteca/{}", user_id));
        debug!(url = %url, items = library.total(), "Replacing library");

        self.send::<IgnoredAny>(self.client.put(&url).json(library), &url)
            .await?
            .into_ack("replace library")?;

        info!("Library saved");
        Ok(())
    }
}
