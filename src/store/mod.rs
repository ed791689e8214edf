pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StoreError;
use crate::models::{Library, Review};

/// Remote persistence for reviews and the personal library
///
/// Every call is a single round trip. No retries are attempted; callers
/// decide how a failure is surfaced.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every review
    async fn fetch_reviews(&self) -> Result<Vec<Review>, StoreError>;

    /// Submit a new review
    async fn create_review(&self, review: &Review) -> Result<(), StoreError>;

    /// Delete a review by its server id
    async fn delete_review(&self, id: &str) -> Result<(), StoreError>;

    /// Fetch the library of the given user
    async fn fetch_library(&self, user_id: &str) -> Result<Library, StoreError>;

    /// Overwrite the whole library of the given user
    async fn replace_library(&self, user_id: &str, library: &Library) -> Result<(), StoreError>;
}

/// `{ success, data, message }` wrapper returned by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, treating `success: false` or a missing payload as a rejection
    pub fn into_data(self, operation: &'static str) -> Result<T, StoreError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(StoreError::Rejected {
                operation,
                message: self.message,
            }),
        }
    }

    /// Check the success flag of an envelope without payload
    pub fn into_ack(self, operation: &'static str) -> Result<(), StoreError> {
        if self.success {
            Ok(())
        } else {
            Err(StoreError::Rejected {
                operation,
                message: self.message,
            })
        }
    }
}
