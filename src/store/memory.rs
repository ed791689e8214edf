use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::RemoteStore;
use crate::error::StoreError;
use crate::models::{Library, Review};

/// Operations a [`MemoryStore`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FetchReviews,
    CreateReview,
    DeleteReview,
    FetchLibrary,
    ReplaceLibrary,
}

#[derive(Debug, Default)]
struct Inner {
    reviews: Vec<Review>,
    libraries: HashMap<String, Library>,
    next_id: u64,
    failing: HashSet<StoreOp>,
    calls: Vec<StoreOp>,
}

/// In-process backend with the same semantics as the REST service
///
/// Assigns review ids on create, keeps one library per user and records
/// every call so tests can assert on the request sequence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing reviews (ids are kept as given)
    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.lock().reviews = reviews;
        self
    }

    pub fn with_library(self, user_id: &str, library: Library) -> Self {
        self.lock().libraries.insert(user_id.to_string(), library);
        self
    }

    /// Make every subsequent call of `op` fail until [`MemoryStore::recover`]
    pub fn fail(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.lock().failing.remove(&op);
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }

    pub fn library(&self, user_id: &str) -> Option<Library> {
        self.lock().libraries.get(user_id).cloned()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<StoreOp> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, op: StoreOp) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        let mut inner = self.lock();
        inner.calls.push(op);
        if inner.failing.contains(&op) {
            debug!(?op, "Injected store failure");
            return Err(StoreError::Unavailable(format!("{:?} disabled", op)));
        }
        Ok(inner)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn fetch_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let inner = self.begin(StoreOp::FetchReviews)?;
        Ok(inner.reviews.clone())
    }

    async fn create_review(&self, review: &Review) -> Result<(), StoreError> {
        let mut inner = self.begin(StoreOp::CreateReview)?;
        inner.next_id += 1;
        let mut stored = review.clone();
        stored.id = Some(format!("mem-{}", inner.next_id));
        inner.reviews.push(stored);
        Ok(())
    }

    async fn delete_review(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.begin(StoreOp::DeleteReview)?;
        let before = inner.reviews.len();
        inner.reviews.retain(|r| !r.has_id(id));
        if inner.reviews.len() == before {
            return Err(StoreError::Rejected {
                operation: "delete review",
                message: Some(format!("no review with id {}", id)),
            });
        }
        Ok(())
    }

    async fn fetch_library(&self, user_id: &str) -> Result<Library, StoreError> {
        let inner = self.begin(StoreOp::FetchLibrary)?;
        Ok(inner.libraries.get(user_id).cloned().unwrap_or_default())
    }

    async fn replace_library(&self, user_id: &str, library: &Library) -> Result<(), StoreError> {
        let mut inner = self.begin(StoreOp::ReplaceLibrary)?;
        let mut stored = library.clone();
        stored.mark_ids_stored();
        inner.libraries.insert(user_id.to_string(), stored);
        Ok(())
    }
}
