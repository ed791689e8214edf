use thiserror::Error;

use crate::models::{Bucket, ItemId};

/// Failure talking to the persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend rejected {operation}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected {
        operation: &'static str,
        message: Option<String>,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Missing or empty form input. The message is what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor ingresa el nombre")]
    MissingName,

    #[error("Por favor selecciona una categoría")]
    MissingCategory,

    #[error("Por favor selecciona una puntuación")]
    MissingRating,

    #[error("Por favor escribe tu reseña")]
    MissingBody,

    #[error("Por favor ingresa un nombre")]
    MissingItemName,
}

impl ValidationError {
    /// Form field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName | ValidationError::MissingItemName => "name",
            ValidationError::MissingCategory => "category",
            ValidationError::MissingRating => "rating",
            ValidationError::MissingBody => "body",
        }
    }
}

/// Unrecognised label or out-of-range value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("score must be between 1 and 5, got {0}")]
    ScoreOutOfRange(u8),

    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown library category: {0}")]
    UnknownBucket(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("invalid item id: {0}")]
    InvalidItemId(String),
}

/// Reference to a review or library item that is not in the cache
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("review {0} not found")]
    ReviewNotFound(String),

    #[error("item {id} not found in {bucket}")]
    ItemNotFound { bucket: Bucket, id: ItemId },
}
