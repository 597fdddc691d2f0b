//! Error types shared across the library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ReviewId;
use crate::validation::ValidationError;

/// Errors returned by the review API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested review does not exist on the server.
    #[error("Review {id} not found")]
    NotFound { id: ReviewId },

    /// The id cannot address a single review, e.g. empty or `..`.
    #[error("Invalid review id '{id}'")]
    InvalidId { id: ReviewId },

    /// The draft failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never produced an HTTP response.
    #[error("Network error while calling {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {body}")]
    Server {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised by a durable storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read slot {key} from {path}")]
    Read {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write slot {key} to {path}")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create storage directory: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend refused the write, e.g. a size quota was hit.
    #[error("Storage rejected write to slot {key}: {reason}")]
    Rejected { key: String, reason: String },
}

/// Errors raised by the favorites store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the snapshot failed; the in-memory change was rolled back.
    #[error("Failed to persist favorites")]
    Persistence(#[source] StorageError),

    /// Reading the stored snapshot failed.
    #[error("Failed to load favorites")]
    Load(#[source] StorageError),

    /// The stored snapshot is not a JSON list of reviews.
    #[error("Stored favorites in slot {key} are corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize favorites")]
    Serialize(#[source] serde_json::Error),
}
