pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod search;
pub mod storage;
pub mod validation;

pub use client::ReviewClient;
pub use config::Config;
pub use error::{ApiError, StorageError, StoreError};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use models::*;
pub use search::{filter_reviews, SearchField};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use validation::{validate, validate_form, FieldError, ReviewForm, ValidationError};
