use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{Review, ReviewId};
use crate::storage::Storage;

/// Storage slot holding the favorites snapshot
pub const FAVORITES_KEY: &str = "reviews";

/// Reviews the user marked as favorite, written through to durable storage.
///
/// Every mutation serializes the whole collection into one storage slot before
/// returning. If that write fails the mutation is undone, so the in-memory list
/// and the stored snapshot never disagree once a call has returned.
pub struct FavoritesStore<S: Storage> {
    storage: S,
    key: String,
    reviews: Vec<Review>,
}

impl<S: Storage> FavoritesStore<S> {
    /// Load favorites from the default slot; an absent slot means no favorites
    pub fn load(storage: S) -> Result<Self, StoreError> {
        Self::load_from_slot(storage, FAVORITES_KEY)
    }

    pub fn load_from_slot(storage: S, key: &str) -> Result<Self, StoreError> {
        let reviews = match storage.get(key).map_err(StoreError::Load)? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })?
            }
            None => Vec::new(),
        };

        info!(key, count = reviews.len(), "Loaded favorites");

        Ok(Self {
            storage,
            key: key.to_string(),
            reviews,
        })
    }

    /// Append a review unless one with the same id is already a favorite.
    ///
    /// Returns `false` for the duplicate case, which writes nothing.
    pub fn add_to_favorites(&mut self, review: Review) -> Result<bool, StoreError> {
        if self.contains(&review.id) {
            debug!(id = %review.id, "Review already in favorites");
            return Ok(false);
        }

        let id = review.id.clone();
        self.reviews.push(review);
        if let Err(e) = self.persist() {
            self.reviews.pop();
            return Err(e);
        }

        info!(%id, count = self.reviews.len(), "Added review to favorites");
        Ok(true)
    }

    /// Drop the review with this id. The snapshot is rewritten even when
    /// nothing matched.
    pub fn remove_favorite(&mut self, id: &ReviewId) -> Result<bool, StoreError> {
        let position = self.reviews.iter().position(|r| &r.id == id);
        let removed = position.map(|index| (index, self.reviews.remove(index)));

        if let Err(e) = self.persist() {
            if let Some((index, review)) = removed {
                self.reviews.insert(index, review);
            }
            return Err(e);
        }

        match removed {
            Some(_) => info!(%id, count = self.reviews.len(), "Removed review from favorites"),
            None => debug!(%id, "Review not in favorites"),
        }
        Ok(position.is_some())
    }

    pub fn clear_favorites(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.reviews);
        if let Err(e) = self.persist() {
            self.reviews = previous;
            return Err(e);
        }

        info!(cleared = previous.len(), "Cleared favorites");
        Ok(())
    }

    /// Current favorites in insertion order
    pub fn favorites(&self) -> &[Review] {
        &self.reviews
    }

    pub fn get(&self, id: &ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &ReviewId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string(&self.reviews).map_err(StoreError::Serialize)?;
        self.storage.set(&self.key, &content).map_err(|e| {
            warn!(key = %self.key, error = %e, "Failed to persist favorites, rolling back");
            StoreError::Persistence(e)
        })
    }
}
