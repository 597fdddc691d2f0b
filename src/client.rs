use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Review, ReviewDraft, ReviewId};
use crate::validation::validate;

/// Client for the movie review REST API.
///
/// Every call is a single attempt; retrying is left to the caller. Drafts are
/// validated before anything is sent.
pub struct ReviewClient {
    client: Client,
    base_url: Url,
}

impl ReviewClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", config.base_url);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_with(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }

    fn collection_url(&self) -> String {
        self.url_with(&["movie"])
    }

    /// The id becomes a single percent-encoded path segment
    fn item_url(&self, id: &ReviewId) -> Result<String, ApiError> {
        let segment = id.to_string();
        // A bare dot segment would resolve to the collection instead of one review
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(ApiError::InvalidId { id: id.clone() });
        }
        Ok(self.url_with(&["movie", &segment]))
    }

    /// `GET /movie`
    #[instrument(skip(self))]
    pub async fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let url = self.collection_url();
        let response = self.send(self.client.get(&url), &url, None).await?;
        let reviews: Vec<Review> = decode(response, &url).await?;

        info!(count = reviews.len(), "Fetched reviews");
        Ok(reviews)
    }

    /// `GET /movie/{id}`
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_review(&self, id: &ReviewId) -> Result<Review, ApiError> {
        let url = self.item_url(id)?;
        let response = self.send(self.client.get(&url), &url, Some(id)).await?;
        decode(response, &url).await
    }

    /// `POST /movie`; the server assigns the id of the returned record
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, ApiError> {
        let draft = validate(draft.clone())?;
        let url = self.collection_url();
        let response = self
            .send(self.client.post(&url).json(&draft), &url, None)
            .await?;
        let review: Review = decode(response, &url).await?;

        info!(id = %review.id, "Created review");
        Ok(review)
    }

    /// `PUT /movie/{id}`
    #[instrument(skip(self, draft), fields(id = %id))]
    pub async fn update_review(&self, id: &ReviewId, draft: &ReviewDraft) -> Result<Review, ApiError> {
        let draft = validate(draft.clone())?;
        let url = self.item_url(id)?;
        let response = self
            .send(self.client.put(&url).json(&draft), &url, Some(id))
            .await?;
        let review = decode(response, &url).await?;

        info!("Updated review");
        Ok(review)
    }

    /// `DELETE /movie/{id}`; deleting an unknown id is `NotFound`
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        self.send(self.client.delete(&url), &url, Some(id)).await?;

        info!("Deleted review");
        Ok(())
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
        id: Option<&ReviewId>,
    ) -> Result<Response, ApiError> {
        debug!(url, "Sending request");

        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(ApiError::NotFound { id: id.clone() });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Review API returned an error");
        Err(ApiError::Server { status, body })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    response.json().await.map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
