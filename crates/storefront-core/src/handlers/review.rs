//! Review handler for submitting and listing product reviews.

use crate::clock::Clock;
use serde_json::Value;
use std::sync::Arc;
use storefront_storage::{QueryFilter, StorageService};
use storefront_types::{
	truncate_id, Review, ReviewValidationError, StorageKey, SubmitReviewRequest,
};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur while handling review requests.
#[derive(Debug, Error)]
pub enum ReviewError {
	#[error("Invalid review: {0}")]
	Validation(#[from] ReviewValidationError),
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Handler behind the review endpoints.
///
/// Reviews are written once and never edited.
pub struct ReviewHandler {
	storage: Arc<StorageService>,
	clock: Arc<dyn Clock>,
}

impl ReviewHandler {
	pub fn new(storage: Arc<StorageService>, clock: Arc<dyn Clock>) -> Self {
		Self { storage, clock }
	}

	/// Validates and stores a review written by `user_id`.
	#[instrument(skip_all, fields(user_id = %truncate_id(user_id)))]
	pub async fn submit(
		&self,
		user_id: &str,
		request: SubmitReviewRequest,
	) -> Result<Review, ReviewError> {
		let review = Review::submit(
			uuid::Uuid::new_v4().to_string(),
			user_id,
			request.product_id.as_deref(),
			request.review_text(),
			request.rating,
			self.clock.now(),
		)?;

		self.storage
			.store(StorageKey::Reviews.as_str(), &review.id, &review)
			.await
			.map_err(|e| ReviewError::Storage(e.to_string()))?;

		tracing::info!(
			review_id = %truncate_id(&review.id),
			product_id = %review.product_id,
			rating = review.rating,
			"Review submitted"
		);
		Ok(review)
	}

	/// Reviews of `product_id`, newest first. Unknown products have none.
	pub async fn for_product(&self, product_id: &str) -> Result<Vec<Review>, ReviewError> {
		self.query(QueryFilter::Equals(
			"productId".to_string(),
			Value::String(product_id.to_string()),
		))
		.await
	}

	/// Every stored review, newest first.
	pub async fn all(&self) -> Result<Vec<Review>, ReviewError> {
		self.query(QueryFilter::All).await
	}

	async fn query(&self, filter: QueryFilter) -> Result<Vec<Review>, ReviewError> {
		let mut reviews: Vec<Review> = self
			.storage
			.query(StorageKey::Reviews.as_str(), filter)
			.await
			.map_err(|e| ReviewError::Storage(e.to_string()))?
			.into_iter()
			.map(|(_, review)| review)
			.collect();
		reviews.sort_by(|a, b| {
			b.created_at
				.cmp(&a.created_at)
				.then_with(|| a.id.cmp(&b.id))
		});
		Ok(reviews)
	}
}
