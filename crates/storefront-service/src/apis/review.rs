//! Review endpoints.

use storefront_core::{ReviewError, StorefrontEngine};
use storefront_types::{
	APIError, ReviewValidationError, ReviewsResponse, SubmitReviewRequest, SubmitReviewResponse,
};

fn to_api_error(err: ReviewError, fallback: &str) -> APIError {
	match err {
		ReviewError::Validation(e @ ReviewValidationError::MissingFields) => {
			APIError::bad_request("MISSING_REVIEW_FIELDS", e.to_string())
		},
		ReviewError::Validation(e @ ReviewValidationError::InvalidRating(_)) => {
			APIError::bad_request("INVALID_RATING", e.to_string())
		},
		ReviewError::Storage(_) => {
			tracing::warn!(error = %err, "{}", fallback);
			APIError::internal("REVIEW_STORAGE_ERROR", fallback)
		},
	}
}

/// Handles POST /api/reviews.
pub async fn submit_review(
	user_id: &str,
	request: SubmitReviewRequest,
	engine: &StorefrontEngine,
) -> Result<SubmitReviewResponse, APIError> {
	let review = engine
		.review_handler()
		.submit(user_id, request)
		.await
		.map_err(|e| to_api_error(e, "Failed to submit review"))?;

	Ok(SubmitReviewResponse {
		message: "Review submitted successfully".to_string(),
		review,
	})
}

/// Handles GET /api/reviews/{product_id}.
pub async fn product_reviews(
	product_id: &str,
	engine: &StorefrontEngine,
) -> Result<ReviewsResponse, APIError> {
	let reviews = engine
		.review_handler()
		.for_product(product_id)
		.await
		.map_err(|e| to_api_error(e, "Failed to fetch reviews"))?;

	Ok(ReviewsResponse { reviews })
}

/// Handles GET /api/reviews.
pub async fn all_reviews(engine: &StorefrontEngine) -> Result<ReviewsResponse, APIError> {
	let reviews = engine
		.review_handler()
		.all()
		.await
		.map_err(|e| to_api_error(e, "Failed to fetch reviews"))?;

	Ok(ReviewsResponse { reviews })
}
