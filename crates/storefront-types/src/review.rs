//! Product review types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// Errors raised when a review is submitted.
#[derive(Debug, Error, PartialEq)]
pub enum ReviewValidationError {
	#[error("Missing productId, review text, or rating")]
	MissingFields,
	#[error("Rating must be between 1 and 5, got {0}")]
	InvalidRating(i64),
}

/// A customer's rating and comment on a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
	pub id: String,
	pub product_id: String,
	/// User that wrote the review.
	pub user_id: String,
	pub text: String,
	/// Between [`MIN_RATING`] and [`MAX_RATING`].
	pub rating: u8,
	pub created_at: DateTime<Utc>,
}

impl Review {
	/// Builds a review from submitted fields.
	///
	/// Blank text, a blank product id and a missing or zero rating all count
	/// as missing.
	pub fn submit(
		id: impl Into<String>,
		user_id: impl Into<String>,
		product_id: Option<&str>,
		text: Option<&str>,
		rating: Option<i64>,
		created_at: DateTime<Utc>,
	) -> Result<Self, ReviewValidationError> {
		let product_id = product_id
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.ok_or(ReviewValidationError::MissingFields)?;
		let text = text
			.map(str::trim)
			.filter(|text| !text.is_empty())
			.ok_or(ReviewValidationError::MissingFields)?;
		let rating = rating
			.filter(|rating| *rating != 0)
			.ok_or(ReviewValidationError::MissingFields)?;
		let rating = u8::try_from(rating)
			.ok()
			.filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
			.ok_or(ReviewValidationError::InvalidRating(rating))?;

		Ok(Self {
			id: id.into(),
			product_id: product_id.to_string(),
			user_id: user_id.into(),
			text: text.to_string(),
			rating,
			created_at,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap()
	}

	#[test]
	fn test_submit_trims_and_keeps_fields() {
		let review = Review::submit(
			"r-1",
			"u1",
			Some(" p-9 "),
			Some("  Soft and warm "),
			Some(5),
			now(),
		)
		.unwrap();

		assert_eq!(review.product_id, "p-9");
		assert_eq!(review.text, "Soft and warm");
		assert_eq!(review.rating, 5);
		assert_eq!(review.created_at, now());
	}

	#[test]
	fn test_submit_requires_every_field() {
		for (product_id, text, rating) in [
			(None, Some("ok"), Some(3)),
			(Some("p"), Some("   "), Some(3)),
			(Some("p"), None, Some(3)),
			(Some("p"), Some("ok"), None),
			(Some("p"), Some("ok"), Some(0)),
		] {
			assert_eq!(
				Review::submit("r", "u", product_id, text, rating, now()),
				Err(ReviewValidationError::MissingFields)
			);
		}
	}

	#[test]
	fn test_submit_rejects_rating_out_of_range() {
		assert_eq!(
			Review::submit("r", "u", Some("p"), Some("ok"), Some(6), now()),
			Err(ReviewValidationError::InvalidRating(6))
		);
		assert_eq!(
			Review::submit("r", "u", Some("p"), Some("ok"), Some(-2), now()),
			Err(ReviewValidationError::InvalidRating(-2))
		);
	}

	#[test]
	fn test_review_serializes_camel_case() {
		let review = Review::submit("r-1", "u1", Some("p-9"), Some("Nice"), Some(4), now()).unwrap();
		let value = serde_json::to_value(&review).unwrap();
		assert_eq!(value["productId"], "p-9");
		assert_eq!(value["userId"], "u1");
		assert_eq!(value["rating"], 4);
	}
}
