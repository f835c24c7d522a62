//! API types for the storefront HTTP API.
//!
//! This module defines the request and response bodies of the order, wishlist
//! and review endpoints together with the structured error type every handler
//! returns. Field names follow the camelCase convention of the storefront
//! frontend.

use crate::{Order, OrderItem, Review, Wishlist};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body of `POST /api/store-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrderRequest {
	/// Line items being purchased.
	#[serde(default)]
	pub items: Vec<OrderItem>,
	/// Total the client computed for the items.
	pub total_amount: Decimal,
}

/// Response body of `POST /api/store-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOrderResponse {
	pub message: String,
	pub order: Order,
}

/// Response body of `GET /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
	pub orders: Vec<Order>,
}

/// An order whose reconciled state could not be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileFailure {
	pub order_id: String,
	pub error: String,
}

/// Response body of `GET /api/orders/update-status`.
///
/// `failures` is empty when every changed order was written. Orders listed in
/// `failures` appear in `orders` with their previously stored state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileOrdersResponse {
	pub orders: Vec<Order>,
	pub failures: Vec<ReconcileFailure>,
}

/// Request body of `POST /api/wishlist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
	/// Product to add or remove.
	pub product_id: Option<String>,
	/// Either "add" or "remove".
	#[serde(default)]
	pub action: String,
}

/// Response body of the wishlist endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistResponse {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	pub wishlist: Vec<String>,
}

/// Response body of `GET /api/wishlists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistsResponse {
	pub wishlists: Vec<Wishlist>,
}

/// Request body of `POST /api/reviews`.
///
/// The review text may be sent as either `text` or `review`; `text` wins
/// when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
	pub product_id: Option<String>,
	pub text: Option<String>,
	pub review: Option<String>,
	pub rating: Option<i64>,
}

impl SubmitReviewRequest {
	/// The submitted review text, whichever field carried it.
	pub fn review_text(&self) -> Option<&str> {
		self.text.as_deref().or(self.review.as_deref())
	}
}

/// Response body of `POST /api/reviews`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewResponse {
	pub message: String,
	pub review: Review,
}

/// Response body of the review listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsResponse {
	pub reviews: Vec<Review>,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Request failed validation (400)
	BadRequest { error_type: String, message: String },
	/// Caller could not be identified (401)
	Unauthorized { message: String },
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Shorthand for a 400.
	pub fn bad_request(error_type: impl Into<String>, message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: error_type.into(),
			message: message.into(),
		}
	}

	/// Shorthand for a 500.
	pub fn internal(error_type: impl Into<String>, message: impl Into<String>) -> Self {
		APIError::InternalServerError {
			error_type: error_type.into(),
			message: message.into(),
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Unauthorized { .. } => 401,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error, message) = match self {
			APIError::BadRequest {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => (error_type.clone(), message.clone()),
			APIError::Unauthorized { message } => ("UNAUTHORIZED".to_string(), message.clone()),
		};

		ErrorResponse { error, message }
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_response_mapping() {
		let err = APIError::Unauthorized {
			message: "No token provided".to_string(),
		};
		assert_eq!(err.status_code(), 401);
		let body = err.to_error_response();
		assert_eq!(body.error, "UNAUTHORIZED");
		assert_eq!(body.message, "No token provided");

		let err = APIError::internal("ORDER_STORAGE_ERROR", "Failed to fetch orders");
		assert_eq!(err.status_code(), 500);
		assert_eq!(err.to_error_response().error, "ORDER_STORAGE_ERROR");
	}

	#[test]
	fn test_review_text_prefers_text_field() {
		let request: SubmitReviewRequest =
			serde_json::from_str(r#"{"productId":"p1","review":"Cosy","rating":4}"#).unwrap();
		assert_eq!(request.review_text(), Some("Cosy"));

		let request: SubmitReviewRequest =
			serde_json::from_str(r#"{"productId":"p1","text":"Warm","review":"Cosy"}"#).unwrap();
		assert_eq!(request.review_text(), Some("Warm"));
		assert_eq!(request.rating, None);
	}

	#[test]
	fn test_store_order_request_accepts_numeric_total() {
		let request: StoreOrderRequest = serde_json::from_str(
			r#"{"items":[{"productId":"p1","name":"Towel","price":12.5,"quantity":2}],"totalAmount":25}"#,
		)
		.unwrap();

		assert_eq!(request.items.len(), 1);
		assert_eq!(request.total_amount, Decimal::from(25));
		assert_eq!(request.items[0].line_total(), Some(Decimal::from(25)));
	}
}
