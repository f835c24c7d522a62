//! Wishlist endpoints.

use storefront_core::{StorefrontEngine, WishlistError};
use storefront_types::{APIError, WishlistRequest, WishlistResponse, WishlistsResponse};

fn to_api_error(err: WishlistError, fallback: &str) -> APIError {
	match err {
		WishlistError::MissingProductId => {
			APIError::bad_request("MISSING_PRODUCT_ID", "Product ID is required")
		},
		WishlistError::InvalidAction(_) => APIError::bad_request("INVALID_ACTION", "Invalid action"),
		WishlistError::Storage(_) => {
			tracing::warn!(error = %err, "{}", fallback);
			APIError::internal("WISHLIST_STORAGE_ERROR", fallback)
		},
	}
}

/// Handles GET /api/wishlist.
pub async fn get_wishlist(
	owner_id: &str,
	engine: &StorefrontEngine,
) -> Result<WishlistResponse, APIError> {
	let wishlist = engine
		.wishlist_handler()
		.wishlist(owner_id)
		.await
		.map_err(|e| to_api_error(e, "Failed to fetch wishlist"))?;

	Ok(WishlistResponse {
		message: None,
		wishlist,
	})
}

/// Handles POST /api/wishlist.
pub async fn update_wishlist(
	owner_id: &str,
	request: WishlistRequest,
	engine: &StorefrontEngine,
) -> Result<WishlistResponse, APIError> {
	let wishlist = engine
		.wishlist_handler()
		.update(owner_id, request.product_id.as_deref(), &request.action)
		.await
		.map_err(|e| to_api_error(e, "Failed to update wishlist"))?;

	Ok(WishlistResponse {
		message: Some("Wishlist updated successfully".to_string()),
		wishlist,
	})
}

/// Handles GET /api/wishlists.
pub async fn all_wishlists(engine: &StorefrontEngine) -> Result<WishlistsResponse, APIError> {
	let wishlists = engine
		.wishlist_handler()
		.all_wishlists()
		.await
		.map_err(|e| to_api_error(e, "Failed to fetch wishlists"))?;

	Ok(WishlistsResponse { wishlists })
}
