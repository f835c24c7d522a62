//! Order endpoints.
//!
//! Placing an order, listing a customer's orders, and refreshing their
//! statuses against the current time.

use storefront_core::{OrderError, StorefrontEngine};
use storefront_types::{
	APIError, OrdersResponse, ReconcileOrdersResponse, StoreOrderRequest, StoreOrderResponse,
};
use tracing::warn;

/// Maps an order handler error to its API error, using `fallback` as the
/// message for server-side failures.
fn to_api_error(err: OrderError, fallback: &str) -> APIError {
	match err {
		OrderError::Validation(e) => APIError::bad_request("INVALID_ORDER", e.to_string()),
		OrderError::Storage(_) | OrderError::Lifecycle(_) => {
			warn!(error = %err, "{}", fallback);
			APIError::internal("ORDER_STORAGE_ERROR", fallback)
		},
	}
}

/// Handles POST /api/store-order.
pub async fn store_order(
	owner_id: &str,
	request: StoreOrderRequest,
	engine: &StorefrontEngine,
) -> Result<StoreOrderResponse, APIError> {
	let order = engine
		.order_handler()
		.place_order(owner_id, request)
		.await
		.map_err(|e| to_api_error(e, "Failed to store order"))?;

	Ok(StoreOrderResponse {
		message: "Order stored successfully".to_string(),
		order,
	})
}

/// Handles GET /api/orders.
pub async fn list_orders(
	owner_id: &str,
	engine: &StorefrontEngine,
) -> Result<OrdersResponse, APIError> {
	let orders = engine
		.order_handler()
		.list_orders(owner_id)
		.await
		.map_err(|e| to_api_error(e, "Failed to fetch orders"))?;

	Ok(OrdersResponse { orders })
}

/// Handles GET /api/orders/update-status.
///
/// Succeeds even when some changed orders could not be written; those are
/// listed in `failures`.
pub async fn update_statuses(
	owner_id: &str,
	engine: &StorefrontEngine,
) -> Result<ReconcileOrdersResponse, APIError> {
	engine
		.order_handler()
		.refresh_orders(owner_id)
		.await
		.map_err(|e| to_api_error(e, "Failed to update order statuses"))
}
