//! HTTP server for the storefront API.
//!
//! Routes live under `/api`; `/health` sits at the root. Callers are
//! identified by a header set by the authenticating gateway in front of
//! this service. The review and wishlist listings are public.

use axum::{
	extract::{DefaultBodyLimit, FromRequestParts, Path, State},
	http::{request::Parts, HeaderName, HeaderValue, Method, StatusCode},
	response::Json,
	routing::{get, post},
	Router,
};
use std::sync::Arc;
use std::time::Duration;
use storefront_config::{ApiConfig, CorsConfig};
use storefront_core::StorefrontEngine;
use storefront_types::{
	APIError, HealthResponse, OrdersResponse, ReconcileOrdersResponse, ReviewsResponse,
	StoreOrderRequest, StoreOrderResponse, SubmitReviewRequest, SubmitReviewResponse,
	WishlistRequest, WishlistResponse, WishlistsResponse,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{Any, CorsLayer},
	limit::RequestBodyLimitLayer,
	timeout::TimeoutLayer,
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the storefront engine for processing requests.
	pub engine: Arc<StorefrontEngine>,
	/// Header carrying the authenticated user id.
	pub user_header: HeaderName,
}

/// Id of the user making the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl FromRequestParts<AppState> for AuthenticatedUser {
	type Rejection = APIError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let user_id = parts
			.headers
			.get(&state.user_header)
			.and_then(|value| value.to_str().ok())
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| APIError::Unauthorized {
				message: "No token provided".to_string(),
			})?;

		Ok(AuthenticatedUser(user_id.to_string()))
	}
}

fn cors_layer(cors: Option<&CorsConfig>) -> Result<CorsLayer, Box<dyn std::error::Error>> {
	let Some(cors) = cors else {
		return Ok(CorsLayer::permissive());
	};

	let mut layer = CorsLayer::new()
		.allow_methods(
			cors.allowed_methods
				.iter()
				.map(|method| method.parse::<Method>())
				.collect::<Result<Vec<_>, _>>()?,
		)
		.allow_headers(
			cors.allowed_headers
				.iter()
				.map(|header| header.parse::<HeaderName>())
				.collect::<Result<Vec<_>, _>>()?,
		);

	layer = if cors.allowed_origins.iter().any(|origin| origin == "*") {
		layer.allow_origin(Any)
	} else {
		layer.allow_origin(
			cors.allowed_origins
				.iter()
				.map(|origin| origin.parse::<HeaderValue>())
				.collect::<Result<Vec<_>, _>>()?,
		)
	};

	Ok(layer)
}

/// Builds the API router with its middleware.
pub fn router(
	api_config: &ApiConfig,
	engine: Arc<StorefrontEngine>,
) -> Result<Router, Box<dyn std::error::Error>> {
	let app_state = AppState {
		engine,
		user_header: api_config.auth.user_header.parse()?,
	};

	let app = Router::new()
		.route("/health", get(handle_health))
		.nest(
			"/api",
			Router::new()
				.route("/store-order", post(handle_store_order))
				.route("/orders", get(handle_list_orders))
				.route("/orders/update-status", get(handle_update_statuses))
				.route(
					"/wishlist",
					get(handle_get_wishlist).post(handle_update_wishlist),
				)
				.route("/wishlists", get(handle_all_wishlists))
				.route("/reviews", get(handle_all_reviews).post(handle_submit_review))
				.route("/reviews/{product_id}", get(handle_product_reviews)),
		)
		.layer(RequestBodyLimitLayer::new(api_config.max_request_size))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				)))
				.layer(cors_layer(api_config.cors.as_ref())?)
				.layer(DefaultBodyLimit::disable()),
		)
		.with_state(app_state);

	Ok(app)
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<StorefrontEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(&api_config, engine)?;

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Storefront API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /health requests.
async fn handle_health() -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "ok".to_string(),
	})
}

/// Handles POST /api/store-order requests.
async fn handle_store_order(
	State(state): State<AppState>,
	AuthenticatedUser(owner_id): AuthenticatedUser,
	Json(request): Json<StoreOrderRequest>,
) -> Result<(StatusCode, Json<StoreOrderResponse>), APIError> {
	let response = crate::apis::order::store_order(&owner_id, request, &state.engine).await?;
	Ok((StatusCode::CREATED, Json(response)))
}

/// Handles GET /api/orders requests.
async fn handle_list_orders(
	State(state): State<AppState>,
	AuthenticatedUser(owner_id): AuthenticatedUser,
) -> Result<Json<OrdersResponse>, APIError> {
	crate::apis::order::list_orders(&owner_id, &state.engine)
		.await
		.map(Json)
}

/// Handles GET /api/orders/update-status requests.
async fn handle_update_statuses(
	State(state): State<AppState>,
	AuthenticatedUser(owner_id): AuthenticatedUser,
) -> Result<Json<ReconcileOrdersResponse>, APIError> {
	crate::apis::order::update_statuses(&owner_id, &state.engine)
		.await
		.map(Json)
}

/// Handles GET /api/wishlist requests.
async fn handle_get_wishlist(
	State(state): State<AppState>,
	AuthenticatedUser(owner_id): AuthenticatedUser,
) -> Result<Json<WishlistResponse>, APIError> {
	crate::apis::wishlist::get_wishlist(&owner_id, &state.engine)
		.await
		.map(Json)
}

/// Handles POST /api/wishlist requests.
async fn handle_update_wishlist(
	State(state): State<AppState>,
	AuthenticatedUser(owner_id): AuthenticatedUser,
	Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistResponse>, APIError> {
	crate::apis::wishlist::update_wishlist(&owner_id, request, &state.engine)
		.await
		.map(Json)
}

/// Handles GET /api/wishlists requests.
async fn handle_all_wishlists(
	State(state): State<AppState>,
) -> Result<Json<WishlistsResponse>, APIError> {
	crate::apis::wishlist::all_wishlists(&state.engine)
		.await
		.map(Json)
}

/// Handles POST /api/reviews requests.
async fn handle_submit_review(
	State(state): State<AppState>,
	AuthenticatedUser(user_id): AuthenticatedUser,
	Json(request): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<SubmitReviewResponse>), APIError> {
	let response = crate::apis::review::submit_review(&user_id, request, &state.engine).await?;
	Ok((StatusCode::CREATED, Json(response)))
}

/// Handles GET /api/reviews/{product_id} requests.
async fn handle_product_reviews(
	State(state): State<AppState>,
	Path(product_id): Path<String>,
) -> Result<Json<ReviewsResponse>, APIError> {
	crate::apis::review::product_reviews(&product_id, &state.engine)
		.await
		.map(Json)
}

/// Handles GET /api/reviews requests.
async fn handle_all_reviews(
	State(state): State<AppState>,
) -> Result<Json<ReviewsResponse>, APIError> {
	crate::apis::review::all_reviews(&state.engine)
		.await
		.map(Json)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::body::{to_bytes, Body};
	use axum::http::Request;
	use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
	use serde_json::{json, Value};
	use storefront_config::builders::ConfigBuilder;
	use storefront_core::FixedClock;
	use storefront_storage::{implementations::memory::MemoryStorage, StorageService};
	use tower::ServiceExt;

	fn placed_at() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 11, 20, 10, 0, 0).unwrap()
	}

	/// Two routers over the same storage, one at placement time and one
	/// `days` later.
	fn routers(days: i64) -> (Router, Router) {
		let config = ConfigBuilder::new().api_port(5001).build();
		let api_config = config.api.clone().unwrap();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));

		let at = |now: DateTime<Utc>| {
			let engine = StorefrontEngine::new(
				config.clone(),
				storage.clone(),
				Arc::new(FixedClock(now)),
			);
			router(&api_config, Arc::new(engine)).unwrap()
		};
		(at(placed_at()), at(placed_at() + ChronoDuration::days(days)))
	}

	async fn send(
		app: &Router,
		method: &str,
		uri: &str,
		user: Option<&str>,
		body: Option<Value>,
	) -> (StatusCode, Value) {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(user) = user {
			builder = builder.header("x-user-id", user);
		}
		let request = match body {
			Some(body) => builder
				.header("content-type", "application/json")
				.body(Body::from(body.to_string()))
				.unwrap(),
			None => builder.body(Body::empty()).unwrap(),
		};

		let response = app.clone().oneshot(request).await.unwrap();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, value)
	}

	fn order_body() -> Value {
		json!({
			"items": [
				{"productId": "p-1", "name": "Tea towel", "price": 12.5, "quantity": 2},
				{"productId": "p-2", "name": "Candle", "price": "7.25", "quantity": 1, "image": "candle.png"}
			],
			"totalAmount": 32.25
		})
	}

	#[tokio::test]
	async fn test_health() {
		let (app, _) = routers(0);
		let (status, body) = send(&app, "GET", "/health", None, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["status"], "ok");
	}

	#[tokio::test]
	async fn test_missing_user_header_is_unauthorized() {
		let (app, _) = routers(0);
		let (status, body) = send(&app, "GET", "/api/orders", None, None).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
		assert_eq!(body["error"], "UNAUTHORIZED");
		assert_eq!(body["message"], "No token provided");
	}

	#[tokio::test]
	async fn test_store_order_then_list() {
		let (app, _) = routers(0);

		let (status, body) =
			send(&app, "POST", "/api/store-order", Some("u1"), Some(order_body())).await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body["message"], "Order stored successfully");
		assert_eq!(body["order"]["status"], "Pending");
		assert_eq!(body["order"]["ownerId"], "u1");
		assert_eq!(body["order"]["statusTimeline"].as_array().unwrap().len(), 1);

		let (status, body) = send(&app, "GET", "/api/orders", Some("u1"), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["orders"].as_array().unwrap().len(), 1);

		let (_, body) = send(&app, "GET", "/api/orders", Some("u2"), None).await;
		assert!(body["orders"].as_array().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_store_order_rejects_wrong_total() {
		let (app, _) = routers(0);
		let mut body = order_body();
		body["totalAmount"] = json!(10);

		let (status, body) = send(&app, "POST", "/api/store-order", Some("u1"), Some(body)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_ORDER");
	}

	#[tokio::test]
	async fn test_store_order_rejects_amount_out_of_range() {
		let (app, _) = routers(0);
		let body = json!({
			"items": [
				{"productId": "p-1", "name": "Rug", "price": "79228162514264337593543950335", "quantity": 2}
			],
			"totalAmount": 1
		});

		let (status, body) = send(&app, "POST", "/api/store-order", Some("u1"), Some(body)).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_ORDER");
		assert_eq!(body["message"], "Item 0 amount is out of range");

		let (_, body) = send(&app, "GET", "/api/orders", Some("u1"), None).await;
		assert!(body["orders"].as_array().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_update_status_advances_orders() {
		let (placing, later) = routers(3);
		send(&placing, "POST", "/api/store-order", Some("u1"), Some(order_body())).await;

		let (status, body) =
			send(&later, "GET", "/api/orders/update-status", Some("u1"), None).await;
		assert_eq!(status, StatusCode::OK);
		assert!(body["failures"].as_array().unwrap().is_empty());
		let order = &body["orders"][0];
		assert_eq!(order["status"], "Shipped");
		let timeline = order["statusTimeline"].as_array().unwrap();
		assert_eq!(timeline.len(), 2);
		assert_eq!(timeline[1]["description"], "Order shipped to the delivery address");

		let (_, again) = send(&later, "GET", "/api/orders/update-status", Some("u1"), None).await;
		assert_eq!(again["orders"], body["orders"]);
	}

	#[tokio::test]
	async fn test_wishlist_flow() {
		let (app, _) = routers(0);

		let (status, body) = send(&app, "GET", "/api/wishlist", Some("u1"), None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!({"wishlist": []}));

		for _ in 0..2 {
			let (status, body) = send(
				&app,
				"POST",
				"/api/wishlist",
				Some("u1"),
				Some(json!({"productId": "p-1", "action": "add"})),
			)
			.await;
			assert_eq!(status, StatusCode::OK);
			assert_eq!(body["message"], "Wishlist updated successfully");
			assert_eq!(body["wishlist"], json!(["p-1"]));
		}

		let (_, body) = send(
			&app,
			"POST",
			"/api/wishlist",
			Some("u1"),
			Some(json!({"productId": "p-1", "action": "remove"})),
		)
		.await;
		assert_eq!(body["wishlist"], json!([]));
	}

	#[tokio::test]
	async fn test_wishlist_rejects_bad_input() {
		let (app, _) = routers(0);

		let (status, body) = send(
			&app,
			"POST",
			"/api/wishlist",
			Some("u1"),
			Some(json!({"action": "add"})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["message"], "Product ID is required");

		let (status, body) = send(
			&app,
			"POST",
			"/api/wishlist",
			Some("u1"),
			Some(json!({"productId": "p-1", "action": "toggle"})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["message"], "Invalid action");
	}

	#[tokio::test]
	async fn test_reviews_flow() {
		let (app, _) = routers(0);

		let (status, body) = send(&app, "GET", "/api/reviews/p-1", None, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!({"reviews": []}));

		let (status, body) = send(
			&app,
			"POST",
			"/api/reviews",
			Some("u1"),
			Some(json!({"productId": "p-1", "review": "Very soft", "rating": 5})),
		)
		.await;
		assert_eq!(status, StatusCode::CREATED);
		assert_eq!(body["message"], "Review submitted successfully");
		assert_eq!(body["review"]["text"], "Very soft");
		assert_eq!(body["review"]["userId"], "u1");

		send(
			&app,
			"POST",
			"/api/reviews",
			Some("u2"),
			Some(json!({"productId": "p-2", "text": "Faded quickly", "rating": 2})),
		)
		.await;

		let (_, body) = send(&app, "GET", "/api/reviews/p-1", None, None).await;
		let reviews = body["reviews"].as_array().unwrap();
		assert_eq!(reviews.len(), 1);
		assert_eq!(reviews[0]["rating"], 5);

		let (status, body) = send(&app, "GET", "/api/reviews", None, None).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body["reviews"].as_array().unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_review_submission_is_validated() {
		let (app, _) = routers(0);
		let review = json!({"productId": "p-1", "text": "Nice", "rating": 4});

		let (status, _) = send(&app, "POST", "/api/reviews", None, Some(review)).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);

		let (status, body) = send(
			&app,
			"POST",
			"/api/reviews",
			Some("u1"),
			Some(json!({"productId": "p-1", "rating": 4})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["message"], "Missing productId, review text, or rating");

		let (status, body) = send(
			&app,
			"POST",
			"/api/reviews",
			Some("u1"),
			Some(json!({"productId": "p-1", "text": "Nice", "rating": 7})),
		)
		.await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body["error"], "INVALID_RATING");

		let (_, body) = send(&app, "GET", "/api/reviews", None, None).await;
		assert!(body["reviews"].as_array().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_all_wishlists_listing() {
		let (app, _) = routers(0);

		for (user, product) in [("u2", "p-1"), ("u1", "p-2")] {
			send(
				&app,
				"POST",
				"/api/wishlist",
				Some(user),
				Some(json!({"productId": product, "action": "add"})),
			)
			.await;
		}

		let (status, body) = send(&app, "GET", "/api/wishlists", None, None).await;
		assert_eq!(status, StatusCode::OK);
		let wishlists = body["wishlists"].as_array().unwrap();
		assert_eq!(wishlists.len(), 2);
		assert_eq!(wishlists[0]["ownerId"], "u1");
		assert_eq!(wishlists[0]["productIds"], json!(["p-2"]));
		assert_eq!(wishlists[1]["ownerId"], "u2");
	}

	#[test]
	fn test_cors_layer_rejects_bad_origin() {
		let cors = CorsConfig {
			allowed_origins: vec!["bad\norigin".to_string()],
			allowed_headers: vec!["content-type".to_string()],
			allowed_methods: vec!["GET".to_string()],
		};
		assert!(cors_layer(Some(&cors)).is_err());
		assert!(cors_layer(None).is_ok());
	}
}
