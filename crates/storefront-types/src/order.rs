//! Order types for the storefront.
//!
//! This module defines the persisted order record, its line items, the
//! fulfilment status and the append-only status timeline that records every
//! status the order has held.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when an order record is built or checked.
#[derive(Debug, Error, PartialEq)]
pub enum OrderValidationError {
	#[error("Order must contain at least one item")]
	EmptyItems,
	#[error("Item {index} has invalid quantity {quantity}")]
	InvalidQuantity { index: usize, quantity: u32 },
	#[error("Item {index} has negative price {price}")]
	NegativePrice { index: usize, price: Decimal },
	#[error("Item {index} amount is out of range")]
	AmountOverflow { index: usize },
	#[error("Total amount {declared} does not match item sum {computed}")]
	TotalMismatch { declared: Decimal, computed: Decimal },
	#[error("Status timeline is empty")]
	EmptyTimeline,
	#[error("Last timeline status {timeline} does not match order status {status}")]
	TimelineStatusMismatch {
		timeline: OrderStatus,
		status: OrderStatus,
	},
	#[error("Timeline entry {index} is earlier than the entry before it")]
	TimelineOutOfOrder { index: usize },
}

/// Fulfilment status of an order.
///
/// Variants are declared in lifecycle order, so the derived `Ord` gives
/// `Pending < Confirmed < Shipped < Delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
	/// Order has been placed and not yet confirmed.
	Pending,
	/// Order has been confirmed by the seller.
	Confirmed,
	/// Order is on its way to the delivery address.
	Shipped,
	/// Order has been delivered. Terminal.
	Delivered,
}

impl OrderStatus {
	/// All statuses in lifecycle order.
	pub const ALL: [OrderStatus; 4] = [
		OrderStatus::Pending,
		OrderStatus::Confirmed,
		OrderStatus::Shipped,
		OrderStatus::Delivered,
	];

	/// Human readable description recorded in the status timeline.
	pub fn description(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "Order placed successfully",
			OrderStatus::Confirmed => "Order confirmed by the seller",
			OrderStatus::Shipped => "Order shipped to the delivery address",
			OrderStatus::Delivered => "Order delivered successfully",
		}
	}

	/// Returns true if no further transitions are defined from this status.
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderStatus::Delivered)
	}

	/// Returns the string representation used on the wire and in storage.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "Pending",
			OrderStatus::Confirmed => "Confirmed",
			OrderStatus::Shipped => "Shipped",
			OrderStatus::Delivered => "Delivered",
		}
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		OrderStatus::ALL
			.into_iter()
			.find(|status| status.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| format!("Unknown order status: {}", s))
	}
}

/// Snapshot of a product taken when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
	/// Reference to the purchased product.
	pub product_id: String,
	/// Product name at the time of purchase.
	pub name: String,
	/// Unit price at the time of purchase.
	pub price: Decimal,
	/// Number of units purchased.
	pub quantity: u32,
	/// Product image reference at the time of purchase.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl OrderItem {
	/// Price of this line: unit price times quantity, or `None` when the
	/// product does not fit in a `Decimal`.
	pub fn line_total(&self) -> Option<Decimal> {
		self.price.checked_mul(Decimal::from(self.quantity))
	}
}

/// One entry of the append-only status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTimelineEntry {
	pub status: OrderStatus,
	pub timestamp: DateTime<Utc>,
	pub description: String,
}

impl StatusTimelineEntry {
	/// Creates an entry carrying the fixed description for `status`.
	pub fn new(status: OrderStatus, timestamp: DateTime<Utc>) -> Self {
		Self {
			status,
			timestamp,
			description: status.description().to_string(),
		}
	}
}

/// A placed order.
///
/// Everything except `status`, `status_updated_at` and `status_timeline` is
/// fixed at creation. The status fields are advanced only by the lifecycle
/// manager in `storefront-core`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// User that placed the order.
	pub owner_id: String,
	/// Line items, never empty.
	pub items: Vec<OrderItem>,
	/// Sum of line totals at creation time.
	pub total_amount: Decimal,
	/// When the order was placed.
	pub placed_at: DateTime<Utc>,
	/// Current fulfilment status.
	pub status: OrderStatus,
	/// When `status` last changed.
	pub status_updated_at: DateTime<Utc>,
	/// Every status the order has held, oldest first.
	pub status_timeline: Vec<StatusTimelineEntry>,
}

impl Order {
	/// Builds a new `Pending` order after checking its items and total.
	///
	/// The timeline starts with a single `Pending` entry stamped `placed_at`.
	pub fn place(
		id: impl Into<String>,
		owner_id: impl Into<String>,
		items: Vec<OrderItem>,
		total_amount: Decimal,
		placed_at: DateTime<Utc>,
	) -> Result<Self, OrderValidationError> {
		if items.is_empty() {
			return Err(OrderValidationError::EmptyItems);
		}

		for (index, item) in items.iter().enumerate() {
			if item.quantity == 0 {
				return Err(OrderValidationError::InvalidQuantity {
					index,
					quantity: item.quantity,
				});
			}
			if item.price < Decimal::ZERO {
				return Err(OrderValidationError::NegativePrice {
					index,
					price: item.price,
				});
			}
		}

		let computed = items
			.iter()
			.enumerate()
			.try_fold(Decimal::ZERO, |sum, (index, item)| {
				item.line_total()
					.and_then(|line| sum.checked_add(line))
					.ok_or(OrderValidationError::AmountOverflow { index })
			})?;
		if computed != total_amount {
			return Err(OrderValidationError::TotalMismatch {
				declared: total_amount,
				computed,
			});
		}

		Ok(Self {
			id: id.into(),
			owner_id: owner_id.into(),
			items,
			total_amount,
			placed_at,
			status: OrderStatus::Pending,
			status_updated_at: placed_at,
			status_timeline: vec![StatusTimelineEntry::new(OrderStatus::Pending, placed_at)],
		})
	}

	/// Most recent timeline entry, if any.
	pub fn latest_timeline_entry(&self) -> Option<&StatusTimelineEntry> {
		self.status_timeline.last()
	}

	/// Checks the timeline invariants: non-empty, ordered by time, and ending
	/// with the current status.
	pub fn verify_timeline(&self) -> Result<(), OrderValidationError> {
		let last = self
			.status_timeline
			.last()
			.ok_or(OrderValidationError::EmptyTimeline)?;

		if last.status != self.status {
			return Err(OrderValidationError::TimelineStatusMismatch {
				timeline: last.status,
				status: self.status,
			});
		}

		for (index, pair) in self.status_timeline.windows(2).enumerate() {
			if pair[1].timestamp < pair[0].timestamp {
				return Err(OrderValidationError::TimelineOutOfOrder { index: index + 1 });
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rust_decimal::Decimal;

	fn item(price: i64, quantity: u32) -> OrderItem {
		OrderItem {
			product_id: format!("product-{}", price),
			name: "Linen sheet".to_string(),
			price: Decimal::new(price, 2),
			quantity,
			image: None,
		}
	}

	fn placed_at() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
	}

	#[test]
	fn test_place_starts_pending_with_single_entry() {
		let order = Order::place(
			"order-1",
			"user-1",
			vec![item(1250, 2), item(300, 1)],
			Decimal::new(2800, 2),
			placed_at(),
		)
		.unwrap();

		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.status_updated_at, placed_at());
		assert_eq!(order.status_timeline.len(), 1);
		assert_eq!(
			order.status_timeline[0].description,
			"Order placed successfully"
		);
		order.verify_timeline().unwrap();
	}

	#[test]
	fn test_place_rejects_bad_input() {
		assert_eq!(
			Order::place("o", "u", vec![], Decimal::ZERO, placed_at()),
			Err(OrderValidationError::EmptyItems)
		);
		assert!(matches!(
			Order::place("o", "u", vec![item(100, 0)], Decimal::ZERO, placed_at()),
			Err(OrderValidationError::InvalidQuantity { index: 0, .. })
		));
		assert!(matches!(
			Order::place("o", "u", vec![item(100, 2)], Decimal::new(100, 2), placed_at()),
			Err(OrderValidationError::TotalMismatch { .. })
		));
	}

	#[test]
	fn test_place_rejects_amounts_out_of_range() {
		let huge = OrderItem {
			price: Decimal::MAX,
			..item(100, 2)
		};
		assert_eq!(
			Order::place("o", "u", vec![huge], Decimal::ONE, placed_at()),
			Err(OrderValidationError::AmountOverflow { index: 0 })
		);

		let max_line = OrderItem {
			price: Decimal::MAX,
			..item(100, 1)
		};
		assert_eq!(
			Order::place(
				"o",
				"u",
				vec![max_line.clone(), max_line],
				Decimal::ONE,
				placed_at()
			),
			Err(OrderValidationError::AmountOverflow { index: 1 })
		);
	}

	#[test]
	fn test_status_ordering_and_parsing() {
		assert!(OrderStatus::Pending < OrderStatus::Confirmed);
		assert!(OrderStatus::Confirmed < OrderStatus::Shipped);
		assert!(OrderStatus::Shipped < OrderStatus::Delivered);
		assert!(OrderStatus::Delivered.is_terminal());
		assert_eq!("shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
		assert!("Cancelled".parse::<OrderStatus>().is_err());
	}

	#[test]
	fn test_verify_timeline_detects_mismatch() {
		let mut order = Order::place(
			"order-1",
			"user-1",
			vec![item(500, 1)],
			Decimal::new(500, 2),
			placed_at(),
		)
		.unwrap();
		order.status = OrderStatus::Shipped;

		assert!(matches!(
			order.verify_timeline(),
			Err(OrderValidationError::TimelineStatusMismatch { .. })
		));
	}

	#[test]
	fn test_order_serializes_camel_case() {
		let order = Order::place(
			"order-1",
			"user-1",
			vec![item(500, 1)],
			Decimal::new(500, 2),
			placed_at(),
		)
		.unwrap();
		let value = serde_json::to_value(&order).unwrap();

		assert_eq!(value["ownerId"], "user-1");
		assert_eq!(value["status"], "Pending");
		assert_eq!(value["statusTimeline"][0]["status"], "Pending");
	}
}
