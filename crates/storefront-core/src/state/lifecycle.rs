//! Status derivation policy.
//!
//! An order's status is a function of the whole days elapsed since it was
//! placed:
//!
//! | elapsed days | status    |
//! |--------------|-----------|
//! | 0            | Pending   |
//! | 1..=2        | Confirmed |
//! | 3..=5        | Shipped   |
//! | 6 and more   | Delivered |
//!
//! Reconciling an order moves it straight to the derived status and appends a
//! single timeline entry, however many statuses it skips. Orders never move
//! backwards and `Delivered` orders are left alone.
//!
//! Everything here is synchronous and takes `now` as a parameter.

use chrono::{DateTime, Utc};
use storefront_types::{Order, OrderStatus, StatusTimelineEntry};

/// Whole days after placement at which an order counts as confirmed.
pub const CONFIRMED_AFTER_DAYS: i64 = 1;
/// Whole days after placement at which an order counts as shipped.
pub const SHIPPED_AFTER_DAYS: i64 = 3;
/// Whole days after placement at which an order counts as delivered.
pub const DELIVERED_AFTER_DAYS: i64 = 6;

/// A status change applied by [`advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
	pub from: OrderStatus,
	pub to: OrderStatus,
}

/// Derives the status an order placed at `placed_at` should hold at `now`.
///
/// Elapsed time is truncated to whole days. A `now` earlier than
/// `placed_at` counts as zero days.
pub fn derive_status(placed_at: DateTime<Utc>, now: DateTime<Utc>) -> OrderStatus {
	let elapsed_days = (now - placed_at).num_days();

	if elapsed_days >= DELIVERED_AFTER_DAYS {
		OrderStatus::Delivered
	} else if elapsed_days >= SHIPPED_AFTER_DAYS {
		OrderStatus::Shipped
	} else if elapsed_days >= CONFIRMED_AFTER_DAYS {
		OrderStatus::Confirmed
	} else {
		OrderStatus::Pending
	}
}

/// Timeline description for `status`.
pub fn describe(status: OrderStatus) -> &'static str {
	status.description()
}

/// Moves `order` to its derived status in place.
///
/// Returns the transition applied, or `None` when the order is terminal,
/// already current, or would have to move backwards.
pub fn advance(order: &mut Order, now: DateTime<Utc>) -> Option<Transition> {
	if order.status.is_terminal() {
		return None;
	}

	let next = derive_status(order.placed_at, now);
	if next <= order.status {
		return None;
	}

	// Keep the timeline ordered even if `now` is behind the last recorded entry.
	let stamp = order
		.latest_timeline_entry()
		.map_or(now, |entry| entry.timestamp.max(now));

	let transition = Transition {
		from: order.status,
		to: next,
	};
	order.status = next;
	order.status_updated_at = stamp;
	order
		.status_timeline
		.push(StatusTimelineEntry::new(next, stamp));

	Some(transition)
}

/// Returns `order` moved to its derived status at `now`.
pub fn reconcile(mut order: Order, now: DateTime<Utc>) -> Order {
	advance(&mut order, now);
	order
}

/// Reconciles every order in `orders`, keeping their order.
///
/// `Delivered` orders are passed through untouched.
pub fn reconcile_all(orders: Vec<Order>, now: DateTime<Utc>) -> Vec<Order> {
	orders
		.into_iter()
		.map(|order| {
			if order.status.is_terminal() {
				order
			} else {
				reconcile(order, now)
			}
		})
		.collect()
}
