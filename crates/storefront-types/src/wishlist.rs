//! Wishlist types.
//!
//! A wishlist is a per-user set of product ids kept in insertion order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Change requested on a wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistAction {
	Add,
	Remove,
}

impl fmt::Display for WishlistAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WishlistAction::Add => write!(f, "add"),
			WishlistAction::Remove => write!(f, "remove"),
		}
	}
}

impl FromStr for WishlistAction {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"add" => Ok(Self::Add),
			"remove" => Ok(Self::Remove),
			other => Err(format!("Invalid action: {}", other)),
		}
	}
}

/// Products a user has saved for later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
	pub owner_id: String,
	pub product_ids: Vec<String>,
	pub updated_at: DateTime<Utc>,
}

impl Wishlist {
	/// Creates an empty wishlist for `owner_id`.
	pub fn empty(owner_id: impl Into<String>, now: DateTime<Utc>) -> Self {
		Self {
			owner_id: owner_id.into(),
			product_ids: Vec::new(),
			updated_at: now,
		}
	}

	/// Returns true if `product_id` is saved.
	pub fn contains(&self, product_id: &str) -> bool {
		self.product_ids.iter().any(|id| id == product_id)
	}

	/// Applies `action` for `product_id` and reports whether the list changed.
	///
	/// Adding a saved product and removing an absent one are both no-ops.
	pub fn apply(&mut self, product_id: &str, action: WishlistAction, now: DateTime<Utc>) -> bool {
		let changed = match action {
			WishlistAction::Add => {
				if self.contains(product_id) {
					false
				} else {
					self.product_ids.push(product_id.to_string());
					true
				}
			},
			WishlistAction::Remove => {
				let before = self.product_ids.len();
				self.product_ids.retain(|id| id != product_id);
				self.product_ids.len() != before
			},
		};

		if changed {
			self.updated_at = now;
		}
		changed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_is_idempotent() {
		let now = Utc::now();
		let mut wishlist = Wishlist::empty("user-1", now);

		assert!(wishlist.apply("p1", WishlistAction::Add, now));
		assert!(!wishlist.apply("p1", WishlistAction::Add, now));
		assert!(wishlist.apply("p2", WishlistAction::Add, now));
		assert_eq!(wishlist.product_ids, vec!["p1", "p2"]);
	}

	#[test]
	fn test_remove_absent_is_noop() {
		let now = Utc::now();
		let mut wishlist = Wishlist::empty("user-1", now);
		wishlist.apply("p1", WishlistAction::Add, now);

		assert!(!wishlist.apply("p9", WishlistAction::Remove, now));
		assert!(wishlist.apply("p1", WishlistAction::Remove, now));
		assert!(wishlist.product_ids.is_empty());
	}

	#[test]
	fn test_parse_action() {
		assert_eq!("add".parse::<WishlistAction>(), Ok(WishlistAction::Add));
		assert_eq!("remove".parse::<WishlistAction>(), Ok(WishlistAction::Remove));
		assert!("toggle".parse::<WishlistAction>().is_err());
	}
}
