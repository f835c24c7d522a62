//! Per-key async locks.
//!
//! Storage backends only offer whole-value reads and writes, so every
//! read-modify-write of a stored value runs under the lock for its key.
//! Entries are removed once nobody holds or waits for them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A set of async mutexes created on demand, one per key.
#[derive(Debug, Default)]
pub struct KeyedLocks {
	locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Holds the lock for one key until dropped.
pub struct KeyGuard<'a> {
	key: String,
	locks: &'a DashMap<String, Arc<Mutex<()>>>,
	guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Waits until no other guard for `key` is alive.
	pub async fn lock(&self, key: &str) -> KeyGuard<'_> {
		let mutex = self.locks.entry(key.to_string()).or_default().clone();
		let guard = mutex.lock_owned().await;

		KeyGuard {
			key: key.to_string(),
			locks: &self.locks,
			guard: Some(guard),
		}
	}

	/// Number of keys currently locked or waited on.
	pub fn len(&self) -> usize {
		self.locks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.locks.is_empty()
	}
}

impl Drop for KeyGuard<'_> {
	fn drop(&mut self) {
		drop(self.guard.take());
		// The map's own reference is the last one when no task waits.
		self.locks
			.remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
	}
}
