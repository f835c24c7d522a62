//! Time source for the lifecycle.
//!
//! Status derivation never reads the system clock itself. Services hold a
//! `Clock` and pass its reading down, so tests can pin time.

use chrono::{DateTime, Utc};

/// Source of the current time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	#[test]
	fn test_fixed_clock_is_stable() {
		let instant = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
		let clock = FixedClock(instant);
		assert_eq!(clock.now(), instant);
		assert_eq!(clock.now(), clock.now());
	}

	#[test]
	fn test_system_clock_moves_forward() {
		let clock = SystemClock;
		let first = clock.now();
		assert!(clock.now() >= first);
	}
}
