//! Wall-clock budgets for the expensive search paths
//!
//! Compound segmentation and some suggestion generators can blow up on
//! adversarial input, so they poll a deadline cooperatively. Reading the
//! clock is not free either, hence the countdown: only every
//! [`POLL_INTERVAL`]th poll actually asks for the time.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Budget for one whole compound segmentation
pub(crate) const COMPOUND_TIME_LIMIT: Duration = Duration::from_millis(250);
/// Budget for one suggestion step (a single edit generator)
pub(crate) const STEP_TIME_LIMIT: Duration = Duration::from_millis(100);

/// Polls between two real clock reads
const POLL_INTERVAL: u32 = 128;

/// An explicit deadline, passed down into every search that needs one
#[derive(Debug)]
pub(crate) struct Deadline {
	end: Option<Instant>,
	countdown: Cell<u32>,
	expired: Cell<bool>,
}

impl Deadline {
	pub(crate) fn after(budget: Duration) -> Self {
		Self {
			end: Instant::now().checked_add(budget),
			// the first poll reads the clock
			countdown: Cell::new(0),
			expired: Cell::new(false),
		}
	}

	/// Cheap cooperative poll; sticky once it has fired
	pub(crate) fn expired(&self) -> bool {
		if self.expired.get() {
			return true;
		}
		let Some(end) = self.end else { return false };

		let left = self.countdown.get();
		if left > 0 {
			self.countdown.set(left - 1);
			return false;
		}
		self.countdown.set(POLL_INTERVAL);

		if Instant::now() >= end {
			self.expired.set(true);
		}
		self.expired.get()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_budget_fires_immediately() {
		let deadline = Deadline::after(Duration::ZERO);
		assert!(deadline.expired());
		// and it stays fired
		assert!(deadline.expired());
	}

	#[test]
	fn generous_budget_survives_many_polls() {
		let deadline = Deadline::after(Duration::from_secs(3600));
		for _ in 0..10_000 {
			assert!(!deadline.expired());
		}
	}
}
