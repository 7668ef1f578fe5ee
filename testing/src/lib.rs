//! # Tripvote Testing
//!
//! Testing utilities and helpers for tripvote reducers.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use tripvote_testing::{test_clock, ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(VotingReducer::new())
//!     .with_env(VotingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new())))
//!     .given_state(VotingState::new())
//!     .when_action(VotingAction::SetLoading(true))
//!     .then_state(|state| assert!(state.is_loading))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use tripvote_core::environment::{Clock, IdGenerator};


/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tripvote_testing::mocks::FixedClock;
    /// use tripvote_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves forward by a fixed step on every reading
    ///
    /// Useful when a test needs to tell two timestamps apart.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap();
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Predictable identifiers: `00000000-0000-0000-0000-000000000001`, `...02`, ...
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        counter: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id ends in `1`
        #[must_use]
        pub const fn new() -> Self {
            Self {
                counter: AtomicU64::new(0),
            }
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.counter.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SequentialIdGenerator, SteppingClock};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_stepping_clock_advances() {
        let start = test_clock().now();
        let clock = SteppingClock::new(start, Duration::seconds(1));

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(1));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();

        assert_eq!(ids.next_id().to_string(), "00000000-0000-0000-0000-000000000001");
        assert_eq!(ids.next_id().to_string(), "00000000-0000-0000-0000-000000000002");
        assert_eq!(ids.issued(), 2);
    }
}
