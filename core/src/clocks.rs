// CourseDesk
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Collection of clock implementations.

use time::OffsetDateTime;

/// Generic definition of a clock.
pub trait Clock {
    /// Returns the current UTC time.
    fn now_utc(&self) -> OffsetDateTime;
}

/// Clock implementation that uses the system clock.
#[derive(Clone, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();

        // Truncate the timestamp to microsecond resolution as this is the resolution supported by
        // timestamps in the PostgreSQL database.  Doing it here keeps values read back from the
        // database equal to the values we wrote.
        let nanos = nanos / 1000 * 1000;

        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .expect("nanos must be in range because they come from the current timestamp")
    }
}

/// Test utilities.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    /// A clock that returns a preconfigured instant and that can be modified at will.
    ///
    /// Only supports second-level precision.
    pub struct SettableClock {
        /// Current fake time in seconds since the epoch.
        now_secs: AtomicI64,
    }

    impl SettableClock {
        /// Creates a new clock that returns `now` until reconfigured with `set` or `advance`.
        pub fn new(now: OffsetDateTime) -> Self {
            assert_eq!(0, now.nanosecond(), "Sub-second precision not supported");
            Self { now_secs: AtomicI64::new(now.unix_timestamp()) }
        }

        /// Sets the new value of `now` that the clock returns.
        pub fn set(&self, now: OffsetDateTime) {
            assert_eq!(0, now.nanosecond(), "Sub-second precision not supported");
            self.now_secs.store(now.unix_timestamp(), Ordering::SeqCst);
        }

        /// Advances the current time by `delta`.
        pub fn advance(&self, delta: Duration) {
            assert_eq!(0, delta.subsec_nanos(), "Sub-second precision not supported");
            let delta = i64::try_from(delta.as_secs()).expect("Delta must fit in an i64");
            self.now_secs.fetch_add(delta, Ordering::SeqCst);
        }
    }

    impl Clock for SettableClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_secs = self.now_secs.load(Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp(now_secs).unwrap()
        }
    }

    /// A clock that returns a monotonically increasing instant every time it is queried.
    ///
    /// Each query advances the clock by one second, which makes ordering by timestamps
    /// deterministic in tests.
    pub struct MonotonicClock {
        /// Next value to return, in seconds since the epoch.
        next_secs: AtomicI64,
    }

    impl MonotonicClock {
        /// Creates a new clock whose first reading will be `start_secs` since the epoch.
        pub fn new(start_secs: i64) -> Self {
            Self { next_secs: AtomicI64::new(start_secs) }
        }
    }

    impl Clock for MonotonicClock {
        fn now_utc(&self) -> OffsetDateTime {
            let now_secs = self.next_secs.fetch_add(1, Ordering::SeqCst);
            OffsetDateTime::from_unix_timestamp(now_secs).unwrap()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::panic::catch_unwind;
        use time::macros::datetime;

        #[test]
        fn test_settableclock_set_and_advance() {
            let now = datetime!(2023-12-01 10:15:00 UTC);
            let clock = SettableClock::new(now);
            assert_eq!(now, clock.now_utc());
            assert_eq!(now, clock.now_utc());

            let now = datetime!(2023-12-01 10:20:00 UTC);
            clock.set(now);
            assert_eq!(now, clock.now_utc());

            clock.advance(Duration::from_secs(3600));
            assert_eq!(datetime!(2023-12-01 11:20:00 UTC), clock.now_utc());
        }

        #[test]
        fn test_settableclock_subsecond_precision_unsupported() {
            catch_unwind(|| {
                SettableClock::new(datetime!(2023-12-01 10:20:00.5 UTC));
            })
            .unwrap_err();

            let clock = SettableClock::new(datetime!(2023-12-01 10:20:00 UTC));
            catch_unwind(|| {
                clock.advance(Duration::from_millis(1));
            })
            .unwrap_err();
        }

        #[test]
        fn test_monotonicclock_advances() {
            let clock = MonotonicClock::new(100000);
            assert_eq!(100000, clock.now_utc().unix_timestamp());
            assert_eq!(100001, clock.now_utc().unix_timestamp());
            assert_eq!(100002, clock.now_utc().unix_timestamp());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systemclock_trivial() {
        let clock = SystemClock::default();
        let now1 = clock.now_utc();
        assert!(now1.unix_timestamp_nanos() > 0);
        let now2 = clock.now_utc();
        assert!(now2 >= now1);
    }

    #[test]
    fn test_systemclock_microsecond_resolution() {
        let clock = SystemClock::default();
        let now = clock.now_utc();
        assert_eq!(0, now.nanosecond() % 1000);
    }
}
