//! Wait policy configuration
//!
//! A pool's wait behaviour is part of its type: the duration unit `U` and the
//! amount `WAIT` in `Pool<T, U, WAIT>`. Nothing about it can change at runtime.

use std::time::Duration;

/// A unit of time used to express the wait amount of a pool.
///
/// Conversions saturate at `u64::MAX` seconds instead of overflowing.
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{Hours, Milliseconds, TimeUnit};
/// use std::time::Duration;
///
/// assert_eq!(Milliseconds::duration(250), Duration::from_millis(250));
/// assert_eq!(Hours::duration(1), Duration::from_secs(3600));
/// ```
pub trait TimeUnit: 'static {
    /// Convert `amount` of this unit into a [`Duration`]
    fn duration(amount: u64) -> Duration;
}

macro_rules! time_unit {
    ($(#[$doc:meta])* $unit:ident, |$amount:ident| $convert:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $unit;

        impl TimeUnit for $unit {
            fn duration($amount: u64) -> Duration {
                $convert
            }
        }
    };
}

time_unit!(
    /// Nanosecond wait unit
    Nanoseconds, |amount| Duration::from_nanos(amount)
);
time_unit!(
    /// Microsecond wait unit
    Microseconds, |amount| Duration::from_micros(amount)
);
time_unit!(
    /// Millisecond wait unit, the default
    Milliseconds, |amount| Duration::from_millis(amount)
);
time_unit!(
    /// Second wait unit
    Seconds, |amount| Duration::from_secs(amount)
);
time_unit!(
    /// Minute wait unit
    Minutes, |amount| Duration::from_secs(amount.saturating_mul(60))
);
time_unit!(
    /// Hour wait unit
    Hours, |amount| Duration::from_secs(amount.saturating_mul(3600))
);

/// Runtime view of a pool's type-level wait configuration
///
/// # Examples
///
/// ```
/// use esox_resourcepool::{Pool, Seconds, WaitPolicy};
/// use std::time::Duration;
///
/// let try_pool: Pool<String> = Pool::new();
/// assert_eq!(try_pool.wait_policy(), WaitPolicy::NoWait);
///
/// let blocking: Pool<String, Seconds, 5> = Pool::new();
/// assert_eq!(blocking.wait_policy(), WaitPolicy::Timeout(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub enum WaitPolicy {
    /// `acquire` returns immediately when nothing is idle
    NoWait,

    /// `acquire` blocks up to the given duration for a resource
    Timeout(Duration),
}

impl WaitPolicy {
    /// Build the policy selected by `WAIT` amounts of unit `U`
    pub fn of<U: TimeUnit, const WAIT: u64>() -> Self {
        if WAIT == 0 {
            WaitPolicy::NoWait
        } else {
            WaitPolicy::Timeout(U::duration(WAIT))
        }
    }

    /// Whether `acquire` may suspend the caller
    pub fn is_blocking(&self) -> bool {
        matches!(self, WaitPolicy::Timeout(_))
    }

    /// The maximum blocked time, `Duration::ZERO` for [`WaitPolicy::NoWait`]
    pub fn timeout(&self) -> Duration {
        match self {
            WaitPolicy::NoWait => Duration::ZERO,
            WaitPolicy::Timeout(timeout) => *timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(Nanoseconds::duration(7), Duration::from_nanos(7));
        assert_eq!(Microseconds::duration(7), Duration::from_micros(7));
        assert_eq!(Seconds::duration(7), Duration::from_secs(7));
        assert_eq!(Minutes::duration(2), Duration::from_secs(120));
        assert_eq!(Hours::duration(2), Duration::from_secs(7200));
    }

    #[test]
    fn test_large_amounts_saturate() {
        assert_eq!(Hours::duration(u64::MAX), Duration::from_secs(u64::MAX));
        assert_eq!(Minutes::duration(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_policy_from_type_parameters() {
        assert_eq!(WaitPolicy::of::<Hours, 0>(), WaitPolicy::NoWait);
        assert!(!WaitPolicy::of::<Hours, 0>().is_blocking());

        let policy = WaitPolicy::of::<Milliseconds, 40>();
        assert!(policy.is_blocking());
        assert_eq!(policy.timeout(), Duration::from_millis(40));
        assert_eq!(WaitPolicy::NoWait.timeout(), Duration::ZERO);
    }
}
