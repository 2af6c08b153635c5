//! Clock sources and tick advancement
//!
//! Ticks are a logical clock seeded from wall time. The wall clock only
//! proposes a candidate; `next_tick` forces the result to be strictly greater
//! than the last tick handed out.

use std::sync::atomic::{AtomicU64, Ordering};

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Compute the tick that follows `last_tick` given a wall-clock candidate.
///
/// Returns `candidate` when it is ahead of `last_tick`, otherwise
/// `last_tick + 1`. Covers clock stalls, rollback and same-millisecond bursts.
/// Returns `None` once the tick space is exhausted.
pub fn next_tick(last_tick: u64, candidate: u64) -> Option<u64> {
    if candidate <= last_tick {
        last_tick.checked_add(1)
    } else {
        Some(candidate)
    }
}

/// Source of wall-clock milliseconds used to seed ticks
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        now_ms()
    }
}

/// Manually driven clock, for tests and replay tooling
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Set the clock to an absolute value (may move backwards)
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move the clock forward
    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_returns_reasonable_timestamp() {
        let ts = now_ms();
        // Should be after 2020-01-01 and before 2100-01-01
        assert!(ts > 1577836800000);
        assert!(ts < 4102444800000);
    }

    #[test]
    fn test_next_tick_takes_clock_when_ahead() {
        assert_eq!(next_tick(1000, 1500), Some(1500));
    }

    #[test]
    fn test_next_tick_same_millisecond() {
        assert_eq!(next_tick(1500, 1500), Some(1501));
    }

    #[test]
    fn test_next_tick_clock_rollback() {
        assert_eq!(next_tick(1500, 900), Some(1501));
    }

    #[test]
    fn test_next_tick_from_zero() {
        assert_eq!(next_tick(0, 0), Some(1));
    }

    #[test]
    fn test_next_tick_exhausted() {
        assert_eq!(next_tick(u64::MAX, 0), None);
        assert_eq!(next_tick(u64::MAX, u64::MAX), None);
        assert_eq!(next_tick(u64::MAX - 1, 5), Some(u64::MAX));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);

        clock.advance(5);
        assert_eq!(clock.now_ms(), 105);

        clock.set(50);
        assert_eq!(clock.now_ms(), 50);
    }
}
