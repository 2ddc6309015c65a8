//! Monotonic microsecond timestamps
//!
//! Session errors are keyed by the microsecond at which they were recorded.
//! Two sign-outs inside the same microsecond would otherwise collide, so the
//! clock never hands out the same value twice.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall-clock microseconds, strictly increasing per clock instance.
#[derive(Debug, Default)]
pub struct MicrosClock {
    last: AtomicI64,
}

impl MicrosClock {
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Current time in microseconds since the Unix epoch.
    ///
    /// If the wall clock has not advanced past the previous reading (or went
    /// backwards), the previous reading plus one is returned instead.
    pub fn now_micros(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(current + 1);
            match self
                .last
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_strictly_increasing() {
        let clock = MicrosClock::new();
        let mut previous = clock.now_micros();
        for _ in 0..1000 {
            let next = clock.now_micros();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_close_to_wall_clock() {
        let clock = MicrosClock::new();
        let wall = Utc::now().timestamp_micros();
        let reading = clock.now_micros();
        assert!((reading - wall).abs() < 5_000_000);
    }

    #[test]
    fn test_unique_across_threads() {
        let clock = Arc::new(MicrosClock::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || (0..250).map(|_| clock.now_micros()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for value in handle.join().unwrap() {
                assert!(seen.insert(value), "duplicate timestamp {value}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
