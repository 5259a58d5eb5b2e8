//! Phase timing for pipeline runs.

use std::time::{Duration, Instant};

/// Adds the time between its creation and its drop to `slot`.
///
/// ```rust,ignore
/// let mut classify = Duration::ZERO;
/// {
///     let _timer = PhaseTimer::new(&mut classify);
///     // classify entries
/// }
/// ```
pub(crate) struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub(crate) fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_phase_timer_records_on_drop() {
        let mut slot = Duration::ZERO;
        {
            let _timer = PhaseTimer::new(&mut slot);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(slot >= Duration::from_millis(10));
    }

    #[test]
    fn test_phase_timer_accumulates_across_runs() {
        let mut slot = Duration::from_millis(5);
        for _ in 0..2 {
            let _timer = PhaseTimer::new(&mut slot);
            thread::sleep(Duration::from_millis(5));
        }
        assert!(slot >= Duration::from_millis(15));
    }
}
