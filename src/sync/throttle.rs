use std::time::Duration;
use tokio::time::Instant;

/// Lets through at most one action per interval
///
/// Only accepted actions move the window; rejected ones do not extend it.
#[derive(Debug)]
pub struct SeekThrottle {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl SeekThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    pub fn try_accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seek_is_accepted() {
        let mut throttle = SeekThrottle::new(Duration::from_millis(500));
        assert!(throttle.try_accept(Instant::now()));
    }

    #[test]
    fn test_burst_within_interval_is_collapsed() {
        let mut throttle = SeekThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        let accepted = (0..10)
            .filter(|i| throttle.try_accept(start + Duration::from_millis(i * 40)))
            .count();

        assert_eq!(accepted, 1);
    }

    #[test]
    fn test_rejected_seeks_do_not_extend_window() {
        let mut throttle = SeekThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(throttle.try_accept(start));
        assert!(!throttle.try_accept(start + Duration::from_millis(400)));
        assert!(throttle.try_accept(start + Duration::from_millis(500)));
        assert_eq!(
            throttle.last_accepted(),
            Some(start + Duration::from_millis(500))
        );
    }
}
