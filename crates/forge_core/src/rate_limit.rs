//! Admission control: one generation per interval.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Minimum-interval rate limiter.
///
/// Only admitted requests move the window. Rejected requests mutate
/// nothing, so a burst of over-eager calls cannot push admission further
/// and further away.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_admitted: Option<Instant>,
    last_admitted_at: Option<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_admitted: None,
            last_admitted_at: None,
        }
    }

    /// Admit the request, or report how long until the window reopens.
    pub fn try_admit(&mut self) -> Result<(), Duration> {
        if let Some(last) = self.last_admitted {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                return Err(self.min_interval - elapsed);
            }
        }
        self.last_admitted = Some(Instant::now());
        self.last_admitted_at = Some(Utc::now());
        Ok(())
    }

    /// Wall-clock time of the last admitted request.
    pub fn last_admitted_at(&self) -> Option<DateTime<Utc>> {
        self.last_admitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_admitted() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        assert!(limiter.try_admit().is_ok());
        assert!(limiter.last_admitted_at().is_some());
    }

    #[test]
    fn second_request_inside_window_is_rejected() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.try_admit().unwrap();

        let retry_after = limiter.try_admit().unwrap_err();
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(50));
    }

    #[test]
    fn rejection_does_not_move_the_window() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.try_admit().unwrap();
        let first_stamp = limiter.last_admitted_at();

        let _ = limiter.try_admit();
        let _ = limiter.try_admit();

        assert_eq!(limiter.last_admitted_at(), first_stamp);
    }

    #[test]
    fn zero_interval_admits_everything() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        assert!(limiter.try_admit().is_ok());
        assert!(limiter.try_admit().is_ok());
        assert!(limiter.try_admit().is_ok());
    }
}
