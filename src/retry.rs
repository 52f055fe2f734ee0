use std::time::Duration;

/// How long to wait between fetch attempts and when to give up.
///
/// `backoff == 1.0` with `max_attempts == None` is the fixed-delay,
/// retry-forever mode the checker ships with.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub backoff: f64,
    pub max_delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(3),
            backoff: 1.0,
            max_delay: Duration::from_secs(120),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63) as i32;
        let secs = self.base_delay.as_secs_f64() * self.backoff.powi(exp);
        let capped = secs.min(self.max_delay.as_secs_f64());
        if self.backoff > 1.0 {
            Duration::try_from_secs_f64(capped).unwrap_or(self.max_delay)
        } else {
            self.base_delay
        }
    }

    /// True once `attempts` failures have used up the ceiling.
    pub fn exhausted(&self, attempts: u32) -> bool {
        matches!(self.max_attempts, Some(max) if attempts >= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_and_unbounded() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(1), Duration::from_secs(3));
        assert_eq!(p.delay_for(50), Duration::from_secs(3));
        assert!(!p.exhausted(u32::MAX));
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let p = RetryPolicy {
            base_delay: Duration::from_secs(2),
            backoff: 2.0,
            max_delay: Duration::from_secs(10),
            max_attempts: Some(4),
        };
        assert_eq!(p.delay_for(1), Duration::from_secs(2));
        assert_eq!(p.delay_for(2), Duration::from_secs(4));
        assert_eq!(p.delay_for(3), Duration::from_secs(8));
        assert_eq!(p.delay_for(4), Duration::from_secs(10));
        assert!(!p.exhausted(3));
        assert!(p.exhausted(4));
    }

    #[test]
    fn huge_cap_does_not_overflow() {
        let p = RetryPolicy {
            base_delay: Duration::from_secs(3),
            backoff: 2.0,
            max_delay: Duration::from_secs(u64::MAX),
            max_attempts: None,
        };
        assert_eq!(p.delay_for(100), Duration::from_secs(u64::MAX));
        assert_eq!(p.delay_for(2), Duration::from_secs(6));
    }
}
