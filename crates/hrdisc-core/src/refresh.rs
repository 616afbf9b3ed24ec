//! Cooperative auto-refresh policy
//!
//! Nothing here runs on a timer. The interaction loop asks [`RefreshPolicy::is_due`]
//! each time it runs and reloads when the answer is yes. Every load, whether
//! automatic, manual or forced by a write, restarts the interval.

use std::time::{Duration, Instant};

/// Decides when a cached table is stale
#[derive(Debug, Clone, Default)]
pub struct RefreshPolicy {
    interval: Option<Duration>,
    last_load: Option<Instant>,
}

impl RefreshPolicy {
    /// Refresh every `interval`; `None` disables automatic refresh
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_load: None,
        }
    }

    /// Configured interval
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Change the interval without touching the load timestamp
    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.interval = interval;
    }

    /// When the table was last loaded
    pub fn last_load(&self) -> Option<Instant> {
        self.last_load
    }

    /// Whether a reload is needed at `now`.
    ///
    /// Always true before the first load. Afterwards only true when an
    /// interval is set and at least that much time has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        match (self.last_load, self.interval) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(last), Some(interval)) => now.saturating_duration_since(last) >= interval,
        }
    }

    /// Record a completed load
    pub fn mark_loaded(&mut self, now: Instant) {
        self.last_load = Some(now);
    }

    /// Forget the last load so the next check reloads
    pub fn invalidate(&mut self) {
        self.last_load = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_check_is_due() {
        assert!(RefreshPolicy::new(None).is_due(Instant::now()));
    }

    #[test]
    fn test_no_interval_never_due_after_load() {
        let mut policy = RefreshPolicy::new(None);
        let t0 = Instant::now();
        policy.mark_loaded(t0);
        assert!(!policy.is_due(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn test_interval_measured_from_latest_load() {
        let mut policy = RefreshPolicy::new(Some(Duration::from_secs(60)));
        let t0 = Instant::now();
        policy.mark_loaded(t0);
        assert!(!policy.is_due(t0 + Duration::from_secs(59)));
        assert!(policy.is_due(t0 + Duration::from_secs(60)));

        // a manual reload at t0+50 pushes the next refresh out
        policy.mark_loaded(t0 + Duration::from_secs(50));
        assert!(!policy.is_due(t0 + Duration::from_secs(100)));
        assert!(policy.is_due(t0 + Duration::from_secs(110)));
    }

    #[test]
    fn test_invalidate() {
        let mut policy = RefreshPolicy::new(Some(Duration::from_secs(60)));
        let t0 = Instant::now();
        policy.mark_loaded(t0);
        policy.invalidate();
        assert!(policy.is_due(t0));
    }
}
