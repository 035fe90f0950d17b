use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

pub const METRIC_TICKS: &str = "ticks";
pub const METRIC_NOTIFICATIONS_SENT: &str = "notifications_sent";

/// Named event counters. Adding an event never waits on anything but the
/// counter map itself and never fails.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counters: Mutex<HashMap<String, u64>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Default::default()
    }

    fn counters(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_event(&self, name: &str) {
        *self.counters().entry(name.to_string()).or_insert(0) += 1;
    }

    /// Consistent copy of all counters
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters()
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counts_events() {
        let metrics = MetricsCollector::new();
        metrics.add_event(METRIC_TICKS);
        metrics.add_event(METRIC_TICKS);
        metrics.add_event(METRIC_NOTIFICATIONS_SENT);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.get("ticks"), Some(&2));
        assert_eq!(snapshot.get("notifications_sent"), Some(&1));
        assert_eq!(snapshot.get("IFTTT"), None);
    }

    #[test]
    fn counts_events_from_many_threads() {
        let metrics = Arc::new(MetricsCollector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.add_event(METRIC_NOTIFICATIONS_SENT);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(metrics.snapshot().get("notifications_sent"), Some(&800));
    }
}
