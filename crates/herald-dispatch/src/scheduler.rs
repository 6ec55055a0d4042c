//! Hourly scheduler loop.
//!
//! A short `tokio::time::interval` checks the wall clock and fires
//! at most one scheduled run per calendar hour. Each run is spawned
//! detached: a minutes-long autonomous-agent call never delays the
//! next tick, and manual triggers can overlap freely because runs are
//! stateless. Errors are logged and the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, Timelike};

use crate::orchestrator::Dispatcher;

/// (date, hour) key of the last fired run.
type HourKey = (NaiveDate, u32);

/// Fire-once-per-hour guard. Separate from the loop so the dedup
/// logic is unit-testable.
#[derive(Debug, Default)]
pub struct HourTracker {
    last_fired: Option<HourKey>,
}

impl HourTracker {
    /// True exactly once per (date, hour).
    pub fn mark(&mut self, key: HourKey) -> bool {
        if self.last_fired == Some(key) {
            return false;
        }
        self.last_fired = Some(key);
        true
    }
}

/// Run the hourly dispatch loop. Never returns.
pub async fn run_hourly(dispatcher: Arc<Dispatcher>, check_interval_secs: u64) {
    tracing::info!(check_interval_secs, "hourly dispatch loop started");

    let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));
    let mut tracker = HourTracker::default();

    loop {
        interval.tick().await;

        let now = Local::now();
        let key = (now.date_naive(), now.hour());
        if !tracker.mark(key) {
            continue;
        }

        let dispatcher = dispatcher.clone();
        let hour = key.1;
        tokio::spawn(async move {
            match dispatcher.run_scheduled(hour).await {
                Ok(Some(report)) => {
                    tracing::info!(
                        theme = %report.theme,
                        all_succeeded = report.all_succeeded(),
                        "scheduled dispatch complete"
                    );
                }
                Ok(None) => {
                    tracing::debug!(hour, "scheduled run skipped (outside active window)");
                }
                Err(e) => {
                    // Run-scoped failure; the loop fires again next hour.
                    tracing::error!(hour, "scheduled dispatch failed: {e}");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_fires_once_per_hour() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut tracker = HourTracker::default();

        assert!(tracker.mark((day, 9)));
        assert!(!tracker.mark((day, 9)));
        assert!(tracker.mark((day, 10)));
        assert!(!tracker.mark((day, 10)));
    }

    #[test]
    fn test_tracker_fires_for_same_hour_next_day() {
        let day1 = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let mut tracker = HourTracker::default();

        assert!(tracker.mark((day1, 9)));
        assert!(tracker.mark((day2, 9)));
    }
}
