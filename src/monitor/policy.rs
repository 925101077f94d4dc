use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::model::PositionKey;

/// When each position last triggered an alert.
///
/// Owned by a single monitor task and dropped with it, so a restarted task
/// may alert again right away for a position that is still below threshold.
#[derive(Debug, Default)]
pub struct NotificationLedger {
    last_notified: HashMap<PositionKey, DateTime<Utc>>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether `key` should be alerted on now and, if so, records
    /// `now` as its last notification before returning.
    ///
    /// * fires only when `current_health < threshold`
    /// * the first breach of a position always fires
    /// * with `interval_hours == 0` a position fires once per ledger lifetime
    /// * otherwise it fires again once `interval_hours` have passed
    pub fn should_notify(
        &mut self,
        key: &PositionKey,
        current_health: f64,
        threshold: f64,
        interval_hours: u64,
        now: DateTime<Utc>,
    ) -> bool {
        if !(current_health < threshold) {
            return false;
        }

        let fire = match self.last_notified.get(key) {
            None => true,
            Some(last) => {
                interval_hours > 0
                    && i64::try_from(interval_hours)
                        .ok()
                        .and_then(Duration::try_hours)
                        .is_some_and(|interval| now.signed_duration_since(*last) >= interval)
            }
        };

        if fire {
            self.last_notified.insert(key.clone(), now);
        }
        fire
    }

    pub fn last_notified(&self, key: &PositionKey) -> Option<DateTime<Utc>> {
        self.last_notified.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_notified.is_empty()
    }
}
