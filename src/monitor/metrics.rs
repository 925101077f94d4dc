use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

use crate::model::{BorrowApy, PositionStats, SnapshotHistory};

/// Risk band of a position, ordered from most to least dangerous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    /// health < 2
    Critical,
    /// 2 <= health < 5
    Caution,
    /// 5 <= health <= 10
    Warning,
    /// health > 10
    Healthy,
}

impl RiskTier {
    pub fn from_health(health: f64) -> Self {
        if health > 10.0 {
            RiskTier::Healthy
        } else if health >= 5.0 {
            RiskTier::Warning
        } else if health >= 2.0 {
            RiskTier::Caution
        } else {
            RiskTier::Critical
        }
    }

    /// Colored circle shown next to the health value
    pub fn indicator(&self) -> &'static str {
        match self {
            RiskTier::Healthy => "\u{1F7E2}",
            RiskTier::Warning => "\u{1F7E1}",
            RiskTier::Caution => "\u{1F7E0}",
            RiskTier::Critical => "\u{1F534}",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Critical => write!(f, "critical"),
            RiskTier::Caution => write!(f, "caution"),
            RiskTier::Warning => write!(f, "warning"),
            RiskTier::Healthy => write!(f, "healthy"),
        }
    }
}

/// Orange while the position is in soft liquidation, green otherwise
pub fn soft_liquidation_indicator(soft_liquidation: bool) -> &'static str {
    if soft_liquidation {
        "\u{1F7E0}"
    } else {
        "\u{1F7E2}"
    }
}

/// Everything needed to display or alert on one position
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetric {
    pub health: f64,
    pub debt: f64,
    pub oracle_price: f64,
    pub soft_liquidation: bool,
    /// Current health minus the latest snapshot's, 2 decimals
    pub health_delta: Option<f64>,
    /// Time since the latest snapshot
    pub elapsed: Option<Duration>,
    pub borrow_apy: BorrowApy,
    pub risk_tier: RiskTier,
}

pub fn derive_metric(
    stats: &PositionStats,
    snapshots: Option<&SnapshotHistory>,
    borrow_apy: BorrowApy,
    now: DateTime<Utc>,
) -> DerivedMetric {
    let (health_delta, elapsed) = match snapshots.and_then(|h| health_change(stats.health, h, now)) {
        Some((delta, elapsed)) => (Some(delta), Some(elapsed)),
        None => (None, None),
    };

    DerivedMetric {
        health: stats.health,
        debt: stats.debt,
        oracle_price: stats.oracle_price,
        soft_liquidation: stats.soft_liquidation,
        health_delta,
        elapsed,
        borrow_apy,
        risk_tier: RiskTier::from_health(stats.health),
    }
}

/// Health change and elapsed time against the most recent snapshot.
/// `None` if that snapshot lacks a health value or a usable timestamp.
pub fn health_change(current_health: f64, history: &SnapshotHistory, now: DateTime<Utc>) -> Option<(f64, Duration)> {
    let latest = history.latest()?;
    let snapshot_health = latest.health_full?;
    let taken_at = parse_snapshot_timestamp(latest.timestamp.as_ref()?)?;

    Some((round2(current_health - snapshot_health), now - taken_at))
}

/// Parses an upstream snapshot timestamp.
///
/// Epoch seconds (number or numeric string) are tried first, then an
/// ISO-8601 date-time with the trailing `Z` stripped and read as UTC, then
/// RFC 3339 with an explicit offset.
pub fn parse_snapshot_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch_seconds),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .and_then(from_epoch_seconds)
                .or_else(|| parse_iso(s))
        }
        _ => None,
    };

    if parsed.is_none() {
        error!("Unable to parse timestamp: {}", value);
    }
    parsed
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    Utc.timestamp_opt(whole as i64, nanos).single()
}

const ISO_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let naive = s.strip_suffix(&['Z', 'z'][..]).unwrap_or(s);

    ISO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| Utc.from_utc_datetime(&dt))
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Whole hours, truncated toward zero: 37h59m -> "37h"
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}h", elapsed.num_hours())
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;
    use serde_json::json;

    fn stats(health: f64) -> PositionStats {
        PositionStats {
            health,
            debt: 120.5,
            oracle_price: 2500.0,
            soft_liquidation: false,
        }
    }

    fn history(health: Option<f64>, timestamp: Option<Value>) -> SnapshotHistory {
        SnapshotHistory::new(vec![
            Snapshot { health_full: Some(99.0), timestamp: Some(json!(1)) },
            Snapshot { health_full: health, timestamp },
        ])
    }

    #[test]
    fn test_risk_tier_bands() {
        assert_eq!(RiskTier::from_health(-1.0), RiskTier::Critical);
        assert_eq!(RiskTier::from_health(1.99), RiskTier::Critical);
        assert_eq!(RiskTier::from_health(2.0), RiskTier::Caution);
        assert_eq!(RiskTier::from_health(4.3), RiskTier::Caution);
        assert_eq!(RiskTier::from_health(5.0), RiskTier::Warning);
        assert_eq!(RiskTier::from_health(10.0), RiskTier::Warning);
        assert_eq!(RiskTier::from_health(10.01), RiskTier::Healthy);
        assert_eq!(RiskTier::from_health(f64::NAN), RiskTier::Critical);
    }

    #[test]
    fn test_risk_tier_is_monotonic() {
        let mut previous = RiskTier::Critical;
        for step in 0..=1500 {
            let tier = RiskTier::from_health(step as f64 / 100.0);
            assert!(tier >= previous, "tier went down at {}", step);
            previous = tier;
        }
        assert_eq!(previous, RiskTier::Healthy);
    }

    #[test]
    fn test_indicators() {
        assert_eq!(RiskTier::Caution.indicator(), "🟠");
        assert_eq!(RiskTier::Critical.indicator(), "🔴");
        assert_eq!(soft_liquidation_indicator(true), "🟠");
        assert_eq!(soft_liquidation_indicator(false), "🟢");
        assert_eq!(RiskTier::Caution.to_string(), "caution");
    }

    #[test]
    fn test_epoch_and_iso_are_the_same_instant() {
        let numeric = parse_snapshot_timestamp(&json!("1700000000")).unwrap();
        let iso = parse_snapshot_timestamp(&json!("2023-11-14T22:13:20Z")).unwrap();
        let number = parse_snapshot_timestamp(&json!(1700000000)).unwrap();
        let offset = parse_snapshot_timestamp(&json!("2023-11-15T00:13:20+02:00")).unwrap();
        let fractional = parse_snapshot_timestamp(&json!("2023-11-14T22:13:20.000Z")).unwrap();

        assert_eq!(numeric, iso);
        assert_eq!(numeric, number);
        assert_eq!(numeric, offset);
        assert_eq!(numeric, fractional);
        assert_eq!(numeric.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_same_elapsed_for_both_formats() {
        let now = Utc.timestamp_opt(1_700_000_000 + 37 * 3600 + 59 * 60, 0).unwrap();

        let a = derive_metric(&stats(4.3), Some(&history(Some(5.0), Some(json!("1700000000")))), BorrowApy::Unavailable, now);
        let b = derive_metric(&stats(4.3), Some(&history(Some(5.0), Some(json!("2023-11-14T22:13:20Z")))), BorrowApy::Unavailable, now);

        assert_eq!(a.elapsed, b.elapsed);
        assert_eq!(format_elapsed(a.elapsed.unwrap()), "37h");
        assert_eq!(a.health_delta, Some(-0.7));
    }

    #[test]
    fn test_unparsable_timestamp_drops_delta() {
        let now = Utc::now();
        for bad in [json!("yesterday"), json!(""), json!(true), json!({"t": 1}), json!("NaN")] {
            let metric = derive_metric(&stats(4.3), Some(&history(Some(5.0), Some(bad))), BorrowApy::Unavailable, now);
            assert_eq!(metric.health_delta, None);
            assert_eq!(metric.elapsed, None);
            assert_eq!(metric.risk_tier, RiskTier::Caution);
        }
    }

    #[test]
    fn test_missing_snapshot_fields_drop_delta() {
        let now = Utc::now();
        let no_health = history(None, Some(json!(1700000000)));
        let no_time = history(Some(5.0), None);

        for h in [&no_health, &no_time, &SnapshotHistory::default()] {
            let metric = derive_metric(&stats(4.3), Some(h), BorrowApy::Available(3.0), now);
            assert!(metric.health_delta.is_none() && metric.elapsed.is_none());
            assert_eq!(metric.borrow_apy, BorrowApy::Available(3.0));
        }

        let metric = derive_metric(&stats(4.3), None, BorrowApy::Unavailable, now);
        assert!(metric.health_delta.is_none());
    }

    #[test]
    fn test_delta_is_rounded() {
        let now = Utc.timestamp_opt(1_700_003_600, 0).unwrap();
        let metric = derive_metric(&stats(4.31789), Some(&history(Some(4.0), Some(json!(1_700_000_000)))), BorrowApy::Unavailable, now);
        assert_eq!(metric.health_delta, Some(0.32));
        assert_eq!(format_elapsed(metric.elapsed.unwrap()), "1h");
    }

    #[test]
    fn test_negative_elapsed_truncates_toward_zero() {
        assert_eq!(format_elapsed(Duration::minutes(-90)), "-1h");
        assert_eq!(format_elapsed(Duration::minutes(59)), "0h");
    }
}
