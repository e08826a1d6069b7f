//! Read-time views computed from a record and the current time.
//!
//! None of these are stored or cached; callers re-evaluate them on every query.
//! Dates are calendar days and are compared from their start (00:00 UTC).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// A record still in progress whose expected date has already begun is delayed.
pub fn is_delayed(in_progress: bool, expected: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
    match expected {
        Some(date) if in_progress => day_start(date) < now,
        _ => false,
    }
}

/// True when `date` starts within `window_days` from `now`. A date whose start
/// has already passed never qualifies, so after midnight today's date is out.
pub fn is_expiring_soon(date: Option<NaiveDate>, now: DateTime<Utc>, window_days: i64) -> bool {
    let Some(date) = date else {
        return false;
    };
    let diff = day_start(date) - now;
    diff >= Duration::zero() && diff <= Duration::days(window_days)
}

pub fn is_low_stock(quantity: u32, threshold: u32) -> bool {
    quantity < threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    fn nov_10() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn expiring_within_window() {
        assert!(is_expiring_soon(date("2025-11-12"), nov_10(), 3));
        assert!(is_expiring_soon(date("2025-11-13"), nov_10(), 3));
        assert!(is_expiring_soon(date("2025-11-10"), nov_10(), 3));
    }

    #[test]
    fn not_expiring_outside_window_or_in_past() {
        assert!(!is_expiring_soon(date("2025-11-20"), nov_10(), 3));
        assert!(!is_expiring_soon(date("2025-11-09"), nov_10(), 3));
        assert!(!is_expiring_soon(None, nov_10(), 3));
    }

    #[test]
    fn window_is_configurable() {
        assert!(is_expiring_soon(date("2025-11-20"), nov_10(), 10));
        assert!(!is_expiring_soon(date("2025-11-12"), nov_10(), 1));
    }

    #[test]
    fn delayed_when_in_progress_and_past_expected() {
        assert!(is_delayed(true, date("2025-11-05"), nov_10()));
        assert!(!is_delayed(true, date("2025-11-15"), nov_10()));
    }

    #[test]
    fn never_delayed_when_done_or_undated() {
        assert!(!is_delayed(false, date("2025-11-05"), nov_10()));
        assert!(!is_delayed(true, None, nov_10()));
    }

    #[test]
    fn same_day_boundaries_after_midnight() {
        let morning = Utc.with_ymd_and_hms(2025, 11, 10, 8, 0, 0).unwrap();
        assert!(is_delayed(true, date("2025-11-10"), morning));
        assert!(!is_expiring_soon(date("2025-11-10"), morning, 3));
        assert!(is_expiring_soon(date("2025-11-11"), morning, 3));
        assert!(!is_expiring_soon(date("2025-11-14"), morning, 3));
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        assert!(is_low_stock(99, 100));
        assert!(!is_low_stock(100, 100));
    }
}
