//! Calendar helpers for windows, streaks, and duration display.
//!
//! Every function takes an explicit reference day instead of reading the
//! system clock, so report math stays deterministic under test.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};

/// Today as a UTC calendar day.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The last `n` days ending at `end`, oldest first.
#[must_use]
pub fn last_n_days(n: u64, end: NaiveDate) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(back)))
        .collect()
}

/// The last `n` months ending at `end`'s month, oldest first, as
/// `(year, month)` pairs.
#[must_use]
pub fn last_n_months(n: u32, end: NaiveDate) -> Vec<(i32, u32)> {
    (0..n)
        .rev()
        .filter_map(|back| end.checked_sub_months(Months::new(back)))
        .map(|d| (d.year(), d.month()))
        .collect()
}

/// Formats whole minutes as `0m`, `45m`, `2h`, or `1h 30m`.
#[must_use]
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Longest unbroken run of consecutive days with a log, counting strictly
/// back from `today`. Any gap terminates the streak.
#[must_use]
pub fn calc_streak(log_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = log_dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let mut streak = 0;
    let mut check = today;
    for date in dates.into_iter().rev() {
        if date != check {
            break;
        }
        streak += 1;
        let Some(prev) = check.checked_sub_days(Days::new(1)) else {
            break;
        };
        check = prev;
    }
    streak
}

/// Whether a due date has passed relative to `today`.
#[must_use]
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn last_n_days_is_oldest_first() {
        let days = last_n_days(3, d(2025, 3, 1));
        assert_eq!(days, [d(2025, 2, 27), d(2025, 2, 28), d(2025, 3, 1)]);
    }

    #[test]
    fn last_n_months_crosses_year_boundary() {
        let months = last_n_months(3, d(2025, 1, 15));
        assert_eq!(months, [(2024, 11), (2024, 12), (2025, 1)]);
    }

    #[test]
    fn streak_counts_consecutive_days_from_today() {
        let today = d(2025, 6, 3);
        let dates = [d(2025, 6, 3), d(2025, 6, 2), d(2025, 6, 1)];
        assert_eq!(calc_streak(&dates, today), 3);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let today = d(2025, 6, 3);
        // Yesterday missing: only today counts
        let dates = [d(2025, 6, 3), d(2025, 6, 1)];
        assert_eq!(calc_streak(&dates, today), 1);
    }

    #[test]
    fn streak_is_zero_without_a_log_today() {
        let today = d(2025, 6, 3);
        assert_eq!(calc_streak(&[], today), 0);
        assert_eq!(calc_streak(&[d(2025, 6, 2)], today), 0);
    }

    #[test]
    fn streak_ignores_duplicate_days() {
        let today = d(2025, 6, 3);
        let dates = [d(2025, 6, 3), d(2025, 6, 3), d(2025, 6, 2)];
        assert_eq!(calc_streak(&dates, today), 2);
    }

    #[test]
    fn format_minutes_variants() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        let today = d(2025, 6, 3);
        assert!(is_overdue(d(2025, 6, 2), today));
        assert!(!is_overdue(today, today));
        assert!(!is_overdue(d(2025, 6, 4), today));
    }
}
