//! Calendar arithmetic for the puzzle's date space.

use chrono::Datelike;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1..=12) during `year`.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => panic!("month out of range: {month}"),
    }
}

/// Whether `(year, month, day)` names a real date.
pub fn is_valid_date(year: i32, month: u8, day: u8) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
}

/// Weekday of `(year, month, day)`, `0 == Monday` through `6 == Sunday`.
pub fn weekday_of(year: i32, month: u8, day: u8) -> u8 {
    debug_assert!(is_valid_date(year, month, day));

    chrono::NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("caller has already validated the date")
        .weekday()
        .num_days_from_monday() as u8
}

/// Iterate every valid (month, day) pair for a year, in calendar order.
pub fn dates_in_year(year: i32) -> impl Iterator<Item = (u8, u8)> {
    (1..=12u8).flat_map(move |month| (1..=days_in_month(year, month)).map(move |day| (month, day)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2032));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn known_weekdays() {
        // 2000-01-01 was a Saturday.
        assert_eq!(weekday_of(2000, 1, 1), 5);
        // 2023-01-01 was a Sunday.
        assert_eq!(weekday_of(2023, 1, 1), 6);
        // 2032-02-29 is a Sunday.
        assert_eq!(weekday_of(2032, 2, 29), 6);
    }

    #[test]
    fn rejects_february_thirtieth() {
        assert!(!is_valid_date(2023, 2, 30));
        assert!(is_valid_date(2024, 2, 29));
        assert!(!is_valid_date(2023, 2, 29));
    }

    #[test]
    fn dates_in_year_counts_leap_and_common_years() {
        assert_eq!(dates_in_year(2023).count(), 365);
        assert_eq!(dates_in_year(2024).count(), 366);
    }
}
