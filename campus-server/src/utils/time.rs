//! Date helpers
//!
//! Calendar dates travel as `YYYY-MM-DD` strings; "today" and month
//! boundaries use the server's local clock.

use chrono::{Datelike, Local, NaiveDate};
use shared::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::validation(format!("invalid date '{value}', expected YYYY-MM-DD"))
            .with_detail("field", "date")
    })
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_string() -> String {
    today().format(DATE_FORMAT).to_string()
}

pub fn is_future(date: NaiveDate) -> bool {
    date > today()
}

fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// `[start, end)` of the current calendar month in unix milliseconds.
pub fn current_month_bounds_millis() -> (i64, i64) {
    let now = today();
    let start = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now);
    let end = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    }
    .unwrap_or(start);
    (start_of_day_millis(start), start_of_day_millis(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn test_future_detection() {
        assert!(!is_future(today()));
        assert!(is_future(today() + chrono::Days::new(1)));
        assert!(!is_future(today() - chrono::Days::new(1)));
    }

    #[test]
    fn test_month_bounds_ordered() {
        let (start, end) = current_month_bounds_millis();
        assert!(start < end);
        let now = shared::util::now_millis();
        assert!(start <= now && now < end);
    }
}
