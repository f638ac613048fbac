//! Date parsing and calendar-month arithmetic.

use chrono::{Months, NaiveDate};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const ISO_DATE_LEN: usize = 10;

/// Parses the calendar date of a stored date or timestamp value.
///
/// Accepts `YYYY-MM-DD` and timestamps starting with it followed by `T` or
/// a space (`2024-01-01T08:30:00Z`, `2024-01-01 08:30:00`). The time part
/// is ignored. Returns `None` for anything else.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.get(..ISO_DATE_LEN)?;
    match trimmed[ISO_DATE_LEN..].chars().next() {
        None | Some('T') | Some('t') | Some(' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).ok()
}

/// Adds `months` calendar months, clamping to the last day of the target
/// month when it is shorter (Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` only when the result falls outside the supported range.
pub fn add_calendar_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Formats a date as ISO `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{add_calendar_months, format_date, parse_date};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn month_end_clamps_in_leap_and_common_years() {
        assert_eq!(add_calendar_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_calendar_months(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(add_calendar_months(date(2024, 3, 31), 1), Some(date(2024, 4, 30)));
    }

    #[test]
    fn day_of_month_is_preserved_when_it_fits() {
        assert_eq!(add_calendar_months(date(2023, 1, 15), 12), Some(date(2024, 1, 15)));
        assert_eq!(add_calendar_months(date(2024, 1, 1), 6), Some(date(2024, 7, 1)));
        assert_eq!(add_calendar_months(date(2024, 2, 29), 0), Some(date(2024, 2, 29)));
    }

    #[test]
    fn parse_date_takes_calendar_date_of_timestamps() {
        assert_eq!(parse_date("2024-01-01"), Some(date(2024, 1, 1)));
        assert_eq!(parse_date(" 2024-01-01T23:59:59Z "), Some(date(2024, 1, 1)));
        assert_eq!(parse_date("2024-01-01 08:00:00"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn parse_date_rejects_malformed_values() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("01/15/2023"), None);
        assert_eq!(parse_date("2024-01-015"), None);
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn format_date_is_iso() {
        assert_eq!(format_date(date(2024, 7, 1)), "2024-07-01");
    }
}
