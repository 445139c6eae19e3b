// Timestamp resolution for sensor-export date/time pairs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Absolute instant in epoch milliseconds (UTC-naive, as exported)
pub type Instant = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("date text is empty")]
    MissingDate,
    #[error("time text is empty")]
    MissingTime,
    #[error("expected three date parts, found {0}")]
    DateParts(usize),
    #[error("date part '{0}' is not numeric")]
    NonNumericPart(String),
    #[error("'{date} {time}' is not a valid calendar date/time")]
    InvalidDateTime { date: String, time: String },
}

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// Resolve a raw (date, time) pair into an instant.
///
/// Day/month order is inferred per value: a second part above 12 means
/// month/day/year, a first part above 12 means day/month/year, and anything
/// ambiguous (both parts <= 12) is read as month/day/year. `05/05/24` and
/// similar pairs therefore always resolve as month first.
pub fn resolve(date_text: &str, time_text: &str) -> Result<Instant, TimestampError> {
    let date_text = date_text.trim();
    let time_text = time_text.trim();
    if date_text.is_empty() {
        return Err(TimestampError::MissingDate);
    }
    if time_text.is_empty() {
        return Err(TimestampError::MissingTime);
    }

    let parts: Vec<&str> = date_text.split(['/', '-']).collect();
    if parts.len() != 3 {
        return Err(TimestampError::DateParts(parts.len()));
    }

    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        let part = part.trim();
        *slot = part
            .parse()
            .map_err(|_| TimestampError::NonNumericPart(part.to_string()))?;
    }
    let [first, second, mut year] = numbers;

    let (month, day) = if second > 12 && first <= 12 {
        (first, second)
    } else if first > 12 && second <= 12 {
        (second, first)
    } else {
        (first, second)
    };

    if year < 100 {
        year += 2000;
    }

    let invalid = || TimestampError::InvalidDateTime {
        date: date_text.to_string(),
        time: time_text.to_string(),
    };

    let date = i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(invalid)?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time_text, fmt).ok())
        .ok_or_else(invalid)?;

    Ok(NaiveDateTime::new(date, time).and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, DateTime, Timelike};

    fn civil(instant: Instant) -> (i32, u32, u32, u32, u32) {
        let dt = DateTime::from_timestamp_millis(instant).unwrap();
        (dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute())
    }

    #[test]
    fn test_first_part_above_twelve_is_day() {
        let t = resolve("15/03/24", "10:00").unwrap();
        assert_eq!(civil(t), (2024, 3, 15, 10, 0));
    }

    #[test]
    fn test_second_part_above_twelve_is_day() {
        let t = resolve("03/15/24", "10:00").unwrap();
        assert_eq!(civil(t), (2024, 3, 15, 10, 0));
    }

    #[test]
    fn test_ambiguous_defaults_to_month_first() {
        let t = resolve("04/05/2024", "08:30:15").unwrap();
        assert_eq!(civil(t), (2024, 4, 5, 8, 30));

        let t = resolve("05-05-24", "23:59").unwrap();
        assert_eq!(civil(t), (2024, 5, 5, 23, 59));
    }

    #[test]
    fn test_four_digit_year_is_kept() {
        let t = resolve("1-2-1999", " 00:00 ").unwrap();
        assert_eq!(civil(t), (1999, 1, 2, 0, 0));
    }

    #[test]
    fn test_fractional_seconds() {
        let whole = resolve("03/15/24", "10:00:00").unwrap();
        let t = resolve("03/15/24", "10:00:00.500").unwrap();
        assert_eq!(civil(t), (2024, 3, 15, 10, 0));
        assert_eq!(t - whole, 500);
    }

    #[test]
    fn test_empty_inputs_fail() {
        assert_eq!(resolve("", "10:00"), Err(TimestampError::MissingDate));
        assert_eq!(resolve("03/15/24", ""), Err(TimestampError::MissingTime));
        assert_eq!(resolve("  ", "10:00"), Err(TimestampError::MissingDate));
    }

    #[test]
    fn test_malformed_dates_fail() {
        assert_eq!(resolve("03/15", "10:00"), Err(TimestampError::DateParts(2)));
        assert!(matches!(
            resolve("03/xx/24", "10:00"),
            Err(TimestampError::NonNumericPart(_))
        ));
        // both parts above twelve leaves month 13
        assert!(matches!(
            resolve("13/14/24", "10:00"),
            Err(TimestampError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            resolve("02/30/24", "10:00"),
            Err(TimestampError::InvalidDateTime { .. })
        ));
        assert!(matches!(
            resolve("03/15/24", "25:00"),
            Err(TimestampError::InvalidDateTime { .. })
        ));
    }
}
