use time::{Date, OffsetDateTime};

/// Source of the date stamped on rendered reports.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Reads the current UTC date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

/// Formats a date as `d/m/yyyy`, without zero padding.
pub fn format_report_date(date: Date) -> String {
    format!(
        "{}/{}/{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn formats_without_padding() {
        let date = Date::from_calendar_date(2024, Month::March, 5).expect("date");
        assert_eq!(format_report_date(date), "5/3/2024");
        assert_eq!(format_report_date(FixedClock(date).today()), "5/3/2024");
    }
}
