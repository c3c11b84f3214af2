use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Weekday;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;

/// shop calendar: weekends plus a configured holiday set are
/// non-working days for build-date arithmetic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calendar {
    holidays: BTreeSet<NaiveDate>,
}

impl Calendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// step back n business days from a date. the starting date itself
    /// does not count as a step.
    pub fn back(&self, from: NaiveDate, n: u32) -> NaiveDate {
        let mut date = from;
        let mut left = n;
        while left > 0 {
            date = date.pred_opt().expect("date within calendar range");
            if self.is_workday(date) {
                left -= 1;
            }
        }
        date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn skips_weekends() {
        let cal = Calendar::default();
        // monday back one business day is friday
        assert!(cal.back(day(2026, 8, 3), 1) == day(2026, 7, 31));
    }

    #[test]
    fn skips_holidays() {
        let cal = Calendar::new([day(2026, 7, 3)]);
        // monday july 6 back one business day jumps the july 3 holiday
        assert!(cal.back(day(2026, 7, 6), 1) == day(2026, 7, 2));
    }

    #[test]
    fn zero_steps_is_identity() {
        let cal = Calendar::default();
        assert!(cal.back(day(2026, 8, 5), 0) == day(2026, 8, 5));
    }

    #[test]
    fn spans_multiple_weeks() {
        let cal = Calendar::default();
        // wednesday back six business days is the prior tuesday
        assert!(cal.back(day(2026, 8, 5), 6) == day(2026, 7, 28));
    }
}
