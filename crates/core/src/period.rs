use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-date range used to pre-filter a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// A range whose end precedes its start admits no dates at all.
    pub fn is_empty(self) -> bool {
        self.end < self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_contains() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        assert!(range.contains(date(2025, 1, 15)));
        assert!(range.contains(date(2025, 1, 1))); // inclusive start
        assert!(range.contains(date(2025, 1, 31))); // inclusive end
        assert!(!range.contains(date(2024, 12, 31)));
        assert!(!range.contains(date(2025, 2, 1)));
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(date(2025, 1, 2), date(2025, 1, 2));
        assert!(range.contains(date(2025, 1, 2)));
        assert!(!range.is_empty());
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(date(2025, 1, 3), date(2025, 1, 1));
        assert!(range.is_empty());
        assert!(!range.contains(date(2025, 1, 2)));
    }

    #[test]
    fn date_range_display() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 12, 31));
        assert_eq!(range.to_string(), "2025-01-01 to 2025-12-31");
    }
}
