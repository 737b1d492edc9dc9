//! Business-hours gate for the `business_hours_closed` reply rule (§4.6).

use chrono::{DateTime, Timelike, Utc, Weekday};

/// A weekday 09:00-17:00-style window, evaluated against the `DateTime<Utc>`
/// the caller supplies. Comparisons operate on the hour of the given
/// timestamp as-is; converting to the business's local timezone before
/// calling is the caller's responsibility (out of scope: this module only
/// implements the open/closed predicate, §4.6 step 4).
#[derive(Debug, Clone, Copy)]
pub struct BusinessHours {
    pub open_hour: u32,
    pub close_hour: u32,
    pub weekdays_only: bool,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self { open_hour: 9, close_hour: 17, weekdays_only: true }
    }
}

impl BusinessHours {
    pub fn new(open_hour: u32, close_hour: u32, weekdays_only: bool) -> Self {
        Self { open_hour, close_hour, weekdays_only }
    }

    /// Whether `now` falls inside the configured window.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if self.weekdays_only && matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let hour = now.hour();
        hour >= self.open_hour && hour < self.close_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn weekday_inside_window_is_open() {
        let hours = BusinessHours::default();
        let wednesday_noon = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        assert!(hours.is_open(wednesday_noon));
    }

    #[test]
    fn weekday_outside_window_is_closed() {
        let hours = BusinessHours::default();
        let wednesday_8am = Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap();
        assert!(!hours.is_open(wednesday_8am));
    }

    #[test]
    fn weekend_is_closed_regardless_of_hour() {
        let hours = BusinessHours::default();
        let saturday_noon = Utc.with_ymd_and_hms(2024, 1, 6, 12, 0, 0).unwrap();
        assert!(!hours.is_open(saturday_noon));
    }
}
