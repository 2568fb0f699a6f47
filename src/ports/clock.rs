use chrono::{DateTime, Utc};

use crate::domain::DayWindow;

/// Source of the current instant, and of the timezone that decides calendar days
#[mockall::automock]
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;
    /// Local calendar day containing `instant`
    fn day_window(&self, instant: DateTime<Utc>) -> DayWindow;
}
