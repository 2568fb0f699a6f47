use crate::{domain::DayWindow, ports::clock::ClockPort};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Clock reading the system time, with days following the system timezone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn day_window(&self, instant: DateTime<Utc>) -> DayWindow {
        DayWindow::containing(&instant.with_timezone(&Local))
    }
}

/// Clock that only moves when told to
///
/// Clones share the same instant, so a test can keep a handle and move time forward after
/// handing the clock over. Calendar days follow the timezone of the instant it was given.
#[derive(Clone, Debug)]
pub struct FixedClock<Tz: TimeZone = FixedOffset> {
    now: Arc<Mutex<DateTime<Tz>>>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Tz>) {
        // A poisoned lock still holds a valid instant
        *self.now.lock().unwrap_or_else(|err| err.into_inner()) = now;
    }

    fn current(&self) -> DateTime<Tz> {
        self.now
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
}

impl<Tz: TimeZone> ClockPort for FixedClock<Tz> {
    fn now(&self) -> DateTime<Utc> {
        self.current().with_timezone(&Utc)
    }

    fn day_window(&self, instant: DateTime<Utc>) -> DayWindow {
        DayWindow::containing(&instant.with_timezone(&self.current().timezone()))
    }
}
