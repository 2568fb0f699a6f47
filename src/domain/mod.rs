use chrono::{DateTime, Duration, NaiveDate, Offset, TimeZone, Timelike, Utc};
use uuid::Uuid;

#[cfg(test)]
pub(crate) mod test_zone;

/// Maximum distance between a member and a gym for a check-in to be accepted
pub const MAX_DISTANCE_KM: f64 = 0.1;

/// Radius used when looking for gyms around a member
pub const NEARBY_GYMS_RADIUS_KM: f64 = 10.0;

/// Number of minutes after its creation during which a check-in can still be validated
pub const CHECK_IN_VALIDATION_WINDOW_MINUTES: i64 = 20;

/// Number of items returned per page by listing operations
pub const PAGE_SIZE: usize = 20;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Physical gym location
#[derive(Clone, Debug, PartialEq)]
pub struct Gym {
    /// Unique identifier for the `Gym`
    pub gym_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Gym {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Attendance of a member at a gym
#[derive(Clone, Debug, PartialEq)]
pub struct CheckIn {
    pub check_in_id: Uuid,
    pub user_id: Uuid,
    pub gym_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Set once a gym staff member confirms the check-in
    ///
    /// This is `None` until the check-in is validated.
    pub validated_at: Option<DateTime<Utc>>,
}

impl CheckIn {
    pub fn new(user_id: Uuid, gym_id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            check_in_id: Uuid::new_v4(),
            user_id,
            gym_id,
            created_at,
            validated_at: None,
        }
    }

    /// Whether the check-in can still be validated at the given instant
    pub fn is_validation_window_open(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_minutes() <= CHECK_IN_VALIDATION_WINDOW_MINUTES
    }
}

/// Point on the surface of the earth, in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components fall within their valid range
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to another coordinate, in kilometers
    ///
    /// Uses the spherical law of cosines, which is accurate enough at the scale of a gym.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        if self == other {
            return 0.0;
        }

        let from_lat = self.latitude.to_radians();
        let to_lat = other.latitude.to_radians();
        let delta_lon = (self.longitude - other.longitude).to_radians();

        let cosine =
            from_lat.sin() * to_lat.sin() + from_lat.cos() * to_lat.cos() * delta_lon.cos();

        // Rounding can push the cosine slightly above 1 for very close points
        cosine.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
    }
}

/// Calendar day in the local time of an instant, as a half-open UTC interval
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayWindow {
    /// Local midnight, inclusive
    pub start: DateTime<Utc>,
    /// Next local midnight, exclusive
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Day of `instant` in its own timezone
    ///
    /// Both bounds are resolved in that timezone, so the window is 23 or 25 hours long on days
    /// when daylight saving time starts or ends.
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let timezone = instant.timezone();
        let date = instant.date_naive();
        let start = start_of_day(&timezone, date);
        let end = date
            .succ_opt()
            .and_then(|next| start_of_day(&timezone, next));

        match (start, end) {
            (Some(start), Some(end)) => Self { start, end },
            // Edge of the representable calendar: fall back to the offset in force at `instant`
            _ => {
                let instant = instant.with_timezone(&instant.offset().fix());
                let since_midnight = Duration::seconds(instant.num_seconds_from_midnight() as i64)
                    + Duration::nanoseconds(instant.nanosecond() as i64);
                let start = (instant - since_midnight).with_timezone(&Utc);
                Self {
                    start,
                    end: start + Duration::days(1),
                }
            }
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// First instant of `date` in `timezone`
///
/// Some timezones skip midnight when daylight saving time starts, in which case the day begins
/// at the end of the gap.
fn start_of_day<Tz: TimeZone>(timezone: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..=8)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|local| timezone.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
}

/// Zero-based offset of the first item of a one-based page
pub fn page_offset(page: u32) -> usize {
    (page.max(1) as usize - 1) * PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::test_zone::Eastern2023;
    use chrono::FixedOffset;
    use rstest::*;
    use speculoos::prelude::*;

    fn brasilia() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    #[test]
    fn test_distance_same_point() {
        let gym = Coordinate::new(-16.2846479, -48.9589726);

        assert_that!(gym.distance_to(&gym)).is_equal_to(0.0);
    }

    #[test]
    fn test_distance_distant_gym() {
        let gym = Coordinate::new(-16.2967057, -48.909269);
        let user = Coordinate::new(-16.2846479, -48.9589726);

        let distance = gym.distance_to(&user);

        assert_that!(distance).is_greater_than(5.0);
        assert_that!(distance).is_less_than(6.0);
        // Distance is symmetric
        assert_that!((distance - user.distance_to(&gym)).abs()).is_less_than(1e-9);
    }

    #[rstest]
    // ~55 meters north
    #[case(-16.2841479, -48.9589726, true)]
    // ~111 meters north
    #[case(-16.2836479, -48.9589726, false)]
    // ~85 meters east
    #[case(-16.2846479, -48.9581726, true)]
    fn test_distance_geofence(#[case] latitude: f64, #[case] longitude: f64, #[case] inside: bool) {
        let gym = Coordinate::new(-16.2846479, -48.9589726);
        let user = Coordinate::new(latitude, longitude);

        assert_that!(gym.distance_to(&user) <= MAX_DISTANCE_KM).is_equal_to(inside);
    }

    #[rstest]
    #[case(0.0, 0.0, true)]
    #[case(90.0, 180.0, true)]
    #[case(-90.0, -180.0, true)]
    #[case(90.1, 0.0, false)]
    #[case(0.0, -180.5, false)]
    fn test_coordinate_is_valid(#[case] latitude: f64, #[case] longitude: f64, #[case] valid: bool) {
        assert_that!(Coordinate::new(latitude, longitude).is_valid()).is_equal_to(valid);
    }

    #[test]
    fn test_day_window_local_midnight() {
        let now = brasilia()
            .with_ymd_and_hms(2023, 1, 20, 22, 30, 0)
            .unwrap();

        let window = DayWindow::containing(&now);

        // Local midnight in UTC-3 is 03:00 UTC
        assert_that!(window.start)
            .is_equal_to(Utc.with_ymd_and_hms(2023, 1, 20, 3, 0, 0).unwrap());
        assert_that!(window.end).is_equal_to(Utc.with_ymd_and_hms(2023, 1, 21, 3, 0, 0).unwrap());
        assert_that!(window.contains(now.with_timezone(&Utc))).is_true();
        assert_that!(window.contains(window.end)).is_false();
        assert_that!(window.contains(window.start)).is_true();
    }

    #[test]
    fn test_day_window_daylight_saving_ends() {
        // Clocks go back from 02:00 EDT to 01:00 EST on 2023-11-05
        let late = Eastern2023.with_ymd_and_hms(2023, 11, 5, 23, 45, 0).unwrap();
        let early = Eastern2023.with_ymd_and_hms(2023, 11, 5, 0, 30, 0).unwrap();

        let window = DayWindow::containing(&late);

        assert_that!(window.start).is_equal_to(Utc.with_ymd_and_hms(2023, 11, 5, 4, 0, 0).unwrap());
        assert_that!(window.end).is_equal_to(Utc.with_ymd_and_hms(2023, 11, 6, 5, 0, 0).unwrap());
        assert_that!(window.contains(early.with_timezone(&Utc))).is_true();
        assert_that!(DayWindow::containing(&early)).is_equal_to(window);
    }

    #[test]
    fn test_day_window_daylight_saving_starts() {
        // Clocks go forward from 02:00 EST to 03:00 EDT on 2023-03-12
        let now = Eastern2023.with_ymd_and_hms(2023, 3, 12, 8, 0, 0).unwrap();
        let next_day = Eastern2023.with_ymd_and_hms(2023, 3, 13, 0, 30, 0).unwrap();

        let window = DayWindow::containing(&now);

        assert_that!(window.start).is_equal_to(Utc.with_ymd_and_hms(2023, 3, 12, 5, 0, 0).unwrap());
        assert_that!(window.end).is_equal_to(Utc.with_ymd_and_hms(2023, 3, 13, 4, 0, 0).unwrap());
        assert_that!(window.contains(next_day.with_timezone(&Utc))).is_false();
    }

    #[test]
    fn test_validation_window() {
        let created_at = Utc.with_ymd_and_hms(2023, 1, 20, 8, 0, 0).unwrap();
        let check_in = CheckIn::new(Uuid::new_v4(), Uuid::new_v4(), created_at);

        assert_that!(check_in.is_validation_window_open(created_at + Duration::minutes(20)))
            .is_true();
        assert_that!(check_in.is_validation_window_open(created_at + Duration::minutes(21)))
            .is_false();
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 20)]
    #[case(3, 40)]
    fn test_page_offset(#[case] page: u32, #[case] expected: usize) {
        assert_that!(page_offset(page)).is_equal_to(expected);
    }
}
