//! US Eastern time with its 2023 daylight saving rules.

use chrono::{Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

#[derive(Clone, Copy, Debug)]
pub struct Eastern2023;

fn est() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

fn edt() -> FixedOffset {
    FixedOffset::west_opt(4 * 3600).unwrap()
}

impl TimeZone for Eastern2023 {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        Eastern2023
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        // An offset is valid for a wall-clock time when it maps back onto itself
        let valid: Vec<FixedOffset> = [edt(), est()]
            .into_iter()
            .filter(|offset| {
                let utc = *local - Duration::seconds(offset.local_minus_utc() as i64);
                self.offset_from_utc_datetime(&utc) == *offset
            })
            .collect();

        match valid.as_slice() {
            [offset] => LocalResult::Single(*offset),
            [earliest, latest] => LocalResult::Ambiguous(*earliest, *latest),
            _ => LocalResult::None,
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        // 2023-03-12 02:00 EST and 2023-11-05 02:00 EDT
        let dst_start = NaiveDate::from_ymd_opt(2023, 3, 12)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let dst_end = NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();

        if dst_start <= *utc && *utc < dst_end {
            edt()
        } else {
            est()
        }
    }
}
