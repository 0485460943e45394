use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset, TimeZone};

pub const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_WEEK: i64 = 7;

/// Monday 00:00:00 through Sunday 23:59:59 of the week containing a moment,
/// as inclusive unix timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    pub start: i64,
    pub end: i64,
    first_day: NaiveDate,
}

impl WeekBounds {
    /// Week containing `now`, measured in `now`'s own timezone
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let first_day = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let start = local_midnight_timestamp(now, first_day);

        Self {
            start,
            end: start + DAYS_PER_WEEK * SECONDS_PER_DAY - 1,
            first_day,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Day-start timestamps of the seven days, stepping whole days from `start`
    pub fn day_starts(&self) -> impl Iterator<Item = i64> + '_ {
        (0..DAYS_PER_WEEK).map(move |day| self.start + day * SECONDS_PER_DAY)
    }

    /// Human label such as "2026-10-12 to 2026-10-18"
    pub fn label(&self) -> String {
        let last_day = self.first_day + Duration::days(DAYS_PER_WEEK - 1);
        format!(
            "{} to {}",
            self.first_day.format("%Y-%m-%d"),
            last_day.format("%Y-%m-%d")
        )
    }
}

fn local_midnight_timestamp<Tz: TimeZone>(now: &DateTime<Tz>, day: NaiveDate) -> i64 {
    let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
    match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp(),
        // Midnight skipped by a DST jump: fall back to the current offset
        None => midnight.and_utc().timestamp() - now.offset().fix().local_minus_utc() as i64,
    }
}
