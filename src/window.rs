//! Block window derivation from a kickoff instant.
//!
//! Kickoffs are converted to the home nation's civil time. A plausible kickoff
//! (between noon and 21:00 local, inclusive) gets a block from 1h30m before to
//! 4h after. Anything outside that range is a provisional placeholder upstream,
//! so the whole afternoon of that local date is blocked instead.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Time before kickoff the block starts.
pub const LEAD_TIME: Duration = Duration::minutes(90);
/// Time after kickoff the block ends.
pub const TRAIL_TIME: Duration = Duration::hours(4);

pub const PLAUSIBLE_FROM: NaiveTime = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
pub const PLAUSIBLE_UNTIL: NaiveTime = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
pub const FALLBACK_START: NaiveTime = NaiveTime::from_hms_opt(13, 30, 0).unwrap();
pub const FALLBACK_END: NaiveTime = NaiveTime::from_hms_opt(19, 0, 0).unwrap();

/// Start and end of a calendar block, in the destination timezone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// True when the kickoff was implausible and the fixed afternoon was used.
    pub fallback: bool,
}

impl BlockWindow {
    /// ISO-8601 with an explicit offset, e.g. `2024-08-10T12:30:00+01:00`.
    pub fn start_rfc3339(&self) -> String {
        format_offset(&self.start)
    }

    pub fn end_rfc3339(&self) -> String {
        format_offset(&self.end)
    }
}

/// Compute the block window for a kickoff.
pub fn block_window(kickoff: DateTime<Utc>, tz: Tz) -> BlockWindow {
    let local = kickoff.with_timezone(&tz);
    let time_of_day = local.time();

    if time_of_day < PLAUSIBLE_FROM || time_of_day > PLAUSIBLE_UNTIL {
        let date = local.date_naive();
        return BlockWindow {
            start: local_at(tz, date, FALLBACK_START),
            end: local_at(tz, date, FALLBACK_END),
            fallback: true,
        };
    }

    BlockWindow {
        start: local - LEAD_TIME,
        end: local + TRAIL_TIME,
        fallback: false,
    }
}

/// Resolve a wall-clock time on a date. Ambiguous times take the earlier
/// instant; times skipped by a forward transition move on by an hour.
fn local_at(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}

fn format_offset(dt: &DateTime<Tz>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}
