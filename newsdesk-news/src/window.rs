//! Source-specific freshness windows

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};

/// The time range an adapter uses to select eligible articles
///
/// The window boundary and its timezone reference are adapter configuration;
/// downstream consumers accept pre-filtered articles without re-filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessWindow {
    /// Articles published on the current calendar day at a fixed UTC offset
    CalendarDay { offset: FixedOffset },
    /// Articles published within the trailing N hours
    TrailingHours(i64),
}

impl FreshnessWindow {
    /// Window covering today at the given UTC offset (hours east)
    pub fn calendar_day(utc_offset_hours: i32) -> Self {
        let seconds = utc_offset_hours.clamp(-23, 23) * 3600;
        // clamped range is always a representable offset
        let offset = FixedOffset::east_opt(seconds).expect("offset within ±23h");
        Self::CalendarDay { offset }
    }

    /// Earliest publication time still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            FreshnessWindow::CalendarDay { offset } => {
                let midnight = now
                    .with_timezone(offset)
                    .date_naive()
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is a valid time");
                midnight
                    .and_local_timezone(*offset)
                    .single()
                    .expect("fixed offsets map local times uniquely")
                    .with_timezone(&Utc)
            }
            FreshnessWindow::TrailingHours(hours) => now - TimeDelta::hours(*hours),
        }
    }

    /// Whether a publication time falls inside the window
    pub fn contains(&self, published_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        published_at >= self.cutoff(now)
    }

    /// The window's current local date (for date-stamped source URLs)
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            FreshnessWindow::CalendarDay { offset } => now.with_timezone(offset).date_naive(),
            FreshnessWindow::TrailingHours(_) => now.date_naive(),
        }
    }
}
