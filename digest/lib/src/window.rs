//! Report window derived from the lookback setting.

use chrono::{DateTime, Duration, Utc};

/// The `[start, end]` period a digest covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Window ending at `now` and reaching back `since_days` days.
    ///
    /// A zero or negative `since_days` produces an empty or inverted window;
    /// rejecting that is left to the caller. A lookback beyond chrono's range
    /// saturates at the earliest (or latest) representable instant.
    ///
    /// ## Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use digest_lib::ReportWindow;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();
    /// let window = ReportWindow::ending_at(now, 7);
    /// assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    /// assert_eq!(window.end, now);
    /// ```
    pub fn ending_at(now: DateTime<Utc>, since_days: i64) -> Self {
        let start = Duration::try_days(since_days)
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .unwrap_or(if since_days > 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });

        Self { start, end: now }
    }

    /// Window ending at the current wall-clock time.
    pub fn from_now(since_days: i64) -> Self {
        Self::ending_at(Utc::now(), since_days)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}
