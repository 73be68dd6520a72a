//! Quiet-hours window and daily alignment.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};

/// Daily local-time window during which no proactive delivery happens.
///
/// The window is `[start, end)`. When `start > end` it wraps midnight;
/// when `start == end` it is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl QuietHours {
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// Local time at which the window opens for deliveries again.
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether `time` falls inside the quiet window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start == self.end {
            false
        } else if self.start < self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }

    /// Whether the local instant `now` falls inside the quiet window.
    #[must_use]
    pub fn is_quiet(&self, now: DateTime<FixedOffset>) -> bool {
        self.contains(now.time())
    }

    /// Next time the delivery window opens, strictly after `now` on the
    /// clock face: today if `now` is still before the opening, else tomorrow.
    #[must_use]
    pub fn next_opening(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let day = if now.time() < self.end {
            now.date_naive()
        } else {
            now.date_naive() + Duration::days(1)
        };

        let naive = day.and_time(self.end);
        now.offset()
            .from_local_datetime(&naive)
            .single()
            .unwrap_or_else(|| now + Duration::days(1))
    }
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msk(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn wrapping_window_covers_night() {
        let quiet = QuietHours::default();
        assert!(quiet.contains(t(23, 0)));
        assert!(quiet.contains(t(23, 30)));
        assert!(quiet.contains(t(3, 0)));
        assert!(quiet.contains(t(7, 59)));
        assert!(!quiet.contains(t(8, 0)));
        assert!(!quiet.contains(t(22, 59)));
    }

    #[test]
    fn daytime_window_is_half_open() {
        let quiet = QuietHours::new(t(13, 0), t(14, 0));
        assert!(quiet.contains(t(13, 0)));
        assert!(!quiet.contains(t(14, 0)));
        assert!(!quiet.contains(t(12, 59)));
    }

    #[test]
    fn equal_bounds_mean_never_quiet() {
        let quiet = QuietHours::new(t(8, 0), t(8, 0));
        assert!(!quiet.contains(t(8, 0)));
        assert!(!quiet.contains(t(2, 0)));
    }

    #[test]
    fn next_opening_is_today_before_window_end() {
        let quiet = QuietHours::default();
        assert_eq!(quiet.next_opening(msk(2024, 5, 10, 2, 0)), msk(2024, 5, 10, 8, 0));
    }

    #[test]
    fn next_opening_is_tomorrow_after_window_end() {
        let quiet = QuietHours::default();
        assert_eq!(quiet.next_opening(msk(2024, 5, 10, 8, 0)), msk(2024, 5, 11, 8, 0));
        assert_eq!(quiet.next_opening(msk(2024, 5, 10, 23, 30)), msk(2024, 5, 11, 8, 0));
    }

    #[test]
    fn next_opening_crosses_month_end() {
        let quiet = QuietHours::default();
        assert_eq!(quiet.next_opening(msk(2024, 5, 31, 12, 0)), msk(2024, 6, 1, 8, 0));
    }
}
