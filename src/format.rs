//! Label text for the active session and the history rows.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, FixedOffset, Local, Utc};
use std::fmt::Write;

use crate::session::Session;

/// Default clock layout: 24-hour hours and minutes.
pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M";

/// Text shown in place of the start time when nothing is running.
pub const NO_ACTIVE_INTERVAL: &str = "No active interval";

/// How timestamps are turned into clock text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat {
    clock_format: String,
    /// Fixed offset to render in; `None` renders in the local time zone.
    offset: Option<FixedOffset>,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::local(DEFAULT_CLOCK_FORMAT)
    }
}

impl TimeFormat {
    pub fn local(clock_format: impl Into<String>) -> Self {
        Self {
            clock_format: clock_format.into(),
            offset: None,
        }
    }

    pub fn fixed(clock_format: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            clock_format: clock_format.into(),
            offset: Some(offset),
        }
    }

    pub fn clock_format(&self) -> &str {
        &self.clock_format
    }

    /// Render `ts` with the configured layout.
    ///
    /// An unrenderable layout falls back to RFC 3339 instead of panicking;
    /// config validation rejects those layouts up front anyway.
    pub fn clock(&self, ts: DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = match self.offset {
            Some(offset) => write!(out, "{}", ts.with_timezone(&offset).format(&self.clock_format)),
            None => write!(out, "{}", ts.with_timezone(&Local).format(&self.clock_format)),
        };
        match written {
            Ok(()) => out,
            Err(_) => ts.to_rfc3339(),
        }
    }
}

/// Returns false when `layout` contains an unknown or malformed strftime specifier.
pub fn is_valid_clock_format(layout: &str) -> bool {
    !layout.is_empty() && !StrftimeItems::new(layout).any(|item| item == Item::Error)
}

// ============================================================================
// Durations
// ============================================================================

/// Round `d` to the nearest multiple of `unit`, halves away from zero.
pub fn round_duration(d: Duration, unit: Duration) -> Duration {
    let unit_ms = unit.num_milliseconds();
    if unit_ms <= 0 {
        return d;
    }
    let ms = d.num_milliseconds();
    let rem = ms % unit_ms;
    let truncated = ms - rem;
    let rounded = if rem.abs() * 2 >= unit_ms {
        truncated + unit_ms * ms.signum()
    } else {
        truncated
    };
    Duration::milliseconds(rounded)
}

/// Compact duration text: `0s`, `45s`, `2m30s`, `1h5m0s`.
///
/// Sub-second parts are dropped; callers round first.
pub fn format_duration_compact(d: Duration) -> String {
    let total = d.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

// ============================================================================
// Labels
// ============================================================================

/// Text for the two labels describing the running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLabels {
    pub session: String,
    pub duration: String,
}

/// Build the active-session labels as of `now`.
///
/// Elapsed time is rounded to the minute.
pub fn active_labels(
    active: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    format: &TimeFormat,
) -> ActiveLabels {
    match active {
        Some(started) => {
            let elapsed = round_duration(now.signed_duration_since(started), Duration::minutes(1));
            ActiveLabels {
                session: format!("Started: {}", format.clock(started)),
                duration: format!("Duration: {}", format_duration_compact(elapsed)),
            }
        }
        None => ActiveLabels {
            session: NO_ACTIVE_INTERVAL.to_string(),
            duration: String::new(),
        },
    }
}

/// Labels for one history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLabels {
    pub start: String,
    pub end: String,
    pub duration: String,
}

/// Build the labels for a history row. Duration is rounded to the second.
pub fn row_labels(session: &Session, format: &TimeFormat) -> RowLabels {
    let duration = round_duration(session.duration(), Duration::seconds(1));
    RowLabels {
        start: format!("Start: {}", format.clock(session.start)),
        end: format!("End: {}", format.clock(session.end)),
        duration: format!("Duration: {}", format_duration_compact(duration)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_format() -> TimeFormat {
        TimeFormat::fixed(DEFAULT_CLOCK_FORMAT, FixedOffset::east_opt(0).unwrap())
    }

    fn ts(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    // ========================================================================
    // Duration formatting
    // ========================================================================

    #[test]
    fn test_format_duration_compact() {
        assert_eq!(format_duration_compact(Duration::zero()), "0s");
        assert_eq!(format_duration_compact(Duration::seconds(45)), "45s");
        assert_eq!(format_duration_compact(Duration::seconds(150)), "2m30s");
        assert_eq!(format_duration_compact(Duration::minutes(65)), "1h5m0s");
        assert_eq!(format_duration_compact(Duration::hours(1)), "1h0m0s");
        assert_eq!(format_duration_compact(Duration::seconds(-90)), "-1m30s");
    }

    #[test]
    fn test_round_duration_half_away_from_zero() {
        let minute = Duration::minutes(1);
        assert_eq!(round_duration(Duration::seconds(29), minute), Duration::zero());
        assert_eq!(round_duration(Duration::seconds(30), minute), minute);
        assert_eq!(round_duration(Duration::seconds(89), minute), minute);
        assert_eq!(round_duration(Duration::seconds(-30), minute), -minute);
        assert_eq!(
            round_duration(Duration::milliseconds(1500), Duration::seconds(1)),
            Duration::seconds(2)
        );
    }

    #[test]
    fn test_round_duration_zero_unit_is_identity() {
        let d = Duration::milliseconds(1234);
        assert_eq!(round_duration(d, Duration::zero()), d);
    }

    // ========================================================================
    // Clock formatting
    // ========================================================================

    #[test]
    fn test_clock_in_fixed_offset() {
        let plus_two = TimeFormat::fixed("%H:%M", FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(plus_two.clock(ts(9, 5, 0)), "11:05");
        assert_eq!(utc_format().clock(ts(23, 59, 59)), "23:59");
    }

    #[test]
    fn test_custom_clock_format() {
        let f = TimeFormat::fixed("%H:%M:%S", FixedOffset::east_opt(0).unwrap());
        assert_eq!(f.clock(ts(8, 7, 6)), "08:07:06");
    }

    #[test]
    fn test_is_valid_clock_format() {
        assert!(is_valid_clock_format("%H:%M"));
        assert!(is_valid_clock_format("%I:%M %p"));
        assert!(!is_valid_clock_format(""));
        assert!(!is_valid_clock_format("%Q"));
    }

    // ========================================================================
    // Labels
    // ========================================================================

    #[test]
    fn test_active_labels_running() {
        let labels = active_labels(Some(ts(9, 0, 0)), ts(10, 14, 40), &utc_format());
        assert_eq!(labels.session, "Started: 09:00");
        assert_eq!(labels.duration, "Duration: 1h15m0s");
    }

    #[test]
    fn test_active_labels_just_started() {
        let labels = active_labels(Some(ts(9, 0, 0)), ts(9, 0, 10), &utc_format());
        assert_eq!(labels.duration, "Duration: 0s");
    }

    #[test]
    fn test_active_labels_idle() {
        let labels = active_labels(None, ts(9, 0, 0), &utc_format());
        assert_eq!(labels.session, "No active interval");
        assert_eq!(labels.duration, "");
    }

    #[test]
    fn test_row_labels() {
        let session = Session::new(ts(9, 0, 0), ts(10, 30, 15));
        let labels = row_labels(&session, &utc_format());
        assert_eq!(labels.start, "Start: 09:00");
        assert_eq!(labels.end, "End: 10:30");
        assert_eq!(labels.duration, "Duration: 1h30m15s");
    }
}
