use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A resolved due moment. `has_time` distinguishes an explicit time from a
/// date-only value that was normalized to end of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DueMoment {
    pub when: NaiveDateTime,
    pub has_time: bool,
}

/// Resolve a raw due-date string to a sortable moment.
///
/// Date-only strings (`2024-06-01`) normalize to 23:59:59 so "due today"
/// sorts after every timed task that day. Date-time strings are taken as-is;
/// a trailing `Z` is ignored (moments are compared in local wall-clock terms).
pub fn resolve_due(raw: &str) -> Option<DueMoment> {
    if raw.contains('T') {
        parse_datetime(raw).map(|when| DueMoment {
            when,
            has_time: true,
        })
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
        let when = date.and_time(NaiveTime::from_hms_opt(23, 59, 59)?);
        Some(DueMoment {
            when,
            has_time: false,
        })
    }
}

/// Parse a `YYYY-MM-DDTHH:MM[:SS]` timestamp, tolerating a trailing `Z`.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Parse either a date-time or a plain date (midnight).
pub fn parse_date_loose(raw: &str) -> Option<NaiveDate> {
    if raw.contains('T') {
        parse_datetime(raw).map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}
