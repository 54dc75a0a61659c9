use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

pub const INVALID_DATE: &str = "Invalid Date";

/// Zone in which calendar components are read and timestamps are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
}

enum ParsedTimestamp {
    Zoned(DateTime<FixedOffset>),
    /// No offset: wall-clock time in whatever zone the reader is in.
    Floating(NaiveDateTime),
    /// Bare dates are midnight UTC.
    DateOnly(NaiveDate),
}

fn parse(raw: &str) -> Option<ParsedTimestamp> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedTimestamp::Zoned(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ParsedTimestamp::Floating(naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(ParsedTimestamp::DateOnly)
}

impl ParsedTimestamp {
    fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDateTime> {
        match self {
            ParsedTimestamp::Zoned(dt) => Some(dt.with_timezone(tz).naive_local()),
            ParsedTimestamp::Floating(naive) => Some(*naive),
            ParsedTimestamp::DateOnly(date) => {
                let midnight = date.and_hms_opt(0, 0, 0)?;
                Some(
                    chrono::Utc
                        .from_utc_datetime(&midnight)
                        .with_timezone(tz)
                        .naive_local(),
                )
            }
        }
    }
}

impl DisplayZone {
    pub fn wall_clock(&self, raw: &str) -> Option<NaiveDateTime> {
        let parsed = parse(raw)?;
        match self {
            DisplayZone::Local => parsed.in_zone(&chrono::Local),
            DisplayZone::Utc => parsed.in_zone(&chrono::Utc),
        }
    }

    pub fn day_of_month(&self, raw: &str) -> Option<u32> {
        self.wall_clock(raw).map(|dt| dt.day())
    }

    /// Formats like an en-US locale string, e.g. `1/15/2024, 12:00:00 AM`.
    pub fn format_locale(&self, raw: &str) -> String {
        self.wall_clock(raw)
            .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }
}
