use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SecondsFormat, Timelike};

pub type Timestamp = DateTime<FixedOffset>;

/// Fixed layout of EXIF date fields, e.g. `2016:03:04 10:00:00`.
pub const EXIF_TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// EXIF fields whose value is a timestamp in [`EXIF_TIMESTAMP_FORMAT`].
pub const TIMESTAMP_FIELDS: &[&str] = &["DateTime", "DateTimeOriginal", "DateTimeDigitized"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampProperty {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
    Unix,
    Weekday,
    Offset,
    Full,
}

impl TimestampProperty {
    pub fn parse(property: Option<&str>) -> Self {
        match property {
            Some("Year") => Self::Year,
            Some("Month") => Self::Month,
            Some("Day") => Self::Day,
            Some("Hour") => Self::Hour,
            Some("Minute") => Self::Minute,
            Some("Second") => Self::Second,
            Some("Nanosecond") => Self::Nanosecond,
            Some("Unix") => Self::Unix,
            Some("Weekday") => Self::Weekday,
            Some("Offset") => Self::Offset,
            _ => Self::Full,
        }
    }
}

pub fn is_timestamp_field(field: &str) -> bool {
    TIMESTAMP_FIELDS.contains(&field)
}

pub fn format_timestamp(timestamp: &Timestamp, property: TimestampProperty) -> String {
    match property {
        TimestampProperty::Year => format!("{:04}", timestamp.year()),
        TimestampProperty::Month => format!("{:02}", timestamp.month()),
        TimestampProperty::Day => format!("{:02}", timestamp.day()),
        TimestampProperty::Hour => format!("{:02}", timestamp.hour()),
        TimestampProperty::Minute => format!("{:02}", timestamp.minute()),
        TimestampProperty::Second => format!("{:02}", timestamp.second()),
        TimestampProperty::Nanosecond => timestamp.nanosecond().to_string(),
        TimestampProperty::Unix => timestamp.timestamp().to_string(),
        TimestampProperty::Weekday => timestamp.format("%A").to_string(),
        TimestampProperty::Offset => zone_name(timestamp),
        TimestampProperty::Full => timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
    }
}

/// Parses an EXIF timestamp. The value carries no zone, so it is taken as UTC.
pub fn parse_exif_timestamp(raw: &str) -> Option<Timestamp> {
    let normalized = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(normalized, EXIF_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

fn zone_name(timestamp: &Timestamp) -> String {
    if timestamp.offset().local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        timestamp.format("%:z").to_string()
    }
}
